//! Core types and trait definitions for the Hive question-and-answer service.
//!
//! This crate has no HTTP or database dependencies. The
//! storage backend is reached through [`store::ForumStore`], draft generation
//! through [`draft::DraftGenerator`], and markdown sanitisation through a plain
//! function pointer. [`forum::Forum`] ties them together.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod answer;
pub mod draft;
pub mod error;
pub mod forum;
pub mod page;
pub mod query;
pub mod question;
pub mod store;
pub mod user;
pub mod vote;

pub use error::{Error, Result};
