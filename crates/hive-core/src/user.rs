//! Users and the authenticated identity they are resolved from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller as asserted by the external auth boundary. Nothing here has
/// touched the store yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Stable external subject identifier (e.g. `auth0|abc123`).
  pub subject: String,
  pub email:   Option<String>,
  pub name:    Option<String>,
}

impl Identity {
  pub fn new(subject: impl Into<String>) -> Self {
    Self { subject: subject.into(), email: None, name: None }
  }

  /// The name stored on first sight: the name hint, then the email, then the
  /// subject itself.
  pub fn display_name(&self) -> String {
    [self.name.as_deref(), self.email.as_deref()]
      .into_iter()
      .flatten()
      .find(|s| !s.trim().is_empty())
      .unwrap_or(&self.subject)
      .to_owned()
  }
}

/// An internal user record, created lazily the first time a subject writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:      Uuid,
  /// Unique across all users.
  pub subject:      String,
  /// Unique when present.
  pub email:        Option<String>,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}
