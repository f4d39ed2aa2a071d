//! Bearer-token identity boundary.
//!
//! A token is `base64url(claims) "." hex(hmac_sha256(secret, base64url(claims)))`
//! with claims `{"sub", "email"?, "name"?}`. The MAC is checked in constant
//! time before the claims are decoded.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as B64};
use hive_core::{store::ForumStore, user::Identity};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::{AppState, error::ApiError};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  #[error("malformed token")]
  Malformed,
  #[error("bad signature")]
  BadSignature,
  #[error("token has no subject")]
  NoSubject,
}

#[derive(Serialize, Deserialize)]
struct Claims {
  sub:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  name:  Option<String>,
}

/// Signs and verifies bearer tokens with one shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
  mac: HmacSha256,
}

impl TokenVerifier {
  pub fn new(secret: &[u8]) -> Result<Self, hmac::digest::InvalidLength> {
    Ok(Self { mac: HmacSha256::new_from_slice(secret)? })
  }

  fn sign(&self, payload: &str) -> HmacSha256 {
    let mut mac = self.mac.clone();
    mac.update(payload.as_bytes());
    mac
  }

  pub fn issue(&self, identity: &Identity) -> Result<String, serde_json::Error> {
    let claims = Claims {
      sub:   identity.subject.clone(),
      email: identity.email.clone(),
      name:  identity.name.clone(),
    };
    let payload = B64.encode(serde_json::to_vec(&claims)?);
    let signature = hex::encode(self.sign(&payload).finalize().into_bytes());
    Ok(format!("{payload}.{signature}"))
  }

  pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
    let (payload, signature) =
      token.split_once('.').ok_or(TokenError::Malformed)?;
    let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;
    self
      .sign(payload)
      .verify_slice(&signature)
      .map_err(|_| TokenError::BadSignature)?;

    let json = B64.decode(payload).map_err(|_| TokenError::Malformed)?;
    let claims: Claims =
      serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;
    if claims.sub.trim().is_empty() {
      return Err(TokenError::NoSubject);
    }
    Ok(Identity { subject: claims.sub, email: claims.email, name: claims.name })
  }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
}

/// Verify the bearer token in `headers`, if any.
pub fn identify(
  headers: &HeaderMap,
  tokens: &TokenVerifier,
) -> Option<Result<Identity, TokenError>> {
  bearer(headers).map(|t| tokens.verify(t))
}

/// The caller, proven by a valid bearer token. Rejects with 401.
pub struct Authenticated(pub Identity);

/// The caller if a valid token was presented; anonymous otherwise.
pub struct MaybeAuthenticated(pub Option<Identity>);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: ForumStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match identify(&parts.headers, &state.tokens) {
      Some(Ok(identity)) => Ok(Authenticated(identity)),
      Some(Err(e)) => {
        tracing::debug!(error = %e, "rejected bearer token");
        Err(ApiError::Unauthorized)
      }
      None => Err(ApiError::Unauthorized),
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for MaybeAuthenticated
where
  S: ForumStore + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = identify(&parts.headers, &state.tokens).and_then(Result::ok);
    Ok(MaybeAuthenticated(identity))
  }
}
