//! HTTP Basic-auth extractor and standalone verifier.
//!
//! Reads are open to everyone; handlers that mutate the schedule take an
//! [`Admin`] argument, which only extracts for the configured credentials.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rota_core::store::ScheduleStore;
use tracing::{debug, warn};

use crate::{AppState, error::ApiError};

/// `WWW-Authenticate` challenge sent with every 401.
pub const CHALLENGE: &str = "Basic realm=\"rota admin\", charset=\"UTF-8\"";

/// The single admin account allowed to change the schedule.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl AuthConfig {
  /// Whether `username`/`password` are the admin's.
  ///
  /// An unparsable configured hash admits nobody.
  pub fn admits(&self, username: &str, password: &str) -> bool {
    if username != self.username {
      debug!(username, "rejected non-admin user");
      return false;
    }
    let Ok(hash) = PasswordHash::new(&self.password_hash) else {
      warn!("configured admin password hash is not a valid PHC string");
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &hash)
      .is_ok()
  }
}

/// Zero-size marker: present in the handler means the caller is the admin.
pub struct Admin;

/// Decode `Authorization: Basic …` into `(username, password)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let encoded = headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;
  let decoded = String::from_utf8(B64.decode(encoded.trim()).ok()?).ok()?;
  let (username, password) = decoded.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// Check that the request carries the admin's credentials.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  match basic_credentials(headers) {
    Some((username, password)) if config.admits(&username, &password) => Ok(()),
    Some(_) => Err(ApiError::Unauthorized),
    None => {
      debug!("schedule change attempted without admin credentials");
      Err(ApiError::Unauthorized)
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: ScheduleStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Admin)
  }
}
