//! Login and logout.
//!
//! Credentials are checked through the [`Authenticator`] trait; the
//! shipped implementation knows two fixed accounts and issues mock tokens.
//! There are no sessions: logout only acknowledges.

pub mod credentials;
pub mod handlers;

use axum::{routing::post, Router};

use crate::http::server::AppState;
use self::handlers::{login, logout};

pub use credentials::{Authenticator, Role, StaticCredentials};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}
