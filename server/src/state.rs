use std::sync::Arc;

use crate::auth::{CredentialCheck, TokenAuthority};
use crate::store::RecordStore;
use crate::time::TimeSource;

/// Shared application state threaded through axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where every record lives.
    pub store: Arc<dyn RecordStore>,
    /// Issues tokens on login and verifies them in the access guard.
    pub tokens: Arc<TokenAuthority>,
    /// Decides which (username, password) pairs may log in.
    pub credentials: Arc<dyn CredentialCheck>,
    /// Stamps submission and publication times.
    pub clock: Arc<dyn TimeSource>,
}
