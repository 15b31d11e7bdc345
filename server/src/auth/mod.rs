//! Authentication module.
//!
//! Admin login is checked against a configured allow-list, a successful
//! login is exchanged for a signed bearer token, and protected routes are
//! gated by middleware that verifies that token.
//!
//! # Pre-conditions
//! - At least one admin credential and a non-empty signing secret are
//!   configured.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - No session state is kept between requests.

pub mod credentials;
pub mod guard;
pub mod jwt;

pub use credentials::{AdminAllowList, AdminCredential, CredentialCheck, CredentialError};
pub use guard::{bearer_token, require_admin};
pub use jwt::{AdminIdentity, TOKEN_LIFETIME_SECS, TokenAuthority, TokenError};
