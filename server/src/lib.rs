// Life of a request:
// 1. JSON comes in over HTTP
// 2. Admin-only routes verify the bearer token
// 3. The handler validates the body and path id
// 4. The record store applies the change under one lock or transaction
// 5. The result goes back as a `{success, ...}` envelope
//
// System components:
//  - Record store (in-memory or embedded document database)
//  - Token authority and access guard
//  - JSON record API

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod store;
pub mod time;
pub mod types;

mod e2e_tests;

pub use server::build_router;
pub use state::AppState;
