//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full router
//! (access guard, handlers and store) with deterministic inputs.

#![cfg(test)]

mod helpers;

mod test_access_guard;
mod test_applications;
mod test_contacts;
mod test_document_store;
mod test_login;
mod test_malformed_requests;
mod test_news;
mod test_popup;
mod test_static_files;
mod test_store_unavailable;
mod test_token_expiry;
