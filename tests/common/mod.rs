//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestClient, TestServer};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_index() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_index().await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod html;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::TestClient;
pub use constants::*;
#[allow(unused_imports)]
pub use html::section_song_ids;
#[allow(unused_imports)]
pub use server::TestServer;
