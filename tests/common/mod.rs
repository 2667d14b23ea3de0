//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
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
//! async fn test_analyze() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.analyze(b"fake image bytes").await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod server;
mod stubs;

// Public API - this is what tests import
pub use client::TestClient;
pub use server::TestServer;
pub use stubs::{StubCaptioner, StubGenerator, StubMusic};
