//! HTTP client for end-to-end tests
//!
//! High-level wrapper around reqwest for the server's endpoints. When routes
//! or request formats change, update only this file.

use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// Upload image bytes to the analyze endpoint as multipart field "image".
    pub async fn analyze(&self, image: &[u8]) -> Response {
        let part = Part::bytes(image.to_vec())
            .file_name("upload.jpg")
            .mime_str("image/jpeg")
            .expect("Invalid MIME type");
        let form = Form::new().part("image", part);

        self.client
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Request failed")
    }

    /// Post a multipart form without the "image" field.
    pub async fn analyze_without_image(&self) -> Response {
        let form = Form::new().text("note", "no image here");

        self.client
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Request failed")
    }
}
