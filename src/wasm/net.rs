use async_trait::async_trait;
use gloo_net::http::Request;

use crate::contact::ContactSink;
use crate::error::ContactError;

/// `fetch`-backed sink for the contact webhook.
pub struct HttpSink;

#[async_trait(?Send)]
impl ContactSink for HttpSink {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<u16, ContactError> {
        let response = Request::post(endpoint)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| ContactError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ContactError::Network(e.to_string()))?;
        if !response.ok() {
            log::warn!("webhook response not OK: {} {}", response.status(), response.status_text());
        }
        Ok(response.status())
    }
}
