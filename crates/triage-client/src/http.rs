//! Shared HTTP response helpers.
//!
//! Centralizes the non-success status check so the chat bridge and the HTTP
//! submitter stay focused on request construction and response mapping.

/// A non-success response: status code plus the raw body.
#[derive(Debug)]
pub struct Rejection {
    pub status: u16,
    pub body: String,
}

/// Return the response unchanged on 2xx, or its status and body otherwise.
///
/// An unreadable error body is reported as empty rather than masking the
/// status.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, Rejection> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(Rejection { status, body })
}
