//! Per-call instruction text: admin-edited template plus a schedule document
//! fetched from the calendar collaborator.
//!
//! Composition happens once per call, at webhook time. A fetch failure is
//! never fatal to the call — the schedule degrades to empty content and the
//! assistant runs with reduced instructions.

use std::time::Duration;

use tracing::{debug, warn};

/// Per-request timeout for the schedule fetch.
pub const SCHEDULE_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch the textual schedule document. Returns an empty string on any
/// failure: non-success status, network error, timeout, or unreadable body.
pub async fn fetch_schedule(client: &reqwest::Client, url: &str) -> String {
    let response = match client
        .get(url)
        .timeout(SCHEDULE_FETCH_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Schedule fetch failed, continuing without schedule: {e}");
            return String::new();
        }
    };

    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(e) => {
            warn!("Schedule fetch returned error status, continuing without schedule: {e}");
            return String::new();
        }
    };

    match response.text().await {
        Ok(text) => {
            debug!(bytes = text.len(), "Fetched schedule document");
            text
        }
        Err(e) => {
            warn!("Failed to read schedule body, continuing without schedule: {e}");
            String::new()
        }
    }
}

/// Compose the final instruction text for one call.
pub fn compose_instructions(template: &str, schedule: &str) -> String {
    let template = template.trim();
    let schedule = schedule.trim();
    if schedule.is_empty() {
        template.to_string()
    } else {
        format!("{template}\n\nToday's schedule:\n{schedule}")
    }
}
