//! Admin page for editing the instruction template.
//!
//! A single HTML form, guarded by the shared-secret middleware. Edits apply
//! to calls whose webhook arrives after the change; in-flight calls keep the
//! text they captured.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use serde::Deserialize;
use tracing::info;

use crate::state::AppState;

/// Query parameters accepted by the admin endpoints.
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Form body for instruction updates.
#[derive(Debug, Deserialize)]
pub struct InstructionsForm {
    pub instructions: String,
}

/// Render the admin page with the current instruction template.
pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminQuery>,
) -> Html<String> {
    let template = escape_html(&state.instruction_template());
    let action = form_action(query.token.as_deref());

    Html(format!(
        "<!doctype html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>voicebridge admin</title></head>\n\
         <body>\n\
         <h1>Call instructions</h1>\n\
         <p>Applied to calls answered after saving. The daily schedule is appended automatically.</p>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <textarea name=\"instructions\" rows=\"16\" cols=\"80\">{template}</textarea><br>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    ))
}

/// Apply an instruction template update and return to the admin page.
pub async fn update_instructions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminQuery>,
    Form(form): Form<InstructionsForm>,
) -> impl IntoResponse {
    state.set_instruction_template(form.instructions.trim().to_string());
    info!("Instruction template updated through admin page");

    let back = match query.token.as_deref() {
        Some(token) => format!("/admin?token={}", urlencode(token)),
        None => "/admin".to_string(),
    };
    Redirect::to(&back)
}

fn form_action(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("/admin/instructions?token={}", urlencode(token)),
        None => "/admin/instructions".to_string(),
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("a < b & \"c\" > d"),
            "a &lt; b &amp; &quot;c&quot; &gt; d"
        );
    }

    #[test]
    fn test_form_action_carries_token() {
        assert_eq!(
            form_action(Some("s3cret&x")),
            "/admin/instructions?token=s3cret%26x"
        );
        assert_eq!(form_action(None), "/admin/instructions");
    }
}
