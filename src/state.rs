//! Shared application state.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::RwLock;

use crate::config::ServerConfig;

/// Process-wide state shared across handlers.
///
/// Instruction text flows through two stages: the admin-editable template
/// (`instruction_template`), and the composed per-call text published at
/// webhook time (`next_call_instructions`). A media-stream connection captures
/// the published snapshot exactly once; from then on the text lives on that
/// call's session and later edits cannot affect it.
pub struct AppState {
    pub config: ServerConfig,
    /// HTTP client for the schedule collaborator
    pub http: reqwest::Client,
    instruction_template: RwLock<String>,
    next_call_instructions: ArcSwap<String>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let template = config.instruction_template.clone();
        Arc::new(Self {
            http: reqwest::Client::new(),
            instruction_template: RwLock::new(template.clone()),
            // A stream that connects without a preceding webhook still gets
            // the bare template.
            next_call_instructions: ArcSwap::from_pointee(template),
            config,
        })
    }

    /// Current admin-editable instruction template.
    pub fn instruction_template(&self) -> String {
        self.instruction_template.read().clone()
    }

    /// Replace the instruction template (admin page).
    pub fn set_instruction_template(&self, text: String) {
        *self.instruction_template.write() = text;
    }

    /// Publish the composed instruction text for the next call.
    pub fn publish_call_instructions(&self, text: String) {
        self.next_call_instructions.store(Arc::new(text));
    }

    /// Snapshot of the published instruction text, captured when a
    /// media stream connects.
    pub fn call_instructions(&self) -> Arc<String> {
        self.next_call_instructions.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> Arc<AppState> {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            tls: None,
            openai_api_key: "sk-test".to_string(),
            realtime_model: "gpt-4o-realtime-preview".to_string(),
            voice: "alloy".to_string(),
            temperature: 0.7,
            vad_threshold: 0.5,
            vad_prefix_padding_ms: 300,
            vad_silence_duration_ms: 500,
            greeting: None,
            instruction_template: "template v1".to_string(),
            schedule_url: None,
            admin_secret: None,
        };
        AppState::new(config)
    }

    #[test]
    fn test_template_edits_do_not_touch_published_snapshot() {
        let state = test_state();
        state.publish_call_instructions("call text".to_string());
        state.set_instruction_template("template v2".to_string());

        assert_eq!(state.instruction_template(), "template v2");
        assert_eq!(state.call_instructions().as_str(), "call text");
    }

    #[test]
    fn test_snapshot_defaults_to_template() {
        let state = test_state();
        assert_eq!(state.call_instructions().as_str(), "template v1");
    }
}
