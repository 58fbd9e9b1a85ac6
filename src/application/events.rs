use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{GenerationSink, GenerationStep};

/// Sink that reports generation progress to the log.
pub struct TracingSink {
    session_id: Uuid,
}

impl TracingSink {
    pub fn new(session_id: Uuid) -> Self {
        Self { session_id }
    }
}

impl GenerationSink for TracingSink {
    fn on_step(&self, step: GenerationStep) {
        debug!(session_id = %self.session_id, step = %step, "generation step");
    }

    fn on_token(&self, token: &str) {
        debug!(session_id = %self.session_id, len = token.len(), "generation output");
    }
}
