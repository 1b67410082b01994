//! Client-side conversation state.
//!
//! Providers are stateless, so a session is just the history that gets
//! resent on every turn. Each identification starts a fresh one.

use super::provider::{ChatTurn, VisionModel, VisionResponse};
use crate::error::PipelineResult;

pub struct ChatSession<'a> {
    model: &'a dyn VisionModel,
    history: Vec<ChatTurn>,
}

impl<'a> ChatSession<'a> {
    /// Start a conversation seeded with `history`.
    pub fn start(model: &'a dyn VisionModel, history: Vec<ChatTurn>) -> Self {
        Self { model, history }
    }

    /// Send a user message and record the model's reply in the history.
    ///
    /// On failure the history is left as it was before the call.
    pub async fn send_message(&mut self, text: &str) -> PipelineResult<VisionResponse> {
        self.history.push(ChatTurn::user_text(text));
        match self.model.generate(&self.history).await {
            Ok(reply) => {
                self.history.push(ChatTurn::model_text(reply.text.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::types::ImageSubmission;
    use crate::vision::provider::{Role, UploadedFile};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes the number of turns it was sent; optionally fails.
    struct CountingModel {
        fail: bool,
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl VisionModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }

        async fn upload_file(&self, _image: &ImageSubmission) -> PipelineResult<UploadedFile> {
            unreachable!("sessions never upload")
        }

        async fn generate(&self, contents: &[ChatTurn]) -> PipelineResult<VisionResponse> {
            self.seen.lock().unwrap().push(contents.len());
            if self.fail {
                return Err(PipelineError::Vision {
                    message: "boom".into(),
                    status_code: Some(500),
                });
            }
            Ok(VisionResponse {
                text: contents.len().to_string(),
                model: "counting".into(),
                tokens_used: None,
                latency_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_send_message_appends_both_turns() {
        let model = CountingModel {
            fail: false,
            seen: Mutex::new(Vec::new()),
        };
        let mut session = ChatSession::start(&model, vec![ChatTurn::model_text("1\n")]);

        let reply = session.send_message("first").await.unwrap();
        assert_eq!(reply.text, "2");
        let reply = session.send_message("second").await.unwrap();
        assert_eq!(reply.text, "4");

        assert_eq!(*model.seen.lock().unwrap(), vec![2, 4]);
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.history()[4].role, Role::Model);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_history_untouched() {
        let model = CountingModel {
            fail: true,
            seen: Mutex::new(Vec::new()),
        };
        let mut session = ChatSession::start(&model, vec![ChatTurn::model_text("1\n")]);

        assert!(session.send_message("hello").await.is_err());
        assert_eq!(session.history().len(), 1);
    }
}
