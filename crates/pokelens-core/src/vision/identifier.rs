//! Species identification from an image.
//!
//! Uploads the image, primes a fresh conversation so the model answers with
//! a bare integer, and parses the reply. Every failure mode resolves to the
//! sentinel id `0`; the detailed outcome is kept for logging.

use super::provider::{ChatTurn, VisionModel};
use super::session::ChatSession;
use crate::error::PipelineResult;
use crate::types::ImageSubmission;
use std::sync::Arc;

/// The question asked after the priming exchange.
pub const IDENTIFY_PROMPT: &str = "Analyze the image and tell me the Pokémon ID.";

/// Canned model turn that shows the expected reply shape.
const PRIMING_REPLY: &str = "1\n";

/// What happened during one identification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identification {
    /// The model answered with a non-zero id
    Recognized(u32),
    /// The model answered `0`
    Declined,
    /// The reply was not a non-negative integer
    Unparseable(String),
    /// Upload or generation failed
    Failed(String),
}

impl Identification {
    /// The sentinel-folded id: `0` for everything but `Recognized`.
    pub fn species_id(&self) -> u32 {
        match self {
            Identification::Recognized(id) => *id,
            _ => 0,
        }
    }

    fn from_reply(reply: &str) -> Self {
        match reply.trim().parse::<u32>() {
            Ok(0) => Identification::Declined,
            Ok(id) => Identification::Recognized(id),
            Err(_) => Identification::Unparseable(reply.trim().to_string()),
        }
    }
}

/// Identifies species through a vision model.
#[derive(Clone)]
pub struct Identifier {
    model: Arc<dyn VisionModel>,
}

impl Identifier {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// Return the species id shown in `image`, or `0` if unrecognized.
    pub async fn identify(&self, image: &ImageSubmission) -> u32 {
        self.identify_detailed(image).await.species_id()
    }

    /// Like [`identify`](Self::identify) but keeps the reason for a `0`.
    pub async fn identify_detailed(&self, image: &ImageSubmission) -> Identification {
        match self.ask(image).await {
            Ok(reply) => {
                let outcome = Identification::from_reply(&reply);
                if let Identification::Unparseable(text) = &outcome {
                    tracing::debug!("{} reply is not an id: {text:?}", self.model.name());
                }
                outcome
            }
            Err(e) => {
                tracing::warn!("{} identification failed: {e}", self.model.name());
                Identification::Failed(e.to_string())
            }
        }
    }

    async fn ask(&self, image: &ImageSubmission) -> PipelineResult<String> {
        let file = self.model.upload_file(image).await?;
        let mut session = ChatSession::start(
            self.model.as_ref(),
            vec![ChatTurn::user_file(file), ChatTurn::model_text(PRIMING_REPLY)],
        );
        let reply = session.send_message(IDENTIFY_PROMPT).await?;
        tracing::debug!(
            model = %reply.model,
            latency_ms = reply.latency_ms,
            tokens = ?reply.tokens_used,
            turns = session.history().len(),
            "Vision reply received"
        );
        Ok(reply.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::vision::provider::{Part, Role, UploadedFile, VisionResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock vision model with a fixed reply (or failure) per stage.
    struct MockVision {
        upload_fails: bool,
        reply: Result<String, u16>,
        history: Mutex<Vec<ChatTurn>>,
    }

    impl MockVision {
        fn replying(text: &str) -> Self {
            Self {
                upload_fails: false,
                reply: Ok(text.to_string()),
                history: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                upload_fails: false,
                reply: Err(status),
                history: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VisionModel for MockVision {
        fn name(&self) -> &str {
            "mock"
        }

        async fn upload_file(&self, image: &ImageSubmission) -> PipelineResult<UploadedFile> {
            if self.upload_fails {
                return Err(PipelineError::Vision {
                    message: "upload refused".into(),
                    status_code: Some(400),
                });
            }
            Ok(UploadedFile {
                name: "files/mock".into(),
                uri: "mock://files/mock".into(),
                media_type: image.media_type.clone(),
            })
        }

        async fn generate(&self, contents: &[ChatTurn]) -> PipelineResult<VisionResponse> {
            *self.history.lock().unwrap() = contents.to_vec();
            match &self.reply {
                Ok(text) => Ok(VisionResponse {
                    text: text.clone(),
                    model: "mock".into(),
                    tokens_used: Some(10),
                    latency_ms: 1,
                }),
                Err(status) => Err(PipelineError::Vision {
                    message: format!("HTTP {status}"),
                    status_code: Some(*status),
                }),
            }
        }
    }

    fn image() -> ImageSubmission {
        ImageSubmission::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg")
    }

    async fn identify_with(model: MockVision) -> (u32, Vec<ChatTurn>) {
        let model = Arc::new(model);
        let identifier = Identifier::new(model.clone());
        let id = identifier.identify(&image()).await;
        let history = model.history.lock().unwrap().clone();
        (id, history)
    }

    #[test]
    fn test_reply_folds_to_species_id() {
        let parse_species_id = |reply: &str| Identification::from_reply(reply).species_id();
        assert_eq!(parse_species_id("25"), 25);
        assert_eq!(parse_species_id("  151\n"), 151);
        assert_eq!(parse_species_id("0"), 0);
        assert_eq!(parse_species_id(""), 0);
        assert_eq!(parse_species_id("abc"), 0);
        assert_eq!(parse_species_id("Pikachu (25)"), 0);
        assert_eq!(parse_species_id("-3"), 0);
        assert_eq!(parse_species_id("2.5"), 0);
    }

    #[test]
    fn test_identification_kinds() {
        assert_eq!(Identification::from_reply("4\n"), Identification::Recognized(4));
        assert_eq!(Identification::from_reply(" 0 "), Identification::Declined);
        assert_eq!(
            Identification::from_reply("abc"),
            Identification::Unparseable("abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_identify_returns_parsed_reply() {
        let (id, _) = identify_with(MockVision::replying("25\n")).await;
        assert_eq!(id, 25);
    }

    #[tokio::test]
    async fn test_identify_unparseable_reply_is_zero() {
        let (id, _) = identify_with(MockVision::replying("abc")).await;
        assert_eq!(id, 0);
        let (id, _) = identify_with(MockVision::replying("")).await;
        assert_eq!(id, 0);
    }

    #[tokio::test]
    async fn test_identify_upstream_error_is_zero() {
        let (id, _) = identify_with(MockVision::failing(503)).await;
        assert_eq!(id, 0);

        let model = MockVision {
            upload_fails: true,
            ..MockVision::replying("25")
        };
        let identifier = Identifier::new(Arc::new(model));
        let outcome = identifier.identify_detailed(&image()).await;
        assert!(matches!(outcome, Identification::Failed(ref m) if m.contains("upload refused")));
    }

    #[tokio::test]
    async fn test_identify_sends_priming_history() {
        let (_, history) = identify_with(MockVision::replying("7")).await;

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, Role::User);
        assert!(matches!(&history[0].parts[0], Part::File(f) if f.media_type == "image/jpeg"));
        assert_eq!(history[1].role, Role::Model);
        assert_eq!(history[1].text(), "1\n");
        assert_eq!(history[2].text(), IDENTIFY_PROMPT);
    }
}
