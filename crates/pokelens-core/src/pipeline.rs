//! Request orchestration: identify, then look up, then localize failures.
//!
//! ```text
//! RECEIVED → IDENTIFYING ─┬─ 0 ──────────────────────────→ NOT FOUND
//!                         └─ id → ENRICHING ─┬─ ok ──────→ RESPONDED
//!                                            └─ NotFound → NOT FOUND
//! ```
//!
//! The submission is taken by value and dropped before the result is
//! returned, on every path.

use crate::config::Config;
use crate::error::{LookupError, PipelineResult};
use crate::species::{Enricher, PokeApiClient, SpeciesSource};
use crate::translate::{localize, translator_from_config, Translator};
use crate::types::{ImageSubmission, SpeciesRecord};
use crate::vision::{Identification, Identifier, VisionModel, VisionModelFactory};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Message shown, after translation, whenever no species can be returned.
pub const NOT_FOUND_DETAIL: &str = "Pokémon not found";

/// Why a request ended without a record. Logged, never shown to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The model answered `0`
    Declined,
    /// The model's reply was not an integer
    UnparseableReply(String),
    /// The vision provider failed
    VisionUnavailable(String),
    /// The id has no upstream record
    UnknownSpecies { id: u32, reason: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Declined => write!(f, "model did not recognize the image"),
            FailureKind::UnparseableReply(reply) => write!(f, "unparseable model reply {reply:?}"),
            FailureKind::VisionUnavailable(e) => write!(f, "vision provider failed: {e}"),
            FailureKind::UnknownSpecies { id, reason } => {
                write!(f, "species {id} not found: {reason}")
            }
        }
    }
}

/// A localized not-found outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    /// Message translated into the requested language
    pub detail: String,
    pub kind: FailureKind,
}

/// The assembled pipeline. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct Pokedex {
    identifier: Identifier,
    enricher: Enricher,
    translator: Arc<dyn Translator>,
}

impl Pokedex {
    pub fn new(
        vision: Arc<dyn VisionModel>,
        species: Arc<dyn SpeciesSource>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            identifier: Identifier::new(vision),
            enricher: Enricher::new(species),
            translator,
        }
    }

    /// Build every client from configuration.
    ///
    /// Fails when the vision API key is missing.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let vision: Arc<dyn VisionModel> = Arc::from(VisionModelFactory::create(config)?);
        let species = Arc::new(PokeApiClient::new(
            &config.species.endpoint,
            config.request_timeout(),
        )?);
        let translator = translator_from_config(config)?;
        tracing::debug!(
            "Pipeline ready: vision={} species={} translator={}",
            vision.name(),
            species.name(),
            translator.name()
        );
        Ok(Self::new(vision, species, translator))
    }

    /// Identify the species in `image` and return its record in `lang`.
    pub async fn identify_pokemon(
        &self,
        image: ImageSubmission,
        lang: &str,
    ) -> Result<SpeciesRecord, NotFound> {
        let start = Instant::now();
        let identification = self.identifier.identify_detailed(&image).await;
        drop(image);

        let id = match identification {
            Identification::Recognized(id) => id,
            Identification::Declined => {
                return Err(self.not_found(FailureKind::Declined, lang).await)
            }
            Identification::Unparseable(reply) => {
                return Err(self.not_found(FailureKind::UnparseableReply(reply), lang).await)
            }
            Identification::Failed(e) => {
                return Err(self.not_found(FailureKind::VisionUnavailable(e), lang).await)
            }
        };
        tracing::info!(
            id,
            lang,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Identified species"
        );

        match self.enricher.lookup(id, lang).await {
            Ok(record) => {
                tracing::info!(
                    id,
                    name = %record.name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Species record assembled"
                );
                Ok(record)
            }
            Err(LookupError::NotFound { id, reason }) => Err(self
                .not_found(FailureKind::UnknownSpecies { id, reason }, lang)
                .await),
        }
    }

    async fn not_found(&self, kind: FailureKind, lang: &str) -> NotFound {
        tracing::info!(lang, "Pokémon not found: {kind}");
        NotFound {
            detail: localize(self.translator.as_ref(), NOT_FOUND_DETAIL, lang).await,
            kind,
        }
    }
}
