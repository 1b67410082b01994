//! Pokelens Core - identify a Pokémon from a photo and describe it.
//!
//! # Architecture
//!
//! Two remote calls in sequence, with no state kept between requests:
//!
//! ```text
//! Image → Identifier (vision model) → id → Enricher (PokeAPI) → SpeciesRecord
//!                                   ↘ 0 → localized "Pokémon not found"
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pokelens_core::{Config, ImageSubmission, Pokedex};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let pokedex = Pokedex::from_config(&config)?;
//!
//!     let image = ImageSubmission::new(std::fs::read("pikachu.png")?, "image/png");
//!     match pokedex.identify_pokemon(image, "fr").await {
//!         Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
//!         Err(not_found) => eprintln!("{}", not_found.detail),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod species;
pub mod translate;
pub mod types;
pub mod vision;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, LookupError, PipelineError, PipelineResult};
pub use pipeline::{FailureKind, NotFound, Pokedex, NOT_FOUND_DETAIL};
pub use species::{Enricher, SpeciesSource};
pub use translate::{localize, Translator};
pub use types::{ImageSubmission, SpeciesRecord, SpriteImages, DEFAULT_LANG};
pub use vision::{Identifier, VisionModel};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
