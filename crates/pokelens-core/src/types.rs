//! Core data types for the Pokelens pipeline.
//!
//! Every value here is request-scoped: built once, never mutated, dropped
//! when the request completes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Language used when the requested one has no text, and as the source
/// language of untranslated messages.
pub const DEFAULT_LANG: &str = "en";

/// An uploaded image awaiting identification.
#[derive(Debug, Clone)]
pub struct ImageSubmission {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Declared MIME type (e.g., "image/jpeg")
    pub media_type: String,
    /// Original filename, if the client sent one
    pub file_name: Option<String>,
}

impl ImageSubmission {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Guess the MIME type from a file extension.
    ///
    /// Unknown extensions fall back to `image/jpeg`.
    pub fn media_type_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            other => {
                tracing::warn!("Unknown image extension '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        }
    }

    /// Name shown in the provider's file storage.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("upload")
    }
}

/// Localized summary of one Pokémon species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    /// Flavor text with `\n` and `\f` replaced by spaces
    pub description: Option<String>,
    /// Type names in upstream slot order
    pub types: Vec<String>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Base stat value keyed by stat name, in upstream order
    pub stats: IndexMap<String, u32>,
    /// Ability names in upstream order
    pub abilities: Vec<String>,
    pub images: SpriteImages,
}

/// The four sprite variants exposed to clients. Any of them may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteImages {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_for_extension() {
        assert_eq!(ImageSubmission::media_type_for_extension("JPG"), "image/jpeg");
        assert_eq!(ImageSubmission::media_type_for_extension("png"), "image/png");
        assert_eq!(ImageSubmission::media_type_for_extension("webp"), "image/webp");
        assert_eq!(ImageSubmission::media_type_for_extension("tiff"), "image/jpeg");
    }

    #[test]
    fn test_display_name_defaults() {
        let image = ImageSubmission::new(vec![1, 2, 3], "image/png");
        assert_eq!(image.display_name(), "upload");
        let image = image.with_file_name("pikachu.png");
        assert_eq!(image.display_name(), "pikachu.png");
    }

    #[test]
    fn test_species_record_serializes_null_fields() {
        let record = SpeciesRecord {
            id: 132,
            name: "ditto".to_string(),
            description: None,
            types: vec!["normal".to_string()],
            height: 3,
            weight: 40,
            stats: IndexMap::from([("hp".to_string(), 48)]),
            abilities: vec!["limber".to_string(), "imposter".to_string()],
            images: SpriteImages::default(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["description"].is_null());
        assert!(json["images"]["back_shiny"].is_null());
        assert_eq!(json["stats"]["hp"], 48);
        assert_eq!(json["abilities"][1], "imposter");
    }
}
