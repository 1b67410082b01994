//! Species lookup: fetches upstream records and assembles a [`SpeciesRecord`].
//!
//! Any upstream failure becomes [`LookupError::NotFound`]. The flavor text
//! is chosen requested-language-first, then [`DEFAULT_LANG`].

use super::client::SpeciesSource;
use super::upstream::{FlavorText, Pokemon};
use crate::error::LookupError;
use crate::types::{SpeciesRecord, SpriteImages, DEFAULT_LANG};
use indexmap::IndexMap;
use std::sync::Arc;

/// Builds localized species records from a [`SpeciesSource`].
#[derive(Clone)]
pub struct Enricher {
    source: Arc<dyn SpeciesSource>,
}

impl Enricher {
    pub fn new(source: Arc<dyn SpeciesSource>) -> Self {
        Self { source }
    }

    /// Look up species `id` with its description in `lang`.
    pub async fn lookup(&self, id: u32, lang: &str) -> Result<SpeciesRecord, LookupError> {
        let not_found = |reason: String| {
            tracing::debug!("{} has no usable record for {id}: {reason}", self.source.name());
            LookupError::NotFound { id, reason }
        };

        let pokemon = self
            .source
            .pokemon(id)
            .await
            .map_err(|e| not_found(e.to_string()))?;
        let species = self
            .source
            .species(id)
            .await
            .map_err(|e| not_found(e.to_string()))?;

        let description = select_description(&species.flavor_text_entries, lang);
        Ok(assemble(pokemon, description))
    }
}

/// Pick the flavor text for `lang`, falling back to [`DEFAULT_LANG`].
///
/// Entries are scanned in upstream order and the first match wins. An
/// empty text in `lang` counts as missing; the fallback entry is taken as is.
pub fn select_description(entries: &[FlavorText], lang: &str) -> Option<String> {
    first_in(entries, lang)
        .filter(|text| !text.is_empty())
        .or_else(|| first_in(entries, DEFAULT_LANG))
        .map(normalize_flavor_text)
}

fn first_in<'a>(entries: &'a [FlavorText], lang: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|e| e.language.name == lang)
        .map(|e| e.flavor_text.as_str())
}

/// Replace each `\n` and `\f` with a single space. Nothing else changes.
pub fn normalize_flavor_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
}

fn assemble(pokemon: Pokemon, description: Option<String>) -> SpeciesRecord {
    // A later duplicate overwrites the value but keeps the first position.
    let stats: IndexMap<String, u32> = pokemon
        .stats
        .into_iter()
        .map(|s| (s.stat.name, s.base_stat))
        .collect();

    SpeciesRecord {
        id: pokemon.id,
        name: pokemon.name,
        description,
        types: pokemon.types.into_iter().map(|t| t.kind.name).collect(),
        height: pokemon.height,
        weight: pokemon.weight,
        stats,
        abilities: pokemon.abilities.into_iter().map(|a| a.ability.name).collect(),
        images: SpriteImages {
            front_default: pokemon.sprites.front_default,
            back_default: pokemon.sprites.back_default,
            front_shiny: pokemon.sprites.front_shiny,
            back_shiny: pokemon.sprites.back_shiny,
        },
    }
}
