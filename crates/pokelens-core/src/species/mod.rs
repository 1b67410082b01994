//! Species data: the PokeAPI client and the enricher built on top of it.

pub(crate) mod client;
pub(crate) mod enricher;
pub mod upstream;

pub use client::{PokeApiClient, SpeciesSource};
pub use enricher::{normalize_flavor_text, select_description, Enricher};
