//! Wire types for the subset of PokeAPI the enricher reads.
//!
//! Unknown fields are ignored, so the full upstream payloads deserialize
//! into these without loss of anything we use.

use serde::Deserialize;

/// A `{ name, url }` reference to another PokeAPI resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonAbility {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonSpecies {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
    pub version: Option<NamedResource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_deserializes_upstream_shape() {
        let json = serde_json::json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "base_experience": 64,
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}},
                {"slot": 2, "type": {"name": "poison", "url": "https://pokeapi.co/api/v2/type/4/"}}
            ],
            "stats": [
                {"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": ""}}
            ],
            "abilities": [
                {"ability": {"name": "overgrow", "url": ""}, "is_hidden": false, "slot": 1}
            ],
            "sprites": {
                "front_default": "https://img/1.png",
                "back_default": null,
                "other": {"home": {}}
            }
        });

        let pokemon: Pokemon = serde_json::from_value(json).unwrap();
        assert_eq!(pokemon.types[1].kind.name, "poison");
        assert_eq!(pokemon.stats[0].base_stat, 45);
        assert_eq!(pokemon.sprites.front_default.as_deref(), Some("https://img/1.png"));
        assert!(pokemon.sprites.back_shiny.is_none());
    }

    #[test]
    fn test_species_without_flavor_texts() {
        let json = serde_json::json!({"id": 10001, "name": "deoxys-attack"});
        let species: PokemonSpecies = serde_json::from_value(json).unwrap();
        assert!(species.flavor_text_entries.is_empty());
    }
}
