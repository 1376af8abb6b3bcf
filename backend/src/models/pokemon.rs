use serde::{Deserialize, Serialize};

/// Pokédex entries per generation used for the rough generation estimate.
pub const POKEMON_PER_GENERATION: u32 = 151;

/// A search-as-you-type suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonSuggestion {
    pub name: String,
    pub pokedex_number: u32,
    pub sprite_url: String,
    pub types: Vec<String>,
    pub generation: u32,
}

pub fn sprite_url(sprites_base: &str, pokedex_number: u32) -> String {
    format!("{}/{}.png", sprites_base.trim_end_matches('/'), pokedex_number)
}

pub fn generation_of(pokedex_number: u32) -> u32 {
    pokedex_number.div_ceil(POKEMON_PER_GENERATION)
}

/// PokeAPI names are lowercase slugs; only the first letter is raised.
pub fn display_name(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
