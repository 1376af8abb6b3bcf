use futures::future::join_all;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PokemonApiConfig;
use crate::models::{display_name, generation_of, sprite_url, PokemonSuggestion};

/// Queries shorter than this return nothing.
pub const MIN_QUERY_CHARS: usize = 3;

/// Name fragments of alternate forms that only differ cosmetically.
const COSMETIC_VARIANTS: &[&str] = &[
    "rock-star",
    "belle",
    "popstar",
    "phd",
    "libre",
    "cosplay",
    "battle-bond",
    "ash-",
    "cap",
    "partner",
    "spiky-eared",
    "totem",
    "school",
    "sunshine",
    "midnight",
    "dusk",
    "own-tempo",
    "original-color",
    "orange",
    "violet",
];

#[derive(Debug, Error)]
pub enum PokemonApiError {
    #[error("PokeAPI request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("PokeAPI returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct SpeciesIndex {
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PokemonDetail {
    id: u32,
    name: String,
    #[serde(default)]
    sprites: Sprites,
    #[serde(default)]
    types: Vec<TypeSlot>,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedType,
}

#[derive(Debug, Deserialize)]
struct NamedType {
    name: String,
}

/// Best-effort Pokémon lookup against PokeAPI for the custom deck picker.
#[derive(Clone)]
pub struct PokemonService {
    client: reqwest::Client,
    config: PokemonApiConfig,
}

impl PokemonService {
    pub fn new(config: PokemonApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Suggestions for `query`, ordered by Pokédex number.
    /// Upstream failures degrade to an empty list.
    pub async fn search(&self, query: &str) -> Vec<PokemonSuggestion> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.fetch_suggestions(&query).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, query = %query, "Pokemon search degraded to empty result");
                Vec::new()
            }
        }
    }

    async fn fetch_suggestions(&self, query: &str) -> Result<Vec<PokemonSuggestion>, PokemonApiError> {
        let index_url = format!(
            "{}/pokemon?limit={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.search_limit
        );
        let index: SpeciesIndex = self.get_json(&index_url).await?;

        let matches = matching_species(&index.results, query, self.config.results_limit);
        debug!(query = %query, matches = matches.len(), "Fetching Pokemon details");

        let details = join_all(matches.iter().map(|r| self.get_json::<PokemonDetail>(&r.url))).await;

        let mut suggestions: Vec<PokemonSuggestion> = details
            .into_iter()
            .filter_map(|detail| match detail {
                Ok(detail) => Some(self.to_suggestion(detail)),
                Err(e) => {
                    debug!(error = %e, "Skipping Pokemon detail");
                    None
                }
            })
            .collect();
        suggestions.sort_by_key(|s| s.pokedex_number);
        Ok(suggestions)
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, PokemonApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PokemonApiError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }

    fn to_suggestion(&self, detail: PokemonDetail) -> PokemonSuggestion {
        PokemonSuggestion {
            name: display_name(&detail.name),
            pokedex_number: detail.id,
            sprite_url: detail
                .sprites
                .front_default
                .unwrap_or_else(|| sprite_url(&self.config.sprites_base, detail.id)),
            types: detail.types.into_iter().map(|t| t.kind.name).collect(),
            generation: generation_of(detail.id),
        }
    }
}

fn is_cosmetic_variant(name: &str) -> bool {
    COSMETIC_VARIANTS.iter().any(|marker| name.contains(marker))
}

/// Index entries whose name contains `query`, minus cosmetic forms, capped at `limit`.
fn matching_species<'a>(
    index: &'a [NamedResource],
    query: &str,
    limit: usize,
) -> Vec<&'a NamedResource> {
    index
        .iter()
        .filter(|r| r.name.contains(query) && !is_cosmetic_variant(&r.name))
        .take(limit)
        .collect()
}
