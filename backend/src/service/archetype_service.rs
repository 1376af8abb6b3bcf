use std::sync::Arc;
use tracing::{error, info};

use crate::api_error::ApiError;
use crate::models::{sprite_url, ArchetypeRole, ArchetypeSeed, DeckSelection};
use crate::store::TournamentStore;

/// Finds or lazily creates deck archetype rows, one table per role.
pub struct ArchetypeService<S> {
    store: Arc<S>,
    sprites_base: String,
}

impl<S: TournamentStore> ArchetypeService<S> {
    pub fn new(store: Arc<S>, sprites_base: impl Into<String>) -> Self {
        Self {
            store,
            sprites_base: sprites_base.into(),
        }
    }

    /// Splits a deck selection into its primary and optional secondary Pokémon.
    pub fn seeds_for(
        &self,
        deck: &DeckSelection,
    ) -> Result<(ArchetypeSeed, Option<ArchetypeSeed>), ApiError> {
        let mut seeds: Vec<ArchetypeSeed> = match deck {
            DeckSelection::Meta(meta) => meta
                .pokemon
                .iter()
                .map(|p| ArchetypeSeed {
                    name: p.name.to_string(),
                    sprite_url: sprite_url(&self.sprites_base, p.pokedex_number),
                })
                .collect(),
            DeckSelection::Custom(picks) => picks
                .iter()
                .map(|p| ArchetypeSeed {
                    name: p.name.trim().to_string(),
                    sprite_url: p
                        .sprite_url
                        .clone()
                        .filter(|url| !url.trim().is_empty())
                        .unwrap_or_else(|| sprite_url(&self.sprites_base, p.pokedex_number)),
                })
                .collect(),
        };
        seeds.truncate(2);

        if seeds.is_empty() {
            return Err(ApiError::invalid_field(
                "selectedDeck",
                "No primary Pokemon selected",
            ));
        }
        let secondary = if seeds.len() > 1 { seeds.pop() } else { None };
        let primary = seeds.remove(0);
        Ok((primary, secondary))
    }

    /// Returns the id of the row named `seed.name` in the role's table,
    /// inserting it with the seed's sprite if absent.
    pub async fn resolve(&self, role: ArchetypeRole, seed: &ArchetypeSeed) -> Result<i32, ApiError> {
        let existing = self
            .store
            .find_archetype(role, &seed.name)
            .await
            .map_err(|e| {
                error!(error = %e, role = %role, name = %seed.name, "Archetype lookup failed");
                ApiError::database_error(format!(
                    "Database error while searching for {}",
                    seed.name
                ))
            })?;

        if let Some(archetype) = existing {
            return Ok(archetype.id);
        }

        let created = self
            .store
            .insert_archetype(role, &seed.name, &seed.sprite_url)
            .await
            .map_err(|e| {
                error!(error = %e, role = %role, name = %seed.name, "Archetype insert failed");
                ApiError::database_error(format!("Failed to create {} archetype", seed.name))
            })?;

        info!(
            archetype_id = created.id,
            role = %role,
            name = %created.name,
            "Created deck archetype"
        );

        Ok(created.id)
    }
}
