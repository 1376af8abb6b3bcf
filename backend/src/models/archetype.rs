use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which slot of a deck an archetype fills. Each role has its own table,
/// so the same Pokémon can exist once per role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeRole {
    Primary,
    Secondary,
}

impl ArchetypeRole {
    pub fn table_name(&self) -> &'static str {
        match self {
            ArchetypeRole::Primary => "deck_archetype_1",
            ArchetypeRole::Secondary => "deck_archetype_2",
        }
    }
}

impl std::fmt::Display for ArchetypeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchetypeRole::Primary => write!(f, "primary"),
            ArchetypeRole::Secondary => write!(f, "secondary"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct DeckArchetype {
    pub id: i32,
    pub name: String,
    pub image_url: String,
}

/// Name and sprite used to find or create an archetype row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeSeed {
    pub name: String,
    pub sprite_url: String,
}

/// Archetype as shown next to a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchetypeSummary {
    pub name: String,
    pub image_url: String,
}

impl From<DeckArchetype> for ArchetypeSummary {
    fn from(archetype: DeckArchetype) -> Self {
        Self {
            name: archetype.name,
            image_url: archetype.image_url,
        }
    }
}
