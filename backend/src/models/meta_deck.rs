use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetaDeckPokemon {
    pub name: &'static str,
    pub pokedex_number: u32,
}

/// A curated preset archetype offered in the deck dropdown.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MetaDeck {
    pub id: u32,
    pub name: &'static str,
    pub rank: u32,
    /// One or two Pokémon; the first fills the primary role.
    pub pokemon: &'static [MetaDeckPokemon],
}

const fn mon(name: &'static str, pokedex_number: u32) -> MetaDeckPokemon {
    MetaDeckPokemon {
        name,
        pokedex_number,
    }
}

pub static META_DECKS: &[MetaDeck] = &[
    MetaDeck {
        id: 1,
        name: "Gardevoir ex",
        rank: 1,
        pokemon: &[mon("Gardevoir", 282)],
    },
    MetaDeck {
        id: 2,
        name: "Raging Bolt Ogerpon",
        rank: 2,
        pokemon: &[mon("Raging Bolt", 1021), mon("Ogerpon", 1017)],
    },
    MetaDeck {
        id: 3,
        name: "Grimmsnarl Froslass",
        rank: 3,
        pokemon: &[mon("Grimmsnarl", 861), mon("Froslass", 478)],
    },
    MetaDeck {
        id: 4,
        name: "Dragapult Charizard",
        rank: 4,
        pokemon: &[mon("Dragapult", 887), mon("Charizard", 6)],
    },
    MetaDeck {
        id: 5,
        name: "Dragapult Dusknoir",
        rank: 5,
        pokemon: &[mon("Dragapult", 887), mon("Dusknoir", 477)],
    },
    MetaDeck {
        id: 6,
        name: "Flareon Noctowl",
        rank: 6,
        pokemon: &[mon("Flareon", 136), mon("Noctowl", 164)],
    },
    MetaDeck {
        id: 7,
        name: "Dragapult ex",
        rank: 7,
        pokemon: &[mon("Dragapult", 887)],
    },
    MetaDeck {
        id: 8,
        name: "Joltik Box",
        rank: 8,
        pokemon: &[mon("Joltik", 595)],
    },
    MetaDeck {
        id: 9,
        name: "Gholdengo ex",
        rank: 9,
        pokemon: &[mon("Gholdengo", 1000)],
    },
    MetaDeck {
        id: 10,
        name: "Gholdengo Dragapult",
        rank: 10,
        pokemon: &[mon("Gholdengo", 1000), mon("Dragapult", 887)],
    },
];

pub fn find_meta_deck(id: u32) -> Option<&'static MetaDeck> {
    META_DECKS.iter().find(|deck| deck.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_meta_deck_ids_are_unique() {
        let ids: HashSet<u32> = META_DECKS.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), META_DECKS.len());
    }

    #[test]
    fn test_every_deck_has_one_or_two_pokemon() {
        for deck in META_DECKS {
            assert!(
                (1..=2).contains(&deck.pokemon.len()),
                "{} has {} pokemon",
                deck.name,
                deck.pokemon.len()
            );
        }
    }

    #[test]
    fn test_find_meta_deck() {
        assert_eq!(find_meta_deck(4).map(|d| d.name), Some("Dragapult Charizard"));
        assert!(find_meta_deck(0).is_none());
        assert!(find_meta_deck(999).is_none());
    }
}
