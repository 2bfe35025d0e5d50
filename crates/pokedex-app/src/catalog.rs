// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::extract_id;
use serde::{Deserialize, Serialize};

/// One row of the index response, exactly as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndexEntry {
    pub name: String,
    pub url: String,
}

/// One normalized catalog row. `id` is decimal with no leading zeros and
/// `name` has hyphens rewritten to spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// The normalized catalog: an ordered run of entries whose ids are
/// contiguous from 1. Built once per index fetch and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Walks the raw index in order, assigning each entry an expected
    /// sequential id starting at 1. The first entry whose extracted id
    /// diverges from the running counter marks the break: that entry and
    /// everything after it are dropped, even if a later entry would match
    /// again. The API appends cosmetic-variant records with
    /// non-sequential five-digit ids after the canonical run, and the
    /// break is where they start.
    pub fn normalize(raw: &[RawIndexEntry]) -> Self {
        let mut entries = Vec::with_capacity(raw.len());
        let mut expected: u32 = 1;

        for entry in raw {
            let id = match extract_id(&entry.url) {
                Ok(id) => id,
                Err(_) => break,
            };
            if id != expected.to_string() {
                break;
            }
            entries.push(CatalogEntry {
                id,
                name: display_name(&entry.name),
                url: entry.url.clone(),
            });
            expected += 1;
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog size as the navigation bound.
    pub fn size(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Looks up an entry by its numeric id (1-based, catalog order).
    pub fn get(&self, id: u32) -> Option<&CatalogEntry> {
        if id < 1 {
            return None;
        }
        self.entries.get(id as usize - 1)
    }
}

/// Display form of an API name: hyphens become spaces, so
/// `mr-mime` renders as `mr mime`.
pub fn display_name(raw: &str) -> String {
    raw.replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::{Catalog, RawIndexEntry, display_name};

    fn raw(name: &str, url: &str) -> RawIndexEntry {
        RawIndexEntry {
            name: name.to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn normalize_keeps_contiguous_prefix_and_rewrites_names() {
        let catalog = Catalog::normalize(&[
            raw("pokemon-1", "pokemon/1/"),
            raw("pokemon-2", "pokemon/2/"),
            raw("pokemon-4", "pokemon/4/"),
        ]);

        assert_eq!(catalog.size(), 2);
        assert_eq!(catalog.entries()[0].id, "1");
        assert_eq!(catalog.entries()[0].name, "pokemon 1");
        assert_eq!(catalog.entries()[1].id, "2");
        assert_eq!(catalog.entries()[1].name, "pokemon 2");
    }

    #[test]
    fn normalize_truncates_at_gap_even_if_later_ids_match() {
        // A gap at 3 ends the canonical run; the later in-sequence 4 and 5
        // must not be re-admitted.
        let catalog = Catalog::normalize(&[
            raw("a", "pokemon/1/"),
            raw("b", "pokemon/2/"),
            raw("c", "pokemon/9/"),
            raw("d", "pokemon/3/"),
            raw("e", "pokemon/4/"),
        ]);

        assert_eq!(catalog.size(), 2);
    }

    #[test]
    fn normalize_truncates_at_variant_jump() {
        let catalog = Catalog::normalize(&[
            raw("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
            raw("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/"),
            raw("deoxys-normal", "https://pokeapi.co/api/v2/pokemon/10001/"),
        ]);

        assert_eq!(catalog.size(), 2);
        assert_eq!(catalog.get(2).map(|entry| entry.name.as_str()), Some("ivysaur"));
    }

    #[test]
    fn normalize_of_empty_input_is_empty_not_an_error() {
        let catalog = Catalog::normalize(&[]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.size(), 0);
    }

    #[test]
    fn normalize_is_idempotent_on_contiguous_input() {
        let first = Catalog::normalize(&[
            raw("bulbasaur", "pokemon/1/"),
            raw("ivysaur", "pokemon/2/"),
            raw("venusaur", "pokemon/3/"),
        ]);

        let round_trip: Vec<RawIndexEntry> = first
            .entries()
            .iter()
            .map(|entry| RawIndexEntry {
                name: entry.name.clone(),
                url: entry.url.clone(),
            })
            .collect();
        let second = Catalog::normalize(&round_trip);

        assert_eq!(first, second);
    }

    #[test]
    fn get_is_one_based_and_bounded() {
        let catalog = Catalog::normalize(&[raw("bulbasaur", "pokemon/1/")]);
        assert_eq!(catalog.get(0), None);
        assert_eq!(catalog.get(1).map(|entry| entry.id.as_str()), Some("1"));
        assert_eq!(catalog.get(2), None);
    }

    #[test]
    fn display_name_replaces_every_hyphen() {
        assert_eq!(display_name("mr-mime"), "mr mime");
        assert_eq!(display_name("tapu-koko-totem"), "tapu koko totem");
        assert_eq!(display_name("pikachu"), "pikachu");
    }
}
