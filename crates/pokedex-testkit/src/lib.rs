// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use pokedex_app::{Catalog, DetailRecord, PositionStore, RawIndexEntry, Router, StoreKey};
use std::collections::HashMap;

/// In-memory `PositionStore` for tests. `fail_writes` makes every `set`
/// error, for exercising persistence-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<&'static str, String>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn with(key: StoreKey, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.as_str(), value.to_owned());
        store
    }
}

impl PositionStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self.values.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<()> {
        if self.fail_writes {
            bail!("store writes disabled for this test");
        }
        self.values.insert(key.as_str(), value.to_owned());
        Ok(())
    }
}

/// `Router` fake that records every navigated path.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    pub param: Option<String>,
    pub paths: Vec<String>,
}

impl RecordingRouter {
    pub fn with_param(param: &str) -> Self {
        Self {
            param: Some(param.to_owned()),
            paths: Vec::new(),
        }
    }

    pub fn last_path(&self) -> Option<&str> {
        self.paths.last().map(String::as_str)
    }
}

impl Router for RecordingRouter {
    fn current_param(&self) -> Option<String> {
        self.param.clone()
    }

    fn navigate(&mut self, id: u32) {
        self.paths.push(format!("/{id}"));
    }
}

/// A contiguous raw index of `count` entries named `pokemon-<i>`, the
/// shape the real index endpoint returns before normalization.
pub fn raw_index(count: u32) -> Vec<RawIndexEntry> {
    (1..=count)
        .map(|id| RawIndexEntry {
            name: format!("pokemon-{id}"),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        })
        .collect()
}

/// A normalized catalog of `count` entries.
pub fn catalog(count: u32) -> Catalog {
    Catalog::normalize(&raw_index(count))
}

/// A plausible detail record for `id`, already in display units.
pub fn detail(id: u32) -> DetailRecord {
    DetailRecord::from_raw_units(
        id,
        &format!("pokemon-{id}"),
        7,
        69,
        Some(format!("sprites/{id}.png")),
        vec!["grass".to_owned(), "poison".to_owned()],
    )
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, RecordingRouter, catalog, detail, raw_index};
    use anyhow::Result;
    use pokedex_app::{PositionStore, Router, StoreKey};

    #[test]
    fn raw_index_is_contiguous_from_one() {
        let raw = raw_index(3);
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].url, "https://pokeapi.co/api/v2/pokemon/1/");
        assert_eq!(catalog(3).size(), 3);
    }

    #[test]
    fn detail_fixture_uses_display_units() {
        let record = detail(1);
        assert_eq!(record.name, "pokemon 1");
        assert_eq!(record.height_meters, 0.7);
        assert_eq!(record.weight_kilograms, 6.9);
    }

    #[test]
    fn memory_store_can_simulate_write_failure() -> Result<()> {
        let mut store = MemoryStore::default();
        store.set(StoreKey::LastSearch, "mew")?;
        assert_eq!(store.get(StoreKey::LastSearch)?, Some("mew".to_owned()));

        store.fail_writes = true;
        assert!(store.set(StoreKey::LastSearch, "mewtwo").is_err());
        Ok(())
    }

    #[test]
    fn recording_router_tracks_navigations() {
        let mut router = RecordingRouter::with_param("5");
        assert_eq!(router.current_param(), Some("5".to_owned()));

        router.navigate(6);
        router.navigate(7);
        assert_eq!(router.last_path(), Some("/7"));
    }
}
