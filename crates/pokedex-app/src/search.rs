// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::catalog::{Catalog, CatalogEntry};

/// Resolves a submitted search to a catalog id. Matching is exact,
/// case-insensitive equality against the normalized name; substring hits
/// never decide navigation. Empty or whitespace-only queries match
/// nothing. Ids are unique, so the first hit in catalog order wins.
pub fn find_id_by_name(query: &str, catalog: &Catalog) -> Option<u32> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    catalog
        .entries()
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
        .and_then(|entry| entry.id.parse().ok())
}

/// Looser contains predicate driving the incremental suggestion list
/// while the user types. Never used to decide navigation.
pub fn suggestions<'a>(query: &str, catalog: &'a Catalog, limit: usize) -> Vec<&'a CatalogEntry> {
    let needle = query.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .entries()
        .iter()
        .filter(|entry| entry.name.to_ascii_lowercase().contains(&needle))
        .take(limit)
        .collect()
}
