// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

/// Pulls the numeric identifier out of a detail URL. The id is the path
/// segment immediately preceding the trailing slash, so
/// `https://pokeapi.co/api/v2/pokemon/152/` yields `"152"`. URLs without a
/// trailing slash are normalized before splitting and yield the same id.
pub fn extract_id(url: &str) -> Result<String> {
    let normalized = if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{url}/")
    };

    let pieces: Vec<&str> = normalized.split('/').collect();
    if pieces.len() < 2 {
        bail!("malformed detail url {url:?}: no id segment before the trailing slash");
    }
    Ok(pieces[pieces.len() - 2].to_owned())
}

/// Left zero-pads `id` so the printed width matches the decimal width of
/// `catalog_size`. A catalog of 1000 entries renders id 7 as `"0007"`.
pub fn format_padded(id: u32, catalog_size: u32) -> String {
    let width = catalog_size.to_string().len();
    format!("{id:0width$}")
}
