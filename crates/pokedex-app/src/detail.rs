// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::catalog::display_name;
use serde::{Deserialize, Serialize};

/// The transformed detail payload for one catalog entry. Created per
/// fetch, keyed by the cursor id it was requested for; a record whose id
/// no longer matches the live cursor is stale and must be discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub height_meters: f64,
    pub weight_kilograms: f64,
    pub sprite_ref: Option<String>,
    pub types: Vec<String>,
}

impl DetailRecord {
    /// Builds a record from the raw API units: height in decimetres and
    /// weight in hectograms, both scaled by 0.1 and rounded to two
    /// decimals. The name is rewritten to display form.
    pub fn from_raw_units(
        id: u32,
        name: &str,
        height_decimetres: i64,
        weight_hectograms: i64,
        sprite_ref: Option<String>,
        types: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: display_name(name),
            height_meters: round2(height_decimetres as f64 * 0.1),
            weight_kilograms: round2(weight_hectograms as f64 * 0.1),
            sprite_ref,
            types,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
