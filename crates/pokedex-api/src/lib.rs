// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use pokedex_app::{DetailRecord, RawIndexEntry};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// A request that reached the server but came back non-successful. The
/// status is kept so callers can distinguish index-level failures
/// (terminal for the session) from detail-level ones (detail pane only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchFailed {
    pub status: u16,
}

impl fmt::Display for FetchFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed with status {}", self.status)
    }
}

impl std::error::Error for FetchFailed {}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("invalid api.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the full catalog index in one bulk request. `limit=-1`
    /// asks the API for every entry it has.
    pub fn fetch_index(&self) -> Result<Vec<RawIndexEntry>> {
        let response = self
            .http
            .get(format!("{}?limit=-1", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(status)).context("fetch catalog index");
        }

        let parsed: IndexResponse = response.json().context("decode catalog index")?;
        Ok(parsed.results)
    }

    /// Fetches and transforms the detail payload for one identifier.
    pub fn fetch_detail(&self, id: u32) -> Result<DetailRecord> {
        let response = self
            .http
            .get(format!("{}/{id}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(status)).with_context(|| format!("fetch detail for id {id}"));
        }

        let parsed: DetailResponse = response.json().context("decode detail payload")?;
        Ok(parsed.into_record(id))
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {base_url} -- check the network and [api] config ({error})")
}

fn fetch_failed(status: StatusCode) -> anyhow::Error {
    FetchFailed {
        status: status.as_u16(),
    }
    .into()
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    results: Vec<RawIndexEntry>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    name: String,
    height: i64,
    weight: i64,
    sprites: SpritesPayload,
    #[serde(default)]
    types: Vec<TypeSlot>,
}

#[derive(Debug, Deserialize)]
struct SpritesPayload {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: i64,
    #[serde(rename = "type")]
    type_ref: TypeRef,
}

#[derive(Debug, Deserialize)]
struct TypeRef {
    name: String,
}

impl DetailResponse {
    fn into_record(self, id: u32) -> DetailRecord {
        let mut slots = self.types;
        slots.sort_by_key(|slot| slot.slot);
        let types = slots.into_iter().map(|slot| slot.type_ref.name).collect();

        DetailRecord::from_raw_units(
            id,
            &self.name,
            self.height,
            self.weight,
            self.sprites.front_default,
            types,
        )
    }
}
