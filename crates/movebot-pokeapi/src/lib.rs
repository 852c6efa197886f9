//! PokeAPI adapter (move-attribute lookup).
//!
//! Uses the `GET /move/{name}` endpoint; only the name, power and damage class
//! of the response are read.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use movebot_core::{
    domain::{DamageClass, MoveData},
    errors::{Error, LookupError},
    ports::MoveLookup,
    Result,
};

#[derive(Clone, Debug)]
pub struct PokeApiClient {
    base_url: String,
    http: reqwest::Client,
}

/// The subset of the PokeAPI move resource we use.
#[derive(Debug, Deserialize)]
struct MoveResponse {
    name: String,
    power: Option<u32>,
    damage_class: Option<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("movebot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn move_url(&self, slug: &str) -> String {
        format!("{}/move/{slug}", self.base_url)
    }
}

/// PokeAPI identifiers are lower-case with dashes (`thunder-wave`).
pub fn move_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Only `[a-z0-9-]` reaches the request path.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn parse_move(body: &str) -> std::result::Result<MoveData, LookupError> {
    let resp: MoveResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;

    let damage_class = match resp.damage_class {
        Some(dc) => Some(
            dc.name
                .parse::<DamageClass>()
                .map_err(|e| LookupError::Malformed(e.to_string()))?,
        ),
        None => None,
    };

    Ok(MoveData {
        canonical_name: resp.name,
        damage_class,
        base_power: resp.power,
    })
}

#[async_trait]
impl MoveLookup for PokeApiClient {
    async fn fetch_move(&self, name: &str) -> Result<MoveData> {
        let slug = move_slug(name);
        if !is_valid_slug(&slug) {
            return Err(LookupError::NotFound(name.to_string()).into());
        }

        let url = self.move_url(&slug);
        tracing::debug!(%url, "fetching move");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(format!("pokeapi request error: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(slug).into());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Transport(format!(
                "pokeapi returned {status} {}",
                body.chars().take(200).collect::<String>()
            ))
            .into());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| LookupError::Transport(format!("pokeapi body error: {e}")))?;

        Ok(parse_move(&body)?)
    }
}
