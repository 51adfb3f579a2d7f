//! Plex API client for watchlist retrieval
//!
//! Reads the account watchlist from a Plex server's hub endpoint. Only
//! movie hubs are consumed; every other media kind is skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::rate_limiter::RateLimitedClient;

/// External identifier attached to a watchlist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalId {
    Imdb(String),
    Tmdb(String),
}

/// A movie on the user's watchlist
#[derive(Debug, Clone)]
pub struct WatchlistMovie {
    pub title: String,
    pub year: Option<i32>,
    /// Identifiers the source supplied; both kinds are kept when present
    pub ids: Vec<ExternalId>,
}

impl WatchlistMovie {
    /// IMDB id, if the source supplied one
    pub fn imdb_id(&self) -> Option<&str> {
        self.ids.iter().find_map(|id| match id {
            ExternalId::Imdb(value) => Some(value.as_str()),
            _ => None,
        })
    }

    /// TMDB id, if the source supplied one
    pub fn tmdb_id(&self) -> Option<&str> {
        self.ids.iter().find_map(|id| match id {
            ExternalId::Tmdb(value) => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Plex API client
pub struct PlexClient {
    client: RateLimitedClient,
    base_url: String,
    token: String,
}

/// Watchlist hub response from Plex
#[derive(Debug, Deserialize)]
struct WatchlistResponse {
    #[serde(rename = "MediaContainer", default)]
    media_container: MediaContainer,
}

#[derive(Debug, Default, Deserialize)]
struct MediaContainer {
    #[serde(rename = "Hub", default)]
    hubs: Vec<Hub>,
}

#[derive(Debug, Deserialize)]
struct Hub {
    #[serde(rename = "type")]
    hub_type: Option<String>,
    #[serde(rename = "Metadata", default)]
    items: Vec<HubItem>,
}

#[derive(Debug, Deserialize)]
struct HubItem {
    title: Option<String>,
    year: Option<i32>,
    #[serde(rename = "Guid", default)]
    guids: Vec<Guid>,
}

#[derive(Debug, Deserialize)]
struct Guid {
    id: Option<String>,
}

impl PlexClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: RateLimitedClient::for_plex(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Fetch the movies on the account watchlist.
    ///
    /// A transport or HTTP-status failure is an `Err`; an empty watchlist is
    /// `Ok(vec![])`. Callers must not conflate the two.
    pub async fn get_watchlist(&self) -> Result<Vec<WatchlistMovie>> {
        let url = format!("{}/hubs/watchlist", self.base_url);
        let response = self
            .client
            .get_with_headers(
                &url,
                &[
                    ("X-Plex-Token", self.token.as_str()),
                    ("Accept", "application/json"),
                ],
            )
            .await
            .context("Failed to fetch Plex watchlist")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Plex watchlist request failed with status: {}",
                response.status()
            );
        }

        let watchlist: WatchlistResponse = response
            .json()
            .await
            .context("Failed to parse Plex watchlist")?;

        let movies = extract_movies(watchlist);
        info!(count = movies.len(), "Found movies in Plex watchlist");
        Ok(movies)
    }
}

/// Flatten the hub response into watchlist movies, movie hubs only
fn extract_movies(watchlist: WatchlistResponse) -> Vec<WatchlistMovie> {
    let mut movies = Vec::new();
    for hub in watchlist.media_container.hubs {
        if hub.hub_type.as_deref() != Some("movie") {
            continue;
        }
        for item in hub.items {
            let Some(title) = item.title else {
                warn!("Skipping watchlist item without a title");
                continue;
            };
            let ids = item.guids.iter().filter_map(parse_guid).collect();
            movies.push(WatchlistMovie {
                title,
                year: item.year,
                ids,
            });
        }
    }
    movies
}

/// Map a Plex guid ("imdb://tt1160419", "tmdb://438631") to an external id.
/// Unrecognized schemes ("plex://", "tvdb://", ...) are dropped.
fn parse_guid(guid: &Guid) -> Option<ExternalId> {
    let id = guid.id.as_deref()?;
    if let Some(value) = id.strip_prefix("imdb://") {
        return Some(ExternalId::Imdb(value.to_string()));
    }
    if let Some(value) = id.strip_prefix("tmdb://") {
        return Some(ExternalId::Tmdb(value.to_string()));
    }
    debug!(guid = %id, "Ignoring unrecognized guid scheme");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_response(json: &str) -> WatchlistResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extracts_movies_with_identifiers() {
        let response = parse_response(
            r#"{
                "MediaContainer": {
                    "Hub": [
                        {
                            "type": "movie",
                            "Metadata": [
                                {
                                    "title": "Dune",
                                    "year": 2021,
                                    "Guid": [
                                        {"id": "plex://movie/5d776b9ad5fab900219dd3a8"},
                                        {"id": "imdb://tt1160419"},
                                        {"id": "tmdb://438631"}
                                    ]
                                }
                            ]
                        }
                    ]
                }
            }"#,
        );

        let movies = extract_movies(response);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Dune");
        assert_eq!(movies[0].year, Some(2021));
        assert_eq!(movies[0].imdb_id(), Some("tt1160419"));
        assert_eq!(movies[0].tmdb_id(), Some("438631"));
    }

    #[test]
    fn test_ignores_non_movie_hubs() {
        let response = parse_response(
            r#"{
                "MediaContainer": {
                    "Hub": [
                        {
                            "type": "show",
                            "Metadata": [{"title": "Severance", "year": 2022}]
                        },
                        {
                            "type": "movie",
                            "Metadata": [{"title": "Heat", "year": 1995}]
                        }
                    ]
                }
            }"#,
        );

        let movies = extract_movies(response);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Heat");
    }

    #[test]
    fn test_skips_items_without_title() {
        let response = parse_response(
            r#"{
                "MediaContainer": {
                    "Hub": [
                        {
                            "type": "movie",
                            "Metadata": [
                                {"year": 2003},
                                {"title": "Oldboy", "year": 2003}
                            ]
                        }
                    ]
                }
            }"#,
        );

        let movies = extract_movies(response);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Oldboy");
    }

    #[test]
    fn test_item_without_guids_has_no_identifiers() {
        let response = parse_response(
            r#"{
                "MediaContainer": {
                    "Hub": [
                        {
                            "type": "movie",
                            "Metadata": [{"title": "Stalker", "year": 1979}]
                        }
                    ]
                }
            }"#,
        );

        let movies = extract_movies(response);
        assert!(movies[0].ids.is_empty());
        assert_eq!(movies[0].imdb_id(), None);
        assert_eq!(movies[0].tmdb_id(), None);
    }

    #[test]
    fn test_empty_container_yields_empty_watchlist() {
        let movies = extract_movies(parse_response(r#"{"MediaContainer": {}}"#));
        assert!(movies.is_empty());
    }
}
