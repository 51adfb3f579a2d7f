//! Radarr API client for movie library management
//!
//! Radarr's v3 movie endpoint accepts only whole-record PUTs, so a profile
//! update is a read-modify-write cycle against the full record. Partial
//! writes would drop every setting this service never modeled.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::rate_limiter::RateLimitedClient;

/// Radarr API client
pub struct RadarrClient {
    client: RateLimitedClient,
    base_url: String,
    api_key: String,
}

/// A movie tracked by Radarr.
///
/// Only the fields this service reads or writes are modeled; everything
/// else the API returns rides along in `extra` so a PUT of the full record
/// cannot lose settings this service never looked at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovie {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    pub quality_profile_id: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A named quality profile defined in Radarr
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
}

impl RadarrClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: RateLimitedClient::for_radarr(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn headers(&self) -> [(&str, &str); 2] {
        [
            ("X-Api-Key", self.api_key.as_str()),
            ("Accept", "application/json"),
        ]
    }

    /// Fetch every movie tracked by Radarr (full snapshot, no pagination)
    pub async fn get_movies(&self) -> Result<Vec<RadarrMovie>> {
        let url = format!("{}/api/v3/movie", self.base_url);
        let response = self
            .client
            .get_with_headers(&url, &self.headers())
            .await
            .context("Failed to fetch movies from Radarr")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Radarr movie list request failed with status: {}",
                response.status()
            );
        }

        let movies: Vec<RadarrMovie> = response
            .json()
            .await
            .context("Failed to parse Radarr movies")?;

        info!(count = movies.len(), "Found movies in Radarr");
        Ok(movies)
    }

    /// Fetch the quality profiles defined in Radarr
    pub async fn get_quality_profiles(&self) -> Result<Vec<QualityProfile>> {
        let url = format!("{}/api/v3/qualityprofile", self.base_url);
        let response = self
            .client
            .get_with_headers(&url, &self.headers())
            .await
            .context("Failed to fetch quality profiles from Radarr")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Radarr quality profile request failed with status: {}",
                response.status()
            );
        }

        let profiles: Vec<QualityProfile> = response
            .json()
            .await
            .context("Failed to parse Radarr quality profiles")?;

        info!(count = profiles.len(), "Found quality profiles in Radarr");
        Ok(profiles)
    }

    /// Fetch a single movie record by id
    pub async fn get_movie(&self, movie_id: i64) -> Result<RadarrMovie> {
        let url = format!("{}/api/v3/movie/{}", self.base_url, movie_id);
        let response = self
            .client
            .get_with_headers(&url, &self.headers())
            .await
            .context("Failed to fetch movie from Radarr")?;

        if response.status().as_u16() == 404 {
            anyhow::bail!("Movie {} not found in Radarr", movie_id);
        }

        if !response.status().is_success() {
            anyhow::bail!(
                "Radarr movie request failed with status: {}",
                response.status()
            );
        }

        response.json().await.context("Failed to parse Radarr movie")
    }

    /// Point a movie at a different quality profile.
    ///
    /// Fetches the current record first and writes the whole thing back with
    /// only the profile id changed.
    pub async fn set_quality_profile(&self, movie_id: i64, profile_id: i64) -> Result<()> {
        let mut movie = self.get_movie(movie_id).await?;
        movie.quality_profile_id = profile_id;

        let url = format!("{}/api/v3/movie/{}", self.base_url, movie_id);
        let response = self
            .client
            .put_json_with_headers(&url, &self.headers(), &movie)
            .await
            .context("Failed to update movie in Radarr")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Radarr movie update failed with status: {}",
                response.status()
            );
        }

        info!(
            movie_id,
            title = %movie.title,
            profile_id,
            "Updated movie quality profile"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_movie_round_trip_preserves_unmodeled_fields() {
        let raw = serde_json::json!({
            "id": 7,
            "title": "Dune",
            "year": 2021,
            "imdbId": "tt1160419",
            "tmdbId": 438631,
            "qualityProfileId": 3,
            "monitored": true,
            "rootFolderPath": "/movies",
            "minimumAvailability": "released",
            "tags": [1, 2]
        });

        let mut movie: RadarrMovie = serde_json::from_value(raw.clone()).unwrap();
        movie.quality_profile_id = 5;

        let mut expected = raw;
        expected["qualityProfileId"] = 5.into();
        assert_eq!(serde_json::to_value(&movie).unwrap(), expected);
    }

    #[test]
    fn test_movie_without_identifiers_parses() {
        let movie: RadarrMovie = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Solaris",
            "year": 1972,
            "qualityProfileId": 1
        }))
        .unwrap();

        assert_eq!(movie.imdb_id, None);
        assert_eq!(movie.tmdb_id, None);
        assert!(movie.extra.is_empty());
    }
}
