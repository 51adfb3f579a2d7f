//! Watchlist reconciliation service
//!
//! One pass: fetch the watchlist, fetch the library once, match each entry
//! and retag the quality profile where it differs. Per-entry failures are
//! logged and skipped; only pass-level fetch failures abort a pass.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::matcher::find_library_match;
use super::plex::{PlexClient, WatchlistMovie};
use super::radarr::{QualityProfile, RadarrClient, RadarrMovie};

/// Pause after each update attempt, a courtesy to both APIs
pub const UPDATE_DELAY: Duration = Duration::from_millis(500);

/// Source of desired watchlist entries
#[async_trait]
pub trait WatchlistSource: Send + Sync {
    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistMovie>>;
}

/// Movie library whose entries carry a mutable quality profile
#[async_trait]
pub trait MovieLibrary: Send + Sync {
    async fn fetch_movies(&self) -> Result<Vec<RadarrMovie>>;
    async fn fetch_quality_profiles(&self) -> Result<Vec<QualityProfile>>;
    async fn set_quality_profile(&self, movie_id: i64, profile_id: i64) -> Result<()>;
}

#[async_trait]
impl WatchlistSource for PlexClient {
    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistMovie>> {
        self.get_watchlist().await
    }
}

#[async_trait]
impl MovieLibrary for RadarrClient {
    async fn fetch_movies(&self) -> Result<Vec<RadarrMovie>> {
        self.get_movies().await
    }

    async fn fetch_quality_profiles(&self) -> Result<Vec<QualityProfile>> {
        self.get_quality_profiles().await
    }

    async fn set_quality_profile(&self, movie_id: i64, profile_id: i64) -> Result<()> {
        RadarrClient::set_quality_profile(self, movie_id, profile_id).await
    }
}

/// Aggregate counters for one reconciliation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub updated: u32,
    pub unmatched: u32,
    pub already_correct: u32,
}

/// Resolve the configured profile name to its Radarr id.
///
/// Exactly one profile must carry the name; anything else is a setup error
/// and the caller is expected to abort startup.
pub async fn resolve_target_profile(library: &dyn MovieLibrary, name: &str) -> Result<i64> {
    let profiles = library
        .fetch_quality_profiles()
        .await
        .context("Failed to fetch quality profiles")?;

    let mut found = profiles.iter().filter(|profile| profile.name == name);
    match (found.next(), found.next()) {
        (Some(profile), None) => {
            info!(profile = %name, id = profile.id, "Resolved target quality profile");
            Ok(profile.id)
        }
        (Some(_), Some(_)) => {
            anyhow::bail!("Multiple quality profiles named '{}' in Radarr", name)
        }
        (None, _) => {
            let available: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
            error!(profile = %name, available = ?available, "Target quality profile not found");
            anyhow::bail!("Quality profile '{}' not found in Radarr", name)
        }
    }
}

/// Coordinates watchlist-to-library reconciliation passes
pub struct SyncService {
    watchlist: Arc<dyn WatchlistSource>,
    library: Arc<dyn MovieLibrary>,
    target_profile_id: i64,
    update_delay: Duration,
}

impl SyncService {
    pub fn new(
        watchlist: Arc<dyn WatchlistSource>,
        library: Arc<dyn MovieLibrary>,
        target_profile_id: i64,
        update_delay: Duration,
    ) -> Self {
        Self {
            watchlist,
            library,
            target_profile_id,
            update_delay,
        }
    }

    /// Run one reconciliation pass.
    ///
    /// Returns `Err` only when the watchlist or the library snapshot cannot
    /// be fetched. An empty watchlist means "nothing to do", never "clear
    /// everything". Individual entries never abort the pass.
    pub async fn run_once(&self) -> Result<SyncReport> {
        let wanted = self
            .watchlist
            .fetch_watchlist()
            .await
            .context("Watchlist fetch failed, aborting pass")?;

        let mut report = SyncReport::default();
        if wanted.is_empty() {
            info!("Watchlist is empty, nothing to reconcile");
            return Ok(report);
        }

        // One snapshot serves every match in the pass
        let library = self
            .library
            .fetch_movies()
            .await
            .context("Library fetch failed, aborting pass")?;

        for movie in &wanted {
            debug!(title = %movie.title, year = ?movie.year, "Processing watchlist entry");

            let Some(found) = find_library_match(movie, &library) else {
                warn!(title = %movie.title, year = ?movie.year, "No matching movie in Radarr");
                report.unmatched += 1;
                continue;
            };

            if found.quality_profile_id == self.target_profile_id {
                debug!(title = %movie.title, movie_id = found.id, "Already on target profile");
                report.already_correct += 1;
                continue;
            }

            match self
                .library
                .set_quality_profile(found.id, self.target_profile_id)
                .await
            {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    error!(
                        title = %movie.title,
                        year = ?movie.year,
                        movie_id = found.id,
                        error = %e,
                        "Profile update failed, skipping entry"
                    );
                }
            }

            tokio::time::sleep(self.update_delay).await;
        }

        info!(
            updated = report.updated,
            unmatched = report.unmatched,
            already_correct = report.already_correct,
            "Reconciliation pass complete"
        );
        Ok(report)
    }
}
