//! External service integrations and the sync engine

pub mod matcher;
pub mod plex;
pub mod radarr;
pub mod rate_limiter;
pub mod sync;

pub use plex::PlexClient;
pub use radarr::RadarrClient;
pub use sync::{SyncService, resolve_target_profile};
