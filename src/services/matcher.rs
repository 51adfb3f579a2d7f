//! Watchlist-to-library matching
//!
//! Identifier matches are authoritative; the title/year tuple is only a
//! fallback, because titles collide and get stylized differently across
//! services. Rule priority outranks library order, so an IMDB hit late in
//! the list still beats a title collision at the front. There is no fuzzy
//! title matching: retagging the wrong movie is worse than skipping one.

use super::plex::WatchlistMovie;
use super::radarr::RadarrMovie;

/// Resolve a watchlist movie to at most one library movie.
///
/// Rules, first hit wins:
/// 1. exact IMDB id
/// 2. exact TMDB id
/// 3. case-insensitive title plus year
pub fn find_library_match<'a>(
    wanted: &WatchlistMovie,
    library: &'a [RadarrMovie],
) -> Option<&'a RadarrMovie> {
    if let Some(imdb_id) = wanted.imdb_id()
        && let Some(found) = library
            .iter()
            .find(|movie| movie.imdb_id.as_deref() == Some(imdb_id))
    {
        return Some(found);
    }

    // Plex supplies the TMDB id as a string, Radarr as a number
    if let Some(tmdb_id) = wanted.tmdb_id()
        && let Some(found) = library
            .iter()
            .find(|movie| movie.tmdb_id.is_some_and(|id| id.to_string() == tmdb_id))
    {
        return Some(found);
    }

    library.iter().find(|movie| {
        movie.title.to_lowercase() == wanted.title.to_lowercase() && movie.year == wanted.year
    })
}
