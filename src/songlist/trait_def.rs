//! SonglistStore trait definition.
//!
//! Relationships are exposed as explicit queries returning sequences rather
//! than navigable attributes on the entities.

use super::models::*;
use anyhow::Result;

/// Row counts of the entity tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub groups: usize,
    pub artists: usize,
    pub songs: usize,
    pub venues: usize,
    pub performances: usize,
}

pub trait SonglistStore: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Inserts a user. Fails on a duplicate email or image url.
    fn insert_user(&self, user: &NewUser) -> Result<User>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, id: i64) -> Result<Option<User>>;

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Records that the user has performed or claimed the song.
    /// Claiming the same song twice is a no-op.
    fn add_user_song(&self, user_id: i64, song_id: i64) -> Result<()>;

    fn get_user_songs(&self, user_id: i64) -> Result<Vec<Song>>;

    fn get_song_users(&self, song_id: i64) -> Result<Vec<User>>;

    // =========================================================================
    // Groups
    // =========================================================================

    fn insert_group(&self, group: &NewGroup) -> Result<Group>;

    fn get_group(&self, id: i64) -> Result<Option<Group>>;

    fn get_user_groups(&self, user_id: i64) -> Result<Vec<Group>>;

    /// Appends the song at the end of the group and returns its position.
    /// Adding a song that is already in the group fails.
    fn add_group_song(&self, group_id: i64, song_id: i64) -> Result<usize>;

    /// Songs of the group in insertion order.
    fn get_group_songs(&self, group_id: i64) -> Result<Vec<Song>>;

    fn get_song_groups(&self, song_id: i64) -> Result<Vec<Group>>;

    // =========================================================================
    // Artists and songs
    // =========================================================================

    fn insert_artist(&self, artist: &NewArtist) -> Result<Artist>;

    fn get_artist(&self, id: i64) -> Result<Option<Artist>>;

    fn insert_song(&self, song: &NewSong) -> Result<Song>;

    fn get_song(&self, id: i64) -> Result<Option<Song>>;

    fn get_artist_songs(&self, artist_id: i64) -> Result<Vec<Song>>;

    fn get_all_songs(&self) -> Result<Vec<Song>>;

    // =========================================================================
    // Venues and performances
    // =========================================================================

    fn insert_venue(&self, venue: &NewVenue) -> Result<Venue>;

    fn get_venue(&self, id: i64) -> Result<Option<Venue>>;

    fn insert_performance(&self, performance: &NewPerformance) -> Result<Performance>;

    fn get_performance(&self, id: i64) -> Result<Option<Performance>>;

    fn get_user_performances(&self, user_id: i64) -> Result<Vec<Performance>>;

    fn get_venue_performances(&self, venue_id: i64) -> Result<Vec<Performance>>;

    fn get_counts(&self) -> Result<StoreCounts>;
}
