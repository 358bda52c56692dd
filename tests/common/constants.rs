//! Shared constants for end-to-end tests
//!
//! When the seeded data changes, update only this file.

// ============================================================================
// Seeded Users
// ============================================================================

/// Inserted first, gets id 1 and owns no songs.
pub const OTHER_USER_EMAIL: &str = "other@example.com";

/// Inserted second, gets id 2, the default index user.
pub const INDEX_USER_EMAIL: &str = "index@example.com";
pub const INDEX_USER_FIRST_NAME: &str = "Thom";
pub const INDEX_USER_ID: i64 = 2;

// ============================================================================
// Seeded Catalog
// ============================================================================

pub const ARTIST_1_NAME: &str = "Radiohead";
pub const ARTIST_1_ECHONEST_ID: &str = "AR001";

pub const ARTIST_2_NAME: &str = "Portishead";
pub const ARTIST_2_ECHONEST_ID: &str = "AR002";

/// (artist, title, echonest id, key, mode, tempo, loudness)
pub type SongFixture = (&'static str, &'static str, &'static str, i32, i32, f64, f64);

pub const SONGS: [SongFixture; 5] = [
    (ARTIST_1_NAME, "Creep", "SO042", 7, 0, 91.0, -8.2),
    (ARTIST_1_NAME, "Karma Police", "SO043", 7, 1, 75.0, -9.1),
    (ARTIST_1_NAME, "No Surprises", "SO044", 5, 1, 76.0, -11.0),
    (ARTIST_2_NAME, "Glory Box", "SO045", 9, 0, 62.5, -10.4),
    (ARTIST_2_NAME, "Roads", "SO046", 4, 0, 67.0, -13.3),
];

/// Indices into [`SONGS`] claimed by the index user.
pub const INDEX_USER_SONGS: [usize; 2] = [1, 3];

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
