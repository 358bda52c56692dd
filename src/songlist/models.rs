//! Songlister entities.
//!
//! Each entity comes in two shapes: a `New*` value built by its constructor
//! (timestamps and derived fields are filled in there) and the stored record
//! carrying the surrogate `id` assigned by the database.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::fmt;

/// Timestamps are persisted with second precision, so constructors truncate
/// to keep the in-memory value equal to the stored one.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

// =============================================================================
// User
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub uuid: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub uuid: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl NewUser {
    /// Stores every field as given and generates a fresh uuid.
    pub fn new(
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        image_url: Option<String>,
    ) -> Self {
        let now = now();
        NewUser {
            uuid: uuid::Uuid::new_v4().to_string(),
            email,
            first_name,
            last_name,
            latitude,
            longitude,
            image_url,
            created: now,
            updated: now,
        }
    }
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<User {} {} {}>",
            or_empty(&self.first_name),
            or_empty(&self.last_name),
            or_empty(&self.email)
        )
    }
}

// =============================================================================
// Group
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Group {
    pub id: i64,
    pub user_id: i64,
    pub name: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewGroup {
    pub user_id: i64,
    pub name: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl NewGroup {
    pub fn new(user: &User, name: Option<String>) -> Self {
        let now = now();
        NewGroup {
            user_id: user.id,
            name,
            created: now,
            updated: now,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Group {}>", or_empty(&self.name))
    }
}

// =============================================================================
// Artist
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub echonest_id: Option<String>,
    pub songsterr_id: Option<String>,
    pub rdio_id: Option<String>,
}

/// A plain artist, `echonest_id` is filled in by the enrichment step.
#[derive(Clone, Debug, PartialEq)]
pub struct NewArtist {
    pub name: String,
    pub echonest_id: Option<String>,
    pub songsterr_id: Option<String>,
    pub rdio_id: Option<String>,
}

impl NewArtist {
    pub fn new(
        name: impl Into<String>,
        songsterr_id: Option<String>,
        rdio_id: Option<String>,
    ) -> Self {
        NewArtist {
            name: name.into(),
            echonest_id: None,
            songsterr_id,
            rdio_id,
        }
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Artist {}>", self.name)
    }
}

// =============================================================================
// Song
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Song {
    pub id: i64,
    pub artist_id: i64,
    pub artist_name: String,
    pub name: String,
    pub file_url: Option<String>,
    pub echonest_id: Option<String>,
    pub songsterr_id: Option<String>,
    pub rdio_id: Option<String>,
    /// Pitch class, 0 = C.
    pub key: Option<i32>,
    pub tempo: Option<f64>,
    pub loudness: Option<f64>,
    pub major_key: Option<bool>,
}

/// A plain song as handed to the enrichment step.
///
/// Callers may set `echonest_id`, `key`, `tempo`, `loudness` and `major_key`,
/// but enrichment overwrites all of them with the fetched audio summary.
/// `genre` has no column and is never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSong {
    pub artist_id: i64,
    pub artist_name: String,
    pub name: String,
    pub file_url: Option<String>,
    pub echonest_id: Option<String>,
    pub songsterr_id: Option<String>,
    pub rdio_id: Option<String>,
    pub key: Option<i32>,
    pub tempo: Option<f64>,
    pub loudness: Option<f64>,
    pub major_key: Option<bool>,
    pub genre: Option<String>,
}

impl NewSong {
    pub fn new(name: impl Into<String>, artist: &Artist) -> Self {
        NewSong {
            artist_id: artist.id,
            artist_name: artist.name.clone(),
            name: name.into(),
            file_url: None,
            echonest_id: None,
            songsterr_id: None,
            rdio_id: None,
            key: None,
            tempo: None,
            loudness: None,
            major_key: None,
            genre: None,
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Song {} - {}>", self.artist_name, self.name)
    }
}

// =============================================================================
// Venue
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fb_id: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewVenue {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fb_id: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl NewVenue {
    pub fn new(
        name: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        fb_id: Option<String>,
    ) -> Self {
        let now = now();
        NewVenue {
            name: name.into(),
            latitude,
            longitude,
            fb_id,
            created: now,
            updated: now,
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Venue {}>", self.name)
    }
}

// =============================================================================
// Performance
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Performance {
    pub id: i64,
    pub user_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub name: String,
    pub start: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Performer and venue are not constructor arguments, callers assign them
/// with [`NewPerformance::set_user`] and [`NewPerformance::set_venue`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewPerformance {
    pub user_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub name: String,
    pub start: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl NewPerformance {
    pub fn new(name: impl Into<String>, start: DateTime<Utc>) -> Self {
        let now = now();
        NewPerformance {
            user_id: None,
            venue_id: None,
            name: name.into(),
            start: start.trunc_subsecs(0),
            created: now,
            updated: now,
        }
    }

    pub fn set_user(&mut self, user: &User) {
        self.user_id = Some(user.id);
    }

    pub fn set_venue(&mut self, venue: &Venue) {
        self.venue_id = Some(venue.id);
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Performance {} {}>", self.name, self.start.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        let new_user = NewUser::new(
            Some("thom@example.com".to_string()),
            Some("Thom".to_string()),
            Some("Yorke".to_string()),
            Some(51.75),
            Some(-1.25),
            None,
        );
        User {
            id,
            uuid: new_user.uuid,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            latitude: new_user.latitude,
            longitude: new_user.longitude,
            image_url: new_user.image_url,
            created: new_user.created,
            updated: new_user.updated,
        }
    }

    #[test]
    fn new_user_generates_distinct_uuids_and_equal_timestamps() {
        let a = NewUser::new(None, None, None, None, None, None);
        let b = NewUser::new(None, None, None, None, None, None);

        assert_ne!(a.uuid, b.uuid);
        assert!(uuid::Uuid::parse_str(&a.uuid).is_ok());
        assert_eq!(a.created, a.updated);
    }

    #[test]
    fn group_links_to_owner() {
        let owner = user(7);
        let group = NewGroup::new(&owner, Some("Friday set".to_string()));
        assert_eq!(group.user_id, 7);
        assert_eq!(group.created, group.updated);
    }

    #[test]
    fn new_artist_has_no_external_id_before_enrichment() {
        let artist = NewArtist::new("Radiohead", Some("123".to_string()), None);
        assert_eq!(artist.echonest_id, None);
        assert_eq!(artist.songsterr_id.as_deref(), Some("123"));
    }

    #[test]
    fn performance_relations_are_assigned_after_construction() {
        let start = DateTime::parse_from_rfc3339("2013-06-01T20:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut performance = NewPerformance::new("Open mic", start);
        assert_eq!(performance.user_id, None);
        assert_eq!(performance.venue_id, None);

        performance.set_user(&user(3));
        assert_eq!(performance.user_id, Some(3));
        assert_eq!(performance.start, start);
    }

    #[test]
    fn display_formats() {
        assert_eq!(user(1).to_string(), "<User Thom Yorke thom@example.com>");

        let song = Song {
            id: 1,
            artist_id: 1,
            artist_name: "Radiohead".to_string(),
            name: "Creep".to_string(),
            file_url: None,
            echonest_id: None,
            songsterr_id: None,
            rdio_id: None,
            key: None,
            tempo: None,
            loudness: None,
            major_key: None,
        };
        assert_eq!(song.to_string(), "<Song Radiohead - Creep>");
    }
}
