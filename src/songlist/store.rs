//! SQLite-backed songlist store.

use super::models::*;
use super::schema::SONGLIST_SCHEMA;
use super::trait_def::{SonglistStore, StoreCounts};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const USER_COLUMNS: &str =
    "u.id, u.uuid, u.email, u.first_name, u.last_name, u.latitude, u.longitude, u.image_url, u.created, u.updated";
const GROUP_COLUMNS: &str = "g.id, g.user_id, g.name, g.created, g.updated";
const ARTIST_COLUMNS: &str = "a.id, a.name, a.echonest_id, a.songsterr_id, a.rdio_id";
const SONG_COLUMNS: &str = "s.id, s.artist_id, a.name, s.name, s.file_url, s.echonest_id, \
     s.songsterr_id, s.rdio_id, s.\"key\", s.tempo, s.loudness, s.major_key";
const VENUE_COLUMNS: &str = "v.id, v.name, v.latitude, v.longitude, v.fb_id, v.created, v.updated";
const PERFORMANCE_COLUMNS: &str =
    "p.id, p.user_id, p.venue_id, p.name, p.start, p.created, p.updated";

/// Returns true if the error comes from a UNIQUE constraint, e.g. a duplicate email.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn datetime_from_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(index)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(index, secs))
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        uuid: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        image_url: row.get(7)?,
        created: datetime_from_column(row, 8)?,
        updated: datetime_from_column(row, 9)?,
    })
}

fn parse_group_row(row: &rusqlite::Row) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        created: datetime_from_column(row, 3)?,
        updated: datetime_from_column(row, 4)?,
    })
}

fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        echonest_id: row.get(2)?,
        songsterr_id: row.get(3)?,
        rdio_id: row.get(4)?,
    })
}

fn parse_song_row(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        artist_id: row.get(1)?,
        artist_name: row.get(2)?,
        name: row.get(3)?,
        file_url: row.get(4)?,
        echonest_id: row.get(5)?,
        songsterr_id: row.get(6)?,
        rdio_id: row.get(7)?,
        key: row.get(8)?,
        tempo: row.get(9)?,
        loudness: row.get(10)?,
        major_key: row.get(11)?,
    })
}

fn parse_venue_row(row: &rusqlite::Row) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        fb_id: row.get(4)?,
        created: datetime_from_column(row, 5)?,
        updated: datetime_from_column(row, 6)?,
    })
}

fn parse_performance_row(row: &rusqlite::Row) -> rusqlite::Result<Performance> {
    Ok(Performance {
        id: row.get(0)?,
        user_id: row.get(1)?,
        venue_id: row.get(2)?,
        name: row.get(3)?,
        start: datetime_from_column(row, 4)?,
        created: datetime_from_column(row, 5)?,
        updated: datetime_from_column(row, 6)?,
    })
}

fn query_one<T, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.query_row(params, parse).optional()?)
}

fn query_all<T, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt
        .query_map(params, parse)?
        .collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

fn query_song(conn: &Connection, id: i64) -> Result<Option<Song>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM song s JOIN artist a ON a.id = s.artist_id WHERE s.id = ?1",
            SONG_COLUMNS
        ),
        params![id],
        parse_song_row,
    )
}

fn count(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM \"{}\"", table),
        [],
        |r| r.get(0),
    )?;
    Ok(count as usize)
}

#[derive(Clone)]
pub struct SqliteSonglistStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSonglistStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = SONGLIST_SCHEMA
            .open(db_path)
            .with_context(|| format!("Failed to open songlist database {:?}", db_path))?;
        info!("Opened songlist database at {:?}", db_path);
        Ok(SqliteSonglistStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SonglistStore for SqliteSonglistStore {
    fn insert_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO user (uuid, email, image_url, first_name, last_name, latitude, longitude, created, updated) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.uuid,
                user.email,
                user.image_url,
                user.first_name,
                user.last_name,
                user.latitude,
                user.longitude,
                user.created.timestamp(),
                user.updated.timestamp(),
            ],
        )
        .with_context(|| format!("Failed to insert user {:?}", user.email))?;
        let id = conn.last_insert_rowid();
        debug!("Inserted user {}", id);

        Ok(User {
            id,
            uuid: user.uuid.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            latitude: user.latitude,
            longitude: user.longitude,
            image_url: user.image_url.clone(),
            created: user.created,
            updated: user.updated,
        })
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        query_one(
            &self.lock(),
            &format!("SELECT {} FROM user u WHERE u.id = ?1", USER_COLUMNS),
            params![id],
            parse_user_row,
        )
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        query_one(
            &self.lock(),
            &format!("SELECT {} FROM user u WHERE u.email = ?1", USER_COLUMNS),
            params![email],
            parse_user_row,
        )
    }

    fn add_user_song(&self, user_id: i64, song_id: i64) -> Result<()> {
        self.lock()
            .execute(
                "INSERT OR IGNORE INTO users_songs (song_id, user_id) VALUES (?1, ?2)",
                params![song_id, user_id],
            )
            .with_context(|| format!("Failed to add song {} to user {}", song_id, user_id))?;
        Ok(())
    }

    fn get_user_songs(&self, user_id: i64) -> Result<Vec<Song>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM users_songs us \
                 JOIN song s ON s.id = us.song_id \
                 JOIN artist a ON a.id = s.artist_id \
                 WHERE us.user_id = ?1 ORDER BY us.rowid",
                SONG_COLUMNS
            ),
            params![user_id],
            parse_song_row,
        )
    }

    fn get_song_users(&self, song_id: i64) -> Result<Vec<User>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM users_songs us JOIN user u ON u.id = us.user_id \
                 WHERE us.song_id = ?1 ORDER BY us.rowid",
                USER_COLUMNS
            ),
            params![song_id],
            parse_user_row,
        )
    }

    fn insert_group(&self, group: &NewGroup) -> Result<Group> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO \"group\" (user_id, name, created, updated) VALUES (?1, ?2, ?3, ?4)",
            params![
                group.user_id,
                group.name,
                group.created.timestamp(),
                group.updated.timestamp()
            ],
        )
        .with_context(|| format!("Failed to insert group for user {}", group.user_id))?;

        Ok(Group {
            id: conn.last_insert_rowid(),
            user_id: group.user_id,
            name: group.name.clone(),
            created: group.created,
            updated: group.updated,
        })
    }

    fn get_group(&self, id: i64) -> Result<Option<Group>> {
        query_one(
            &self.lock(),
            &format!("SELECT {} FROM \"group\" g WHERE g.id = ?1", GROUP_COLUMNS),
            params![id],
            parse_group_row,
        )
    }

    fn get_user_groups(&self, user_id: i64) -> Result<Vec<Group>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM \"group\" g WHERE g.user_id = ?1 ORDER BY g.id",
                GROUP_COLUMNS
            ),
            params![user_id],
            parse_group_row,
        )
    }

    fn add_group_song(&self, group_id: i64, song_id: i64) -> Result<usize> {
        let conn = self.lock();
        let position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM groups_songs WHERE group_id = ?1",
            params![group_id],
            |r| r.get(0),
        )?;
        conn.execute(
            "INSERT INTO groups_songs (song_id, group_id, position) VALUES (?1, ?2, ?3)",
            params![song_id, group_id, position],
        )
        .with_context(|| format!("Failed to add song {} to group {}", song_id, group_id))?;
        Ok(position as usize)
    }

    fn get_group_songs(&self, group_id: i64) -> Result<Vec<Song>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM groups_songs gs \
                 JOIN song s ON s.id = gs.song_id \
                 JOIN artist a ON a.id = s.artist_id \
                 WHERE gs.group_id = ?1 ORDER BY gs.position",
                SONG_COLUMNS
            ),
            params![group_id],
            parse_song_row,
        )
    }

    fn get_song_groups(&self, song_id: i64) -> Result<Vec<Group>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM groups_songs gs JOIN \"group\" g ON g.id = gs.group_id \
                 WHERE gs.song_id = ?1 ORDER BY g.id",
                GROUP_COLUMNS
            ),
            params![song_id],
            parse_group_row,
        )
    }

    fn insert_artist(&self, artist: &NewArtist) -> Result<Artist> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO artist (name, echonest_id, songsterr_id, rdio_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                artist.name,
                artist.echonest_id,
                artist.songsterr_id,
                artist.rdio_id
            ],
        )
        .with_context(|| format!("Failed to insert artist {}", artist.name))?;

        Ok(Artist {
            id: conn.last_insert_rowid(),
            name: artist.name.clone(),
            echonest_id: artist.echonest_id.clone(),
            songsterr_id: artist.songsterr_id.clone(),
            rdio_id: artist.rdio_id.clone(),
        })
    }

    fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        query_one(
            &self.lock(),
            &format!("SELECT {} FROM artist a WHERE a.id = ?1", ARTIST_COLUMNS),
            params![id],
            parse_artist_row,
        )
    }

    fn insert_song(&self, song: &NewSong) -> Result<Song> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO song (artist_id, name, file_url, echonest_id, songsterr_id, rdio_id, \"key\", tempo, loudness, major_key) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                song.artist_id,
                song.name,
                song.file_url,
                song.echonest_id,
                song.songsterr_id,
                song.rdio_id,
                song.key,
                song.tempo,
                song.loudness,
                song.major_key,
            ],
        )
        .with_context(|| format!("Failed to insert song {}", song.name))?;
        let id = conn.last_insert_rowid();

        query_song(&conn, id)?.with_context(|| format!("Song {} vanished after insert", id))
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        query_song(&self.lock(), id)
    }

    fn get_artist_songs(&self, artist_id: i64) -> Result<Vec<Song>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM song s JOIN artist a ON a.id = s.artist_id \
                 WHERE s.artist_id = ?1 ORDER BY s.id",
                SONG_COLUMNS
            ),
            params![artist_id],
            parse_song_row,
        )
    }

    fn get_all_songs(&self) -> Result<Vec<Song>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM song s JOIN artist a ON a.id = s.artist_id ORDER BY s.id",
                SONG_COLUMNS
            ),
            [],
            parse_song_row,
        )
    }

    fn insert_venue(&self, venue: &NewVenue) -> Result<Venue> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO venue (name, latitude, longitude, fb_id, created, updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                venue.name,
                venue.latitude,
                venue.longitude,
                venue.fb_id,
                venue.created.timestamp(),
                venue.updated.timestamp()
            ],
        )
        .with_context(|| format!("Failed to insert venue {}", venue.name))?;

        Ok(Venue {
            id: conn.last_insert_rowid(),
            name: venue.name.clone(),
            latitude: venue.latitude,
            longitude: venue.longitude,
            fb_id: venue.fb_id.clone(),
            created: venue.created,
            updated: venue.updated,
        })
    }

    fn get_venue(&self, id: i64) -> Result<Option<Venue>> {
        query_one(
            &self.lock(),
            &format!("SELECT {} FROM venue v WHERE v.id = ?1", VENUE_COLUMNS),
            params![id],
            parse_venue_row,
        )
    }

    fn insert_performance(&self, performance: &NewPerformance) -> Result<Performance> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO performance (user_id, venue_id, name, start, created, updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                performance.user_id,
                performance.venue_id,
                performance.name,
                performance.start.timestamp(),
                performance.created.timestamp(),
                performance.updated.timestamp()
            ],
        )
        .with_context(|| format!("Failed to insert performance {}", performance.name))?;

        Ok(Performance {
            id: conn.last_insert_rowid(),
            user_id: performance.user_id,
            venue_id: performance.venue_id,
            name: performance.name.clone(),
            start: performance.start,
            created: performance.created,
            updated: performance.updated,
        })
    }

    fn get_performance(&self, id: i64) -> Result<Option<Performance>> {
        query_one(
            &self.lock(),
            &format!("SELECT {} FROM performance p WHERE p.id = ?1", PERFORMANCE_COLUMNS),
            params![id],
            parse_performance_row,
        )
    }

    fn get_user_performances(&self, user_id: i64) -> Result<Vec<Performance>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM performance p WHERE p.user_id = ?1 ORDER BY p.start",
                PERFORMANCE_COLUMNS
            ),
            params![user_id],
            parse_performance_row,
        )
    }

    fn get_venue_performances(&self, venue_id: i64) -> Result<Vec<Performance>> {
        query_all(
            &self.lock(),
            &format!(
                "SELECT {} FROM performance p WHERE p.venue_id = ?1 ORDER BY p.start",
                PERFORMANCE_COLUMNS
            ),
            params![venue_id],
            parse_performance_row,
        )
    }

    fn get_counts(&self) -> Result<StoreCounts> {
        let conn = self.lock();
        Ok(StoreCounts {
            users: count(&conn, "user")?,
            groups: count(&conn, "group")?,
            artists: count(&conn, "artist")?,
            songs: count(&conn, "song")?,
            venues: count(&conn, "venue")?,
            performances: count(&conn, "performance")?,
        })
    }
}
