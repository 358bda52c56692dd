//! SQLite schema for the songlist database.
//!
//! Six entity tables with integer rowid primary keys, plus two association
//! tables for the user/song and group/song many-to-many relations.
//! Timestamps are unix seconds.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const GROUP_FK: ForeignKey = ForeignKey {
    foreign_table: "group",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artist",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "song",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const VENUE_FK: ForeignKey = ForeignKey {
    foreign_table: "venue",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const PERFORMER_FK: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const USER_TABLE: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("uuid", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text),
        sqlite_column!("image_url", &SqlType::Text),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
        sqlite_column!("created", &SqlType::Integer, non_null = true),
        sqlite_column!("updated", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["email"], &["image_url"]],
};

const GROUP_TABLE: Table = Table {
    name: "group",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("name", &SqlType::Text),
        sqlite_column!("created", &SqlType::Integer, non_null = true),
        sqlite_column!("updated", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_group_user_id", "user_id")],
    unique_constraints: &[],
};

const ARTIST_TABLE: Table = Table {
    name: "artist",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("echonest_id", &SqlType::Text),
        sqlite_column!("songsterr_id", &SqlType::Text),
        sqlite_column!("rdio_id", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[],
};

const SONG_TABLE: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("file_url", &SqlType::Text),
        sqlite_column!("echonest_id", &SqlType::Text),
        sqlite_column!("songsterr_id", &SqlType::Text),
        sqlite_column!("rdio_id", &SqlType::Text),
        sqlite_column!("key", &SqlType::Integer),
        sqlite_column!("tempo", &SqlType::Real),
        sqlite_column!("loudness", &SqlType::Real),
        sqlite_column!("major_key", &SqlType::Integer),
    ],
    indices: &[("idx_song_artist_id", "artist_id")],
    unique_constraints: &[],
};

const VENUE_TABLE: Table = Table {
    name: "venue",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
        sqlite_column!("fb_id", &SqlType::Text),
        sqlite_column!("created", &SqlType::Integer, non_null = true),
        sqlite_column!("updated", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const PERFORMANCE_TABLE: Table = Table {
    name: "performance",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            foreign_key = Some(&PERFORMER_FK)
        ),
        sqlite_column!(
            "venue_id",
            &SqlType::Integer,
            foreign_key = Some(&VENUE_FK)
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("start", &SqlType::Integer, non_null = true),
        sqlite_column!("created", &SqlType::Integer, non_null = true),
        sqlite_column!("updated", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_performance_user_id", "user_id"),
        ("idx_performance_venue_id", "venue_id"),
    ],
    unique_constraints: &[],
};

/// Songs in a group, `position` keeps insertion order.
const GROUPS_SONGS_TABLE: Table = Table {
    name: "groups_songs",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!(
            "group_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GROUP_FK)
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_groups_songs_song_id", "song_id")],
    unique_constraints: &[&["group_id", "song_id"]],
};

const USERS_SONGS_TABLE: Table = Table {
    name: "users_songs",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
    ],
    indices: &[("idx_users_songs_song_id", "song_id")],
    unique_constraints: &[&["user_id", "song_id"]],
};

pub const SONGLIST_SCHEMA: VersionedSchema = VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE,
        GROUP_TABLE,
        ARTIST_TABLE,
        SONG_TABLE,
        VENUE_TABLE,
        PERFORMANCE_TABLE,
        GROUPS_SONGS_TABLE,
        USERS_SONGS_TABLE,
    ],
};
