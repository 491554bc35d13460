use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

/// V 0
const SONG_TABLE_V_0: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("artist_name", &SqlType::Text, non_null = true),
        sqlite_column!("song_title", &SqlType::Text, non_null = true),
        sqlite_column!("lyrics", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("countries", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_song_artist_name", "artist_name")],
};

pub const SONG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONG_TABLE_V_0],
    migration: None,
}];
