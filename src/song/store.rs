use super::models::{SongRecord, StoredSong};
use super::schema::SONG_VERSIONED_SCHEMAS;
use crate::sqlite_persistence::open_versioned;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub trait SongStore: Send + Sync {
    /// Inserts a record, returning its id.
    fn create_song(&self, song: &SongRecord) -> Result<i64>;
    fn get_song(&self, id: i64) -> Result<Option<StoredSong>>;
    fn count_songs(&self) -> Result<usize>;
}

pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path, SONG_VERSIONED_SCHEMAS, "song")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        info!("Song store ready with {} songs", store.count_songs()?);
        Ok(store)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Song store connection mutex poisoned"))
    }
}

impl SongStore for SqliteSongStore {
    fn create_song(&self, song: &SongRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO song (artist_name, song_title, lyrics, summary, countries) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                song.artist_name,
                song.song_title,
                song.lyrics,
                song.summary,
                song.countries
            ],
        )
        .with_context(|| format!("Failed to insert song {}", song))?;
        let id = conn.last_insert_rowid();
        debug!("Inserted song {} with id {}", song, id);
        Ok(id)
    }

    fn get_song(&self, id: i64) -> Result<Option<StoredSong>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, artist_name, song_title, lyrics, summary, countries, created_at FROM song WHERE id = ?1",
            params![id],
            |row| {
                Ok(StoredSong {
                    id: row.get("id")?,
                    record: SongRecord {
                        artist_name: row.get("artist_name")?,
                        song_title: row.get("song_title")?,
                        lyrics: row.get("lyrics")?,
                        summary: row.get("summary")?,
                        countries: row.get("countries")?,
                    },
                    created_at: row.get("created_at")?,
                })
            },
        )
        .optional()
        .with_context(|| format!("Failed to read song {}", id))
    }

    fn count_songs(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM song", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
