use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of the artist and title fields.
pub const MAX_NAME_LENGTH: usize = 255;

/// A song and the data derived from its lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub artist_name: String,
    pub song_title: String,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub countries: Option<String>,
}

impl SongRecord {
    pub fn new(artist_name: impl Into<String>, song_title: impl Into<String>) -> Self {
        Self {
            artist_name: artist_name.into(),
            song_title: song_title.into(),
            lyrics: None,
            summary: None,
            countries: None,
        }
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    /// Lyrics, when present and not blank.
    pub fn usable_lyrics(&self) -> Option<&str> {
        self.lyrics
            .as_deref()
            .filter(|lyrics| !lyrics.trim().is_empty())
    }

    /// Whether both derived fields are already filled in.
    pub fn is_enriched(&self) -> bool {
        self.summary.is_some() && self.countries.is_some()
    }
}

impl fmt::Display for SongRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist_name, self.song_title)
    }
}

/// A persisted [`SongRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSong {
    pub id: i64,
    pub record: SongRecord,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}
