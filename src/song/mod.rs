mod models;
mod schema;
mod store;
mod validation;

pub use models::{SongRecord, StoredSong, MAX_NAME_LENGTH};
pub use schema::SONG_VERSIONED_SCHEMAS;
pub use store::{SongStore, SqliteSongStore};
pub use validation::{validate_song, FieldErrors, NON_FIELD_ERRORS};
