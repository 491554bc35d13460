//! Validation of incoming song payloads.
//!
//! Errors are collected per field so the client gets every problem at once,
//! as `{"field": ["message", ...]}`.

use super::models::{SongRecord, MAX_NAME_LENGTH};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NULL: &str = "This field may not be null.";
const NOT_A_STRING: &str = "Not a valid string.";

/// Field name to the list of problems found with it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// Validates a decoded JSON body into a [`SongRecord`].
///
/// `artist_name` and `song_title` are required, trimmed, non-blank and at most
/// 255 characters. `lyrics`, `summary` and `countries` may be absent, null or
/// blank.
pub fn validate_song(body: &Value) -> Result<SongRecord, FieldErrors> {
    let Some(object) = body.as_object() else {
        return Err(FieldErrors::non_field(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            json_type_name(body)
        )));
    };

    let mut errors = FieldErrors::default();
    let artist_name = required_name(object, "artist_name", &mut errors);
    let song_title = required_name(object, "song_title", &mut errors);
    let lyrics = optional_text(object, "lyrics", &mut errors);
    let summary = optional_text(object, "summary", &mut errors);
    let countries = optional_text(object, "countries", &mut errors);

    match (artist_name, song_title) {
        (Some(artist_name), Some(song_title)) if errors.is_empty() => Ok(SongRecord {
            artist_name,
            song_title,
            lyrics,
            summary,
            countries,
        }),
        _ => Err(errors),
    }
}

fn required_name(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    let value = match object.get(field) {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NULL);
            return None;
        }
        Some(value) => value,
    };

    let text = match as_text(value) {
        Some(text) => text.trim().to_string(),
        None => {
            errors.add(field, NOT_A_STRING);
            return None;
        }
    };

    if text.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if text.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            field,
            format!(
                "Ensure this field has no more than {} characters.",
                MAX_NAME_LENGTH
            ),
        );
        return None;
    }
    Some(text)
}

fn optional_text(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => match as_text(value) {
            Some(text) => Some(text.trim().to_string()),
            None => {
                errors.add(field, NOT_A_STRING);
                None
            }
        },
    }
}

/// Strings as-is, numbers in their decimal form, anything else rejected.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
