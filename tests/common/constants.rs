//! Shared constants for end-to-end tests
//!
//! When stub data changes (known songs, canned model answers), update only
//! this file.

// ============================================================================
// Upstream credentials
// ============================================================================

pub const TEST_MUSIXMATCH_KEY: &str = "test-musixmatch-key";
pub const TEST_OPENAI_KEY: &str = "sk-test";

// ============================================================================
// Stub lyrics catalog
// ============================================================================

/// Artist the lyrics stub knows about
pub const KNOWN_ARTIST: &str = "Adele";

/// Title the lyrics stub knows about
pub const KNOWN_TITLE: &str = "Hello";

/// Lyrics returned for the known song
pub const KNOWN_LYRICS: &str =
    "Hello, it's me. I was wondering if after all these years you'd like to meet, from California";

/// A combination the lyrics stub reports as not found
pub const UNKNOWN_ARTIST: &str = "Nobody";
pub const UNKNOWN_TITLE: &str = "No Such Song";

// ============================================================================
// Stub model answers
// ============================================================================

pub const STUB_SUMMARY: &str = "The singer reaches out to an old love to apologize.";

/// Raw countries answer; the server normalizes it to [`STUB_COUNTRIES`]
pub const STUB_COUNTRIES_RAW: &str = "United States,  England.";
pub const STUB_COUNTRIES: &str = "United States, England";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Timeout of every test request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
