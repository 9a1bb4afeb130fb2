//! Error types for the ecopoint library
//!
//! Route resolution failures never surface here: they are folded into the
//! "unavailable" path by the resolver. This type covers the remaining
//! fallible operations (catalog loading, geocoding, configuration, and
//! selecting an id the catalog does not know).

use std::fmt;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum combined similarity for an id to be suggested.
const MIN_SUGGESTION_SCORE: f64 = 0.7;

/// Suggest the closest known collection point id for a misspelled one
///
/// Scores each candidate with 70% Jaro-Winkler and 30% normalized
/// Levenshtein. Returns `None` when the input matches exactly (ignoring case)
/// or when nothing scores above the threshold.
pub fn suggest_point_id<'a, I>(input: &str, known_ids: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, f64)> = None;

    for candidate in known_ids {
        let candidate_lower = candidate.to_lowercase();
        if candidate_lower == input_lower {
            return None;
        }

        let score = jaro_winkler(&input_lower, &candidate_lower) * 0.7
            + normalized_levenshtein(&input_lower, &candidate_lower) * 0.3;

        if score >= MIN_SUGGESTION_SCORE && best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    best.map(|(id, _)| id.to_string())
}

/// Main error type for ecopoint operations
#[derive(Debug)]
pub enum Error {
    /// Selected id does not exist in the catalog
    PointNotFound {
        id: String,
        suggestion: Option<String>,
    },

    /// HTTP-specific error (non-success status, bad body)
    HttpError(String),

    /// Network connectivity issues
    NetworkError(String),

    /// Invalid catalog, configuration, or parameters
    InvalidInput(String),

    /// JSON decoding failure
    ParseError(String),

    /// File I/O error
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PointNotFound { id, suggestion } => match suggestion {
                Some(s) => write!(f, "Collection point '{id}' not found. Did you mean '{s}'?"),
                None => write!(f, "Collection point '{id}' not found"),
            },
            Error::HttpError(msg) => write!(f, "HTTP error: {msg}"),
            Error::NetworkError(msg) => write!(f, "Network error: {msg}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Error::IoError(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else if err.is_decode() {
            Error::ParseError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for ecopoint operations
pub type Result<T> = std::result::Result<T, Error>;
