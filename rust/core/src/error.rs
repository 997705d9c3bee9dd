// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for surface text operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading POLYHEDRALSURFACE text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input does not match the surface grammar
    #[error("Invalid POLYHEDRALSURFACE text near: {snippet}")]
    Grammar { snippet: String },

    /// Syntactically valid input using a feature this codec rejects
    #[error("Unsupported surface feature: {0}")]
    UnsupportedFeature(String),

    /// Ring without enough coordinates to describe a closed face
    #[error("Ring has {count} coordinates; at least 4 (3 unique + closing repeat) are required")]
    RingTooShort { count: usize },

    /// Coordinate token that is not `lon lat alt [m]` with finite numbers
    #[error("Invalid coordinate '{token}': {reason}")]
    InvalidCoordinate { token: String, reason: String },

    /// First and last vertex of a ring differ
    #[error("Ring is not closed: first vertex {first} does not match last vertex {last}")]
    RingNotClosed { first: String, last: String },
}

impl Error {
    /// Build a grammar error quoting a bounded prefix of the input
    pub fn grammar(input: &str) -> Self {
        const MAX_SNIPPET: usize = 60;

        let snippet = match input.char_indices().nth(MAX_SNIPPET) {
            Some((cut, _)) => format!("{}...", &input[..cut]),
            None => input.to_string(),
        };
        Error::Grammar { snippet }
    }

    /// Build a coordinate error naming the offending token
    pub fn coordinate(token: &str, reason: impl Into<String>) -> Self {
        Error::InvalidCoordinate {
            token: token.trim().to_string(),
            reason: reason.into(),
        }
    }
}
