/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Text encoding of a [`SessionDescription`] for manual, out-of-band exchange.
//!
//! A code is standard base64 (padded) over the JSON form of the description,
//! i.e. exactly `btoa(JSON.stringify(description))`. There is no version
//! field and no integrity check: anything that fails to decode is a user
//! input error.

use crate::session::SessionDescription;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionCodeError {
    #[error("Connection code is empty.")]
    Empty,

    #[error("Connection code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Connection code does not contain a session description: {0}")]
    Json(#[from] serde_json::Error),
}

/// A session description encoded for copy and paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCode(String);

impl ConnectionCode {
    pub fn encode(description: &SessionDescription) -> Self {
        // Serializing a struct of a string and a unit enum cannot fail.
        let json = serde_json::to_vec(description).unwrap_or_default();
        Self(STANDARD.encode(json))
    }

    /// Parses pasted text. Whitespace anywhere in the input is dropped since
    /// chat clients and terminals like to wrap long lines.
    pub fn parse(text: &str) -> Result<Self, ConnectionCodeError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ConnectionCodeError::Empty);
        }
        let code = Self(compact);
        code.decode()?;
        Ok(code)
    }

    pub fn decode(&self) -> Result<SessionDescription, ConnectionCodeError> {
        let bytes = STANDARD.decode(self.0.as_bytes())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConnectionCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ConnectionCode> for String {
    fn from(code: ConnectionCode) -> Self {
        code.0
    }
}
