//! Room join code - short shareable code a partner types to pair up

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Join codes are always this many characters
pub const JOIN_CODE_LEN: usize = 6;

/// Characters used when generating a code. Uppercase letters and digits,
/// matching what participants are asked to type in.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A validated 6-character room join code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JoinCode(String);

impl JoinCode {
    /// Parse and normalize a user-supplied code (lowercase input is accepted)
    pub fn parse(input: &str) -> Result<Self, JoinCodeParseError> {
        let normalized = input.trim().to_ascii_uppercase();

        if normalized.len() != JOIN_CODE_LEN {
            return Err(JoinCodeParseError::WrongLength(normalized.len()));
        }
        if !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(JoinCodeParseError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Get the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for JoinCode {
    type Error = JoinCodeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JoinCode> for String {
    fn from(code: JoinCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for JoinCode {
    type Err = JoinCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error when parsing a join code
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JoinCodeParseError {
    #[error("join code must be {JOIN_CODE_LEN} characters, got {0}")]
    WrongLength(usize),

    #[error("join code may only contain letters and digits")]
    InvalidCharacter,
}

/// Generate a random join code.
///
/// Uniqueness is enforced by the store's unique constraint; collisions surface
/// as a conflict on insert and the caller regenerates.
#[must_use]
pub fn generate_join_code() -> JoinCode {
    let mut rng = rand::thread_rng();
    let code: String = (0..JOIN_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    JoinCode(code)
}
