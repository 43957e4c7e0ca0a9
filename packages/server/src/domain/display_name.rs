//! Display name value object.

use std::fmt;

use super::AdmissionError;

/// Identity the server uses for its own notices. No participant may take it.
pub const RESERVED_NAME: &str = "SERVER";

/// Characters that would make a name look like a message prefix or a path.
pub const ILLEGAL_CHARS: [char; 8] = ['(', ')', '[', ']', '{', '}', '/', '\\'];

/// A validated participant display name.
///
/// Holding a `DisplayName` guarantees the name is non-empty, is not the
/// reserved server identity and contains none of [`ILLEGAL_CHARS`].
/// Uniqueness and bans are checked by the
/// [`SessionRegistry`](super::SessionRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, AdmissionError> {
        if value.is_empty() {
            return Err(AdmissionError::Empty);
        }
        if value.to_lowercase() == RESERVED_NAME.to_lowercase() {
            return Err(AdmissionError::Reserved(value));
        }
        if let Some(c) = value.chars().find(|c| ILLEGAL_CHARS.contains(c)) {
            return Err(AdmissionError::IllegalChar(c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AdmissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
