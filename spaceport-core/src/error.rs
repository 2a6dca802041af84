//! Error types for Spaceport core.

use std::{error::Error, fmt};

/// A ship field that failed its validity predicate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidField {
    /// Name is missing, empty, or longer than the limit.
    Name,
    /// Planet is missing, empty, or longer than the limit.
    Planet,
    /// Ship type is missing on creation.
    ShipType,
    /// Production date is missing or outside the allowed years.
    ProdDate,
    /// Speed is missing or outside the allowed range.
    Speed,
    /// Crew size is missing or outside the allowed range.
    CrewSize,
}

impl InvalidField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidField::Name => "name",
            InvalidField::Planet => "planet",
            InvalidField::ShipType => "shipType",
            InvalidField::ProdDate => "prodDate",
            InvalidField::Speed => "speed",
            InvalidField::CrewSize => "crewSize",
        }
    }
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for Spaceport core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceportError {
    /// A supplied field failed validation.
    Validation(InvalidField),
    /// The identifier text is not a positive integer.
    InvalidId(String),
    /// No ship exists with the identifier.
    NotFound(i64),
    /// The storage backend failed.
    Storage(String),
}

impl fmt::Display for SpaceportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(field) => write!(f, "invalid ship field: {field}"),
            Self::InvalidId(raw) => write!(f, "invalid ship id: {raw:?}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for SpaceportError {}

impl From<InvalidField> for SpaceportError {
    fn from(value: InvalidField) -> Self {
        Self::Validation(value)
    }
}

/// Convenience result type for Spaceport core.
pub type Result<T> = std::result::Result<T, SpaceportError>;
