//! Configuration errors

use core::fmt;

use alloc::string::String;

use labdeck_core::{DeckError, RecordError};

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// TOML parsing failed
    TomlParse(String),
    /// Catalog entry with impossible dimensions or volumes
    InvalidCatalogEntry(String),
    /// Deck population or calibration failed
    Deck(DeckError),
    /// Stored calibration record unusable
    Record(RecordError),
}

impl From<DeckError> for ConfigError {
    fn from(e: DeckError) -> Self {
        ConfigError::Deck(e)
    }
}

impl From<RecordError> for ConfigError {
    fn from(e: RecordError) -> Self {
        ConfigError::Record(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUtf8 => f.write_str("configuration is not valid UTF-8"),
            Self::TomlParse(msg) => write!(f, "TOML parse error: {msg}"),
            Self::InvalidCatalogEntry(tag) => write!(f, "invalid catalog entry {tag:?}"),
            Self::Deck(e) => write!(f, "deck error: {e}"),
            Self::Record(e) => write!(f, "calibration record error: {e}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Deck(e) => Some(e),
            Self::Record(e) => Some(e),
            _ => None,
        }
    }
}

/// Map a TOML deserialization error, keeping its message
pub(crate) fn toml_error(e: toml::de::Error) -> ConfigError {
    use alloc::string::ToString;

    warn!("TOML parse error: {=str}", e.message());
    ConfigError::TomlParse(e.to_string())
}
