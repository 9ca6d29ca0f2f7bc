//! Configuration loading for labdeck
//!
//! Turns TOML text into the structures the core consumes:
//!
//! - Labware catalogs (`standards.toml` is embedded as the default)
//! - Deck layouts: slot population, pipette settings and calibration
//! - Stored calibration records (postcard bytes) for re-applying a one-time
//!   calibration on the next run

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod calibration;
pub mod catalog;
pub mod error;
pub mod layout;
pub mod loader;

pub use calibration::{load_calibration, parse_calibration, restore_calibration, save_calibration};
pub use catalog::{extend_catalog, parse_catalog, standard_catalog, STANDARD_CATALOG};
pub use error::ConfigError;
pub use layout::{parse_layout, DeckLayout, SlotEntry};
pub use loader::{load_deck, load_deck_str};
