//! Deck layout and calibration core for liquid-handling robots
//!
//! This crate contains the coordinate-addressing logic that does not depend
//! on any particular robot or motion controller:
//!
//! - Position label codec ("B3" -> row 1, column 2)
//! - Labware catalog records (pipette, tiprack and microplate dimensions)
//! - Labware variants with explicit capabilities
//! - Deck slot registry and calibration routing
//! - Microplate well-coordinate transform and cached well handles
//! - Transfer planning against a pipette's volume envelope
//!
//! Everything here is synchronous and single-threaded. Nothing performs I/O.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod calibration;
pub mod catalog;
pub mod deck;
pub mod error;
pub mod labware;
pub mod position;
pub mod transfer;

pub use calibration::{CalibrationDocument, CalibrationOrigin, CalibrationParams, Coordinate};
pub use catalog::{Catalog, MicroplateSpec, PipetteSpec, Tag, TiprackSpec, MAX_TAG_LEN};
pub use deck::Deck;
pub use error::DeckError;
pub use labware::{
    Capability, Labware, LabwareKind, Microplate, Pipette, PipetteSettings, Side, Tiprack, Well,
};
pub use position::{normalize, Position, MAX_COLUMNS, MAX_ROWS};
pub use transfer::{CoordinateLookup, TransferPlan, WellAddress};

#[cfg(feature = "serde")]
pub use calibration::{CalibrationRecord, RecordError};
