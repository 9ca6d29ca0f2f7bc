//! Labware catalog
//!
//! Hardware sizes differ only in their constants, so each labware family has
//! one record type keyed by a size tag. The table itself is configuration
//! data; adding a new pipette or plate is a table edit, not a new type.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::labware::{Labware, LabwareKind, Microplate, Pipette, Tiprack};
use crate::position::Position;

/// Maximum size tag length
pub const MAX_TAG_LEN: usize = 16;

/// Catalog key such as "P200" or "96-deepwell"
pub type Tag = heapless::String<MAX_TAG_LEN>;

/// Build a tag, or `None` if the text exceeds [`MAX_TAG_LEN`]
pub fn tag(text: &str) -> Option<Tag> {
    Tag::try_from(text).ok()
}

/// Pipette size record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipetteSpec {
    /// Size tag (e.g., "P10")
    pub size: Tag,
    /// Smallest volume the pipette can move (µL)
    pub min_vol: f64,
    /// Largest volume the pipette can move (µL)
    pub max_vol: f64,
    /// Number of channels
    #[cfg_attr(feature = "serde", serde(default = "single_channel"))]
    pub channels: u8,
}

#[cfg(feature = "serde")]
fn single_channel() -> u8 {
    1
}

impl PipetteSpec {
    /// Single-channel pipette with the given envelope
    pub fn new(size: Tag, min_vol: f64, max_vol: f64) -> Self {
        Self {
            size,
            min_vol,
            max_vol,
            channels: 1,
        }
    }

    /// Set the channel count
    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    /// Check if a volume lies within the envelope (inclusive)
    pub fn accepts(&self, volume: f64) -> bool {
        self.min_vol <= volume && volume <= self.max_vol
    }

    /// Sanity check for loaded tables
    pub fn is_valid(&self) -> bool {
        self.channels > 0 && 0.0 <= self.min_vol && self.min_vol <= self.max_vol
    }
}

/// Tiprack record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TiprackSpec {
    /// Size tag of the pipette the tips fit
    pub size: Tag,
}

/// Microplate dimensional record
///
/// Lengths in millimetres, volumes in µL.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MicroplateSpec {
    /// Model tag (e.g., "96-deepwell")
    pub model: Tag,
    /// Number of well rows (A..)
    pub rows: u16,
    /// Number of well columns (1..)
    pub cols: u16,
    /// Nominal well volume
    pub volume: f64,
    /// Minimum working volume
    pub min_vol: f64,
    /// Maximum working volume
    pub max_vol: f64,
    /// Plate height
    pub height: f64,
    /// Plate footprint length
    pub length: f64,
    /// Plate footprint width
    pub width: f64,
    /// Well diameter
    pub diameter: f64,
    /// Well depth
    pub depth: f64,
    /// Distance from the plate edge to the centre of A1 along x
    pub a1_x: f64,
    /// Distance from the plate edge to the centre of A1 along y
    pub a1_y: f64,
    /// Centre-to-centre well pitch
    pub spacing: f64,
}

impl MicroplateSpec {
    /// Check if a position addresses a well on this plate
    pub fn contains(&self, position: Position) -> bool {
        position.row() < self.rows && position.col() < self.cols
    }

    /// Number of wells
    pub fn well_count(&self) -> u32 {
        self.rows as u32 * self.cols as u32
    }

    /// Sanity check for loaded tables
    pub fn is_valid(&self) -> bool {
        self.rows > 0
            && self.cols > 0
            && self.spacing > 0.0
            && 0.0 <= self.min_vol
            && self.min_vol <= self.max_vol
            && self.max_vol <= self.volume
    }
}

/// Table of known labware
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Catalog {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pipettes: Vec<PipetteSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tipracks: Vec<TiprackSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub microplates: Vec<MicroplateSpec>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pipette record, replacing any record with the same tag
    pub fn insert_pipette(&mut self, spec: PipetteSpec) {
        self.pipettes.retain(|p| !p.size.eq_ignore_ascii_case(&spec.size));
        self.pipettes.push(spec);
    }

    /// Add a tiprack record, replacing any record with the same tag
    pub fn insert_tiprack(&mut self, spec: TiprackSpec) {
        self.tipracks.retain(|t| !t.size.eq_ignore_ascii_case(&spec.size));
        self.tipracks.push(spec);
    }

    /// Add a microplate record, replacing any record with the same tag
    pub fn insert_microplate(&mut self, spec: MicroplateSpec) {
        self.microplates
            .retain(|m| !m.model.eq_ignore_ascii_case(&spec.model));
        self.microplates.push(spec);
    }

    /// Find a pipette record by tag (case-insensitive)
    pub fn find_pipette(&self, size: &str) -> Option<&PipetteSpec> {
        self.pipettes
            .iter()
            .find(|p| p.size.eq_ignore_ascii_case(size))
    }

    /// Find a tiprack record by tag (case-insensitive)
    pub fn find_tiprack(&self, size: &str) -> Option<&TiprackSpec> {
        self.tipracks
            .iter()
            .find(|t| t.size.eq_ignore_ascii_case(size))
    }

    /// Find a microplate record by tag (case-insensitive)
    pub fn find_microplate(&self, model: &str) -> Option<&MicroplateSpec> {
        self.microplates
            .iter()
            .find(|m| m.model.eq_ignore_ascii_case(model))
    }

    /// Build a pipette of the given size
    pub fn pipette(&self, size: &str) -> Result<Pipette, DeckError> {
        self.find_pipette(size)
            .map(|spec| Pipette::new(spec.clone()))
            .ok_or_else(|| DeckError::UnknownLabware(size.into()))
    }

    /// Build a tiprack of the given size
    pub fn tiprack(&self, size: &str) -> Result<Tiprack, DeckError> {
        self.find_tiprack(size)
            .map(|spec| Tiprack::new(spec.clone()))
            .ok_or_else(|| DeckError::UnknownLabware(size.into()))
    }

    /// Build a fresh, uncalibrated microplate of the given model
    pub fn microplate(&self, model: &str) -> Result<Microplate, DeckError> {
        self.find_microplate(model)
            .map(|spec| Microplate::new(spec.clone()))
            .ok_or_else(|| DeckError::UnknownLabware(model.into()))
    }

    /// Build any labware variant by kind and tag
    ///
    /// Trash has no table entry and must not be given a `model`; every other
    /// variant needs one.
    pub fn labware(&self, kind: LabwareKind, model: Option<&str>) -> Result<Labware, DeckError> {
        let required = || model.ok_or(DeckError::MissingModel(kind));
        Ok(match kind {
            LabwareKind::Pipette => self.pipette(required()?)?.into(),
            LabwareKind::Tiprack => self.tiprack(required()?)?.into(),
            LabwareKind::Microplate => self.microplate(required()?)?.into(),
            LabwareKind::Trash if model.is_some() => {
                return Err(DeckError::UnexpectedModel(kind));
            }
            LabwareKind::Trash => Labware::Trash,
        })
    }
}
