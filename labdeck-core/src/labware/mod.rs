//! Labware variants and their capabilities
//!
//! Labware is anything that can sit in a deck slot. Whether or not it is a
//! "smart" module, each variant declares the operations it answers to:
//!
//! | Variant    | Capabilities                  |
//! |------------|-------------------------------|
//! | Pipette    | Configure                     |
//! | Tiprack    | none                          |
//! | Trash      | Dispose                       |
//! | Microplate | Calibrate, CoordinateLookup   |
//!
//! Asking a variant for an operation outside its set fails with
//! [`DeckError::CapabilityNotSupported`].

pub mod microplate;
pub mod pipette;
pub mod tiprack;
pub mod well;

pub use microplate::Microplate;
pub use pipette::{Pipette, PipetteSettings, Side};
pub use tiprack::Tiprack;
pub use well::Well;

use alloc::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationOrigin, CalibrationParams, Coordinate};
use crate::error::DeckError;
use crate::transfer::WellAddress;

/// Optional operation a labware variant may support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    /// Accepts a settings patch
    Configure,
    /// Accepts a calibration origin
    Calibrate,
    /// Resolves well labels to coordinates
    CoordinateLookup,
    /// Accepts discarded tips
    Dispose,
}

/// Labware variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LabwareKind {
    Pipette,
    Tiprack,
    Trash,
    Microplate,
}

impl LabwareKind {
    /// Capabilities every instance of this variant supports
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Pipette => &[Capability::Configure],
            Self::Tiprack => &[],
            Self::Trash => &[Capability::Dispose],
            Self::Microplate => &[Capability::Calibrate, Capability::CoordinateLookup],
        }
    }

    /// Lower-case name as used in layout files
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pipette => "pipette",
            Self::Tiprack => "tiprack",
            Self::Trash => "trash",
            Self::Microplate => "microplate",
        }
    }
}

/// Anything that can occupy a deck slot
#[derive(Debug)]
pub enum Labware {
    Pipette(Pipette),
    Tiprack(Tiprack),
    Trash,
    Microplate(Microplate),
}

impl Labware {
    /// Variant tag
    pub fn kind(&self) -> LabwareKind {
        match self {
            Self::Pipette(_) => LabwareKind::Pipette,
            Self::Tiprack(_) => LabwareKind::Tiprack,
            Self::Trash => LabwareKind::Trash,
            Self::Microplate(_) => LabwareKind::Microplate,
        }
    }

    /// Capabilities of this instance
    pub fn capabilities(&self) -> &'static [Capability] {
        self.kind().capabilities()
    }

    /// Check if this instance supports a capability
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    fn unsupported(&self, capability: Capability) -> DeckError {
        DeckError::CapabilityNotSupported {
            kind: self.kind(),
            capability,
        }
    }

    /// Merge a settings patch (pipettes only)
    pub fn configure(&mut self, settings: &PipetteSettings) -> Result<(), DeckError> {
        match self {
            Self::Pipette(pipette) => {
                pipette.configure(settings);
                Ok(())
            }
            _ => Err(self.unsupported(Capability::Configure)),
        }
    }

    /// Store a calibration origin (microplates only)
    pub fn calibrate(&mut self, params: CalibrationParams) -> Result<(), DeckError> {
        match self {
            Self::Microplate(plate) => {
                plate.calibrate(params.x, params.y, params.z);
                Ok(())
            }
            _ => Err(self.unsupported(Capability::Calibrate)),
        }
    }

    /// Current calibration origin, if this labware has one
    pub fn calibration_origin(&self) -> Option<CalibrationOrigin> {
        match self {
            Self::Microplate(plate) => plate.origin(),
            _ => None,
        }
    }

    /// Absolute coordinate of a well (microplates only)
    pub fn well_coordinates(&self, label: &str) -> Result<Coordinate, DeckError> {
        match self {
            Self::Microplate(plate) => plate.get_well_coordinates(label),
            _ => Err(self.unsupported(Capability::CoordinateLookup)),
        }
    }

    /// Cached well handle (microplates only)
    pub fn well(&self, label: &str) -> Result<Rc<Well>, DeckError> {
        match self {
            Self::Microplate(plate) => plate.well(label),
            _ => Err(self.unsupported(Capability::CoordinateLookup)),
        }
    }

    /// Address a well for deferred lookup, e.g. as a transfer endpoint
    pub fn at<'a>(&'a self, label: &'a str) -> WellAddress<'a> {
        WellAddress::new(self, label)
    }

    /// Accept discarded tips (trash only)
    pub fn dispose(&self) -> Result<(), DeckError> {
        match self {
            Self::Trash => {
                trace!("tip disposed");
                Ok(())
            }
            _ => Err(self.unsupported(Capability::Dispose)),
        }
    }

    pub fn as_pipette(&self) -> Option<&Pipette> {
        match self {
            Self::Pipette(pipette) => Some(pipette),
            _ => None,
        }
    }

    pub fn as_pipette_mut(&mut self) -> Option<&mut Pipette> {
        match self {
            Self::Pipette(pipette) => Some(pipette),
            _ => None,
        }
    }

    pub fn as_tiprack(&self) -> Option<&Tiprack> {
        match self {
            Self::Tiprack(tiprack) => Some(tiprack),
            _ => None,
        }
    }

    pub fn as_microplate(&self) -> Option<&Microplate> {
        match self {
            Self::Microplate(plate) => Some(plate),
            _ => None,
        }
    }

    pub fn as_microplate_mut(&mut self) -> Option<&mut Microplate> {
        match self {
            Self::Microplate(plate) => Some(plate),
            _ => None,
        }
    }
}

impl From<Pipette> for Labware {
    fn from(pipette: Pipette) -> Self {
        Self::Pipette(pipette)
    }
}

impl From<Tiprack> for Labware {
    fn from(tiprack: Tiprack) -> Self {
        Self::Tiprack(tiprack)
    }
}

impl From<Microplate> for Labware {
    fn from(plate: Microplate) -> Self {
        Self::Microplate(plate)
    }
}
