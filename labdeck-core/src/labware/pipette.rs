//! Pipette labware
//!
//! A pipette carries its catalog record (volume envelope and channel count)
//! plus the operator settings written through `configure`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::PipetteSpec;

/// Mounting side of a pipette on the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Left,
    Right,
}

/// Pipette settings
///
/// Used both as the stored state and as a patch: when merging, only fields
/// that are `Some` in the patch overwrite stored values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct PipetteSettings {
    /// Plunger position at the first stop (mm)
    pub stop: Option<f64>,
    /// Plunger position that ejects the tip (mm)
    pub drop: Option<f64>,
    /// Working volume (µL)
    pub volume: Option<f64>,
    /// Mounting side
    pub side: Option<Side>,
}

impl PipetteSettings {
    /// Merge a patch into these settings field by field
    pub fn merge(&mut self, patch: &PipetteSettings) {
        self.stop = patch.stop.or(self.stop);
        self.drop = patch.drop.or(self.drop);
        self.volume = patch.volume.or(self.volume);
        self.side = patch.side.or(self.side);
    }

    /// Check if the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.stop.is_none() && self.drop.is_none() && self.volume.is_none() && self.side.is_none()
    }
}

/// Pipette of one catalog size
#[derive(Debug, Clone, PartialEq)]
pub struct Pipette {
    spec: PipetteSpec,
    settings: PipetteSettings,
}

impl Pipette {
    /// Create an unconfigured pipette
    pub fn new(spec: PipetteSpec) -> Self {
        Self {
            spec,
            settings: PipetteSettings::default(),
        }
    }

    pub fn spec(&self) -> &PipetteSpec {
        &self.spec
    }

    /// Size tag (e.g., "P200")
    pub fn size(&self) -> &str {
        &self.spec.size
    }

    pub fn channels(&self) -> u8 {
        self.spec.channels
    }

    pub fn min_vol(&self) -> f64 {
        self.spec.min_vol
    }

    pub fn max_vol(&self) -> f64 {
        self.spec.max_vol
    }

    /// Settings written so far
    pub fn settings(&self) -> &PipetteSettings {
        &self.settings
    }

    /// Merge a settings patch; absent fields keep their stored values
    pub fn configure(&mut self, patch: &PipetteSettings) {
        self.settings.merge(patch);
        debug!("pipette {=str} configured: {}", self.size(), self.settings);
    }
}
