//! Tiprack labware
//!
//! A classifier only: it records which pipette size its tips fit.

use crate::catalog::TiprackSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tiprack {
    spec: TiprackSpec,
}

impl Tiprack {
    pub fn new(spec: TiprackSpec) -> Self {
        Self { spec }
    }

    /// Size tag of the matching pipette
    pub fn size(&self) -> &str {
        &self.spec.size
    }

    /// Check if these tips fit a pipette size (case-insensitive)
    pub fn fits(&self, pipette_size: &str) -> bool {
        self.spec.size.eq_ignore_ascii_case(pipette_size)
    }
}
