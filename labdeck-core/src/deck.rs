//! Deck slot registry
//!
//! The deck maps slot positions to the labware sitting in them and routes
//! calibration documents to the right slot.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::calibration::{CalibrationDocument, CalibrationParams};
use crate::error::DeckError;
use crate::labware::Labware;
use crate::position::{normalize, Position};

/// Slot registry for one protocol run
///
/// Each deck owns its own registry. A slot, once occupied, is never
/// overwritten.
#[derive(Debug, Default)]
pub struct Deck {
    slots: BTreeMap<Position, Labware>,
}

impl Deck {
    /// Create an empty deck
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deck populated with `modules`
    pub fn with_modules<I, L, M>(modules: I) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (L, M)>,
        L: AsRef<str>,
        M: Into<Labware>,
    {
        let mut deck = Self::new();
        deck.add_modules(modules)?;
        Ok(deck)
    }

    /// Place labware in a slot
    ///
    /// Returns the normalized slot position. Fails with
    /// [`DeckError::DuplicateSlot`] if the slot is taken; the existing
    /// occupant stays in place.
    pub fn add_module(
        &mut self,
        label: &str,
        module: impl Into<Labware>,
    ) -> Result<Position, DeckError> {
        let position = normalize(label)?;
        if self.slots.contains_key(&position) {
            warn!("trying to overwrite existing slot {}", position);
            return Err(DeckError::DuplicateSlot(position));
        }

        let module = module.into();
        debug!("slot {} <- {}", position, module.kind());
        self.slots.insert(position, module);
        Ok(position)
    }

    /// Place several modules
    ///
    /// Stops at the first failure. Modules placed before it stay on the deck.
    pub fn add_modules<I, L, M>(&mut self, modules: I) -> Result<(), DeckError>
    where
        I: IntoIterator<Item = (L, M)>,
        L: AsRef<str>,
        M: Into<Labware>,
    {
        for (label, module) in modules {
            self.add_module(label.as_ref(), module)?;
        }
        Ok(())
    }

    /// Labware in a slot
    pub fn slot(&self, label: &str) -> Result<&Labware, DeckError> {
        let position = normalize(label)?;
        self.slots
            .get(&position)
            .ok_or(DeckError::UnknownSlot(position))
    }

    /// Mutable labware in a slot
    pub fn slot_mut(&mut self, label: &str) -> Result<&mut Labware, DeckError> {
        let position = normalize(label)?;
        self.slots
            .get_mut(&position)
            .ok_or(DeckError::UnknownSlot(position))
    }

    /// Apply a calibration document
    ///
    /// Every label is normalized before anything is applied, so a malformed
    /// label or two labels for the same slot (`a1` and `A1`) reject the whole
    /// document with [`DeckError::InvalidPosition`] or
    /// [`DeckError::DuplicateSlot`].
    ///
    /// Entries are then applied in ascending label order. The first unknown
    /// slot or non-calibratable occupant aborts the walk; entries applied
    /// before it keep their new calibration.
    pub fn configure(&mut self, document: &CalibrationDocument) -> Result<(), DeckError> {
        info!("applying calibration for {} slot(s)", document.len());

        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(document.len());
        for (label, params) in &document.calibration {
            let position = normalize(label)?;
            if !seen.insert(position) {
                warn!("calibration lists slot {} twice", position);
                return Err(DeckError::DuplicateSlot(position));
            }
            entries.push((position, *params));
        }

        for (position, params) in entries {
            let module = self
                .slots
                .get_mut(&position)
                .ok_or(DeckError::UnknownSlot(position))?;
            module.calibrate(params)?;
        }

        Ok(())
    }

    /// Calibration of every calibrated slot, keyed by canonical label
    ///
    /// Feeding the result back into [`Deck::configure`] on a deck with the
    /// same layout restores the same origins.
    pub fn calibration(&self) -> CalibrationDocument {
        let mut document = CalibrationDocument::new();
        for (position, module) in &self.slots {
            if let Some(origin) = module.calibration_origin() {
                document.insert(position.to_string(), CalibrationParams::from(origin));
            }
        }
        document
    }

    /// Occupied slots in row-major order
    pub fn slots(&self) -> impl Iterator<Item = (Position, &Labware)> {
        self.slots.iter().map(|(position, module)| (*position, module))
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
