//! Microplate coordinate engine
//!
//! A microplate stores the machine coordinate of well A1 once it has been
//! calibrated. Every other well is a fixed pitch away:
//!
//! ```text
//! x = start_x + spacing * row
//! y = start_y + spacing * col
//! z = transfer_z
//! ```
//!
//! Well handles are created on first lookup and cached per plate instance.
//! They hold a weak reference to the plate's shared state, so they always see
//! the current calibration and never keep a dropped plate alive.

use core::cell::{Cell, RefCell};

use alloc::collections::BTreeMap;
use alloc::rc::Rc;

use crate::calibration::{CalibrationOrigin, Coordinate};
use crate::catalog::MicroplateSpec;
use crate::error::DeckError;
use crate::position::{normalize, Position};

use super::well::Well;

/// Plate geometry plus calibration, shared with the plate's wells
#[derive(Debug)]
pub(crate) struct PlateState {
    spec: MicroplateSpec,
    origin: Cell<Option<CalibrationOrigin>>,
}

impl PlateState {
    fn check_bounds(&self, position: Position) -> Result<(), DeckError> {
        if self.spec.contains(position) {
            Ok(())
        } else {
            Err(DeckError::WellOutOfRange {
                position,
                rows: self.spec.rows,
                cols: self.spec.cols,
            })
        }
    }

    /// Absolute coordinate of a well
    ///
    /// Bounds are checked before calibration so an impossible address is
    /// reported as such even on an uncalibrated plate.
    pub(crate) fn coordinates_at(&self, position: Position) -> Result<Coordinate, DeckError> {
        self.check_bounds(position)?;
        let origin = self
            .origin
            .get()
            .ok_or(DeckError::UninitializedCalibration)?;

        let spacing = self.spec.spacing;
        Ok(Coordinate::new(
            origin.start_x + spacing * f64::from(position.row()),
            origin.start_y + spacing * f64::from(position.col()),
            origin.transfer_z,
        ))
    }
}

/// A microplate instance
///
/// Not `Clone`: two plates never share calibration or well handles.
#[derive(Debug)]
pub struct Microplate {
    state: Rc<PlateState>,
    wells: RefCell<BTreeMap<Position, Rc<Well>>>,
}

impl Microplate {
    /// Create an uncalibrated plate with an empty well cache
    pub fn new(spec: MicroplateSpec) -> Self {
        Self {
            state: Rc::new(PlateState {
                spec,
                origin: Cell::new(None),
            }),
            wells: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn spec(&self) -> &MicroplateSpec {
        &self.state.spec
    }

    /// Model tag (e.g., "96-deepwell")
    pub fn model(&self) -> &str {
        &self.state.spec.model
    }

    pub fn rows(&self) -> u16 {
        self.state.spec.rows
    }

    pub fn cols(&self) -> u16 {
        self.state.spec.cols
    }

    pub fn spacing(&self) -> f64 {
        self.state.spec.spacing
    }

    /// Current calibration origin
    pub fn origin(&self) -> Option<CalibrationOrigin> {
        self.state.origin.get()
    }

    pub fn is_calibrated(&self) -> bool {
        self.origin().is_some()
    }

    /// Store the coordinate of well A1
    ///
    /// Replaces any previous origin. Existing well handles follow the new
    /// origin immediately.
    pub fn calibrate(&mut self, x: f64, y: f64, z: f64) {
        self.state
            .origin
            .set(Some(CalibrationOrigin::new(x, y, z)));
        debug!("microplate {=str} calibrated: A1 at ({}, {}, {})", self.model(), x, y, z);
    }

    /// Absolute coordinate of the well with this label
    pub fn get_well_coordinates(&self, label: &str) -> Result<Coordinate, DeckError> {
        let position = normalize(label)?;
        self.state.coordinates_at(position)
    }

    /// Well handle for a label, created on first use
    ///
    /// Labels that normalize to the same position return the same handle.
    pub fn well(&self, label: &str) -> Result<Rc<Well>, DeckError> {
        let position = normalize(label)?;
        self.state.check_bounds(position)?;

        let mut wells = self.wells.borrow_mut();
        let well = wells.entry(position).or_insert_with(|| {
            trace!("creating well handle {}", position);
            Rc::new(Well::new(Rc::downgrade(&self.state), position))
        });
        Ok(Rc::clone(well))
    }

    /// Number of well handles created so far
    pub fn cached_wells(&self) -> usize {
        self.wells.borrow().len()
    }
}
