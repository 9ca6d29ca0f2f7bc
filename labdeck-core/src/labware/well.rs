//! Well handles

use core::fmt;

use alloc::rc::Weak;

use crate::calibration::Coordinate;
use crate::error::DeckError;
use crate::position::Position;

use super::microplate::PlateState;

/// One addressable well of a microplate
///
/// Holds no state of its own beyond its position. Coordinates are computed
/// from the parent plate's calibration at the time of the call.
#[derive(Debug)]
pub struct Well {
    plate: Weak<PlateState>,
    position: Position,
}

impl Well {
    pub(crate) fn new(plate: Weak<PlateState>, position: Position) -> Self {
        Self { plate, position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Absolute coordinate of this well
    ///
    /// Fails with [`DeckError::DetachedWell`] once the parent plate is gone.
    pub fn coordinates(&self) -> Result<Coordinate, DeckError> {
        let plate = self
            .plate
            .upgrade()
            .ok_or(DeckError::DetachedWell(self.position))?;
        plate.coordinates_at(self.position)
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.position, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::fixtures;
    use crate::labware::Microplate;
    use crate::DeckError;

    #[test]
    fn test_well_displays_label() {
        let plate = Microplate::new(fixtures::plate_96());
        assert_eq!(plate.well("c7").unwrap().to_string(), "C7");
    }

    #[test]
    fn test_well_outliving_plate_is_detached() {
        let mut plate = Microplate::new(fixtures::plate_96());
        plate.calibrate(1.0, 2.0, 3.0);
        let well = plate.well("A1").unwrap();
        drop(plate);

        assert_eq!(
            well.coordinates(),
            Err(DeckError::DetachedWell(well.position()))
        );
    }
}
