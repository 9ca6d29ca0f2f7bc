//! Transfer planning
//!
//! Checks a requested volume against the acting pipette's envelope and
//! resolves both endpoints to machine coordinates. The resulting plan is
//! handed to whatever drives the motors; no liquid is moved here.

use alloc::rc::Rc;

use crate::calibration::Coordinate;
use crate::catalog::Tag;
use crate::error::DeckError;
use crate::labware::{Labware, Pipette, Side, Well};

/// Anything that resolves to an absolute coordinate
pub trait CoordinateLookup {
    fn coordinates(&self) -> Result<Coordinate, DeckError>;
}

impl CoordinateLookup for Coordinate {
    fn coordinates(&self) -> Result<Coordinate, DeckError> {
        Ok(*self)
    }
}

impl CoordinateLookup for Well {
    fn coordinates(&self) -> Result<Coordinate, DeckError> {
        Well::coordinates(self)
    }
}

impl<T: CoordinateLookup + ?Sized> CoordinateLookup for Rc<T> {
    fn coordinates(&self) -> Result<Coordinate, DeckError> {
        (**self).coordinates()
    }
}

impl<T: CoordinateLookup + ?Sized> CoordinateLookup for &T {
    fn coordinates(&self) -> Result<Coordinate, DeckError> {
        (**self).coordinates()
    }
}

/// A well label on a piece of labware, resolved on demand
///
/// Resolution goes through the labware's coordinate-lookup capability, so
/// pointing at a tiprack or trash fails with
/// [`DeckError::CapabilityNotSupported`].
#[derive(Debug, Clone, Copy)]
pub struct WellAddress<'a> {
    labware: &'a Labware,
    label: &'a str,
}

impl<'a> WellAddress<'a> {
    pub fn new(labware: &'a Labware, label: &'a str) -> Self {
        Self { labware, label }
    }

    pub fn label(&self) -> &'a str {
        self.label
    }
}

impl CoordinateLookup for WellAddress<'_> {
    fn coordinates(&self) -> Result<Coordinate, DeckError> {
        self.labware.well_coordinates(self.label)
    }
}

/// A validated transfer ready for execution
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferPlan {
    /// Size tag of the acting pipette
    pub pipette: Tag,
    /// Channels moving in parallel
    pub channels: u8,
    /// Mounting side, if configured
    pub side: Option<Side>,
    /// Volume per channel (µL)
    pub volume: f64,
    /// Aspirate coordinate
    pub source: Coordinate,
    /// Dispense coordinate
    pub destination: Coordinate,
}

impl Pipette {
    /// Check a volume against this pipette's envelope
    pub fn check_volume(&self, volume: f64) -> Result<(), DeckError> {
        if self.spec().accepts(volume) {
            Ok(())
        } else {
            Err(DeckError::VolumeOutOfRange {
                volume,
                min_vol: self.min_vol(),
                max_vol: self.max_vol(),
            })
        }
    }

    /// Plan a transfer of `volume` from `start` to `end`
    ///
    /// The volume is checked first; no endpoint is resolved for a volume
    /// the pipette cannot move.
    pub fn transfer<S, E>(&self, start: &S, end: &E, volume: f64) -> Result<TransferPlan, DeckError>
    where
        S: CoordinateLookup + ?Sized,
        E: CoordinateLookup + ?Sized,
    {
        if let Err(e) = self.check_volume(volume) {
            warn!("{=str} cannot move {} uL", self.size(), volume);
            return Err(e);
        }

        let source = start.coordinates()?;
        let destination = end.coordinates()?;

        let plan = TransferPlan {
            pipette: self.spec().size.clone(),
            channels: self.channels(),
            side: self.settings().side,
            volume,
            source,
            destination,
        };
        debug!("planned transfer: {}", plan);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::catalog::fixtures;
    use crate::labware::{Microplate, PipetteSettings};
    use crate::LabwareKind;

    /// Lookup that counts how often it was resolved
    struct Probe<'a> {
        calls: &'a Cell<u32>,
    }

    impl CoordinateLookup for Probe<'_> {
        fn coordinates(&self) -> Result<Coordinate, DeckError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Coordinate::default())
        }
    }

    fn plate() -> Microplate {
        let mut plate = Microplate::new(fixtures::plate_96());
        plate.calibrate(10.0, 20.0, 5.0);
        plate
    }

    #[test]
    fn test_transfer_between_wells() {
        let mut pipette = Pipette::new(fixtures::p200());
        pipette.configure(&PipetteSettings {
            side: Some(Side::Left),
            ..Default::default()
        });
        let plate = plate();

        let plan = pipette
            .transfer(&plate.well("A1").unwrap(), &plate.well("B2").unwrap(), 50.0)
            .unwrap();

        assert_eq!(plan.pipette, "P200");
        assert_eq!(plan.channels, 1);
        assert_eq!(plan.side, Some(Side::Left));
        assert_eq!(plan.volume, 50.0);
        assert_eq!(plan.source, Coordinate::new(10.0, 20.0, 5.0));
        assert_eq!(plan.destination, Coordinate::new(19.0, 29.0, 5.0));
    }

    #[test]
    fn test_volume_outside_envelope_resolves_nothing() {
        let pipette = Pipette::new(fixtures::p200());
        let calls = Cell::new(0);
        let probe = Probe { calls: &calls };

        for volume in [19.9, 200.5, -1.0, f64::NAN] {
            let result = pipette.transfer(&probe, &probe, volume);
            assert!(matches!(
                result,
                Err(DeckError::VolumeOutOfRange {
                    min_vol,
                    max_vol,
                    ..
                }) if min_vol == 20.0 && max_vol == 200.0
            ));
        }
        assert_eq!(calls.get(), 0);

        pipette.transfer(&probe, &probe, 200.0).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_transfer_through_labware_capability() {
        let pipette = Pipette::new(fixtures::p200());
        let plate: Labware = plate().into();
        let rack: Labware = fixtures::catalog().tiprack("P200").unwrap().into();

        let plan = pipette
            .transfer(&plate.at("A1"), &Coordinate::new(0.0, 0.0, 50.0), 20.0)
            .unwrap();
        assert_eq!(plan.source, Coordinate::new(10.0, 20.0, 5.0));
        assert_eq!(plan.destination, Coordinate::new(0.0, 0.0, 50.0));

        assert!(matches!(
            pipette.transfer(&plate.at("A1"), &rack.at("A1"), 20.0),
            Err(DeckError::CapabilityNotSupported {
                kind: LabwareKind::Tiprack,
                ..
            })
        ));
    }

    #[test]
    fn test_transfer_from_uncalibrated_plate_fails() {
        let pipette = Pipette::new(fixtures::p200());
        let plate = Microplate::new(fixtures::plate_96());
        let well = plate.well("A1").unwrap();
        assert_eq!(
            pipette.transfer(&well, &well, 100.0),
            Err(DeckError::UninitializedCalibration)
        );
    }
}
