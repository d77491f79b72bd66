//! Seeded implementation of the center-choice collaborator.

use navsurvey_core::{CelestialBody, CenterChooser, SurfaceCoordinate, SurfaceResolver};

use crate::sequence::{SeededSequence, STREAM_CENTER};

const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Picks scatter centers uniformly by area over a body's surface.
///
/// When water must be excluded and a surface model is attached, samples whose
/// terrain lies below datum are redrawn up to the attempt limit; the last
/// sample is kept if every attempt lands in water.
pub struct SeededCenterChooser<'a> {
    sequence: SeededSequence,
    surface: Option<&'a dyn SurfaceResolver>,
    max_attempts: u32,
}

impl std::fmt::Debug for SeededCenterChooser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededCenterChooser")
            .field("sequence", &self.sequence)
            .field("has_surface", &self.surface.is_some())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl<'a> SeededCenterChooser<'a> {
    /// Creates a chooser drawing from the center stream of `seed`.
    #[must_use]
    pub fn new(seed: i64) -> Self {
        Self {
            sequence: SeededSequence::labeled(seed, STREAM_CENTER),
            surface: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Attaches the terrain model used to detect water.
    #[must_use]
    pub fn with_surface(mut self, surface: &'a dyn SurfaceResolver) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Overrides the number of samples drawn when excluding water.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn sample(&mut self) -> SurfaceCoordinate {
        let latitude = (2.0 * self.sequence.next_unit() - 1.0).asin().to_degrees();
        let longitude = self.sequence.next_range(-180.0, 180.0);
        SurfaceCoordinate::new(latitude, longitude)
    }
}

impl CenterChooser for SeededCenterChooser<'_> {
    fn choose_center(&mut self, body: &CelestialBody, exclude_water: bool) -> SurfaceCoordinate {
        let mut candidate = self.sample();
        let Some(surface) = self.surface.filter(|_| exclude_water) else {
            return candidate;
        };

        for _ in 1..self.max_attempts {
            if surface.height_at(body.id, candidate.body_fixed_direction()) >= 0.0 {
                break;
            }
            candidate = self.sample();
        }
        candidate
    }
}
