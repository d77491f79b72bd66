#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic survey waypoint generation.
//!
//! A single integer seed drives every draw: which reached body hosts the
//! survey, where the scatter center lands, which waypoint is the secret
//! target and where each waypoint is scattered. Each concern draws from its
//! own labelled [`SeededSequence`] stream, so a [`GenerationRecord`] holding
//! the seed, body, center and tier regenerates an identical [`WaypointSet`].

mod center;
mod sequence;

use std::f64::consts::TAU;

use navsurvey_core::{
    CelestialBody, CenterChooser, GenerationFailure, GenerationRecord, Reward, SurfaceCoordinate,
    Tier, TierPolicyTable, Waypoint, WaypointSet,
};
use navsurvey_world::BodyCatalog;
use serde::Deserialize;

pub use center::SeededCenterChooser;
pub use sequence::{SeededSequence, STREAM_BODY, STREAM_CENTER, STREAM_SCATTER, STREAM_SECRET};

/// Tuning knobs for the waypoint generator.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Count, radius and reward scaling per tier.
    pub tiers: TierPolicyTable,
    /// Distance in meters within which a waypoint counts as reached.
    pub acceptance_radius: f64,
    /// Reward granted per waypoint before tier and body scaling.
    pub base_reward: Reward,
    /// Body without a landable surface whose moons are picked in its place.
    pub substitute_moons_of: Option<String>,
    /// Whether scatter centers must avoid water.
    pub exclude_water: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tiers: TierPolicyTable::default(),
            acceptance_radius: 500.0,
            base_reward: Reward::new(5_000.0, 10.0, 10.0),
            substitute_moons_of: Some("Jool".to_owned()),
            exclude_water: false,
        }
    }
}

/// Waypoints produced by an offer together with the record that regenerates
/// them.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    /// Generated waypoints.
    pub waypoints: WaypointSet,
    /// Minimal state to persist.
    pub record: GenerationRecord,
}

/// Pure system that turns seeds into waypoint sets.
#[derive(Clone, Debug, Default)]
pub struct WaypointSetGenerator {
    config: GeneratorConfig,
}

impl WaypointSetGenerator {
    /// Creates a generator with the provided tuning.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Tuning the generator applies.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the waypoints for `body` scattered around `center`.
    ///
    /// Fails with [`GenerationFailure::Ineligible`] when `eligible` is false.
    /// A non-positive scatter range places every waypoint on the center.
    pub fn generate(
        &self,
        seed: i64,
        body: &CelestialBody,
        tier: Tier,
        center: SurfaceCoordinate,
        eligible: bool,
    ) -> Result<WaypointSet, GenerationFailure> {
        if !eligible {
            tracing::trace!(seed, "skipping ineligible waypoint generation");
            return Err(GenerationFailure::Ineligible);
        }

        let policy = self.config.tiers.get(tier);
        let count = policy.waypoint_count;
        let range = policy.search_range(body.gravity);
        let secret_index = SeededSequence::labeled(seed, STREAM_SECRET).next_index(count.get());
        let reward = self
            .config
            .base_reward
            .scaled(policy.reward_scale * body.reward_multiplier);
        let acceptance_radius = self.config.acceptance_radius;

        let set = WaypointSet::build(
            body.id,
            tier,
            center,
            range,
            count,
            secret_index,
            |index, is_target| {
                let mut scatter = SeededSequence::indexed(seed, STREAM_SCATTER, index);
                Waypoint {
                    index,
                    body: body.id,
                    coordinate: scatter_around(center, range, body.radius, &mut scatter),
                    acceptance_radius,
                    is_target,
                    reward,
                }
            },
        );

        tracing::debug!(
            seed,
            body = %body.name,
            ?tier,
            count = set.len(),
            range,
            secret_index = set.secret_index(),
            "generated waypoint set"
        );
        Ok(set)
    }

    /// Rebuilds the waypoint set described by a persisted record.
    pub fn regenerate(
        &self,
        record: &GenerationRecord,
        catalog: &BodyCatalog,
    ) -> Result<WaypointSet, GenerationFailure> {
        let body = catalog.get(record.body).ok_or_else(|| {
            tracing::info!(body = record.body.get(), "record names an unknown body");
            GenerationFailure::NoValidBody
        })?;
        self.generate(record.seed, body, record.tier, record.center, true)
    }

    /// Picks the body that hosts the survey from the reached bodies, leaving
    /// out the star.
    ///
    /// When the pick is the configured substitution body, one of its moons is
    /// picked from the same stream instead.
    pub fn select_body<'c>(
        &self,
        seed: i64,
        catalog: &'c BodyCatalog,
    ) -> Result<&'c CelestialBody, GenerationFailure> {
        let pool: Vec<&CelestialBody> = catalog.surveyable().collect();
        if pool.is_empty() {
            tracing::info!(seed, "no surveyable bodies reached");
            return Err(GenerationFailure::NoValidBody);
        }

        let mut sequence = SeededSequence::labeled(seed, STREAM_BODY);
        let picked = pool[sequence.next_index(pool.len() as u32) as usize];
        if !self.is_substituted(picked) {
            return Ok(picked);
        }

        let moons: Vec<&CelestialBody> = catalog.moons_of(picked.id).collect();
        if moons.is_empty() {
            tracing::info!(seed, body = %picked.name, "substitution body has no moons");
            return Err(GenerationFailure::NoValidBody);
        }

        let moon = moons[sequence.next_index(moons.len() as u32) as usize];
        if self.is_substituted(moon) {
            tracing::info!(seed, body = %moon.name, "substitution yielded no valid body");
            return Err(GenerationFailure::NoValidBody);
        }
        Ok(moon)
    }

    /// Runs a complete offer: gate, body selection, center choice and
    /// generation.
    pub fn offer(
        &self,
        seed: i64,
        tier: Tier,
        catalog: &BodyCatalog,
        chooser: &mut dyn CenterChooser,
        eligible: bool,
    ) -> Result<Offer, GenerationFailure> {
        if !eligible {
            tracing::trace!(seed, "skipping ineligible offer");
            return Err(GenerationFailure::Ineligible);
        }

        let body = self.select_body(seed, catalog)?;
        let center = chooser.choose_center(body, self.config.exclude_water);
        let waypoints = self.generate(seed, body, tier, center, true)?;
        let record = GenerationRecord {
            seed,
            body: body.id,
            center,
            tier,
        };

        Ok(Offer { waypoints, record })
    }

    fn is_substituted(&self, body: &CelestialBody) -> bool {
        self.config
            .substitute_moons_of
            .as_deref()
            .is_some_and(|name| body.name.eq_ignore_ascii_case(name))
    }
}

/// Places a point a random surface distance of at most `range` meters from
/// `center`, uniformly by area over that disc.
fn scatter_around(
    center: SurfaceCoordinate,
    range: f64,
    radius: f64,
    sequence: &mut SeededSequence,
) -> SurfaceCoordinate {
    if !(range > 0.0 && radius > 0.0) {
        return center;
    }

    let bearing = sequence.next_unit() * TAU;
    let distance = range * sequence.next_unit().sqrt();
    destination(center, bearing, distance / radius)
}

/// Great-circle destination from `origin` along `bearing` (radians clockwise
/// from north) over `angular_distance` radians.
fn destination(origin: SurfaceCoordinate, bearing: f64, angular_distance: f64) -> SurfaceCoordinate {
    let lat = origin.latitude().to_radians();
    let lon = origin.longitude().to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_d, cos_d) = angular_distance.sin_cos();

    let sin_lat2 = (sin_lat * cos_d + cos_lat * sin_d * bearing.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon + (bearing.sin() * sin_d * cos_lat).atan2(cos_d - sin_lat * sin_lat2);

    SurfaceCoordinate::new(lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use navsurvey_core::BodyId;

    fn mun() -> CelestialBody {
        CelestialBody {
            id: BodyId::new(2),
            name: "Mun".to_owned(),
            radius: 200_000.0,
            gravity: 0.166,
            reward_multiplier: 2.0,
            parent: Some(BodyId::new(1)),
            reached: true,
        }
    }

    #[test]
    fn destination_moves_north_along_meridian() {
        let radius = 200_000.0;
        let start = SurfaceCoordinate::new(10.0, 20.0);
        let moved = destination(start, 0.0, 1_000.0 / radius);
        assert!((moved.longitude() - 20.0).abs() < 1e-9);
        assert!((start.surface_distance(moved, radius) - 1_000.0).abs() < 1e-6);
        assert!(moved.latitude() > start.latitude());
    }

    #[test]
    fn destination_crosses_the_antimeridian() {
        let start = SurfaceCoordinate::new(0.0, 179.9);
        let moved = destination(start, std::f64::consts::FRAC_PI_2, 0.2f64.to_radians());
        assert!((moved.longitude() - -179.9).abs() < 1e-6, "{moved:?}");
    }

    #[test]
    fn scatter_stays_within_range() {
        let center = SurfaceCoordinate::new(-45.0, 100.0);
        let mut sequence = SeededSequence::new(1);
        for _ in 0..1_000 {
            let point = scatter_around(center, 2_332.0, 200_000.0, &mut sequence);
            assert!(center.surface_distance(point, 200_000.0) <= 2_332.0 + 1e-6);
        }
    }

    #[test]
    fn rewards_scale_with_tier_and_body() {
        let generator = WaypointSetGenerator::default();
        let set = generator
            .generate(1, &mun(), Tier::Exceptional, SurfaceCoordinate::ORIGIN, true)
            .expect("generation succeeds");
        let expected = Reward::new(5_000.0, 10.0, 10.0).scaled(1.5 * 2.0);
        for waypoint in set.waypoints() {
            assert_eq!(waypoint.reward, expected);
            assert_eq!(waypoint.acceptance_radius, 500.0);
            assert_eq!(waypoint.body, BodyId::new(2));
        }
    }

    #[test]
    fn config_deserializes_partial_overrides() {
        let config: GeneratorConfig = toml::from_str(
            r#"
                acceptance_radius = 250.0
                exclude_water = true

                [tiers.trivial]
                waypoint_count = 4
                base_radius = 500.0
                radius_per_gravity = 0.0
                reward_scale = 1.0
            "#,
        )
        .expect("config parses");

        assert_eq!(config.acceptance_radius, 250.0);
        assert!(config.exclude_water);
        assert_eq!(config.tiers.trivial.waypoint_count.get(), 4);
        assert_eq!(config.tiers.significant.waypoint_count.get(), 5);
        assert_eq!(config.substitute_moons_of.as_deref(), Some("Jool"));
    }
}
