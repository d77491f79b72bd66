#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the survey navigation subsystem.
//!
//! This crate defines the data that flows between the body catalog, the
//! waypoint generator, the persistence codec and the indicator projector.
//! Generators consume a seed plus immutable [`CelestialBody`] reference data
//! and respond with a [`WaypointSet`]; the compact [`GenerationRecord`] is
//! enough to regenerate that set later. External collaborators (terrain
//! height queries and the center-choice strategy) are expressed as the
//! [`SurfaceResolver`] and [`CenterChooser`] traits.

use std::{num::NonZeroU32, ops::Add};

use glam::{DQuat, DVec3};
use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier of a celestial body, an index into the body table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(u32);

impl BodyId {
    /// Creates a new body identifier with the provided table index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable reference data describing a celestial body.
///
/// Bodies are owned by the catalog; waypoints and records only ever carry the
/// [`BodyId`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Identifier allocated to the body by the catalog.
    pub id: BodyId,
    /// Display name of the body.
    pub name: String,
    /// Reference (datum) radius in meters.
    pub radius: f64,
    /// Surface gravity expressed in multiples of standard gravity.
    pub gravity: f64,
    /// Multiplier applied to rewards earned on this body.
    pub reward_multiplier: f64,
    /// Body this one orbits, if any.
    pub parent: Option<BodyId>,
    /// Whether the player has reached this body.
    pub reached: bool,
}

/// Per-tick placement of a body in world space.
///
/// The orientation advances as the body rotates; the host loop supplies a
/// fresh frame every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyFrame {
    /// World-space position of the body center.
    pub center: DVec3,
    /// Current world orientation of the body-fixed axes.
    pub rotation: DQuat,
}

impl BodyFrame {
    /// Frame whose body sits at the world origin with identity orientation.
    pub const IDENTITY: Self = Self {
        center: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Creates a frame from a center position and orientation.
    #[must_use]
    pub const fn new(center: DVec3, rotation: DQuat) -> Self {
        Self { center, rotation }
    }

    /// Transforms a body-fixed offset into world space.
    #[must_use]
    pub fn to_world(&self, body_fixed: DVec3) -> DVec3 {
        self.center + self.rotation * body_fixed
    }
}

/// Latitude and longitude on a body surface, in degrees.
///
/// Latitude is clamped to `[-90, 90]` and longitude normalised to
/// `(-180, 180]` on construction, including when deserialised.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurfaceCoordinate {
    latitude: f64,
    longitude: f64,
}

impl<'de> Deserialize<'de> for SurfaceCoordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Degrees {
            latitude: f64,
            longitude: f64,
        }

        let degrees = Degrees::deserialize(deserializer)?;
        Ok(Self::new(degrees.latitude, degrees.longitude))
    }
}

impl SurfaceCoordinate {
    /// The intersection of the equator and the prime meridian.
    pub const ORIGIN: Self = Self {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Launch site on the home body.
    pub const LAUNCH_SITE: Self = Self {
        latitude: 0.0,
        longitude: -74.5,
    };

    /// Creates a coordinate, clamping latitude and wrapping longitude.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: normalize_longitude(longitude),
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Unit direction from the body center through this coordinate, in
    /// body-fixed axes (`+Y` is the north pole, `+X` crosses the prime
    /// meridian at the equator).
    ///
    /// The reference direction `+X` is first rotated by latitude about the
    /// prime-meridian tangent axis `+Z`, then by longitude about the polar axis
    /// `-Y`. Externally supplied coordinates depend on this exact composition.
    #[must_use]
    pub fn body_fixed_direction(&self) -> DVec3 {
        let around_pole = DQuat::from_axis_angle(DVec3::NEG_Y, self.longitude.to_radians());
        let around_tangent = DQuat::from_axis_angle(DVec3::Z, self.latitude.to_radians());
        (around_pole * around_tangent) * DVec3::X
    }

    /// Great-circle distance to `other` on a sphere of the provided radius.
    #[must_use]
    pub fn surface_distance(&self, other: SurfaceCoordinate, radius: f64) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = lat_b - lat_a;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * radius * h.sqrt().min(1.0).asin()
    }
}

/// Wraps a longitude in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_longitude(longitude: f64) -> f64 {
    if !longitude.is_finite() {
        return 0.0;
    }
    if longitude > -180.0 && longitude <= 180.0 {
        return longitude;
    }

    let wrapped = longitude.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Difficulty classification controlling waypoint count and search radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Three waypoints scattered over a small area.
    #[default]
    Trivial,
    /// Five waypoints over a moderate area.
    Significant,
    /// Seven waypoints over a wide area.
    Exceptional,
}

impl Tier {
    /// Every tier in ascending difficulty.
    pub const ALL: [Tier; 3] = [Tier::Trivial, Tier::Significant, Tier::Exceptional];

    /// Numeric index used by the persisted record.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Trivial => 0,
            Self::Significant => 1,
            Self::Exceptional => 2,
        }
    }

    /// Resolves a persisted numeric index back into a tier.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Trivial),
            1 => Some(Self::Significant),
            2 => Some(Self::Exceptional),
            _ => None,
        }
    }
}

/// Generation parameters associated with a single tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Number of waypoints generated for the tier.
    pub waypoint_count: NonZeroU32,
    /// Search radius in meters before gravity scaling.
    pub base_radius: f64,
    /// Additional meters of search radius per `g` of surface gravity.
    pub radius_per_gravity: f64,
    /// Multiplier applied to every waypoint reward.
    pub reward_scale: f64,
}

impl TierPolicy {
    /// Built-in policy for the provided tier.
    #[must_use]
    pub const fn for_tier(tier: Tier) -> Self {
        let (count, radius, scale) = match tier {
            Tier::Trivial => (3, 1_000.0, 1.0),
            Tier::Significant => (5, 2_000.0, 1.25),
            Tier::Exceptional => (7, 3_000.0, 1.5),
        };

        Self {
            waypoint_count: match NonZeroU32::new(count) {
                Some(count) => count,
                None => NonZeroU32::MIN,
            },
            base_radius: radius,
            radius_per_gravity: radius,
            reward_scale: scale,
        }
    }

    /// Scatter range in meters for a body with the provided surface gravity.
    ///
    /// The result is not clamped; callers treat a non-positive range as a
    /// degenerate scatter around the center.
    #[must_use]
    pub fn search_range(&self, gravity: f64) -> f64 {
        self.base_radius + self.radius_per_gravity * gravity
    }
}

/// Policy rows for every tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicyTable {
    /// Policy applied to [`Tier::Trivial`].
    pub trivial: TierPolicy,
    /// Policy applied to [`Tier::Significant`].
    pub significant: TierPolicy,
    /// Policy applied to [`Tier::Exceptional`].
    pub exceptional: TierPolicy,
}

impl Default for TierPolicyTable {
    fn default() -> Self {
        Self {
            trivial: TierPolicy::for_tier(Tier::Trivial),
            significant: TierPolicy::for_tier(Tier::Significant),
            exceptional: TierPolicy::for_tier(Tier::Exceptional),
        }
    }
}

impl TierPolicyTable {
    /// Looks up the policy for a tier.
    #[must_use]
    pub const fn get(&self, tier: Tier) -> &TierPolicy {
        match tier {
            Tier::Trivial => &self.trivial,
            Tier::Significant => &self.significant,
            Tier::Exceptional => &self.exceptional,
        }
    }
}

/// Funds, reputation and science granted for reaching a waypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Funds awarded.
    pub funds: f64,
    /// Reputation awarded.
    pub reputation: f64,
    /// Science awarded.
    pub science: f64,
}

impl Reward {
    /// Reward granting nothing.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a reward tuple.
    #[must_use]
    pub const fn new(funds: f64, reputation: f64, science: f64) -> Self {
        Self {
            funds,
            reputation,
            science,
        }
    }

    /// Multiplies every component by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(
            self.funds * factor,
            self.reputation * factor,
            self.science * factor,
        )
    }
}

impl Add for Reward {
    type Output = Reward;

    fn add(self, rhs: Reward) -> Reward {
        Reward::new(
            self.funds + rhs.funds,
            self.reputation + rhs.reputation,
            self.science + rhs.science,
        )
    }
}

/// Candidate surface location produced by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position of the waypoint within its set.
    pub index: u32,
    /// Body the waypoint lies on.
    pub body: BodyId,
    /// Surface location of the waypoint.
    pub coordinate: SurfaceCoordinate,
    /// Distance in meters within which the waypoint counts as reached.
    pub acceptance_radius: f64,
    /// Whether this waypoint is the true objective.
    pub is_target: bool,
    /// Reward granted for reaching the waypoint.
    pub reward: Reward,
}

/// Ordered set of waypoints with exactly one target.
///
/// Sets are only produced by [`WaypointSet::build`] and are never
/// deserialised; persisted surveys store a [`GenerationRecord`] instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaypointSet {
    body: BodyId,
    tier: Tier,
    center: SurfaceCoordinate,
    range: f64,
    secret_index: u32,
    waypoints: Vec<Waypoint>,
}

impl WaypointSet {
    /// Builds a set of `count` waypoints around `center`.
    ///
    /// The secret index is fixed before any waypoint is built; `build` is
    /// invoked once per index with a flag telling it whether that index is the
    /// target, so the set always holds exactly one target. A secret index
    /// outside `0..count` is wrapped into range.
    #[must_use]
    pub fn build(
        body: BodyId,
        tier: Tier,
        center: SurfaceCoordinate,
        range: f64,
        count: NonZeroU32,
        secret_index: u32,
        mut build: impl FnMut(u32, bool) -> Waypoint,
    ) -> Self {
        let secret_index = secret_index % count.get();
        let waypoints = (0..count.get())
            .map(|index| {
                let mut waypoint = build(index, index == secret_index);
                waypoint.index = index;
                waypoint.is_target = index == secret_index;
                waypoint
            })
            .collect();

        Self {
            body,
            tier,
            center,
            range,
            secret_index,
            waypoints,
        }
    }

    /// Body every waypoint lies on.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// Tier the set was generated for.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Center the waypoints are scattered around.
    #[must_use]
    pub const fn center(&self) -> SurfaceCoordinate {
        self.center
    }

    /// Scatter range in meters.
    #[must_use]
    pub const fn range(&self) -> f64 {
        self.range
    }

    /// Index of the target waypoint.
    #[must_use]
    pub const fn secret_index(&self) -> u32 {
        self.secret_index
    }

    /// Waypoints in index order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The waypoint marked as the true objective.
    #[must_use]
    pub fn target(&self) -> &Waypoint {
        &self.waypoints[self.secret_index as usize]
    }

    /// Number of waypoints in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; a set holds at least one waypoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterator over waypoint coordinates in index order.
    pub fn coordinates(&self) -> impl Iterator<Item = SurfaceCoordinate> + '_ {
        self.waypoints.iter().map(|waypoint| waypoint.coordinate)
    }

    /// Sum of all waypoint rewards.
    #[must_use]
    pub fn reward_total(&self) -> Reward {
        self.waypoints
            .iter()
            .fold(Reward::ZERO, |total, waypoint| total + waypoint.reward)
    }
}

/// Minimal persisted state from which a waypoint set can be regenerated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Seed that drove the generation.
    pub seed: i64,
    /// Body the waypoints were generated on.
    pub body: BodyId,
    /// Center coordinate chosen for the scatter.
    pub center: SurfaceCoordinate,
    /// Tier the set was generated for.
    pub tier: Tier,
}

impl GenerationRecord {
    /// Record substituted when persisted state cannot be read: the home body,
    /// zero coordinates, the default tier and a zero seed.
    #[must_use]
    pub fn fallback(home: BodyId) -> Self {
        Self {
            seed: 0,
            body: home,
            center: SurfaceCoordinate::ORIGIN,
            tier: Tier::default(),
        }
    }
}

/// Reasons a generation attempt may produce no waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GenerationFailure {
    /// The equipment or quota gate rejected the attempt.
    #[error("generator is not eligible to run")]
    Ineligible,
    /// No reachable body could host the waypoints.
    #[error("no valid body is available for waypoint generation")]
    NoValidBody,
}

/// Terrain height lookup supplied by the host.
pub trait SurfaceResolver {
    /// Terrain height in meters above the body's reference radius along the
    /// body-fixed unit `direction`. Negative values lie below datum.
    fn height_at(&self, body: BodyId, direction: DVec3) -> f64;
}

impl<F> SurfaceResolver for F
where
    F: Fn(BodyId, DVec3) -> f64,
{
    fn height_at(&self, body: BodyId, direction: DVec3) -> f64 {
        self(body, direction)
    }
}

/// Strategy that picks the center coordinate of a waypoint scatter.
pub trait CenterChooser {
    /// Chooses a surface coordinate on `body`, avoiding water when
    /// `exclude_water` is set.
    fn choose_center(&mut self, body: &CelestialBody, exclude_water: bool) -> SurfaceCoordinate;
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_longitude, BodyId, GenerationRecord, Reward, SurfaceCoordinate, Tier,
        TierPolicy, TierPolicyTable, Waypoint, WaypointSet,
    };
    use std::num::NonZeroU32;

    fn waypoint(index: u32) -> Waypoint {
        Waypoint {
            index,
            body: BodyId::new(2),
            coordinate: SurfaceCoordinate::new(f64::from(index), 0.0),
            acceptance_radius: 500.0,
            is_target: false,
            reward: Reward::new(100.0, 1.0, 2.0),
        }
    }

    #[test]
    fn tier_policy_matches_published_table() {
        let counts: Vec<u32> = Tier::ALL
            .iter()
            .map(|tier| TierPolicy::for_tier(*tier).waypoint_count.get())
            .collect();
        assert_eq!(counts, vec![3, 5, 7]);

        let significant = TierPolicy::for_tier(Tier::Significant);
        assert!((significant.search_range(0.166) - 2_332.0).abs() < 1e-9);
    }

    #[test]
    fn search_range_is_non_decreasing_in_gravity() {
        let table = TierPolicyTable::default();
        for tier in Tier::ALL {
            let policy = table.get(tier);
            let mut previous = f64::NEG_INFINITY;
            for step in 0..=40 {
                let gravity = f64::from(step) * 0.05;
                let range = policy.search_range(gravity);
                assert!(range >= previous, "{tier:?} range shrank at {gravity}");
                previous = range;
            }
        }
    }

    #[test]
    fn tier_indices_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_index(tier.index()), Some(tier));
        }
        assert_eq!(Tier::from_index(3), None);
    }

    #[test]
    fn longitude_wraps_into_half_open_range() {
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(360.0), 0.0);
        assert_eq!(normalize_longitude(f64::NAN), 0.0);
    }

    #[test]
    fn latitude_is_clamped() {
        let coordinate = SurfaceCoordinate::new(95.0, 10.0);
        assert_eq!(coordinate.latitude(), 90.0);
        let coordinate = SurfaceCoordinate::new(-91.0, 10.0);
        assert_eq!(coordinate.latitude(), -90.0);
    }

    #[test]
    fn body_fixed_direction_follows_axis_convention() {
        let assert_close = |actual: glam::DVec3, expected: glam::DVec3| {
            assert!(
                (actual - expected).length() < 1e-12,
                "expected {expected:?}, got {actual:?}"
            );
        };

        assert_close(SurfaceCoordinate::ORIGIN.body_fixed_direction(), glam::DVec3::X);
        assert_close(
            SurfaceCoordinate::new(90.0, 0.0).body_fixed_direction(),
            glam::DVec3::Y,
        );
        assert_close(
            SurfaceCoordinate::new(0.0, 90.0).body_fixed_direction(),
            glam::DVec3::Z,
        );

        let mixed = SurfaceCoordinate::new(30.0, 45.0).body_fixed_direction();
        let (lat, lon) = (30f64.to_radians(), 45f64.to_radians());
        assert_close(
            mixed,
            glam::DVec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin()),
        );
    }

    #[test]
    fn surface_distance_spans_quarter_circumference() {
        let radius = 200_000.0;
        let equator = SurfaceCoordinate::new(0.0, 0.0);
        let pole = SurfaceCoordinate::new(90.0, 0.0);
        let expected = std::f64::consts::FRAC_PI_2 * radius;
        assert!((equator.surface_distance(pole, radius) - expected).abs() < 1e-6);
        assert_eq!(equator.surface_distance(equator, radius), 0.0);
    }

    #[test]
    fn build_marks_exactly_one_target() {
        let count = NonZeroU32::new(5).expect("non-zero count");
        let set = WaypointSet::build(
            BodyId::new(2),
            Tier::Significant,
            SurfaceCoordinate::ORIGIN,
            2_000.0,
            count,
            3,
            |index, _| waypoint(index),
        );

        assert_eq!(set.len(), 5);
        assert_eq!(set.waypoints().iter().filter(|w| w.is_target).count(), 1);
        assert_eq!(set.target().index, 3);
    }

    #[test]
    fn build_wraps_out_of_range_secret() {
        let count = NonZeroU32::new(3).expect("non-zero count");
        let set = WaypointSet::build(
            BodyId::new(2),
            Tier::Trivial,
            SurfaceCoordinate::ORIGIN,
            1_000.0,
            count,
            7,
            |index, _| waypoint(index),
        );
        assert_eq!(set.secret_index(), 1);
        assert!(set.waypoints()[1].is_target);
    }

    #[test]
    fn reward_total_sums_waypoints() {
        let count = NonZeroU32::new(3).expect("non-zero count");
        let set = WaypointSet::build(
            BodyId::new(2),
            Tier::Trivial,
            SurfaceCoordinate::ORIGIN,
            1_000.0,
            count,
            0,
            |index, _| waypoint(index),
        );
        assert_eq!(set.reward_total(), Reward::new(300.0, 3.0, 6.0));
    }

    #[test]
    fn generation_record_round_trips_through_bincode() {
        let record = GenerationRecord {
            seed: -42,
            body: BodyId::new(2),
            center: SurfaceCoordinate::new(10.0, 20.0),
            tier: Tier::Exceptional,
        };
        let bytes = bincode::serialize(&record).expect("serialize");
        let restored: GenerationRecord = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, record);
    }

    #[test]
    fn deserialised_coordinates_are_clamped_and_wrapped() {
        let bytes = bincode::serialize(&(95.0_f64, 190.0_f64)).expect("serialize");
        let coordinate: SurfaceCoordinate = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(coordinate, SurfaceCoordinate::new(90.0, -170.0));
        assert_eq!(coordinate.latitude(), 90.0);
        assert_eq!(coordinate.longitude(), -170.0);
    }

    #[test]
    fn target_is_the_flagged_waypoint() {
        let set = WaypointSet::build(
            BodyId::new(2),
            Tier::Significant,
            SurfaceCoordinate::ORIGIN,
            100.0,
            NonZeroU32::new(5).expect("non-zero"),
            3,
            |index, _| waypoint(index),
        );
        assert!(set.target().is_target);
        assert_eq!(set.target().index, set.secret_index());
    }
}
