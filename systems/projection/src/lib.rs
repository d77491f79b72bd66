#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projection of survey waypoints onto the vessel's attitude instrument.
//!
//! Surface coordinates resolve to world positions through [`SurfacePoint`],
//! which captures the terrain height once. [`IndicatorProjector`] maps a
//! world target into the instrument's local frame and decides visibility.
//! [`NavIndicator`] ties both to a host [`MarkerBackend`] and pushes the
//! marker transform on every [`NavIndicator::tick`] without allocating.

mod coordinates;
mod indicator;
mod marker;
mod nav_indicator;

pub use coordinates::{resolve_world_position, SurfacePoint};
pub use indicator::{IndicatorFrame, IndicatorProjector, ObserverContext, DEFAULT_MARKER_RADIUS};
pub use marker::{Color, MarkerBackend, MarkerTexture, MarkerTextures, PLACEHOLDER_SIZE};
pub use nav_indicator::{
    marker_facing, marker_rest_orientation, IndicatorState, NavIndicator, LAUNCH_SITE,
    LAUNCH_SITE_ALTITUDE,
};
