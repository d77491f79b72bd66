//! Plain-text rendering of generated surveys and projections.

use std::io::{self, Write};

use navsurvey_core::{GenerationRecord, WaypointSet};
use navsurvey_system_projection::IndicatorFrame;
use navsurvey_world::BodyCatalog;

use crate::console::MarkerSnapshot;

pub(crate) fn write_set(
    out: &mut impl Write,
    set: &WaypointSet,
    catalog: &BodyCatalog,
) -> io::Result<()> {
    let body = catalog
        .get(set.body())
        .map_or("<unknown>", |body| body.name.as_str());
    writeln!(
        out,
        "survey of {body} ({:?}): {} waypoints within {:.1} m of ({:.6}, {:.6})",
        set.tier(),
        set.len(),
        set.range(),
        set.center().latitude(),
        set.center().longitude(),
    )?;

    for waypoint in set.waypoints() {
        let marker = if waypoint.is_target { "  <- target" } else { "" };
        writeln!(
            out,
            "  #{:<2} {:>11.6} {:>11.6}  radius {:.0} m{marker}",
            waypoint.index,
            waypoint.coordinate.latitude(),
            waypoint.coordinate.longitude(),
            waypoint.acceptance_radius,
        )?;
    }

    let total = set.reward_total();
    writeln!(
        out,
        "reward: {:.0} funds, {:.1} reputation, {:.1} science",
        total.funds, total.reputation, total.science
    )
}

pub(crate) fn write_record(
    out: &mut impl Write,
    encoded: &str,
    record: &GenerationRecord,
) -> io::Result<()> {
    writeln!(out, "record (seed {}): {encoded}", record.seed)
}

pub(crate) fn write_projection(
    out: &mut impl Write,
    frame: &IndicatorFrame,
    marker: &MarkerSnapshot,
) -> io::Result<()> {
    let position = marker.local_position;
    writeln!(
        out,
        "marker {} at ({:.4}, {:.4}, {:.4})",
        if frame.visible { "visible" } else { "hidden" },
        position.x,
        position.y,
        position.z,
    )?;
    let tint = marker.tint;
    writeln!(
        out,
        "texture {} tint rgba({:.2}, {:.2}, {:.2}, {:.2}) rotation {:?} shown {}",
        marker.texture,
        tint.red,
        tint.green,
        tint.blue,
        tint.alpha,
        marker.local_rotation,
        marker.visible,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use navsurvey_core::{SurfaceCoordinate, Tier};
    use navsurvey_system_generation::WaypointSetGenerator;

    #[test]
    fn survey_lists_every_waypoint_and_one_target() {
        let catalog = BodyCatalog::builtin().expect("builtin manifest parses");
        let mun = catalog.by_name("Mun").expect("Mun is listed");
        let set = WaypointSetGenerator::default()
            .generate(42, mun, Tier::Significant, SurfaceCoordinate::new(10.0, 20.0), true)
            .expect("generation succeeds");

        let mut out = Vec::new();
        write_set(&mut out, &set, &catalog).expect("writing to memory succeeds");
        let text = String::from_utf8(out).expect("report is utf-8");

        assert!(text.starts_with("survey of Mun (Significant): 5 waypoints"));
        assert_eq!(text.matches("<- target").count(), 1);
        assert_eq!(text.lines().filter(|line| line.starts_with("  #")).count(), 5);
        assert!(text.lines().last().is_some_and(|line| line.starts_with("reward:")));
    }
}
