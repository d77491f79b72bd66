use navsurvey_core::{GenerationRecord, SurfaceCoordinate, Tier};
use navsurvey_persistence::{load, load_or_default, save};
use navsurvey_system_generation::{SeededCenterChooser, WaypointSetGenerator};
use navsurvey_world::BodyCatalog;

#[test]
fn saved_offers_regenerate_identical_waypoints() {
    let catalog = BodyCatalog::builtin().expect("builtin manifest parses");
    let generator = WaypointSetGenerator::default();

    for (seed, tier) in [
        (7, Tier::Trivial),
        (42, Tier::Significant),
        (-1_234_567, Tier::Exceptional),
    ] {
        let mut chooser = SeededCenterChooser::new(seed);
        let offer = generator
            .offer(seed, tier, &catalog, &mut chooser, true)
            .expect("offer succeeds");

        let stored = save(&offer.record);
        let restored = load(&stored).expect("stored record decodes");
        assert_eq!(restored, offer.record);

        let regenerated = generator
            .regenerate(&restored, &catalog)
            .expect("restored record regenerates");
        assert_eq!(regenerated, offer.waypoints);
    }
}

#[test]
fn corrupt_storage_falls_back_to_the_home_body() {
    let catalog = BodyCatalog::builtin().expect("builtin manifest parses");
    let generator = WaypointSetGenerator::default();

    let record = load_or_default("", catalog.home_id());
    assert_eq!(record.body, catalog.home_id());
    assert_eq!(record.center, SurfaceCoordinate::ORIGIN);
    assert_eq!(record, GenerationRecord::fallback(catalog.home_id()));

    let set = generator
        .regenerate(&record, &catalog)
        .expect("fallback record regenerates");
    assert_eq!(set.body(), catalog.home_id());
    assert_eq!(set.len(), 3);
}
