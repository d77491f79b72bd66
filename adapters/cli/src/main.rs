#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating, replaying and projecting surveys.

mod config;
mod console;
mod report;

use std::{
    collections::BTreeSet,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use glam::{EulerRot, Quat};
use navsurvey_core::{BodyFrame, CelestialBody, GenerationRecord, SurfaceCoordinate, Tier};
use navsurvey_persistence::{load, load_or_default, save};
use navsurvey_system_eligibility::{ContractCounts, EligibilityGate};
use navsurvey_system_generation::{SeededCenterChooser, WaypointSetGenerator};
use navsurvey_system_projection::{
    Color, IndicatorProjector, MarkerTexture, MarkerTextures, NavIndicator, ObserverContext,
    SurfacePoint,
};
use navsurvey_world::BodyCatalog;
use tracing_subscriber::EnvFilter;

use crate::{config::CliConfig, console::ConsoleBackend};

#[derive(Debug, Parser)]
#[command(name = "navsurvey", version, about = "Deterministic surface survey waypoints")]
struct Cli {
    /// Raise log verbosity; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Body manifest replacing the built-in Kerbol system.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// TOML file tuning the generator and eligibility gate.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate waypoints around an explicit center on a named body.
    Generate {
        #[arg(long, allow_negative_numbers = true)]
        seed: i64,
        #[arg(long)]
        body: String,
        #[arg(long, value_enum, default_value_t = TierArg::Trivial)]
        tier: TierArg,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Run a full offer: gate, body selection, center choice and generation.
    Offer {
        #[arg(long, allow_negative_numbers = true)]
        seed: i64,
        #[arg(long, value_enum, default_value_t = TierArg::Trivial)]
        tier: TierArg,
        /// Survey contracts currently offered.
        #[arg(long, default_value_t = 0)]
        offered: u32,
        /// Survey contracts currently active.
        #[arg(long, default_value_t = 0)]
        active: u32,
        /// Researched technology id; repeat for several.
        #[arg(long = "tech", default_values_t = [String::from("roverWheel1")])]
        technologies: Vec<String>,
    },

    /// Regenerate the waypoints described by a saved record.
    Replay {
        record: String,
        /// Fail on an unreadable record instead of falling back to defaults.
        #[arg(long)]
        strict: bool,
    },

    /// Project the target waypoint of a saved record onto the instrument.
    Project {
        record: String,
        /// Body the observer is on; defaults to the survey body.
        #[arg(long)]
        observer_body: Option<String>,
        /// Observer latitude; defaults to the survey center.
        #[arg(long, allow_negative_numbers = true)]
        observer_latitude: Option<f64>,
        /// Observer longitude; defaults to the survey center.
        #[arg(long, allow_negative_numbers = true)]
        observer_longitude: Option<f64>,
        /// Observer altitude above the reference radius, in meters.
        #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
        observer_altitude: f64,
        /// Attitude yaw in degrees.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        yaw: f32,
        /// Attitude pitch in degrees.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pitch: f32,
        /// Attitude roll in degrees.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        roll: f32,
        /// Marker texture: default, plane or rover.
        #[arg(long, default_value = "default")]
        texture: String,
        /// Directory holding marker textures.
        #[arg(long)]
        assets: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierArg {
    Trivial,
    Significant,
    Exceptional,
}

impl From<TierArg> for Tier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Trivial => Tier::Trivial,
            TierArg::Significant => Tier::Significant,
            TierArg::Exceptional => Tier::Exceptional,
        }
    }
}

/// Entry point for the navsurvey command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let catalog = load_catalog(cli.catalog.as_deref())?;
    let config = CliConfig::load(cli.config.as_deref())?;
    let generator = WaypointSetGenerator::new(config.generator);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Generate {
            seed,
            body,
            tier,
            latitude,
            longitude,
        } => {
            let body = find_body(&catalog, &body)?;
            let center = SurfaceCoordinate::new(latitude, longitude);
            let tier = Tier::from(tier);
            let set = generator
                .generate(seed, body, tier, center, true)
                .with_context(|| format!("failed to generate a survey of {}", body.name))?;
            let record = GenerationRecord {
                seed,
                body: body.id,
                center,
                tier,
            };
            report::write_set(&mut out, &set, &catalog)?;
            report::write_record(&mut out, &save(&record), &record)?;
        }
        Command::Offer {
            seed,
            tier,
            offered,
            active,
            technologies,
        } => {
            let gate = EligibilityGate::new(config.gate);
            let ledger: BTreeSet<String> = technologies.into_iter().collect();
            let eligible = gate.is_eligible(&ledger, ContractCounts::new(offered, active));
            let mut chooser = SeededCenterChooser::new(seed);

            match generator.offer(seed, tier.into(), &catalog, &mut chooser, eligible) {
                Ok(offer) => {
                    report::write_set(&mut out, &offer.waypoints, &catalog)?;
                    report::write_record(&mut out, &save(&offer.record), &offer.record)?;
                }
                Err(failure) => writeln!(out, "no offer: {failure}")?,
            }
        }
        Command::Replay { record, strict } => {
            let record = if strict {
                load(&record).context("saved record is unreadable")?
            } else {
                load_or_default(&record, catalog.home_id())
            };
            let set = generator
                .regenerate(&record, &catalog)
                .context("saved record does not describe a survey")?;
            report::write_set(&mut out, &set, &catalog)?;
        }
        Command::Project {
            record,
            observer_body,
            observer_latitude,
            observer_longitude,
            observer_altitude,
            yaw,
            pitch,
            roll,
            texture,
            assets,
        } => {
            let record = load(&record).context("saved record is unreadable")?;
            let set = generator
                .regenerate(&record, &catalog)
                .context("saved record does not describe a survey")?;
            let survey_body = catalog
                .get(set.body())
                .context("survey body missing from catalog")?;
            let observer_body = match observer_body {
                Some(name) => find_body(&catalog, &name)?,
                None => survey_body,
            };
            let observer_coordinate = SurfaceCoordinate::new(
                observer_latitude.unwrap_or(set.center().latitude()),
                observer_longitude.unwrap_or(set.center().longitude()),
            );
            let attitude = Quat::from_euler(
                EulerRot::YXZ,
                yaw.to_radians(),
                pitch.to_radians(),
                roll.to_radians(),
            );

            let textures = load_textures(assets.as_deref());
            let mut indicator = NavIndicator::new(
                ConsoleBackend::default(),
                &textures,
                IndicatorProjector::default(),
                catalog.home(),
                None,
            );
            indicator.setup(
                survey_body,
                set.target().coordinate,
                0.0,
                MarkerTexture::from_name(&texture),
                Color::WHITE,
                None,
            );
            indicator.activate();

            let observer = ObserverContext {
                body: observer_body.id,
                position: SurfacePoint::resolve(observer_body, observer_coordinate, None)
                    .world_position(&BodyFrame::IDENTITY, observer_altitude),
                attitude,
            };
            let frame = indicator.tick(Some(&observer), &BodyFrame::IDENTITY);
            report::write_projection(&mut out, &frame, indicator.backend().snapshot())?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

fn load_catalog(path: Option<&Path>) -> Result<BodyCatalog> {
    match path {
        Some(path) => BodyCatalog::from_manifest_path(path)
            .with_context(|| format!("failed to load body manifest {}", path.display())),
        None => BodyCatalog::builtin().context("built-in body manifest is invalid"),
    }
}

fn find_body<'c>(catalog: &'c BodyCatalog, name: &str) -> Result<&'c CelestialBody> {
    catalog
        .by_name(name)
        .with_context(|| format!("no body named '{name}' in the catalog"))
}

fn load_textures(assets: Option<&Path>) -> MarkerTextures<String> {
    MarkerTextures::load(
        |variant| console::texture_path(assets, variant),
        console::placeholder_texture,
    )
}
