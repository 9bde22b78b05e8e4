//! This crate provides the interactive candle table.
//!
//! There is one candle for every week of the year. Each week that has passed lights another
//! candle, and clicking a lit flame opens the destination with the navigator that this binary was
//! built with.

mod bevy_setup;
mod config;
mod interaction;
mod logging;
mod navigators;

use self::{
    bevy_setup::{add_table_to_world, add_text_to_world, flicker_lights, setup},
    config::SceneConfig,
    interaction::{
        handle_pointer, recheck_reveals, resolve_reveals, update_flame_labels, update_popup,
        ActiveNavigator, RecheckTimer, RevealClock, SharedInteraction,
    },
    logging::{flush_log_file_on_exit, LogFileGuard},
    navigators::SelectedNavigator,
};
use bevy::{log::LogPlugin, prelude::*, DefaultPlugins};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use fc_calendar::CANDLE_COUNT;
use fc_navigator_trait::validate_destination;
use smooth_bevy_cameras::{controllers::orbit::OrbitCameraPlugin, LookTransformPlugin};
use std::{path::PathBuf, process};
use tracing::{info, instrument, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Show the candle table for this year.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The RON config file for the scene. It gets created with defaults if it doesn't exist.
    #[arg(long, default_value = "config/scene.ron")]
    config: PathBuf,

    /// Pretend that it's this date (YYYY-MM-DD) rather than asking the system clock.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// The directory to write the log file to.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let guard = logging::init_tracing(&args.log_dir);

    let config = SceneConfig::from_file(&args.config);
    if let Err(error) = validate_destination(&config.destination_url) {
        warn!(
            %error,
            destination = %config.destination_url,
            "Clicking a lit candle will fail with this destination"
        );
    }
    info!(?config, date = ?args.date, "Loaded scene config");

    let clock = RevealClock::new(args.date)?;

    run_scene(config, clock, guard);
    Ok(())
}

/// Run the candle table with Bevy.
#[instrument(skip(config, log_guard))]
fn run_scene(config: SceneConfig, clock: RevealClock, log_guard: WorkerGuard) {
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| format!("{CANDLE_COUNT} Candles of {}", clock.now().year()));
    let recheck = RecheckTimer::new(config.recheck_interval_secs);

    // Logging is handled by our own subscriber, so Bevy's LogPlugin is disabled
    info!("Starting bevy app");
    App::new()
        .insert_resource(Msaa { samples: 4 })
        .insert_resource(ClearColor(Color::rgb(0.02, 0.015, 0.03)))
        .insert_resource(AmbientLight {
            color: Color::rgb(1., 0.85, 0.7),
            brightness: 0.08,
        })
        .insert_resource(config)
        .insert_resource(clock)
        .insert_resource(recheck)
        .insert_resource(LogFileGuard::new(log_guard))
        .insert_resource(SharedInteraction::default())
        .insert_resource(ActiveNavigator(Box::new(SelectedNavigator::init())))
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    window: WindowDescriptor {
                        title,
                        ..default()
                    },
                    ..default()
                }),
        )
        .add_plugin(LookTransformPlugin)
        .add_plugin(OrbitCameraPlugin::default())
        .add_startup_system(setup)
        .add_startup_system(add_table_to_world)
        .add_startup_system(add_text_to_world)
        .add_startup_system_to_stage(StartupStage::PostStartup, resolve_reveals)
        .add_system(flicker_lights)
        .add_system(recheck_reveals)
        .add_system(handle_pointer)
        .add_system(update_popup.after(handle_pointer))
        .add_system(update_flame_labels)
        .add_system_to_stage(CoreStage::Last, flush_log_file_on_exit)
        .run();

    // Winit terminates the program after the event loop ends, so this should be unreachable. A
    // runner that does return drops the app with it, which flushes the log file
    warn!("Winit didn't terminate the program after the event loop ended, terminating now");
    process::exit(255);
}
