//! This module handles setting up logging with `tracing`.

use bevy::{
    app::AppExit,
    prelude::{EventReader, ResMut, Resource},
};
use std::path::Path;
use tracing::debug;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{filter::LevelFilter, fmt::Layer, prelude::*, EnvFilter};
use tracing_unwrap::ResultExt;

/// The name of the scene's log file.
const LOG_FILENAME: &str = "scene.log";

/// Initialise a subscriber for tracing to log to `stdout` and a file in the given directory.
///
/// The returned guard must be kept alive for as long as logs should be written to the file.
pub fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let (appender, guard) = non_blocking(rolling::never(log_dir, LOG_FILENAME));

    let subscriber = tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_writer(appender)
                .with_ansi(false)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::DEBUG.into())
                        .parse_lossy(""),
                ),
        )
        .with(
            Layer::new()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::INFO.into())
                        .from_env_lossy(),
                ),
        );

    tracing::subscriber::set_global_default(subscriber)
        .expect_or_log("Setting the global default for tracing should be okay");

    guard
}

/// Holds the guard for the log file so that it can be flushed before the app exits.
///
/// Winit ends the process itself when the event loop finishes, so nothing outside the app gets
/// dropped.
#[derive(Resource, Debug)]
pub struct LogFileGuard(Option<WorkerGuard>);

impl LogFileGuard {
    /// Keep the given guard until the app exits.
    pub fn new(guard: WorkerGuard) -> Self {
        Self(Some(guard))
    }

    /// Has the log file been flushed yet?
    pub fn is_flushed(&self) -> bool {
        self.0.is_none()
    }
}

/// Flush the log file when the app is asked to exit.
pub fn flush_log_file_on_exit(mut exits: EventReader<AppExit>, mut guard: ResMut<LogFileGuard>) {
    if exits.iter().last().is_none() {
        return;
    }

    if let Some(guard) = guard.0.take() {
        debug!("Flushing the log file before exiting");
        drop(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::{App, CoreStage, Events};

    #[test]
    fn guard_is_dropped_when_the_app_exits() {
        let (_, guard) = non_blocking(std::io::sink());

        let mut app = App::new();
        app.add_event::<AppExit>()
            .insert_resource(LogFileGuard::new(guard))
            .add_system_to_stage(CoreStage::Last, flush_log_file_on_exit);

        app.update();
        assert!(!app.world.resource::<LogFileGuard>().is_flushed());

        app.world.resource_mut::<Events<AppExit>>().send(AppExit);
        app.update();
        assert!(app.world.resource::<LogFileGuard>().is_flushed());
    }
}
