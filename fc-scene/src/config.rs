//! This module handles the config file for the scene.

use bevy::prelude::Resource;
use fc_navigator_trait::DESTINATION_URL;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use tracing::{debug, warn};

/// The config for the scene, stored as RON.
#[derive(Clone, Debug, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Where clicking a lit candle takes you.
    pub destination_url: String,

    /// How often to check whether another candle has unlocked, in seconds.
    ///
    /// With `None`, candles are only revealed when the scene starts, so a new week needs a
    /// restart to show up.
    pub recheck_interval_secs: Option<u64>,

    /// How close (in pixels) the pointer has to be to a flame to hover over it.
    pub hover_radius_px: f32,

    /// The font for the title and the week labels, relative to the `assets` folder.
    ///
    /// With `None`, no text is shown at all.
    pub font_path: Option<String>,

    /// The title shown at the top of the window. `None` means "52 Candles of <year>".
    pub title: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            destination_url: DESTINATION_URL.to_string(),
            recheck_interval_secs: None,
            hover_radius_px: 18.,
            font_path: None,
            title: None,
        }
    }
}

impl SceneConfig {
    /// Load the config from the file.
    ///
    /// If the file doesn't exist, the default config is used and written to the file so that it
    /// can be edited. If it exists but can't be read or parsed, the default is used and the file
    /// is left alone.
    pub fn from_file(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(?path, "No config file, writing the default");
                let default = Self::default();
                default.save_to_file(path);
                return default;
            }
            Err(error) => {
                warn!(?error, ?path, "Unable to read config file, using the default");
                return Self::default();
            }
        };

        ron::from_str(&text).unwrap_or_else(|error| {
            warn!(?error, ?path, "Unable to parse config file, using the default");
            Self::default()
        })
    }

    /// Save the config to the file.
    pub fn save_to_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::DirBuilder::new().recursive(true).create(parent);
        }

        let text = match ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default().struct_names(true),
        ) {
            Ok(text) => text,
            Err(error) => {
                warn!(?error, "Unable to serialize the scene config");
                return;
            }
        };

        if let Err(error) = fs::write(path, text) {
            warn!(?error, ?path, "Unable to save the scene config");
        }
    }
}
