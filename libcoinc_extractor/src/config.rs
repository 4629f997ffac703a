use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::{DEFAULT_CHUNK_BYTES, EVENT_RECORD_BYTES, KEY_INFO_FILE};
use super::error::ConfigError;

/// Structure representing the application configuration. Contains pathing, channel
/// selection, and acceptance window information.
/// Configs are serializable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub event_file_path: PathBuf,
    pub output_path: PathBuf,
    pub save_name: String,
    pub calibration_path: PathBuf,
    pub channels_a: Vec<u8>,
    pub channels_b: Vec<u8>,
    pub chunk_size_bytes: usize,
    pub ns_per_sample: f64,
    pub time_min: f64,
    pub time_max: f64,
    pub time_res: f64,
    pub energy_min: f64,
    pub energy_max: f64,
    pub energy_res: f64,
    pub psd_min: f64,
    pub psd_max: f64,
    pub psd_res: f64,
}

impl Default for Config {
    /// Generate a new Config object. Paths and channel groups will be empty/invalid;
    /// the acceptance windows carry the usual starting points for a 500 MHz digitizer.
    fn default() -> Self {
        Self {
            event_file_path: PathBuf::from("None"),
            output_path: PathBuf::from("None"),
            save_name: String::from(""),
            calibration_path: PathBuf::from("None"),
            channels_a: vec![],
            channels_b: vec![],
            chunk_size_bytes: DEFAULT_CHUNK_BYTES,
            ns_per_sample: 2.0 / 1024.0,
            time_min: -150.0,
            time_max: 100.0,
            time_res: 1.0,
            energy_min: 0.0,
            energy_max: 66000.0,
            energy_res: 50.0,
            psd_min: -0.2,
            psd_max: 1.0,
            psd_res: 0.0012,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Check the parts of the configuration that would make a run impossible
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size_bytes < EVENT_RECORD_BYTES {
            return Err(ConfigError::ChunkTooSmall(self.chunk_size_bytes));
        }
        if self.channels_a.is_empty() || self.channels_b.is_empty() {
            return Err(ConfigError::EmptyChannelGroup);
        }
        Ok(())
    }

    /// Get the path to the output coincidence table
    pub fn npy_file_path(&self) -> PathBuf {
        self.output_path
            .join(format!("{}_coincidence_events.npy", self.save_name))
    }

    /// Get the path to the metadata record written next to the table
    pub fn key_info_path(&self) -> PathBuf {
        self.output_path.join(KEY_INFO_FILE)
    }
}
