use ndarray_npy::write_npy;
use serde::Serialize;
use std::path::PathBuf;

use super::coincidence::CoincidenceTable;
use super::config::Config;
use super::error::WriterError;

/// The metadata record written next to the coincidence table, capturing the
/// axis definitions needed to histogram the table later.
#[derive(Debug, Serialize)]
struct KeyInfo<'a> {
    channels_a: &'a [u8],
    channels_b: &'a [u8],
    ns_per_sample: f64,
    time_min: f64,
    time_max: f64,
    time_res: f64,
    time_units: &'static str,
    energy_min: f64,
    energy_max: f64,
    energy_res: f64,
    energy_units: &'static str,
    psd_min: f64,
    psd_max: f64,
    psd_res: f64,
    psd_units: &'static str,
}

impl<'a> KeyInfo<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            channels_a: &config.channels_a,
            channels_b: &config.channels_b,
            ns_per_sample: config.ns_per_sample,
            time_min: config.time_min,
            time_max: config.time_max,
            time_res: config.time_res,
            time_units: "ns",
            energy_min: config.energy_min,
            energy_max: config.energy_max,
            energy_res: config.energy_res,
            energy_units: "ch",
            psd_min: config.psd_min,
            psd_max: config.psd_max,
            psd_res: config.psd_res,
            psd_units: "(qlong-qshort)/qlong",
        }
    }
}

/// A simple struct which writes the run's two output artifacts: the
/// coincidence table as a NumPy .npy array and the key-info JSON record.
///
/// Creating the writer creates the destination directory; a directory that
/// already exists is fine.
#[derive(Debug)]
pub struct NpyWriter {
    npy_path: PathBuf,
    key_info_path: PathBuf,
}

impl NpyWriter {
    /// Create the writer and the destination directory
    pub fn new(config: &Config) -> Result<Self, WriterError> {
        std::fs::create_dir_all(&config.output_path)?;
        Ok(Self {
            npy_path: config.npy_file_path(),
            key_info_path: config.key_info_path(),
        })
    }

    /// Write the full table as a 2-D float array with one row per coincidence
    pub fn write_table(&self, table: &CoincidenceTable) -> Result<(), WriterError> {
        write_npy(&self.npy_path, &table.to_array())?;
        Ok(())
    }

    /// Write the metadata record for the run's configuration
    pub fn write_key_info(&self, config: &Config) -> Result<(), WriterError> {
        let key_info_file = std::fs::File::create(&self.key_info_path)?;
        serde_json::to_writer_pretty(key_info_file, &KeyInfo::new(config))?;
        Ok(())
    }

    pub fn npy_path(&self) -> &PathBuf {
        &self.npy_path
    }

    pub fn key_info_path(&self) -> &PathBuf {
        &self.key_info_path
    }
}

//Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::coincidence::CoincidenceEvent;
    use ndarray::Array2;
    use ndarray_npy::read_npy;

    fn test_config(dir_name: &str) -> Config {
        let mut config = Config::default();
        config.output_path = std::env::temp_dir().join(format!("{}_{}", dir_name, std::process::id()));
        config.save_name = String::from("test");
        config.channels_a = vec![0];
        config.channels_b = vec![3];
        config
    }

    #[test]
    fn test_write_and_read_back() {
        let config = test_config("npy_writer_roundtrip");
        let mut table = CoincidenceTable::new();
        table.extend(vec![CoincidenceEvent {
            channel_a: 0,
            channel_b: 3,
            energy_a: 5000.0,
            energy_b: 2000.0,
            psd_a: 0.3,
            psd_b: 0.1,
            time_diff_ns: 50.0,
        }]);

        let writer = NpyWriter::new(&config).unwrap();
        writer.write_table(&table).unwrap();
        writer.write_key_info(&config).unwrap();

        let array: Array2<f64> = read_npy(writer.npy_path()).unwrap();
        assert_eq!(array.shape(), [1, 7]);
        assert_eq!(array[[0, 2]], 5000.0);
        assert_eq!(array[[0, 6]], 50.0);

        let key_info = std::fs::read_to_string(writer.key_info_path()).unwrap();
        assert!(key_info.contains("ns_per_sample"));
        assert!(key_info.contains("(qlong-qshort)/qlong"));

        std::fs::remove_dir_all(&config.output_path).unwrap();
    }

    #[test]
    fn test_existing_directory_is_tolerated() {
        let config = test_config("npy_writer_existing_dir");
        std::fs::create_dir_all(&config.output_path).unwrap();
        // A second create over the same directory must not fail
        assert!(NpyWriter::new(&config).is_ok());
        std::fs::remove_dir_all(&config.output_path).unwrap();
    }
}
