use fxhash::FxHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::error::CalibrationError;

/// One entry of the calibration artifact: either a fitted offset in
/// nanoseconds or the failure sentinel left behind by the fitting step
/// (the literal string "failed").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OffsetEntry {
    Ns(f64),
    Uncalibrated(String),
}

/// TimeOffsetMap holds the per-channel-pair timing offsets learned from a
/// calibration run.
///
/// The artifact is a JSON file mapping string-encoded channel a ids to
/// string-encoded channel b ids to either a nanosecond offset or the
/// failure sentinel. Pairs whose fit failed, and pairs absent from the file
/// altogether, have no offset: the extraction skips them rather than
/// assuming zero.
#[derive(Debug, Clone, Default)]
pub struct TimeOffsetMap {
    offsets: FxHashMap<(u8, u8), f64>,
}

impl TimeOffsetMap {
    /// Load the calibration artifact, keeping only the calibrated pairs
    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        if !path.exists() {
            return Err(CalibrationError::BadFilePath(path.to_path_buf()));
        }
        let json_str = std::fs::read_to_string(path)?;
        let raw: BTreeMap<String, BTreeMap<String, OffsetEntry>> =
            serde_json::from_str(&json_str)?;

        let mut map = TimeOffsetMap::default();
        for (key_a, row) in raw.iter() {
            let ch_a: u8 = key_a
                .parse()
                .map_err(|_| CalibrationError::BadChannelKey(key_a.clone()))?;
            for (key_b, entry) in row.iter() {
                let ch_b: u8 = key_b
                    .parse()
                    .map_err(|_| CalibrationError::BadChannelKey(key_b.clone()))?;
                match entry {
                    OffsetEntry::Ns(offset) => {
                        map.offsets.insert((ch_a, ch_b), *offset);
                    }
                    OffsetEntry::Uncalibrated(_) => (),
                }
            }
        }
        Ok(map)
    }

    /// Get the offset for a pair, in the fixed a-then-b direction.
    ///
    /// If returns None the pair is uncalibrated and must be skipped
    pub fn get(&self, ch_a: u8, ch_b: u8) -> Option<f64> {
        self.offsets.get(&(ch_a, ch_b)).copied()
    }

    /// Number of calibrated pairs
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
