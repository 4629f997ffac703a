//! # coinc_extractor
//!
//! coinc_extractor scans list-mode data from a PSD-capable digitizer DAQ and
//! extracts time-correlated event pairs between a "neutron" channel group (a)
//! and a "gamma" channel group (b), for example for neutron time-of-flight
//! analysis with an AmBe source. The extracted coincidence table is written
//! as a NumPy .npy array together with a key-info record describing the run.
//!
//! ## Input data
//!
//! The event file is a flat sequence of packed 16-byte little-endian records
//! as written by the acquisition: a 64-bit sample-clock timestamp, the short-
//! and long-gate integrated charges, the baseline, the channel id, and the
//! pile-up/under-range flag. The file is streamed in large record-aligned
//! chunks, so arbitrarily large runs can be processed in bounded memory.
//!
//! Per-channel-pair timing offsets come from a calibration JSON file of the
//! form produced by the offset fitting step:
//!
//! ```json
//! {
//!     "0": {"2": 12.5, "3": -60.0, "4": "failed"},
//!     "1": {"2": 0.25}
//! }
//! ```
//!
//! A pair marked `"failed"` (or missing entirely) is skipped with a notice
//! rather than searched with a zero offset.
//!
//! ## Configuration
//!
//! Runs are configured with a YAML file (see `coinc_extractor_cli new` for a
//! template):
//!
//! ```yml
//! event_file_path: /data/2024-05-08_AmBe_strong/events.ade
//! output_path: ./csv_folder/AmBe_coin
//! save_name: AmBe
//! calibration_path: ./jsons/Co60_zeros.json
//! channels_a: [0, 1, 7]
//! channels_b: [2, 3, 4, 5, 6]
//! chunk_size_bytes: 167772160
//! ns_per_sample: 0.001953125
//! time_min: -150.0
//! time_max: 100.0
//! time_res: 1.0
//! energy_min: 0.0
//! energy_max: 66000.0
//! energy_res: 50.0
//! psd_min: -0.2
//! psd_max: 1.0
//! psd_res: 0.0012
//! ```
//!
//! The energy and PSD windows select which events may participate at all; the
//! time window bounds the (offset-corrected) separation between the group-a
//! anchor and its group-b partner. All windows are open intervals: an event
//! sitting exactly on an edge is rejected.
//!
//! ## Output
//!
//! Two artifacts are written to `output_path` (the directory is created if
//! needed):
//!
//! - `<save_name>_coincidence_events.npy` - an (n, 7) float64 array with one
//!   row per coincidence: channel a, channel b, energy a, energy b, PSD a,
//!   PSD b, and the offset-corrected time difference in nanoseconds.
//! - `key_info.json` - the channel groups, sampling period, and the axis
//!   ranges/resolutions with their units, for downstream histogramming.
//!
//! ## Known limitation
//!
//! Chunks are searched independently: a true coincidence whose two events
//! fall on opposite sides of a chunk boundary is not found. With the default
//! 160 MB chunks and nanosecond-scale windows this loss is negligible, but it
//! does mean the output can depend on the chunk size in pathological cases.
pub mod calibration;
pub mod coincidence;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod event_file;
pub mod npy_writer;
pub mod process;
pub mod worker_status;
