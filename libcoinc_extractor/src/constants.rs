//! Constants tied to the on-disk list-mode format and the output table layout.

/// Size in bytes of one list-mode event record (u64 timestamp, three u16
/// charge/baseline words, u8 channel, u8 pile-up flag, packed little-endian).
pub const EVENT_RECORD_BYTES: usize = 16;

/// Number of columns in a row of the output coincidence table:
/// channel a, channel b, energy a, energy b, PSD a, PSD b, time difference.
pub const COINCIDENCE_COLUMNS: usize = 7;

/// Default read chunk of 160 MB; always rounded down to a record multiple.
pub const DEFAULT_CHUNK_BYTES: usize = 16 * 10 * 1024 * 1024;

/// File name of the metadata record written next to the coincidence table.
pub const KEY_INFO_FILE: &str = "key_info.json";
