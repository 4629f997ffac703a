use byteorder::{ByteOrder, LittleEndian};

use super::constants::EVENT_RECORD_BYTES;
use super::error::EventDataError;

/// One on-disk list-mode record as produced by the digitizer DAQ.
///
/// Records are packed little-endian with no padding: a 64-bit sample-clock
/// timestamp, the short- and long-gate integrated charges, the baseline,
/// the channel id, and the pile-up/under-range flag. The baseline and the
/// flag are carried through decoding but unused by the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub timestamp: u64,
    pub qshort: u16,
    pub qlong: u16,
    pub baseline: u16,
    pub channel: u8,
    pub pur: u8,
}

impl EventRecord {
    /// Decode one record from a EVENT_RECORD_BYTES-long slice
    pub fn from_bytes(buffer: &[u8]) -> Self {
        EventRecord {
            timestamp: LittleEndian::read_u64(&buffer[0..8]),
            qshort: LittleEndian::read_u16(&buffer[8..10]),
            qlong: LittleEndian::read_u16(&buffer[10..12]),
            baseline: LittleEndian::read_u16(&buffer[12..14]),
            channel: buffer[14],
            pur: buffer[15],
        }
    }
}

/// A decoded event with the derived quantities used by the coincidence search.
///
/// The timestamp is converted to nanoseconds with the configured sample period,
/// energy is the long-gate charge, and PSD is the usual charge ratio
/// (qlong - qshort) / qlong.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsdEvent {
    pub channel: u8,
    pub timestamp_ns: f64,
    pub energy: f64,
    pub psd: f64,
}

/// Decode a record-aligned chunk into time-sorted [PsdEvent]s.
///
/// Only records on a selected channel (group a or group b) with strictly
/// positive long-gate charge survive; everything else is dropped here so the
/// PSD ratio is always well defined downstream. The surviving events are
/// stable-sorted ascending by raw timestamp, keeping file order for ties.
/// A chunk in which nothing survives yields an empty Vec.
pub fn decode_chunk(
    chunk: &[u8],
    channels_a: &[u8],
    channels_b: &[u8],
    ns_per_sample: f64,
) -> Result<Vec<PsdEvent>, EventDataError> {
    if chunk.len() % EVENT_RECORD_BYTES != 0 {
        return Err(EventDataError::MisalignedChunk(chunk.len()));
    }

    let mut selected: Vec<EventRecord> = Vec::with_capacity(chunk.len() / EVENT_RECORD_BYTES);
    for raw in chunk.chunks_exact(EVENT_RECORD_BYTES) {
        let record = EventRecord::from_bytes(raw);
        if record.qlong == 0 {
            continue;
        }
        if !(channels_a.contains(&record.channel) || channels_b.contains(&record.channel)) {
            continue;
        }
        selected.push(record);
    }

    selected.sort_by_key(|record| record.timestamp);

    Ok(selected
        .iter()
        .map(|record| PsdEvent {
            channel: record.channel,
            timestamp_ns: record.timestamp as f64 * ns_per_sample,
            energy: record.qlong as f64,
            psd: (record.qlong as f64 - record.qshort as f64) / record.qlong as f64,
        })
        .collect())
}
