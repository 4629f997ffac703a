use ndarray::Array2;

use super::constants::COINCIDENCE_COLUMNS;
use super::event::PsdEvent;

/// An open acceptance interval: a value passes only strictly between min and
/// max. Boundary values are excluded, matching the fitted-window convention
/// used when the windows were tuned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    /// Strictly-open interval membership
    pub fn contains(&self, value: f64) -> bool {
        self.min < value && value < self.max
    }
}

/// One correlated pair of detections: the group-a anchor and its group-b
/// partner, with the offset-corrected time difference in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoincidenceEvent {
    pub channel_a: u8,
    pub channel_b: u8,
    pub energy_a: f64,
    pub energy_b: f64,
    pub psd_a: f64,
    pub psd_b: f64,
    pub time_diff_ns: f64,
}

impl CoincidenceEvent {
    /// The fixed-width row layout used by the output table
    pub fn as_row(&self) -> [f64; COINCIDENCE_COLUMNS] {
        [
            self.channel_a as f64,
            self.channel_b as f64,
            self.energy_a,
            self.energy_b,
            self.psd_a,
            self.psd_b,
            self.time_diff_ns,
        ]
    }
}

/// Find all coincidences between channel a and channel b in a time-sorted
/// event slice.
///
/// Every event on channel a whose energy and PSD lie strictly inside the
/// acceptance windows anchors a search window
/// (t + time.min + offset, t + time.max + offset), open at both edges. The
/// scan walks forward from the next event and backward from the previous
/// event; each direction stops at the first candidate whose timestamp falls
/// outside the window. With events sorted by timestamp no later (earlier)
/// candidate can re-enter the window once the right (left) edge is crossed,
/// so the two breaks bound the work per anchor to the local cluster size.
/// Candidates inside the window count when they are on channel b and pass the
/// same energy and PSD windows; each match is emitted as its own record, so
/// one anchor may produce many pairs. The anchor index itself is never
/// examined, which rules out self-pairing even when the two channel groups
/// share a channel id.
pub fn find_coincidences(
    events: &[PsdEvent],
    ch_a: u8,
    ch_b: u8,
    energy: Bounds,
    psd: Bounds,
    time: Bounds,
    offset_ns: f64,
) -> Vec<CoincidenceEvent> {
    let mut found: Vec<CoincidenceEvent> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        if event.channel != ch_a || !energy.contains(event.energy) || !psd.contains(event.psd) {
            continue;
        }

        let window = Bounds::new(
            event.timestamp_ns + time.min + offset_ns,
            event.timestamp_ns + time.max + offset_ns,
        );

        // Coincidences AFTER the anchor
        for other in events[index + 1..].iter() {
            if !window.contains(other.timestamp_ns) {
                break;
            }
            if other.channel == ch_b && energy.contains(other.energy) && psd.contains(other.psd) {
                found.push(CoincidenceEvent {
                    channel_a: ch_a,
                    channel_b: ch_b,
                    energy_a: event.energy,
                    energy_b: other.energy,
                    psd_a: event.psd,
                    psd_b: other.psd,
                    time_diff_ns: other.timestamp_ns - event.timestamp_ns - offset_ns,
                });
            }
        }
        // Coincidences BEFORE the anchor
        for other in events[..index].iter().rev() {
            if !window.contains(other.timestamp_ns) {
                break;
            }
            if other.channel == ch_b && energy.contains(other.energy) && psd.contains(other.psd) {
                found.push(CoincidenceEvent {
                    channel_a: ch_a,
                    channel_b: ch_b,
                    energy_a: event.energy,
                    energy_b: other.energy,
                    psd_a: event.psd,
                    psd_b: other.psd,
                    time_diff_ns: other.timestamp_ns - event.timestamp_ns - offset_ns,
                });
            }
        }
    }

    found
}

/// The global result table: every coincidence found across all chunks and
/// all channel pairs, in arrival order.
///
/// Append-only; rows are materialized into the fixed-width array layout only
/// when the table is written out at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct CoincidenceTable {
    events: Vec<CoincidenceEvent>,
}

impl CoincidenceTable {
    pub fn new() -> Self {
        CoincidenceTable { events: Vec::new() }
    }

    /// Append a batch of records, preserving their order
    pub fn extend(&mut self, events: Vec<CoincidenceEvent>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[CoincidenceEvent] {
        &self.events
    }

    /// Materialize the (n, 7) array written to disk
    pub fn to_array(&self) -> Array2<f64> {
        let mut table = Array2::<f64>::zeros([self.events.len(), COINCIDENCE_COLUMNS]);
        for (i, event) in self.events.iter().enumerate() {
            for (j, value) in event.as_row().iter().enumerate() {
                table[[i, j]] = *value;
            }
        }
        table
    }
}
