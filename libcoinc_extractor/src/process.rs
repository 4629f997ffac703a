use std::sync::mpsc::Sender;

use super::calibration::TimeOffsetMap;
use super::coincidence::{find_coincidences, Bounds, CoincidenceTable};
use super::config::Config;
use super::error::ProcessorError;
use super::event::decode_chunk;
use super::event_file::EventFile;
use super::npy_writer::NpyWriter;
use super::worker_status::{BarColor, WorkerStatus};

/// The main loop of the coincidence extraction.
///
/// This takes in a config (and a progress channel) and performs the full
/// extraction on the configured event file: stream the file chunk by chunk,
/// decode and time-sort each chunk, search every configured channel pair for
/// coincidences, and accumulate the results into one table. The table and
/// its key-info record are written out only once the whole file has been
/// read, so any error along the way aborts the run with nothing persisted.
pub fn process(config: &Config, tx: &Sender<WorkerStatus>) -> Result<(), ProcessorError> {
    config.validate()?;

    let offsets = TimeOffsetMap::load(&config.calibration_path)?;
    spdlog::info!(
        "Loaded timing offsets for {} channel pairs from {}",
        offsets.len(),
        config.calibration_path.to_string_lossy()
    );

    let mut event_file = EventFile::open(&config.event_file_path, config.chunk_size_bytes)?;
    spdlog::info!(
        "Event file: {}",
        config.event_file_path.to_string_lossy()
    );
    spdlog::info!(
        "Event file size: {}",
        human_bytes::human_bytes(event_file.size_bytes() as f64)
    );
    spdlog::info!(
        "Using chunk size: {}",
        human_bytes::human_bytes(event_file.chunk_bytes() as f64)
    );
    let chunks_needed =
        (event_file.size_bytes() as f64 / event_file.chunk_bytes() as f64).ceil() as u64;
    spdlog::info!("Required chunks: {}", chunks_needed);
    spdlog::info!("Selected channels for a: {:?}", config.channels_a);
    spdlog::info!("Selected channels for b: {:?}", config.channels_b);

    let energy_window = Bounds::new(config.energy_min, config.energy_max);
    let psd_window = Bounds::new(config.psd_min, config.psd_max);
    let time_window = Bounds::new(config.time_min, config.time_max);
    let total_bytes = event_file.size_bytes().max(1) as f32;

    let mut table = CoincidenceTable::new();
    let mut chunk_counter: u32 = 0;
    tx.send(WorkerStatus::new(0.0, chunk_counter, BarColor::CYAN))?;
    while let Some(chunk) = event_file.get_next_chunk()? {
        spdlog::info!("Reading chunk: {}", chunk_counter);
        let events = decode_chunk(
            &chunk,
            &config.channels_a,
            &config.channels_b,
            config.ns_per_sample,
        )?;

        for &ch_a in config.channels_a.iter() {
            for &ch_b in config.channels_b.iter() {
                let offset_ns = match offsets.get(ch_a, ch_b) {
                    Some(offset) => offset,
                    None => {
                        spdlog::warn!("No timing offset for pair a: {} b: {}, skipping", ch_a, ch_b);
                        continue;
                    }
                };

                let found = find_coincidences(
                    &events,
                    ch_a,
                    ch_b,
                    energy_window,
                    psd_window,
                    time_window,
                    offset_ns,
                );
                table.extend(found);
            }
        }

        chunk_counter += 1;
        tx.send(WorkerStatus::new(
            event_file.bytes_read() as f32 / total_bytes,
            chunk_counter,
            BarColor::CYAN,
        ))?;
    }
    spdlog::info!(
        "Done reading after {} chunks. Found {} coincidence events.",
        chunk_counter,
        table.len()
    );

    tx.send(WorkerStatus::new(1.0, chunk_counter, BarColor::GREEN))?;
    let writer = NpyWriter::new(config)?;
    writer.write_table(&table)?;
    writer.write_key_info(config)?;
    spdlog::info!(
        "Wrote coincidence table to {}",
        writer.npy_path().to_string_lossy()
    );
    spdlog::info!(
        "Wrote key info to {}",
        writer.key_info_path().to_string_lossy()
    );
    Ok(())
}
