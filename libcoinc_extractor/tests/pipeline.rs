//! End-to-end test of the extraction pipeline: a synthetic list-mode file and
//! calibration artifact go in, the .npy table and key-info record come out.
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

use ndarray::Array2;
use ndarray_npy::read_npy;

use libcoinc_extractor::config::Config;
use libcoinc_extractor::process::process;
use libcoinc_extractor::worker_status::WorkerStatus;

fn record_bytes(timestamp: u64, qshort: u16, qlong: u16, channel: u8) -> [u8; 16] {
    let mut buffer = [0u8; 16];
    buffer[0..8].copy_from_slice(&timestamp.to_le_bytes());
    buffer[8..10].copy_from_slice(&qshort.to_le_bytes());
    buffer[10..12].copy_from_slice(&qlong.to_le_bytes());
    // baseline stays zero, it is unused by the extraction
    buffer[14] = channel;
    buffer
}

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(dir: &PathBuf) -> Config {
    let mut config = Config::default();
    config.event_file_path = dir.join("events.ade");
    config.output_path = dir.join("out");
    config.save_name = String::from("test");
    config.calibration_path = dir.join("offsets.json");
    config.channels_a = vec![0];
    config.channels_b = vec![3, 4];
    // Three records per chunk, so the run takes more than one chunk
    config.chunk_size_bytes = 48;
    config.ns_per_sample = 1.0;
    config
}

#[test]
fn extraction_round_trip() {
    let dir = test_dir("pipeline_round_trip");
    let config = test_config(&dir);

    // First chunk holds the coincident pair out of time order plus an event
    // on an unused channel; the second chunk holds a zero-charge record and a
    // lone group-b event far from everything.
    let mut data = Vec::new();
    data.extend_from_slice(&record_bytes(1050, 1800, 2000, 3));
    data.extend_from_slice(&record_bytes(1000, 3500, 5000, 0));
    data.extend_from_slice(&record_bytes(1200, 50, 100, 9));
    data.extend_from_slice(&record_bytes(990, 0, 0, 0));
    data.extend_from_slice(&record_bytes(5000, 100, 1000, 4));
    let mut event_file = std::fs::File::create(&config.event_file_path).unwrap();
    event_file.write_all(&data).unwrap();

    // Pair (0, 4) failed its offset fit and must be skipped, not searched
    let mut calibration_file = std::fs::File::create(&config.calibration_path).unwrap();
    calibration_file
        .write_all(br#"{"0": {"3": 0.0, "4": "failed"}}"#)
        .unwrap();

    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    process(&config, &tx).unwrap();

    // The worker reported progress while it ran
    let statuses: Vec<WorkerStatus> = rx.try_iter().collect();
    assert!(!statuses.is_empty());
    assert_eq!(statuses.last().unwrap().progress, 1.0);

    let table: Array2<f64> = read_npy(config.npy_file_path()).unwrap();
    assert_eq!(table.shape(), [1, 7]);
    assert_eq!(table[[0, 0]], 0.0);
    assert_eq!(table[[0, 1]], 3.0);
    assert_eq!(table[[0, 2]], 5000.0);
    assert_eq!(table[[0, 3]], 2000.0);
    assert_eq!(table[[0, 4]], 0.3);
    assert_eq!(table[[0, 5]], 0.1);
    assert_eq!(table[[0, 6]], 50.0);

    let key_info = std::fs::read_to_string(config.key_info_path()).unwrap();
    assert!(key_info.contains("channels_a"));
    assert!(key_info.contains("ns_per_sample"));
    assert!(key_info.contains("(qlong-qshort)/qlong"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn uncalibrated_pairs_yield_an_empty_table() {
    let dir = test_dir("pipeline_uncalibrated");
    let mut config = test_config(&dir);
    config.channels_b = vec![3];

    let mut data = Vec::new();
    data.extend_from_slice(&record_bytes(1000, 3500, 5000, 0));
    data.extend_from_slice(&record_bytes(1050, 1800, 2000, 3));
    let mut event_file = std::fs::File::create(&config.event_file_path).unwrap();
    event_file.write_all(&data).unwrap();

    let mut calibration_file = std::fs::File::create(&config.calibration_path).unwrap();
    calibration_file
        .write_all(br#"{"0": {"3": "failed"}}"#)
        .unwrap();

    let (tx, _rx) = mpsc::channel::<WorkerStatus>();
    process(&config, &tx).unwrap();

    let table: Array2<f64> = read_npy(config.npy_file_path()).unwrap();
    assert_eq!(table.shape(), [0, 7]);

    std::fs::remove_dir_all(&dir).unwrap();
}

// Chunks are searched independently, so a pair split across a chunk boundary
// is lost. This pins down the documented limitation: the same file searched
// with a large enough chunk finds the pair.
#[test]
fn chunk_boundary_split_loses_pairs() {
    let dir = test_dir("pipeline_chunk_boundary");
    let mut config = test_config(&dir);
    config.channels_b = vec![3];

    let mut data = Vec::new();
    data.extend_from_slice(&record_bytes(10, 1800, 2000, 3));
    data.extend_from_slice(&record_bytes(20, 1800, 2000, 3));
    data.extend_from_slice(&record_bytes(1000, 3500, 5000, 0));
    data.extend_from_slice(&record_bytes(1050, 1800, 2000, 3));
    let mut event_file = std::fs::File::create(&config.event_file_path).unwrap();
    event_file.write_all(&data).unwrap();

    let mut calibration_file = std::fs::File::create(&config.calibration_path).unwrap();
    calibration_file.write_all(br#"{"0": {"3": 0.0}}"#).unwrap();

    // Three records per chunk: the anchor and its partner end up in
    // different chunks and the pair is missed
    let (tx, _rx) = mpsc::channel::<WorkerStatus>();
    process(&config, &tx).unwrap();
    let table: Array2<f64> = read_npy(config.npy_file_path()).unwrap();
    assert_eq!(table.shape(), [0, 7]);

    // One chunk covering the whole file finds it
    config.chunk_size_bytes = 1024;
    let (tx, _rx) = mpsc::channel::<WorkerStatus>();
    process(&config, &tx).unwrap();
    let table: Array2<f64> = read_npy(config.npy_file_path()).unwrap();
    assert_eq!(table.shape(), [1, 7]);
    assert_eq!(table[[0, 6]], 50.0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn offset_correction_is_applied() {
    let dir = test_dir("pipeline_offset");
    let mut config = test_config(&dir);
    config.channels_b = vec![3];

    let mut data = Vec::new();
    data.extend_from_slice(&record_bytes(1000, 3500, 5000, 0));
    data.extend_from_slice(&record_bytes(1050, 1800, 2000, 3));
    let mut event_file = std::fs::File::create(&config.event_file_path).unwrap();
    event_file.write_all(&data).unwrap();

    let mut calibration_file = std::fs::File::create(&config.calibration_path).unwrap();
    calibration_file.write_all(br#"{"0": {"3": 60.0}}"#).unwrap();

    let (tx, _rx) = mpsc::channel::<WorkerStatus>();
    process(&config, &tx).unwrap();

    let table: Array2<f64> = read_npy(config.npy_file_path()).unwrap();
    assert_eq!(table.shape(), [1, 7]);
    assert_eq!(table[[0, 6]], -10.0);

    std::fs::remove_dir_all(&dir).unwrap();
}
