use std::path::PathBuf;
use thiserror::Error;

use super::constants::EVENT_RECORD_BYTES;
use super::worker_status::WorkerStatus;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config chunk size {0} is smaller than one event record ({size} bytes)", size = EVENT_RECORD_BYTES)]
    ChunkTooSmall(usize),
    #[error("Config must select at least one channel in each of groups a and b")]
    EmptyChannelGroup,
}

#[derive(Debug, Error)]
pub enum EventFileError {
    #[error("Could not open event file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Event file chunk size {0} is smaller than one event record ({size} bytes)", size = EVENT_RECORD_BYTES)]
    ChunkTooSmall(usize),
    #[error("Event file ended with {0} trailing bytes, which is not a whole event record")]
    TrailingBytes(usize),
    #[error("Event file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Error)]
pub enum EventDataError {
    #[error("Chunk length {0} is not a multiple of the event record size {size}", size = EVENT_RECORD_BYTES)]
    MisalignedChunk(usize),
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Could not load timing offsets because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Timing offsets failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Timing offsets failed to parse JSON: {0}")]
    ParsingError(#[from] serde_json::Error),
    #[error("Timing offset channel key {0:?} is not an unsigned 8-bit integer")]
    BadChannelKey(String),
}

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Writer failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Writer failed to write the coincidence table: {0}")]
    NpyError(#[from] ndarray_npy::WriteNpyError),
    #[error("Writer failed to serialize key info to JSON: {0}")]
    ParsingError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to EventFile error: {0}")]
    FileError(#[from] EventFileError),
    #[error("Processor failed due to event data error: {0}")]
    DataError(#[from] EventDataError),
    #[error("Processor failed due to Calibration error: {0}")]
    CalibrationError(#[from] CalibrationError),
    #[error("Processor failed due to Writer error: {0}")]
    WriterError(#[from] WriterError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
}
