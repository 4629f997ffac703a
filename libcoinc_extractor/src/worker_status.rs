#[derive(Debug, Clone, Default)]
pub enum BarColor {
    #[default]
    CYAN,
    GREEN,
}

/// Progress message sent from the processing thread to the UI.
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub chunks_read: u32,
    pub color: BarColor,
}

impl WorkerStatus {
    pub fn new(progress: f32, chunks_read: u32, color: BarColor) -> Self {
        Self {
            progress,
            chunks_read,
            color,
        }
    }
}
