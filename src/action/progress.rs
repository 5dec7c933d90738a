/// Turns raw upload percentages into the sequence shown to the user: capped
/// at 100 and never moving backwards. Some transports over-report the bytes
/// sent, so raw values above 100 are expected.
#[derive(Debug, Default, Clone)]
pub struct ProgressTracker {
    last: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, raw: u64) -> u8 {
        let clamped = raw.min(100) as u8;
        self.last = self.last.max(clamped);
        self.last
    }

    pub fn last(&self) -> u8 {
        self.last
    }
}
