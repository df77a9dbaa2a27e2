/// Warmup state tracker.
///
/// A bar is warm once `warmup_bars` bars have been processed before it, so
/// with `warmup_bars = max_bars_back` the first warm bar has index
/// `max_bars_back`.
#[derive(Debug, Clone)]
pub struct WarmupState {
    warmup_bars: usize,
    bars_processed: usize,
}

impl WarmupState {
    pub fn new(warmup_bars: usize) -> Self {
        Self {
            warmup_bars,
            bars_processed: 0,
        }
    }

    /// Count one processed bar. Returns true on the bar that completes warmup.
    pub fn process_bar(&mut self) -> bool {
        let was_warm = self.is_warm();
        self.bars_processed += 1;
        !was_warm && self.is_warm()
    }

    pub fn bars_processed(&self) -> usize {
        self.bars_processed
    }

    pub fn warmup_bars(&self) -> usize {
        self.warmup_bars
    }

    /// Whether the next bar to be processed is past warmup.
    pub fn is_warm(&self) -> bool {
        self.bars_processed >= self.warmup_bars
    }

    pub fn bars_until_warm(&self) -> usize {
        self.warmup_bars.saturating_sub(self.bars_processed)
    }

    pub fn reset(&mut self) {
        self.bars_processed = 0;
    }
}
