/// Fractional progress reporting for long-running stages
use constants::progress::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use indicatif::{ProgressBar, ProgressStyle};

/// Receives advisory 0-100 progress updates after each tile or chunk.
pub trait Progress {
    fn set_percent(&mut self, percent: f64);

    fn finish(&mut self, _message: &str) {}
}

impl Progress for ProgressBar {
    fn set_percent(&mut self, percent: f64) {
        self.set_position(percent.clamp(0.0, 100.0).round() as u64);
    }

    fn finish(&mut self, message: &str) {
        self.finish_with_message(message.to_string());
    }
}

/// Discards all updates.
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_percent(&mut self, _percent: f64) {}
}

/// Keeps every update, in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordedProgress {
    pub updates: Vec<f64>,
}

#[cfg(test)]
impl Progress for RecordedProgress {
    fn set_percent(&mut self, percent: f64) {
        self.updates.push(percent);
    }
}

/// Create a percentage bar for a stage, hidden when `quiet`.
pub fn stage_bar(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(PROGRESS_CHARS),
    );
    pb.set_message(message);
    pb
}

/// Percent complete after `done` of `total` steps.
pub fn fraction_percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (done as f64 / total as f64) * 100.0
}
