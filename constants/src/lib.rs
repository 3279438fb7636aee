pub mod conversion;
pub mod export;
pub mod preview;
pub mod progress;
