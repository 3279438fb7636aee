/// Progress bar template shared by all long-running stages
pub const PROGRESS_TEMPLATE: &str = "[{bar:40.green/blue}] {pos}/{len}% {msg}";

/// Glyphs used to draw partial progress cells
pub const PROGRESS_CHARS: &str = "▉▊▋▌▍▎▏ ";
