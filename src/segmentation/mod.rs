pub mod algorithm;
pub mod config;
pub mod reading_time;
pub mod truncate;

pub use algorithm::{is_separator, tokenize, Document, Segment, SegmentKind, Segments, WordList};
pub use config::TextLimits;
pub use reading_time::calculate_reading_time;
pub use truncate::{count_words, truncate, Truncation};
