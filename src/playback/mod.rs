pub mod controller;
pub mod state;

pub use controller::{PlaybackController, EMPTY_TEXT_MESSAGE, END_OF_TEXT_MESSAGE};
pub use state::{
    PlaybackSnapshot, PlaybackState, PlaybackStatus, TickOutcome, MIN_TICK_DELAY,
};
