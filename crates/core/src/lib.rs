#![forbid(unsafe_code)]

pub mod countdown;
pub mod defaults;
pub mod model;
pub mod time;
pub mod transfer;

pub use countdown::{Countdown, TickOutcome};
pub use time::Clock;
