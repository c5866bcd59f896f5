use std::{default::Default, time::Duration};

use crate::constants::DEFAULT_CHUNK_PIXELS;

/// Contains Config properties shared by hosts and peers
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How often the session processes inbound events and advances movement
    pub tick_interval: Duration,
    /// How long an avatar takes to walk one cell
    pub step_duration: Duration,
    /// Source pixels carried by each bitmap chunk. Rounded down to an even number.
    pub chunk_pixels: usize,
    /// Capacity of the channel between the tick task and the sender task
    pub outbound_capacity: usize,
    /// Chat lines kept in the session's log
    pub chat_history: usize,
}

impl SessionConfig {
    /// Fraction of a step covered by one tick
    pub fn step_per_tick(&self) -> f32 {
        if self.step_duration.is_zero() {
            return 1.0;
        }
        (self.tick_interval.as_secs_f32() / self.step_duration.as_secs_f32()).min(1.0)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            step_duration: Duration::from_millis(200),
            chunk_pixels: DEFAULT_CHUNK_PIXELS,
            outbound_capacity: 1024,
            chat_history: 64,
        }
    }
}
