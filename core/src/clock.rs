//! Simulation clock: tick count, speed control and pause.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    pub speed:        SimSpeed,
    pub paused:       bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            current_tick: 0,
            speed: SimSpeed::Normal,
            paused: false,
        }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    pub fn set_speed(&mut self, speed: SimSpeed) {
        self.speed = speed;
    }

    /// Voyage steps applied per timer firing.
    pub fn ticks_per_step(&self) -> u32 {
        match self.speed {
            SimSpeed::Normal => 1,
            SimSpeed::Fast   => 2,
            SimSpeed::Turbo  => 4,
        }
    }
}

impl Default for SimClock {
    fn default() -> Self { Self::new() }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimSpeed {
    Normal, // 1 step per firing (~8 s voyage at 80 ms)
    Fast,   // 2 steps per firing
    Turbo,  // 4 steps per firing
}
