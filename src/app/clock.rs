use chrono::Local;

use crate::scene::local_hour;

/// Source of the wall-clock hour used to pick the scene phase.
pub trait Clock: Send {
    fn local_hour(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> f64 {
        local_hour(&Local::now())
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn local_hour(&self) -> f64 {
        self.0
    }
}
