use std::time::Duration;

use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};

use super::events::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashState {
    Idle,
    Armed,
    Active,
    Expired,
}

#[derive(Debug)]
struct FlashTimers {
    activate: JoinHandle<()>,
    expire: JoinHandle<()>,
}

impl FlashTimers {
    fn abort(&self) {
        self.activate.abort();
        self.expire.abort();
    }
}

/// One-shot beacon flash: armed, then active, then expired.
///
/// At most one timer pair is ever pending. Arming aborts the previous pair
/// first, and every timer event carries the generation it was armed for so a
/// timer that fired just before being aborted is recognised as stale.
#[derive(Debug)]
pub struct BeaconFlash {
    state: FlashState,
    generation: u64,
    timers: Option<FlashTimers>,
}

impl Default for BeaconFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl BeaconFlash {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FlashState::Idle,
            generation: 0,
            timers: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> FlashState {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timer pairs that can still deliver an event.
    #[must_use]
    pub fn pending_timer_pairs(&self) -> usize {
        self.timers
            .iter()
            .filter(|timers| !timers.expire.is_finished())
            .count()
    }

    pub fn arm(&mut self, tx: &mpsc::Sender<AppEvent>, delay: Duration, duration: Duration) -> u64 {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        let activate_tx = tx.clone();
        let activate = tokio::spawn(async move {
            sleep(delay).await;
            let _ = activate_tx.send(AppEvent::FlashActivate(generation)).await;
        });
        let expire_tx = tx.clone();
        let expire = tokio::spawn(async move {
            sleep(delay + duration).await;
            let _ = expire_tx.send(AppEvent::FlashExpire(generation)).await;
        });

        self.timers = Some(FlashTimers { activate, expire });
        self.state = FlashState::Armed;
        generation
    }

    /// Aborts pending timers. The state is left as is.
    pub fn cancel(&mut self) {
        if let Some(timers) = self.timers.take() {
            timers.abort();
        }
    }

    /// `false` for a stale generation or an out-of-order event.
    pub fn activate(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != FlashState::Armed {
            return false;
        }
        self.state = FlashState::Active;
        true
    }

    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation
            || !matches!(self.state, FlashState::Armed | FlashState::Active)
        {
            return false;
        }
        self.state = FlashState::Expired;
        self.timers = None;
        true
    }
}

impl Drop for BeaconFlash {
    fn drop(&mut self) {
        self.cancel();
    }
}
