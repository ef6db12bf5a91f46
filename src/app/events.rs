use std::time::Duration;

use rand::Rng;
use tokio::{
    sync::{broadcast, mpsc},
    time::sleep,
};

use crate::{config::SceneConfig, domain::metrics::MetricSample};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    RefreshRequested,
    Resize(u32),
    FetchStarted,
    FetchSucceeded(MetricSample),
    FetchFailed(String),
    FlashActivate(u64),
    FlashExpire(u64),
    ConfigReloaded(Box<SceneConfig>),
    Quit,
}

/// No-payload "please recompute" broadcast any control may emit.
///
/// Subscribers unsubscribe by dropping their receiver.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: broadcast::Sender<()>,
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers saw the signal.
    pub fn emit(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

/// Turns refresh broadcasts into orchestrator events until either side closes.
pub fn forward_refresh_signal(signal: &RefreshSignal, tx: mpsc::Sender<AppEvent>) {
    let mut rx = signal.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    if tx.send(AppEvent::RefreshRequested).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

pub fn start_refresh_task(tx: mpsc::Sender<AppEvent>, refresh_secs: u64) {
    tokio::spawn(async move {
        let base = refresh_secs.max(10);
        loop {
            sleep(jittered(base)).await;
            if tx.send(AppEvent::RefreshRequested).await.is_err() {
                break;
            }
        }
    });
}

pub fn schedule_retry(tx: mpsc::Sender<AppEvent>, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay.max(Duration::from_secs(1))).await;
        let _ = tx.send(AppEvent::RefreshRequested).await;
    });
}

/// `base` seconds, give or take ten percent.
#[allow(clippy::cast_precision_loss)]
fn jittered(base_secs: u64) -> Duration {
    let jitter = rand::rng().random_range(-0.1_f64..0.1_f64);
    Duration::from_secs_f64(((base_secs as f64) * (1.0 + jitter)).max(1.0))
}
