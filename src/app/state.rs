use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        clock::{Clock, SystemClock},
        events::{AppEvent, schedule_retry, start_refresh_task},
        flash::{BeaconFlash, FlashState},
        host::HostFrame,
    },
    config::SceneConfig,
    data::MetricSource,
    domain::{
        metrics::{MetricSample, RefreshHealth},
        scene::SceneDescriptor,
    },
    resilience::backoff::Backoff,
    scene::{SceneRng, assemble_scene, rescale_for_viewport, resolve_phase},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub viewport_width_px: u32,
    /// `None` disables the periodic refresh task.
    pub refresh_interval_secs: Option<u64>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            viewport_width_px: 390,
            refresh_interval_secs: None,
        }
    }
}

/// Sole owner of scene state.
///
/// Events are handled one at a time; each successful fetch yields exactly one
/// new descriptor, built in full before it replaces the previous one.
pub struct SceneOrchestrator<S: MetricSource> {
    source: Arc<S>,
    config: SceneConfig,
    options: OrchestratorOptions,
    rng: SceneRng,
    clock: Box<dyn Clock>,
    sample: Option<MetricSample>,
    descriptor: Option<SceneDescriptor>,
    viewport_width_px: u32,
    version: u64,
    flash: BeaconFlash,
    backoff: Backoff,
    health: RefreshHealth,
    fetch_in_flight: bool,
    outbox: Vec<HostFrame>,
    running: bool,
}

impl<S: MetricSource> SceneOrchestrator<S> {
    pub fn new(source: S, config: SceneConfig, options: OrchestratorOptions, rng: SceneRng) -> Self {
        Self {
            source: Arc::new(source),
            backoff: Backoff::from_config(&config.refresh),
            config,
            options,
            rng,
            clock: Box::new(SystemClock),
            sample: None,
            descriptor: None,
            viewport_width_px: options.viewport_width_px.max(1),
            version: 0,
            flash: BeaconFlash::new(),
            health: RefreshHealth::default(),
            fetch_in_flight: false,
            outbox: Vec::new(),
            running: true,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn descriptor(&self) -> Option<&SceneDescriptor> {
        self.descriptor.as_ref()
    }

    #[must_use]
    pub fn sample(&self) -> Option<&MetricSample> {
        self.sample.as_ref()
    }

    #[must_use]
    pub fn health(&self) -> &RefreshHealth {
        &self.health
    }

    #[must_use]
    pub fn flash(&self) -> &BeaconFlash {
        &self.flash
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    /// Frames produced since the last call, oldest first.
    pub fn drain_frames(&mut self) -> Vec<HostFrame> {
        std::mem::take(&mut self.outbox)
    }

    pub async fn handle_event(&mut self, event: AppEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                if let Some(secs) = self.options.refresh_interval_secs {
                    start_refresh_task(tx.clone(), secs);
                }
                self.start_fetch(tx).await?;
            }
            AppEvent::RefreshRequested => self.start_fetch(tx).await?,
            AppEvent::Resize(width) => self.resize(width),
            AppEvent::FetchStarted => {
                self.health.mark_attempt();
                debug!(target: "harborlight::app", "metrics.fetch=started");
            }
            AppEvent::FetchSucceeded(sample) => {
                self.fetch_in_flight = false;
                self.health.mark_success();
                self.backoff.reset();
                self.sample = Some(sample);
                self.recompute();
                self.arm_flash(tx);
            }
            AppEvent::FetchFailed(err) => {
                self.fetch_in_flight = false;
                let thresholds = self.config.refresh.freshness();
                let delay = self.backoff.next_delay();
                warn!(
                    target: "harborlight::app",
                    error = %err,
                    retry_in_secs = delay.as_secs(),
                    failures = self.health.consecutive_failures + 1,
                    "metrics.fetch=failed keeping_last_scene"
                );
                self.health.mark_failure(err, &thresholds);
                schedule_retry(tx.clone(), delay);
            }
            AppEvent::FlashActivate(generation) => {
                if self.flash.activate(generation) {
                    self.push_flash(FlashState::Active);
                } else {
                    debug!(target: "harborlight::app", generation, "beacon.flash=stale_activate");
                }
            }
            AppEvent::FlashExpire(generation) => {
                if self.flash.expire(generation) {
                    self.push_flash(FlashState::Expired);
                } else {
                    debug!(target: "harborlight::app", generation, "beacon.flash=stale_expire");
                }
            }
            AppEvent::ConfigReloaded(config) => {
                self.backoff = Backoff::from_config(&config.refresh);
                self.config = *config;
                info!(target: "harborlight::app", "scene_config.applied");
                self.recompute();
            }
            AppEvent::Quit => {
                self.flash.cancel();
                self.running = false;
            }
        }

        Ok(())
    }

    async fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        if self.fetch_in_flight {
            debug!(target: "harborlight::app", "metrics.fetch=skipped in_flight");
            return Ok(());
        }
        self.fetch_in_flight = true;
        tx.send(AppEvent::FetchStarted).await?;

        let source = Arc::clone(&self.source);
        let layout = self.config.sheet.clone();
        let normalizer = self.config.normalizer;
        let tx2 = tx.clone();
        tokio::spawn(async move {
            match source.fetch_sample(&layout, &normalizer).await {
                Ok(sample) => {
                    let _ = tx2.send(AppEvent::FetchSucceeded(sample)).await;
                }
                Err(err) => {
                    let _ = tx2.send(AppEvent::FetchFailed(err.to_string())).await;
                }
            }
        });
        Ok(())
    }

    /// Full rebuild from the current sample; a no-op before the first sample.
    fn recompute(&mut self) {
        let Some(sample) = self.sample else {
            return;
        };
        let phase = resolve_phase(self.clock.local_hour(), &self.config.phase);
        self.version += 1;
        let descriptor = assemble_scene(
            &sample,
            phase,
            self.viewport_width_px,
            self.version,
            &self.config,
            &mut self.rng,
        );
        info!(
            target: "harborlight::app",
            version = descriptor.version,
            phase = descriptor.phase.label(),
            flocks = descriptor.flocks.len(),
            clouds = descriptor.clouds.len(),
            "scene.published"
        );
        self.publish(descriptor);
    }

    fn resize(&mut self, width: u32) {
        if width == 0 || width == self.viewport_width_px {
            return;
        }
        self.viewport_width_px = width;
        let Some(current) = self.descriptor.as_ref() else {
            return;
        };
        let descriptor = rescale_for_viewport(current, width, self.version + 1, &self.config);
        self.version += 1;
        info!(target: "harborlight::app", version = self.version, width, "scene.resized");
        self.publish(descriptor);
    }

    fn publish(&mut self, descriptor: SceneDescriptor) {
        self.outbox.push(HostFrame::Scene(descriptor.clone()));
        self.descriptor = Some(descriptor);
    }

    fn arm_flash(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let beacon = &self.config.beacon;
        let generation = self.flash.arm(
            tx,
            Duration::from_millis(beacon.flash_delay_ms),
            Duration::from_millis(beacon.duration_ms),
        );
        debug!(target: "harborlight::app", generation, "beacon.flash=armed");
        self.push_flash(FlashState::Armed);
    }

    fn push_flash(&mut self, state: FlashState) {
        self.outbox.push(HostFrame::Flash {
            state,
            generation: self.flash.generation(),
        });
    }
}
