pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod geometry;
pub mod resilience;
pub mod scene;

#[cfg(test)]
pub(crate) mod test_support;

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use app::{
    events::{AppEvent, RefreshSignal, forward_refresh_signal},
    host::{HostCommand, HostFrame},
    state::{OrchestratorOptions, SceneOrchestrator},
};
use cli::Cli;
use config::{CONFIG_ENV_VAR, ConfigSource, load_config};
use data::{
    LiveMetricSource, MetricSource,
    sheets::SheetsClient,
    weather::WeatherClient,
};
use scene::SceneRng;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let (config, config_source) = load_config(cli.config.as_deref());

    let mut source = LiveMetricSource::new(SheetsClient::with_base_url(cli.sheet_url.clone()));
    if let Some(at) = cli.coordinates() {
        source = source.with_weather(WeatherClient::with_base_url(cli.weather_url.clone()), at);
    }

    let rng = cli.seed.map_or_else(SceneRng::from_clock, SceneRng::seeded);
    info!(target: "harborlight", seed = rng.seed(), width = cli.width, "harborlight.start");

    let options = OrchestratorOptions {
        viewport_width_px: cli.width,
        refresh_interval_secs: (!cli.one_shot).then_some(cli.refresh_interval),
    };
    let app = SceneOrchestrator::new(source, config, options, rng);

    if cli.one_shot {
        run_once(app).await
    } else {
        run_loop(app, reload_path(&cli, config_source)).await
    }
}

/// Path to re-read on `reload`; `None` means builtins only.
fn reload_path(cli: &Cli, source: ConfigSource) -> Option<PathBuf> {
    match source {
        ConfigSource::File(path) => Some(path),
        ConfigSource::Builtin => cli
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)),
    }
}

async fn run_once<S: MetricSource>(mut app: SceneOrchestrator<S>) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(64);
    tx.send(AppEvent::Bootstrap).await?;

    while let Some(event) = rx.recv().await {
        let failed = matches!(event, AppEvent::FetchFailed(_));
        app.handle_event(event, &tx).await?;
        if failed {
            let reason = app.health().last_error.clone().unwrap_or_default();
            anyhow::bail!("metric fetch failed: {reason}");
        }
        let scene = app
            .drain_frames()
            .into_iter()
            .find(|frame| matches!(frame, HostFrame::Scene(_)));
        if let Some(frame) = scene {
            emit(&frame)?;
            return Ok(());
        }
    }
    Ok(())
}

async fn run_loop<S: MetricSource>(
    mut app: SceneOrchestrator<S>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let refresh = RefreshSignal::new();
    forward_refresh_signal(&refresh, tx.clone());
    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    tx.send(AppEvent::Bootstrap).await?;

    while app.is_running() {
        tokio::select! {
            line = commands.next_line(), if stdin_open => {
                match line.context("reading host command failed")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => dispatch(&line, &refresh, config_path.as_deref(), &tx).await?,
                    None => stdin_open = false,
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx).await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                app.handle_event(AppEvent::Quit, &tx).await?;
            }
        }

        for frame in app.drain_frames() {
            emit(&frame)?;
        }
    }

    info!(target: "harborlight", "harborlight.stop");
    Ok(())
}

async fn dispatch(
    line: &str,
    refresh: &RefreshSignal,
    config_path: Option<&std::path::Path>,
    tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    match line.parse::<HostCommand>() {
        Ok(HostCommand::Refresh) => {
            refresh.emit();
        }
        Ok(HostCommand::Resize(width)) => tx.send(AppEvent::Resize(width)).await?,
        Ok(HostCommand::Reload) => {
            let (config, _) = load_config(config_path);
            tx.send(AppEvent::ConfigReloaded(Box::new(config))).await?;
        }
        Ok(HostCommand::Quit) => tx.send(AppEvent::Quit).await?,
        Err(err) => warn!(target: "harborlight", command = line, error = %err, "host.command=rejected"),
    }
    Ok(())
}

fn emit(frame: &HostFrame) -> Result<()> {
    let line = frame.to_json_line().context("serializing frame failed")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}").context("writing frame failed")?;
    stdout.flush().context("flushing stdout failed")?;
    Ok(())
}
