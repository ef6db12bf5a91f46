mod common;

use std::time::Duration;

use common::{ScriptedSource, orchestrator_at, sample};
use harborlight::{
    app::{events::AppEvent, flash::FlashState, host::HostFrame},
    data::FetchError,
    domain::scene::ScenePhase,
};
use tokio::sync::mpsc;

/// Feeds every queued event back into the orchestrator until the channel is idle.
async fn pump(
    app: &mut harborlight::app::state::SceneOrchestrator<ScriptedSource>,
    tx: &mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
    until: impl Fn(&AppEvent) -> bool,
) {
    loop {
        let event = rx.recv().await.expect("event");
        let done = until(&event);
        app.handle_event(event, tx).await.expect("handled");
        if done {
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn bootstrap_fetches_and_publishes_first_scene() {
    let (tx, mut rx) = mpsc::channel(32);
    let mut app = orchestrator_at(17.5, ScriptedSource::new([Ok(sample(0.62, 0.12))]));

    app.handle_event(AppEvent::Bootstrap, &tx).await.expect("bootstrap");
    pump(&mut app, &tx, &mut rx, |event| {
        matches!(event, AppEvent::FetchSucceeded(_))
    })
    .await;

    let descriptor = app.descriptor().expect("first scene");
    assert_eq!(descriptor.phase, ScenePhase::Sunset);
    assert!(descriptor.flocks.is_empty());
    assert!((descriptor.generated_from.sales_ratio() - 0.62).abs() < 1e-12);
    assert!(app.health().is_healthy());
}

#[tokio::test(start_paused = true)]
async fn rapid_refreshes_leave_one_flash_timer_pair() {
    let (tx, mut rx) = mpsc::channel(32);
    let mut app = orchestrator_at(
        12.0,
        ScriptedSource::new([Ok(sample(0.4, 0.6)), Ok(sample(0.7, 0.8))]),
    );

    for _ in 0..2 {
        app.handle_event(AppEvent::RefreshRequested, &tx)
            .await
            .expect("refresh");
        pump(&mut app, &tx, &mut rx, |event| {
            matches!(event, AppEvent::FetchSucceeded(_))
        })
        .await;
    }
    assert_eq!(app.flash().pending_timer_pairs(), 1);
    assert_eq!(app.flash().generation(), 2);
    app.drain_frames();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let mut flash_frames = Vec::new();
    while let Ok(event) = rx.try_recv() {
        app.handle_event(event, &tx).await.expect("handled");
        flash_frames.extend(
            app.drain_frames()
                .into_iter()
                .filter(|frame| matches!(frame, HostFrame::Flash { .. })),
        );
    }

    assert_eq!(
        flash_frames,
        vec![
            HostFrame::Flash {
                state: FlashState::Active,
                generation: 2
            },
            HostFrame::Flash {
                state: FlashState::Expired,
                generation: 2
            },
        ]
    );
    assert_eq!(app.flash().pending_timer_pairs(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_scene_and_retries() {
    let (tx, mut rx) = mpsc::channel(32);
    let mut app = orchestrator_at(
        12.0,
        ScriptedSource::new([
            Ok(sample(0.5, 0.5)),
            Err(FetchError::NoKpiRows),
            Ok(sample(0.9, 0.5)),
        ]),
    );

    app.handle_event(AppEvent::RefreshRequested, &tx)
        .await
        .expect("refresh");
    pump(&mut app, &tx, &mut rx, |event| {
        matches!(event, AppEvent::FetchSucceeded(_))
    })
    .await;
    let kept = app.descriptor().cloned().expect("scene");

    app.handle_event(AppEvent::RefreshRequested, &tx)
        .await
        .expect("refresh");
    pump(&mut app, &tx, &mut rx, |event| {
        matches!(event, AppEvent::FetchFailed(_))
    })
    .await;
    assert_eq!(app.descriptor(), Some(&kept));
    assert_eq!(app.health().consecutive_failures, 1);

    // the backoff retry fires on its own and recovers
    pump(&mut app, &tx, &mut rx, |event| {
        matches!(event, AppEvent::FetchSucceeded(_))
    })
    .await;
    let recovered = app.descriptor().expect("scene");
    assert!(recovered.version > kept.version);
    assert!((recovered.generated_from.sales_ratio() - 0.9).abs() < 1e-12);
    assert!(app.health().is_healthy());
}

#[tokio::test(start_paused = true)]
async fn resize_never_refetches_or_flashes() {
    let (tx, mut rx) = mpsc::channel(32);
    let mut app = orchestrator_at(21.0, ScriptedSource::new([Ok(sample(0.5, 0.9))]));
    app.handle_event(AppEvent::RefreshRequested, &tx)
        .await
        .expect("refresh");
    pump(&mut app, &tx, &mut rx, |event| {
        matches!(event, AppEvent::FetchSucceeded(_))
    })
    .await;
    app.drain_frames();
    let generation = app.flash().generation();

    for width in [320, 640, 1024] {
        app.handle_event(AppEvent::Resize(width), &tx)
            .await
            .expect("resize");
    }

    let frames = app.drain_frames();
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|frame| matches!(frame, HostFrame::Scene(_))));
    assert_eq!(app.flash().generation(), generation);
    assert!(!app.fetch_in_flight());
    assert_eq!(app.descriptor().map(|d| d.phase), Some(ScenePhase::Night));
}
