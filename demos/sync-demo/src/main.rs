//! SimSync Demo Application
//!
//! Runs a scripted end-to-end scenario against an in-memory simulator
//! target and an in-memory telemetry peer:
//! - simulator starts, a scene loads with a clock ten minutes behind
//! - the moving-only mode holds the write until the bus moves
//! - the clock is corrected, then the simulator exits

use std::time::Duration;

use chrono::{Duration as TimeDelta, Local};
use tokio::sync::watch;

use simsync_core::{AutoSyncMode, SyncPolicy, TelemetryHandle};
use simsync_memory::{LifecycleMonitor, DEFAULT_PROCESS_NAME};
use simsync_runtime::{Orchestrator, SyncContext};
use simsync_telemetry::{ClientConfig, TelemetryClient};
use simsync_test::{LoopbackPeer, SimTarget};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("SimSync demo: scripted synchronization run");
    println!();

    let target = SimTarget::stopped();
    let peer = LoopbackPeer::new();
    peer.set_report(0.0, false);

    let handle = TelemetryHandle::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client_config = ClientConfig {
        request_interval: Duration::from_millis(100),
        reconnect_delay: Duration::from_millis(100),
        connect_timeout: None,
    };
    let client = TelemetryClient::with_config(peer.connector(), handle.clone(), client_config);
    let telemetry_task = tokio::spawn(client.run(shutdown_rx));

    let policy = SyncPolicy {
        mode: AutoSyncMode::WhenMoving,
        ..SyncPolicy::default()
    };
    let monitor = LifecycleMonitor::new(target.probe(), DEFAULT_PROCESS_NAME);
    let mut orchestrator = Orchestrator::new(monitor, SyncContext::new(policy, handle));

    let steps: &[(&str, &dyn Fn())] = &[
        ("simulator not started yet", &|| {}),
        ("simulator starts, no scene loaded", &|| {
            target.set_running(true);
        }),
        ("scene loads ten minutes behind the wall clock", &|| {
            target.load_scene(Local::now().naive_local() - TimeDelta::minutes(10));
        }),
        ("bus stationary, moving-only mode holds the write", &|| {}),
        ("bus pulls away", &|| peer.set_report(31.5, true)),
        ("clock corrected on this tick", &|| {}),
        ("simulator exits", &|| target.set_running(false)),
    ];

    for (label, apply) in steps {
        apply();
        // Give the telemetry client a round trip before the tick
        tokio::time::sleep(Duration::from_millis(300)).await;

        let status = orchestrator.tick(Local::now().naive_local());
        println!("  {label:52} -> {status}");
    }

    let _ = shutdown_tx.send(true);
    let _ = telemetry_task.await;

    println!();
    println!("done");
}
