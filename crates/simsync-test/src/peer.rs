//! A loopback telemetry peer
//!
//! Serves the line protocol over an in-memory duplex stream, with
//! adjustable report values and an online switch for exercising the
//! client's reconnect path.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

use simsync_telemetry::{Connect, REQUEST_TOKEN};

/// Telemetry values the peer reports; adjustable while serving
#[derive(Clone, Copy, Debug)]
pub struct PeerReport {
    pub bus_speed_kph: f32,
    pub schedule_active: bool,
}

/// In-memory telemetry peer; clones share one peer
#[derive(Clone)]
pub struct LoopbackPeer {
    report: Arc<RwLock<PeerReport>>,
    online: Arc<RwLock<bool>>,
}

impl LoopbackPeer {
    pub fn new() -> Self {
        LoopbackPeer {
            report: Arc::new(RwLock::new(PeerReport {
                bus_speed_kph: 0.0,
                schedule_active: false,
            })),
            online: Arc::new(RwLock::new(true)),
        }
    }

    pub fn set_report(&self, bus_speed_kph: f32, schedule_active: bool) {
        *self.report.write() = PeerReport {
            bus_speed_kph,
            schedule_active,
        };
    }

    /// Offline closes the current channel on the next request and makes
    /// new connects wait until the peer comes back
    pub fn set_online(&self, online: bool) {
        *self.online.write() = online;
    }

    pub fn connector(&self) -> LoopbackConnector {
        LoopbackConnector { peer: self.clone() }
    }
}

impl Default for LoopbackPeer {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side connector for the loopback peer
pub struct LoopbackConnector {
    peer: LoopbackPeer,
}

impl Connect for LoopbackConnector {
    type Stream = DuplexStream;

    fn connect(&mut self) -> impl Future<Output = io::Result<DuplexStream>> + Send {
        let peer = self.peer.clone();
        async move {
            while !*peer.online.read() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }

            let (client_end, server_end) = tokio::io::duplex(1024);
            tokio::spawn(serve(peer, server_end));
            Ok(client_end)
        }
    }
}

async fn serve(peer: LoopbackPeer, stream: DuplexStream) {
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let mut request = String::new();

    loop {
        request.clear();
        match reader.read_line(&mut request).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if !*peer.online.read() || request.trim_end() != REQUEST_TOKEN {
            return;
        }

        let report = *peer.report.read();
        let line = format!("{}*{}\n", report.bus_speed_kph, report.schedule_active as u8);
        if write_half.write_all(line.as_bytes()).await.is_err() {
            return;
        }
        let _ = write_half.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simsync_core::TelemetryHandle;
    use simsync_telemetry::TelemetryClient;
    use tokio::sync::watch;

    async fn wait_for(mut predicate: impl FnMut() -> bool) {
        for _ in 0..10_000 {
            if predicate() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_tracks_peer_report() {
        let peer = LoopbackPeer::new();
        peer.set_report(42.5, true);

        let handle = TelemetryHandle::new();
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(TelemetryClient::new(peer.connector(), handle.clone()).run(rx));

        wait_for(|| handle.snapshot().bus_speed_kph == 42.5).await;
        assert!(handle.snapshot().plugin_active);
        assert!(handle.snapshot().schedule_active);

        peer.set_report(0.0, false);
        wait_for(|| handle.snapshot().bus_speed_kph == 0.0).await;

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_survives_peer_outage() {
        let peer = LoopbackPeer::new();
        peer.set_report(10.0, false);

        let handle = TelemetryHandle::new();
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(TelemetryClient::new(peer.connector(), handle.clone()).run(rx));

        wait_for(|| handle.snapshot().plugin_active).await;

        peer.set_online(false);
        wait_for(|| !handle.snapshot().plugin_active).await;

        peer.set_online(true);
        peer.set_report(30.0, true);
        wait_for(|| handle.snapshot().bus_speed_kph == 30.0).await;

        tx.send(true).unwrap();
        task.await.unwrap();
    }
}
