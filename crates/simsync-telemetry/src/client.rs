//! The self-healing telemetry client
//!
//! A single-purpose background loop that never terminates on failure.
//! Any I/O error (write, flush, read, or a closed channel) resets the
//! machine to Disconnected and the whole attempt restarts, including a
//! fresh connect. Failures are local state resets, never panics and
//! never errors returned to the caller.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use simsync_core::TelemetryHandle;

use crate::connector::Connect;
use crate::parse::{parse_response, REQUEST_TOKEN};

/// Client state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Tuning knobs for the client loop
///
/// `connect_timeout: None` keeps the connect-forever policy; bounding
/// it is deliberate configuration, not an accident of the blocking
/// call.
#[derive(Clone, Copy, Debug)]
pub struct ClientConfig {
    /// Interval between telemetry requests while connected
    pub request_interval: Duration,
    /// Pause before retrying after a failed connect attempt
    pub reconnect_delay: Duration,
    /// Optional bound on one connect attempt
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_interval: Duration::from_secs(1),
            reconnect_delay: Duration::from_secs(1),
            connect_timeout: None,
        }
    }
}

/// Best-effort client for the optional telemetry peer
pub struct TelemetryClient<C: Connect> {
    connector: C,
    handle: TelemetryHandle,
    config: ClientConfig,
    state: watch::Sender<ClientState>,
}

impl<C: Connect> TelemetryClient<C> {
    pub fn new(connector: C, handle: TelemetryHandle) -> Self {
        Self::with_config(connector, handle, ClientConfig::default())
    }

    pub fn with_config(connector: C, handle: TelemetryHandle, config: ClientConfig) -> Self {
        let (state, _) = watch::channel(ClientState::Disconnected);
        TelemetryClient {
            connector,
            handle,
            config,
            state,
        }
    }

    /// Observe the state machine; the receiver stays valid for the
    /// whole `run`
    pub fn states(&self) -> watch::Receiver<ClientState> {
        self.state.subscribe()
    }

    /// Drive the client until the shutdown signal fires.
    ///
    /// Expected to run for the lifetime of the process; the signal is
    /// the one deliberate way out.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            self.state.send_replace(ClientState::Connecting);
            self.handle.set_plugin_active(false);

            let stream = tokio::select! {
                result = Self::connect_once(&mut self.connector, self.config.connect_timeout) => {
                    match result {
                        Ok(stream) => stream,
                        Err(error) => {
                            tracing::debug!(%error, "telemetry connect failed");
                            self.state.send_replace(ClientState::Disconnected);
                            tokio::select! {
                                _ = tokio::time::sleep(self.config.reconnect_delay) => continue,
                                _ = shutdown.changed() => return,
                            }
                        }
                    }
                }
                _ = shutdown.changed() => return,
            };

            self.state.send_replace(ClientState::Connected);
            self.handle.set_plugin_active(true);
            tracing::info!("telemetry peer connected");

            if self.serve(stream, &mut shutdown).await {
                return;
            }

            // Any I/O failure lands here: reset and start over
            self.state.send_replace(ClientState::Disconnected);
            self.handle.set_plugin_active(false);
            tracing::info!("telemetry peer lost, reconnecting");
        }
    }

    async fn connect_once(
        connector: &mut C,
        connect_timeout: Option<Duration>,
    ) -> io::Result<C::Stream> {
        match connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connector.connect())
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?,
            None => connector.connect().await,
        }
    }

    /// Connected request/response loop. Returns true when shutdown was
    /// requested, false on any I/O failure.
    async fn serve(&mut self, stream: C::Stream, shutdown: &mut watch::Receiver<bool>) -> bool {
        let (read_half, mut write_half) = tokio::io::split(stream);
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();

        loop {
            if write_half.write_all(REQUEST_TOKEN.as_bytes()).await.is_err() {
                return false;
            }
            if write_half.write_all(b"\n").await.is_err() {
                return false;
            }
            if write_half.flush().await.is_err() {
                return false;
            }

            line.clear();
            let read = tokio::select! {
                read = reader.read_line(&mut line) => read,
                _ = shutdown.changed() => return true,
            };

            match read {
                // Peer closed the channel
                Ok(0) => return false,
                Ok(_) => match parse_response(line.trim_end()) {
                    Some((speed, schedule)) => self.handle.record(speed, schedule),
                    // Malformed response: previous snapshot stays as-is
                    None => tracing::debug!(line = line.trim_end(), "unparseable telemetry"),
                },
                Err(_) => return false,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.request_interval) => {}
                _ = shutdown.changed() => return true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;

    use tokio::io::DuplexStream;

    /// One scripted connection per entry; each line is sent in reply to
    /// one request. Script exhaustion closes the channel. With no
    /// connections left, `connect` pends forever.
    struct ScriptConnector {
        connections: VecDeque<Vec<String>>,
    }

    impl ScriptConnector {
        fn new(connections: Vec<Vec<&str>>) -> Self {
            ScriptConnector {
                connections: connections
                    .into_iter()
                    .map(|lines| lines.into_iter().map(String::from).collect())
                    .collect(),
            }
        }
    }

    impl Connect for ScriptConnector {
        type Stream = DuplexStream;

        fn connect(&mut self) -> impl Future<Output = io::Result<DuplexStream>> + Send {
            let script = self.connections.pop_front();
            async move {
                let Some(script) = script else {
                    return std::future::pending().await;
                };

                let (client_end, server_end) = tokio::io::duplex(1024);
                tokio::spawn(serve_peer(server_end, script));
                Ok(client_end)
            }
        }
    }

    async fn serve_peer(server_end: DuplexStream, script: Vec<String>) {
        let (read_half, mut write_half) = tokio::io::split(server_end);
        let mut reader = BufReader::new(read_half);
        let mut request = String::new();

        for response in script {
            request.clear();
            if reader.read_line(&mut request).await.unwrap_or(0) == 0 {
                return;
            }
            assert_eq!(request.trim_end(), REQUEST_TOKEN);

            write_half.write_all(response.as_bytes()).await.ok();
            write_half.write_all(b"\n").await.ok();
            write_half.flush().await.ok();
        }
        // Dropping the stream closes the channel
    }

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
    async fn test_response_overwrites_snapshot() {
        let handle = TelemetryHandle::new();
        let connector = ScriptConnector::new(vec![vec!["42.5*1"]]);
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(TelemetryClient::new(connector, handle.clone()).run(rx));

        wait_for(|| handle.snapshot().bus_speed_kph == 42.5).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.plugin_active);
        assert!(snapshot.schedule_active);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_response_keeps_previous_snapshot() {
        let handle = TelemetryHandle::new();
        handle.record(42.5, true);
        handle.set_plugin_active(false);

        let connector = ScriptConnector::new(vec![vec!["bad*1"]]);
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(TelemetryClient::new(connector, handle.clone()).run(rx));

        // Connection comes up, serves the bad line, then closes
        wait_for(|| handle.snapshot().plugin_active).await;
        wait_for(|| !handle.snapshot().plugin_active).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.bus_speed_kph, 42.5);
        assert!(snapshot.schedule_active);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnects_after_channel_loss() {
        let handle = TelemetryHandle::new();
        let connector = ScriptConnector::new(vec![vec!["10*0"], vec!["20*1"]]);
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(TelemetryClient::new(connector, handle.clone()).run(rx));

        wait_for(|| handle.snapshot().bus_speed_kph == 20.0).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.plugin_active);
        assert!(snapshot.schedule_active);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_close_resets_without_panic() {
        let handle = TelemetryHandle::new();
        let connector = ScriptConnector::new(vec![vec![], vec!["5*0"]]);
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(TelemetryClient::new(connector, handle.clone()).run(rx));

        wait_for(|| handle.snapshot().bus_speed_kph == 5.0).await;

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_machine_observable_while_running() {
        let handle = TelemetryHandle::new();
        let connector = ScriptConnector::new(vec![vec!["42.5*1"]]);
        let client = TelemetryClient::new(connector, handle.clone());
        let states = client.states();
        assert_eq!(*states.borrow(), ClientState::Disconnected);

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(client.run(rx));

        wait_for(|| *states.borrow() == ClientState::Connected).await;

        // Script exhaustion closes the channel; the next connect pends,
        // so the machine settles in Connecting
        wait_for(|| *states.borrow() == ClientState::Connecting).await;
        assert!(!handle.snapshot().plugin_active);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_connect() {
        let handle = TelemetryHandle::new();
        // No scripted connections: connect pends forever
        let connector = ScriptConnector::new(vec![]);
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(TelemetryClient::new(connector, handle.clone()).run(rx));

        tx.send(true).unwrap();
        task.await.unwrap();
        assert!(!handle.snapshot().plugin_active);
    }
}
