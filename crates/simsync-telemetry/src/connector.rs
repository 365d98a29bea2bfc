//! Connecting to the telemetry peer

use std::future::Future;
use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

/// Well-known endpoint name of the in-simulator telemetry plugin
pub const DEFAULT_ENDPOINT: &str = "SimSyncTelemetryPlugin";

/// Opens a duplex byte stream to the telemetry peer.
///
/// Implementations may block until a peer appears (the upstream policy)
/// or surface transient absence as an `Err`; the client retries either
/// way per its configuration.
pub trait Connect: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn connect(&mut self) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

#[cfg(unix)]
pub use unix::UnixSocketConnector;

#[cfg(unix)]
mod unix {
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    use tokio::net::UnixStream;

    use super::Connect;

    /// Connects to a filesystem socket, waiting indefinitely for the
    /// peer to appear
    pub struct UnixSocketConnector {
        path: PathBuf,
        /// Pause between probes while the socket does not exist yet
        probe_interval: Duration,
    }

    impl UnixSocketConnector {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            UnixSocketConnector {
                path: path.into(),
                probe_interval: Duration::from_secs(1),
            }
        }

        /// Socket path for a well-known endpoint name
        pub fn for_endpoint(name: &str) -> Self {
            Self::new(std::env::temp_dir().join(format!("{name}.sock")))
        }

        pub fn probe_interval(mut self, interval: Duration) -> Self {
            self.probe_interval = interval;
            self
        }
    }

    impl Connect for UnixSocketConnector {
        type Stream = UnixStream;

        async fn connect(&mut self) -> io::Result<UnixStream> {
            loop {
                match UnixStream::connect(&self.path).await {
                    Ok(stream) => return Ok(stream),
                    // Peer not up yet; keep probing
                    Err(error)
                        if matches!(
                            error.kind(),
                            io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        tokio::time::sleep(self.probe_interval).await;
                    }
                    Err(error) => return Err(error),
                }
            }
        }
    }
}
