//! IPC server for the Timebox daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for the six timer operations and status
//! - Integration with SessionController for command execution

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::types::{IpcRequest, IpcResponse, ResponseData, StartParams};

use super::timer::SessionController;

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
pub const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// The client closed the connection without sending anything
    #[error("Connection closed by client")]
    ConnectionClosed,

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Accepts connections forever, handling each one on its own task.
    ///
    /// # Errors
    ///
    /// Returns an error only if the listener itself fails.
    pub async fn serve(&self, handler: Arc<RequestHandler>) -> Result<()> {
        loop {
            let stream = self.accept().await?;
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &handler).await {
                    warn!("IPC connection failed: {:#}", e);
                }
            });
        }
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE + 1];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            return Err(IpcError::ConnectionClosed.into());
        }
        if n > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge.into());
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Reads one request, answers it, and closes the connection.
async fn handle_connection(mut stream: UnixStream, handler: &RequestHandler) -> Result<()> {
    let response = match IpcServer::receive_request(&mut stream).await {
        Ok(request) => {
            debug!(?request, "IPC request received");
            handler.handle(request).await
        }
        Err(e) => {
            if matches!(e.downcast_ref::<IpcError>(), Some(IpcError::ConnectionClosed)) {
                return Ok(());
            }
            IpcResponse::error(format!("{:#}", e))
        }
    };
    IpcServer::send_response(&mut stream, &response).await
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to SessionController.
pub struct RequestHandler {
    /// Shared reference to the session controller
    controller: Arc<Mutex<SessionController>>,
}

impl RequestHandler {
    /// Creates a new request handler with the given controller.
    pub fn new(controller: Arc<Mutex<SessionController>>) -> Self {
        Self { controller }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start { params } => self.handle_start(params).await,
            IpcRequest::Pause => self.handle_pause().await,
            IpcRequest::Resume => self.handle_resume().await,
            IpcRequest::Reset => self.handle_reset().await,
            IpcRequest::Skip => self.handle_skip().await,
            IpcRequest::Status => self.handle_status().await,
        }
    }

    /// Handles the start command.
    async fn handle_start(&self, params: StartParams) -> IpcResponse {
        let mut controller = self.controller.lock().await;

        let config = params.apply_to(controller.config());
        if let Err(e) = config.validate() {
            return IpcResponse::error(e.to_string());
        }

        if params.no_restart.unwrap_or(false) {
            let previous = controller.config().clone();
            controller.update_config(config);
            if !controller.start_if_idle() {
                controller.update_config(previous);
                return IpcResponse::error(
                    "Timer is already running (omit --no-restart to restart it)",
                );
            }
        } else {
            controller.update_config(config);
            controller.start();
        }

        let message = format!(
            "{} started ({})",
            controller.mode(),
            controller.remaining_display()
        );
        IpcResponse::success(message, Some(snapshot(&controller)))
    }

    /// Handles the pause command.
    async fn handle_pause(&self) -> IpcResponse {
        let mut controller = self.controller.lock().await;
        let was_running = controller.is_running();
        controller.pause();

        let message = if was_running {
            "Timer paused"
        } else {
            "Timer is already paused"
        };
        IpcResponse::success(message, Some(snapshot(&controller)))
    }

    /// Handles the resume command.
    async fn handle_resume(&self) -> IpcResponse {
        let mut controller = self.controller.lock().await;

        if controller.resume() {
            IpcResponse::success("Timer resumed", Some(snapshot(&controller)))
        } else {
            IpcResponse::error("Nothing to resume; start a session first")
        }
    }

    /// Handles the reset command.
    async fn handle_reset(&self) -> IpcResponse {
        let mut controller = self.controller.lock().await;
        controller.reset();

        IpcResponse::success("Timer reset", Some(snapshot(&controller)))
    }

    /// Handles the skip command.
    async fn handle_skip(&self) -> IpcResponse {
        let mut controller = self.controller.lock().await;
        let transition = controller.skip();

        let message = format!(
            "Skipped {}; {} started",
            transition.finished, transition.next
        );
        IpcResponse::success(message, Some(snapshot(&controller)))
    }

    /// Handles the status command.
    async fn handle_status(&self) -> IpcResponse {
        let controller = self.controller.lock().await;

        IpcResponse::success("", Some(snapshot(&controller)))
    }
}

fn snapshot(controller: &SessionController) -> ResponseData {
    ResponseData::from_timer_state(controller.state(), controller.config())
}

// ============================================================================
// Tests
// ============================================================================
