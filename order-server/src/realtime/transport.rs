//! Transport layer for the realtime hub
//!
//! Wire format: `[frame_type u8][len u32 LE][json payload]` — the same
//! frame shape on TCP and in-process. The in-process transport exists so
//! the broadcast path can be exercised without sockets.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, mpsc};

use crate::utils::AppError;
use shared::realtime::{FrameType, HubFrame};

/// Read one frame from a stream
pub async fn read_frame_from<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<HubFrame, AppError> {
    // Read frame type (1 byte)
    let mut type_buf = [0u8; 1];
    reader
        .read_exact(&mut type_buf)
        .await
        .map_err(|e| AppError::internal(format!("Read type failed: {}", e)))?;

    let frame_type =
        FrameType::try_from(type_buf[0]).map_err(|_| AppError::invalid("Invalid frame type"))?;

    // Read payload length (4 bytes)
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| AppError::internal(format!("Read len failed: {}", e)))?;

    let len = u32::from_le_bytes(len_buf) as usize;

    // Read payload
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| AppError::internal(format!("Read payload failed: {}", e)))?;

    Ok(HubFrame::new(frame_type, payload))
}

/// Write one frame to a stream
pub async fn write_frame_to<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    frame: &HubFrame,
) -> Result<(), AppError> {
    let mut data = Vec::with_capacity(5 + frame.payload.len());
    data.push(frame.frame_type as u8);
    data.extend_from_slice(&(frame.payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&frame.payload);

    writer
        .write_all(&data)
        .await
        .map_err(|e| AppError::internal(format!("Write failed: {}", e)))?;
    Ok(())
}

// ========== TCP Transport ==========

/// TCP transport implementation
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    /// Connect to a hub TCP listener (client side)
    pub async fn connect(addr: &str) -> Result<Self, AppError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| AppError::internal(format!("TCP connect failed: {}", e)))?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub async fn read_frame(&self) -> Result<HubFrame, AppError> {
        let mut reader = self.reader.lock().await;
        read_frame_from(&mut *reader).await
    }

    pub async fn write_frame(&self, frame: &HubFrame) -> Result<(), AppError> {
        let mut writer = self.writer.lock().await;
        write_frame_to(&mut *writer, frame).await
    }
}

// ========== Memory Transport (In-Process) ==========

/// In-process transport for same-process subscribers and tests
///
/// Receives frames from the hub over the same per-connection channel the
/// TCP path uses, so ordering semantics are identical.
#[derive(Debug)]
pub struct MemoryTransport {
    conn_id: String,
    rx: Mutex<mpsc::Receiver<HubFrame>>,
}

impl MemoryTransport {
    pub(crate) fn new(conn_id: String, rx: mpsc::Receiver<HubFrame>) -> Self {
        Self {
            conn_id,
            rx: Mutex::new(rx),
        }
    }

    /// Connection id for subscribe/unsubscribe calls against the hub
    pub fn connection_id(&self) -> &str {
        &self.conn_id
    }

    /// Receive the next frame (None when the hub dropped the connection)
    pub async fn read_frame(&self) -> Option<HubFrame> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Non-blocking receive, for asserting that nothing was delivered
    pub fn try_read_frame(&self) -> Option<HubFrame> {
        let mut rx = self.rx.try_lock().ok()?;
        rx.try_recv().ok()
    }
}
