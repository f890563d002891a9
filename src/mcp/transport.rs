//! In-process duplex transport for MCP.
//!
//! A `Transport` is one end of a cross-wired channel pair: whatever one end
//! sends becomes readable on the other end, in both directions. Messages are
//! newline-delimited JSON lines. Each direction is an unbounded channel, so
//! a large write can never deadlock against a peer that is not yet reading
//! (the classic fixed-capacity pipe hazard).

use crate::error::{NyhetError, Result};
use serde::Serialize;
use tokio::sync::mpsc;

/// One endpoint of an in-process duplex link.
pub struct Transport {
    tx: Option<mpsc::UnboundedSender<String>>,
    rx: mpsc::UnboundedReceiver<String>,
}

impl Transport {
    /// Create a cross-wired pair of endpoints.
    ///
    /// Writes on the first endpoint are readable on the second, and vice
    /// versa. Message boundaries and ordering are preserved per direction.
    pub fn pair() -> (Transport, Transport) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();

        (
            Transport {
                tx: Some(a_tx),
                rx: a_rx,
            },
            Transport {
                tx: Some(b_tx),
                rx: b_rx,
            },
        )
    }

    /// Serialize a message to a single JSON line and send it to the peer.
    pub fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        let line = serde_json::to_string(message)?;
        self.send_line(line)
    }

    /// Send one raw line to the peer.
    pub fn send_line(&self, line: String) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(NyhetError::TransportClosed)?;
        tx.send(line).map_err(|_| NyhetError::TransportClosed)
    }

    /// Receive the next line from the peer.
    ///
    /// Returns `None` once the peer's send half is gone and all buffered
    /// lines have been drained — pending reads end instead of blocking
    /// forever.
    pub async fn recv_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Close the send half. Idempotent.
    ///
    /// The peer drains any buffered lines and then observes end-of-stream.
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// Whether this endpoint's send half has been closed.
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}
