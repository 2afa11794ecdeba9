//! Forwarding buffer
//!
//! Bounded FIFO between request handlers and the relay loop. Pushing into a
//! full buffer waits for the relay to free a slot; nothing is ever dropped.

use std::num::NonZeroUsize;

use async_channel::{bounded, Receiver, Sender};
use contracts::CanonicalLine;
use tracing::trace;

use crate::error::BufferClosed;

/// Constructor for the producer/consumer pair
pub struct ForwardingBuffer;

impl ForwardingBuffer {
    /// Create a buffer holding at most `capacity` lines
    pub fn bounded(capacity: NonZeroUsize) -> (LineProducer, LineConsumer) {
        let (tx, rx) = bounded(capacity.get());
        (LineProducer { tx }, LineConsumer { rx })
    }
}

/// Producer side, cloned into every request handler
///
/// The buffer closes once every producer has been dropped; the consumer then
/// drains what is left and stops.
#[derive(Debug, Clone)]
pub struct LineProducer {
    tx: Sender<CanonicalLine>,
}

impl LineProducer {
    /// Push one line, waiting while the buffer is full
    ///
    /// # Errors
    /// Returns `BufferClosed` if the consumer is gone.
    pub async fn push(&self, line: CanonicalLine) -> Result<(), BufferClosed> {
        self.tx.send(line).await.map_err(|_| BufferClosed)
    }

    /// Push a batch in order, returning how many lines were pushed
    ///
    /// An empty batch returns immediately without touching the buffer.
    pub async fn push_all(&self, lines: Vec<CanonicalLine>) -> Result<usize, BufferClosed> {
        let count = lines.len();
        for line in lines {
            self.push(line).await?;
        }
        if count > 0 {
            trace!(count, queued = self.tx.len(), "lines buffered");
        }
        Ok(count)
    }

    /// Lines currently waiting
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Check whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Maximum number of waiting lines
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(usize::MAX)
    }

    /// Check whether the consumer is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the relay loop
#[derive(Debug)]
pub struct LineConsumer {
    rx: Receiver<CanonicalLine>,
}

impl LineConsumer {
    /// Take the oldest line, waiting while the buffer is empty
    ///
    /// Returns `None` once every producer is dropped and the buffer is drained.
    pub async fn pop(&self) -> Option<CanonicalLine> {
        self.rx.recv().await.ok()
    }

    /// Lines currently waiting
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Check whether every producer has been dropped
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}
