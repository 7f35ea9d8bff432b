//! The vendor queue pattern.
//!
//! Analytics vendors all bootstrap the same way: the page defines a tiny
//! placeholder that appends calls to a buffer, callers invoke it freely
//! before the real script arrives, and the real script drains the buffer in
//! order when it attaches. [`VendorQueue`] is that pattern with the two
//! states made explicit.

use std::sync::Mutex;

type Sink<T> = Box<dyn Fn(T) + Send + Sync>;

enum QueueState<T> {
    /// No sink yet; calls accumulate in order.
    Buffering(Vec<T>),
    /// Real implementation attached; calls route straight through.
    Attached(Sink<T>),
}

/// Append-only call buffer with ordered replay on attach.
///
/// `push` never fails and never blocks on vendor work. `attach` replays the
/// buffer into the sink in insertion order before any later push reaches it,
/// so the vendor observes the exact call sequence the page produced.
///
/// Delivery happens under the queue lock: a sink must not call back into the
/// same queue.
pub struct VendorQueue<T> {
    name: &'static str,
    state: Mutex<QueueState<T>>,
}

impl<T> VendorQueue<T> {
    /// Creates a buffering queue. `name` labels log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(QueueState::Buffering(Vec::new())),
        }
    }

    /// Records a call, buffering it or routing it to the attached sink.
    pub fn push(&self, call: T) {
        let mut state = self.state.lock().expect("vendor queue lock poisoned");
        match &mut *state {
            QueueState::Buffering(buffer) => {
                buffer.push(call);
                log::trace!("{}: buffered call ({} queued)", self.name, buffer.len());
            }
            QueueState::Attached(sink) => sink(call),
        }
    }

    /// Attaches the real sink, replaying buffered calls in order first.
    /// Returns the number of calls replayed.
    ///
    /// Attaching twice replaces the sink without replaying anything; the
    /// buffer was already drained by the first attach.
    pub fn attach<F>(&self, sink: F) -> usize
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let mut state = self.state.lock().expect("vendor queue lock poisoned");
        match std::mem::replace(&mut *state, QueueState::Attached(Box::new(sink))) {
            QueueState::Buffering(buffer) => {
                let replayed = buffer.len();
                if let QueueState::Attached(sink) = &*state {
                    for call in buffer {
                        sink(call);
                    }
                }
                log::debug!("{}: sink attached, {} call(s) replayed", self.name, replayed);
                replayed
            }
            QueueState::Attached(_) => {
                log::warn!("{}: sink attached twice; replacing", self.name);
                0
            }
        }
    }

    /// Whether the real sink has attached.
    pub fn is_attached(&self) -> bool {
        matches!(
            &*self.state.lock().expect("vendor queue lock poisoned"),
            QueueState::Attached(_)
        )
    }

    /// Calls currently buffered (zero once attached).
    pub fn buffered_len(&self) -> usize {
        match &*self.state.lock().expect("vendor queue lock poisoned") {
            QueueState::Buffering(buffer) => buffer.len(),
            QueueState::Attached(_) => 0,
        }
    }
}

impl<T: Clone> VendorQueue<T> {
    /// Snapshot of the buffered calls, in insertion order.
    pub fn buffered(&self) -> Vec<T> {
        match &*self.state.lock().expect("vendor queue lock poisoned") {
            QueueState::Buffering(buffer) => buffer.clone(),
            QueueState::Attached(_) => Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for VendorQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorQueue")
            .field("name", &self.name)
            .field("attached", &self.is_attached())
            .field("buffered", &self.buffered_len())
            .finish()
    }
}
