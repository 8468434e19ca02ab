//! Per-actor message queue and wake signal.
//!
//! The mailbox is an append-only FIFO owned by exactly one receiver: only
//! the owning actor scans and removes entries, every other actor may only
//! append through [`deliver`](Mailbox::deliver). Selective receive walks the
//! queue head to tail and removes the first entry matching any pattern;
//! entries that match nothing stay put in their original order.
//!
//! The wake signal is a `tokio::sync::Notify` whose permit survives a
//! notify issued while no receiver is waiting, so an append between "scan
//! found nothing" and "await the signal" can never be lost.

// Layer 1: Standard library imports
use std::collections::VecDeque;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::Notify;

// Layer 3: Internal module imports
use crate::message::Value;
use crate::shape::{is_shaped, Shape};

pub(crate) struct Mailbox {
    queue: Mutex<VecDeque<Value>>,
    signal: Notify,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            signal: Notify::new(),
        }
    }

    /// Append a message and wake the receiver, if any.
    pub(crate) fn deliver(&self, message: Value) {
        self.queue.lock().push_back(message);
        self.signal.notify_one();
    }

    /// Remove and return the first entry matching any of `patterns`,
    /// together with the pattern that matched. Ties within one entry are
    /// broken by pattern order. An empty pattern slice is the wildcard and
    /// takes the queue head.
    pub(crate) fn take_first(&self, patterns: &[Shape]) -> Option<(Shape, Value)> {
        let mut queue = self.queue.lock();
        if patterns.is_empty() {
            return queue.pop_front().map(|message| (Shape::Any, message));
        }
        for index in 0..queue.len() {
            for pattern in patterns {
                let matched = queue
                    .get(index)
                    .map(|message| is_shaped(message, pattern))
                    .unwrap_or(false);
                if matched {
                    if let Some(message) = queue.remove(index) {
                        return Some((pattern.clone(), message));
                    }
                }
            }
        }
        None
    }

    /// Future that resolves at the next delivery (or immediately, if a
    /// delivery already happened since the last wait).
    pub(crate) fn signalled(&self) -> tokio::sync::futures::Notified<'_> {
        self.signal.notified()
    }

    /// Number of queued entries.
    pub(crate) fn len(&self) -> usize {
        self.queue.lock().len()
    }
}
