//! Recording event sink for asserting on published events.

use std::sync::{Arc, Mutex};

use hangman_core::event::EventSink;

/// A sink that keeps every published event. Clones share the same buffer.
#[derive(Debug)]
pub struct RecordingSink<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> RecordingSink<E> {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: Clone> RecordingSink<E> {
    /// Returns a snapshot of all events published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<E> {
        self.events.lock().unwrap().clone()
    }
}

impl<E> Clone for RecordingSink<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for RecordingSink<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Send> EventSink<E> for RecordingSink<E> {
    fn publish(&self, event: &E) {
        self.events.lock().unwrap().push(event.clone());
    }
}
