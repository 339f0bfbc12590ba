//! Change notifications and disposable subscriptions.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::BufferId;

/// One edit of a buffer region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferChange {
    /// Text removed from the region.
    pub old_text: String,
    /// Text inserted into the region.
    pub new_text: String,
    /// Character just before the region (None at buffer start).
    pub prev_char: Option<char>,
    /// Character just after the region (None at buffer end).
    pub next_char: Option<char>,
}

impl BufferChange {
    /// Change with no surrounding context, e.g. a full text replacement.
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
            prev_char: None,
            next_char: None,
        }
    }

    /// Attach the characters surrounding the edited region.
    pub fn with_context(mut self, prev_char: Option<char>, next_char: Option<char>) -> Self {
        self.prev_char = prev_char;
        self.next_char = next_char;
        self
    }
}

/// Handle that releases a subscription. Cloning shares the same subscription.
///
/// Disposing more than once is harmless.
#[derive(Debug, Clone, Default)]
pub struct Disposable {
    disposed: Rc<Cell<bool>>,
}

impl Disposable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.set(true);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Receiving end of a buffer's change notifications.
#[derive(Debug)]
pub struct Subscription {
    buffer: BufferId,
    receiver: Option<Receiver<BufferChange>>,
    handle: Disposable,
}

impl Subscription {
    /// Buffer this subscription listens to.
    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    /// Handle that releases this subscription.
    pub fn disposable(&self) -> Disposable {
        self.handle.clone()
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
        self.receiver = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }

    /// Take all queued notifications (non-blocking).
    ///
    /// Returns nothing once disposed, including notifications queued before
    /// disposal.
    pub fn drain(&mut self) -> Vec<BufferChange> {
        if self.handle.is_disposed() {
            self.receiver = None;
            return Vec::new();
        }
        match &self.receiver {
            Some(receiver) => receiver.try_iter().collect(),
            None => Vec::new(),
        }
    }
}

/// Sending side, owned by a buffer.
#[derive(Debug, Default)]
pub struct ChangeEmitter {
    listeners: Vec<(Sender<BufferChange>, Disposable)>,
}

impl ChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener for `buffer`.
    pub fn subscribe(&mut self, buffer: BufferId) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let handle = Disposable::new();
        self.listeners.push((tx, handle.clone()));
        Subscription {
            buffer,
            receiver: Some(rx),
            handle,
        }
    }

    /// Deliver a change to every live listener, pruning disposed ones.
    pub fn emit(&mut self, change: &BufferChange) {
        self.listeners
            .retain(|(tx, handle)| !handle.is_disposed() && tx.send(change.clone()).is_ok());
    }

    /// Check if any listener is still subscribed.
    pub fn has_listeners(&self) -> bool {
        self.listeners
            .iter()
            .any(|(_, handle)| !handle.is_disposed())
    }
}
