//! State-change notifications.
//!
//! Every state object can be handed a [`Notifier`]; whatever renders the
//! state subscribes and re-queries when an event arrives. Events are
//! broadcast, so any number of subscribers may listen, and a subscriber that
//! falls behind loses the oldest events rather than blocking the sender.

use catalog::DogId;
use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

/// How loud a [`Notice`] should be when shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient, user-visible message (a "toast")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, "Error", message)
    }
}

/// Something observable changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    SessionChanged { authenticated: bool },
    FavoritesChanged { count: usize },
    BreedsLoaded { count: usize },
    SearchStarted,
    ResultsReady { total: usize, total_pages: usize },
    PageChanged { page: usize, total_pages: usize },
    MatchReady { dog_id: DogId },
    Notice(Notice),
}

/// Receiving half handed to subscribers
pub type EventReceiver = broadcast::Receiver<StateEvent>;

/// Cloneable sending half of the event channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<StateEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: StateEvent) {
        if self.sender.send(event).is_err() {
            trace!("State event dropped: no subscribers");
        }
    }

    pub fn notice(&self, notice: Notice) {
        self.emit(StateEvent::Notice(notice));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain everything currently queued on a receiver (non-blocking)
pub fn drain(receiver: &mut EventReceiver) -> Vec<StateEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                trace!("Subscriber lagged, skipped {} events", skipped);
            }
            Err(_) => break,
        }
    }
    events
}
