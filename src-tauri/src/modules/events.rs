// Engine-originated events and the per-tab subscription hub.
// Engines may fire callbacks on any thread; they only enqueue here. The shell
// drains the queue on the UI thread before touching tab or window state.

use std::collections::HashSet;
use std::fmt;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use url::Url;

use crate::state::TabId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FullScreenDirection {
    Enter,
    Exit,
}

/// A page asked to enter or leave full screen.
///
/// The page's full-screen call stays pending until the request is accepted.
/// Dropping an unaccepted request accepts it.
pub struct FullScreenRequest {
    direction: FullScreenDirection,
    acknowledge: Option<Box<dyn FnOnce() + Send>>,
}

impl FullScreenRequest {
    pub fn new(direction: FullScreenDirection, acknowledge: impl FnOnce() + Send + 'static) -> Self {
        Self {
            direction,
            acknowledge: Some(Box::new(acknowledge)),
        }
    }

    pub fn toggle_on(&self) -> bool {
        self.direction == FullScreenDirection::Enter
    }

    pub fn accept(mut self) {
        self.acknowledge_once();
    }

    fn acknowledge_once(&mut self) {
        if let Some(ack) = self.acknowledge.take() {
            ack();
        }
    }
}

impl Drop for FullScreenRequest {
    fn drop(&mut self) {
        self.acknowledge_once();
    }
}

impl fmt::Debug for FullScreenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullScreenRequest")
            .field("direction", &self.direction)
            .field("pending", &self.acknowledge.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum ViewEvent {
    UrlChanged(Url),
    FullScreenRequested(FullScreenRequest),
}

#[derive(Debug)]
pub struct TabEvent {
    pub tab: TabId,
    pub event: ViewEvent,
}

/// Event stream handle given to one tab's engine view.
#[derive(Clone, Debug)]
pub struct ViewEventSender {
    tab: TabId,
    tx: UnboundedSender<TabEvent>,
}

impl ViewEventSender {
    /// Queues an event. Returns false once the hub is gone.
    pub fn emit(&self, event: ViewEvent) -> bool {
        self.tx.send(TabEvent { tab: self.tab, event }).is_ok()
    }

    pub fn url_changed(&self, url: Url) -> bool {
        self.emit(ViewEvent::UrlChanged(url))
    }
}

pub struct EventHub {
    tx: UnboundedSender<TabEvent>,
    rx: UnboundedReceiver<TabEvent>,
    subscribed: HashSet<TabId>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            subscribed: HashSet::new(),
        }
    }

    pub fn subscribe(&mut self, tab: TabId) -> ViewEventSender {
        self.subscribed.insert(tab);
        ViewEventSender {
            tab,
            tx: self.tx.clone(),
        }
    }

    /// Stops delivering the tab's events. Anything it still sends is discarded.
    pub fn unsubscribe(&mut self, tab: TabId) -> bool {
        self.subscribed.remove(&tab)
    }

    pub fn is_subscribed(&self, tab: TabId) -> bool {
        self.subscribed.contains(&tab)
    }

    /// Takes every queued event of a subscribed tab, in arrival order.
    pub fn drain(&mut self) -> Vec<TabEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.subscribed.contains(&event.tab) => events.push(event),
                Ok(stale) => {
                    log::debug!("[Events] Dropping event from closed {}", stale.tab);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
