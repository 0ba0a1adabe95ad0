//! Per-widget publish/subscribe bus for component lifecycle events.
//!
//! This is separate from mouse/keyboard bubbling (see `input`): listeners
//! are arbitrary observers, not ancestors. A listener may cancel an event;
//! cancellation stops delivery to the remaining listeners, and for
//! pre-mutation posts (visibility, hover, focus, size) it also vetoes the
//! state change that triggered the post.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::WidgetId;
use super::geometry::{Axis, Dimension};

/// Event payloads posted on a widget's bus.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEvent {
    /// Visibility is about to change to `visible`.
    VisibilityChange { visible: bool },
    /// Hover is about to be gained (`true`) or has been lost (`false`).
    HoverChange { hovered: bool },
    /// Focus is about to be gained (`true`) or has been lost (`false`).
    FocusChange { focused: bool },
    /// The set of visible children, or one child's geometry, changed.
    ContentUpdate,
    /// The widget's size declaration is about to change.
    SpaceChange { old: Dimension, new: Dimension },
    /// A scroll fraction changed.
    ScrollChange { axis: Axis, offset: f32 },
    /// A button was clicked.
    Activated,
}

/// Discriminant of [`ComponentEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    VisibilityChange,
    HoverChange,
    FocusChange,
    ContentUpdate,
    SpaceChange,
    ScrollChange,
    Activated,
}

impl ComponentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ComponentEvent::VisibilityChange { .. } => EventKind::VisibilityChange,
            ComponentEvent::HoverChange { .. } => EventKind::HoverChange,
            ComponentEvent::FocusChange { .. } => EventKind::FocusChange,
            ComponentEvent::ContentUpdate => EventKind::ContentUpdate,
            ComponentEvent::SpaceChange { .. } => EventKind::SpaceChange,
            ComponentEvent::ScrollChange { .. } => EventKind::ScrollChange,
            ComponentEvent::Activated => EventKind::Activated,
        }
    }
}

/// An event in flight on one widget's bus.
#[derive(Debug, Clone)]
pub struct BusEvent {
    pub source: WidgetId,
    pub event: ComponentEvent,
    cancelled: bool,
}

impl BusEvent {
    pub fn new(source: WidgetId, event: ComponentEvent) -> Self {
        Self {
            source,
            event,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Listener = Rc<RefCell<dyn FnMut(&mut BusEvent)>>;

struct Subscription {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Typed listener lists keyed by [`EventKind`]. Delivery follows
/// subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscriptions: SmallVec<[Subscription; 2]>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&mut BusEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            listener: Rc::new(RefCell::new(listener)),
        });
        id
    }

    /// Returns false if no listener had this id.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }

    /// Deliver `event` to every listener of its kind until one cancels.
    /// Returns true if the event was NOT cancelled.
    pub fn post(&self, event: &mut BusEvent) -> bool {
        let kind = event.event.kind();
        for sub in self.subscriptions.iter().filter(|s| s.kind == kind) {
            // A listener that is already running (re-entrant post) is skipped.
            let Ok(mut listener) = sub.listener.try_borrow_mut() else {
                log::warn!("re-entrant {:?} post skipped listener {:?}", kind, sub.id);
                continue;
            };
            (&mut *listener)(event);
            if event.is_cancelled() {
                log::debug!("{:?} on {:?} cancelled by {:?}", kind, event.source, sub.id);
                return false;
            }
        }
        true
    }
}
