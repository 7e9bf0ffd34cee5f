// ── Push events ──
//
// One optional sink per network instance. Subscribing atomically swaps in
// a fresh sink; the previous receiver then sees end-of-stream. Publishing
// never blocks and drops the event when nobody listens.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwapOption;
use futures_core::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::model::{Group, MeshAddress};
use crate::reply::GroupPayload;

/// Asynchronous state change pushed to the subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MeshEvent {
    GroupAdded {
        group: GroupPayload,
    },
    GroupRemoved {
        address: u16,
        address_label: Option<String>,
    },
}

impl MeshEvent {
    pub fn group_added(group: &Group) -> Self {
        Self::GroupAdded {
            group: GroupPayload::from(group),
        }
    }

    pub fn group_removed(address: &MeshAddress) -> Self {
        Self::GroupRemoved {
            address: address.address,
            address_label: address.label_string(),
        }
    }
}

type Sink = mpsc::UnboundedSender<MeshEvent>;

/// Single-subscriber event sink for one network.
#[derive(Default)]
pub struct EventPublisher {
    sink: ArcSwapOption<Sink>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new sink, replacing any previous one.
    pub fn subscribe(&self) -> EventSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self.sink.swap(Some(Arc::new(tx)));
        if previous.is_some() {
            debug!("event sink replaced");
        }
        EventSubscription { rx }
    }

    /// Drop the current sink. A no-op when nothing is subscribed.
    pub fn cancel(&self) {
        if self.sink.swap(None).is_some() {
            debug!("event sink cleared");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.sink.load().is_some()
    }

    /// Send to the current sink. Returns whether the event was handed off.
    pub fn publish(&self, event: MeshEvent) -> bool {
        match &*self.sink.load() {
            Some(sink) => sink.send(event).is_ok(),
            None => false,
        }
    }
}

// ── Subscription handle ─────────────────────────────────────────────

/// Receiving end of an event sink.
///
/// Yields `None` once the publisher has replaced or cleared this sink and
/// every already-published event has been drained.
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<MeshEvent>,
}

impl EventSubscription {
    pub async fn recv(&mut self) -> Option<MeshEvent> {
        self.rx.recv().await
    }

    /// Next event if one is already waiting.
    pub fn try_recv(&mut self) -> Option<MeshEvent> {
        self.rx.try_recv().ok()
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: UnboundedReceiverStream::new(self.rx),
        }
    }
}

/// `Stream` adapter over an [`EventSubscription`].
pub struct EventStream {
    inner: UnboundedReceiverStream<MeshEvent>,
}

impl Stream for EventStream {
    type Item = MeshEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
