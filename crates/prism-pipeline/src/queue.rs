//! # Shard Queue
//!
//! The per-shard republisher: a single task owning a command mailbox, a
//! standby buffer, and one slot per subscriber. Events are released to a
//! subscriber only against demand it has signalled, so a slow consumer
//! buffers inside its own slot instead of stalling the others.
//!
//! ## Release Discipline
//!
//! For every subscriber slot, at most one of `backlog` and `demand` is
//! non-zero after each command is handled: pending events mean demand is
//! exhausted, pending demand means the backlog is drained. Events leave
//! each slot in exactly the order they were enqueued.

use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tracing::debug;
use uuid::Uuid;

use prism_types::{NormalizedEvent, ShardId};

use crate::error::QueueClosed;

/// Mailbox commands handled by the queue task.
enum QueueCommand {
    /// Publish one event to every subscriber (or the standby buffer).
    Enqueue(NormalizedEvent),
    /// Attach a subscriber; replies with its id and event receiver.
    Subscribe {
        reply: oneshot::Sender<(Uuid, mpsc::UnboundedReceiver<NormalizedEvent>)>,
    },
    /// Add release credit to one subscriber.
    Demand { id: Uuid, amount: usize },
    /// Detach a subscriber and drop its backlog.
    Unsubscribe { id: Uuid },
    /// Snapshot buffering state, for introspection and tests.
    Stats {
        reply: oneshot::Sender<QueueStats>,
    },
}

/// Buffering snapshot of one subscriber slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberStats {
    /// Subscriber id.
    pub id: Uuid,
    /// Events held back awaiting demand.
    pub backlog: usize,
    /// Unspent release credit.
    pub demand: usize,
}

/// Buffering snapshot of a whole queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Events parked while the queue had no subscribers.
    pub standby: usize,
    /// Per-subscriber state.
    pub subscribers: Vec<SubscriberStats>,
}

/// One attached subscriber: its undelivered events, unspent demand, and the
/// channel its released events flow out on.
struct SubscriberSlot {
    backlog: VecDeque<NormalizedEvent>,
    demand: usize,
    sink: mpsc::UnboundedSender<NormalizedEvent>,
}

impl SubscriberSlot {
    /// Move events from backlog to sink while demand lasts. Returns false
    /// when the subscriber's receiver is gone.
    fn release(&mut self) -> bool {
        while self.demand > 0 {
            let Some(event) = self.backlog.pop_front() else {
                break;
            };
            self.demand -= 1;
            if self.sink.send(event).is_err() {
                return false;
            }
        }
        true
    }
}

/// The per-shard queue task. Spawn one per shard pair; interact through the
/// returned [`ShardQueueHandle`].
pub struct ShardQueue;

impl ShardQueue {
    /// Spawn the queue task for a shard.
    #[must_use]
    pub fn spawn(shard_id: ShardId) -> (ShardQueueHandle, JoinHandle<()>) {
        let (commands, mailbox) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(shard_id, mailbox));
        (ShardQueueHandle { shard_id, commands }, task)
    }
}

async fn run(shard_id: ShardId, mut mailbox: mpsc::UnboundedReceiver<QueueCommand>) {
    let mut standby: VecDeque<NormalizedEvent> = VecDeque::new();
    let mut subscribers: HashMap<Uuid, SubscriberSlot> = HashMap::new();

    debug!(shard_id, "Shard queue started");

    while let Some(command) = mailbox.recv().await {
        match command {
            QueueCommand::Enqueue(event) => {
                if subscribers.is_empty() {
                    standby.push_back(event);
                } else {
                    for slot in subscribers.values_mut() {
                        slot.backlog.push_back(event.clone());
                    }
                }
                subscribers.retain(|id, slot| {
                    let alive = slot.release();
                    if !alive {
                        debug!(shard_id, subscriber = %id, "Subscriber receiver dropped, detaching");
                    }
                    alive
                });
            }
            QueueCommand::Subscribe { reply } => {
                let id = Uuid::new_v4();
                let (sink, events) = mpsc::unbounded_channel();
                // The first subscriber inherits everything parked while the
                // queue had no audience.
                let backlog = if subscribers.is_empty() {
                    std::mem::take(&mut standby)
                } else {
                    VecDeque::new()
                };
                let inherited = backlog.len();
                subscribers.insert(
                    id,
                    SubscriberSlot {
                        backlog,
                        demand: 0,
                        sink,
                    },
                );
                debug!(shard_id, subscriber = %id, inherited, "Subscriber attached");
                if reply.send((id, events)).is_err() {
                    subscribers.remove(&id);
                }
            }
            QueueCommand::Demand { id, amount } => {
                if let Some(slot) = subscribers.get_mut(&id) {
                    slot.demand = slot.demand.saturating_add(amount);
                    if !slot.release() {
                        subscribers.remove(&id);
                    }
                }
            }
            QueueCommand::Unsubscribe { id } => {
                if subscribers.remove(&id).is_some() {
                    debug!(shard_id, subscriber = %id, "Subscriber detached");
                }
            }
            QueueCommand::Stats { reply } => {
                let stats = QueueStats {
                    standby: standby.len(),
                    subscribers: subscribers
                        .iter()
                        .map(|(id, slot)| SubscriberStats {
                            id: *id,
                            backlog: slot.backlog.len(),
                            demand: slot.demand,
                        })
                        .collect(),
                };
                let _ = reply.send(stats);
            }
        }
    }

    debug!(shard_id, "Shard queue stopped");
}

/// Cloneable handle to one shard's queue task.
#[derive(Clone)]
pub struct ShardQueueHandle {
    shard_id: ShardId,
    commands: mpsc::UnboundedSender<QueueCommand>,
}

impl ShardQueueHandle {
    /// Shard this queue serves.
    #[must_use]
    pub const fn shard_id(&self) -> ShardId {
        self.shard_id
    }

    /// Publish an event into the queue.
    pub fn enqueue(&self, event: NormalizedEvent) -> Result<(), QueueClosed> {
        self.commands
            .send(QueueCommand::Enqueue(event))
            .map_err(|_| QueueClosed {
                shard_id: self.shard_id,
            })
    }

    /// Attach a new subscriber. It starts with zero demand; call
    /// [`EventSubscription::request`] to release events.
    pub async fn subscribe(&self) -> Result<EventSubscription, QueueClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(QueueCommand::Subscribe { reply })
            .map_err(|_| QueueClosed {
                shard_id: self.shard_id,
            })?;
        let (id, events) = response.await.map_err(|_| QueueClosed {
            shard_id: self.shard_id,
        })?;
        Ok(EventSubscription {
            id,
            shard_id: self.shard_id,
            commands: self.commands.clone(),
            events,
        })
    }

    /// Snapshot the queue's buffering state.
    pub async fn stats(&self) -> Result<QueueStats, QueueClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(QueueCommand::Stats { reply })
            .map_err(|_| QueueClosed {
                shard_id: self.shard_id,
            })?;
        response.await.map_err(|_| QueueClosed {
            shard_id: self.shard_id,
        })
    }
}

/// One subscriber's end of a shard queue.
///
/// Events arrive only after being requested; dropping the subscription
/// detaches it and discards its backlog.
pub struct EventSubscription {
    id: Uuid,
    shard_id: ShardId,
    commands: mpsc::UnboundedSender<QueueCommand>,
    events: mpsc::UnboundedReceiver<NormalizedEvent>,
}

impl EventSubscription {
    /// Subscriber id, for correlation with [`QueueStats`].
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Shard this subscription listens on.
    #[must_use]
    pub const fn shard_id(&self) -> ShardId {
        self.shard_id
    }

    /// Signal readiness for `amount` more events. Credit accumulates and
    /// never expires.
    pub fn request(&self, amount: usize) -> Result<(), QueueClosed> {
        self.commands
            .send(QueueCommand::Demand {
                id: self.id,
                amount,
            })
            .map_err(|_| QueueClosed {
                shard_id: self.shard_id,
            })
    }

    /// Receive the next released event. `None` means the queue task is gone.
    pub async fn recv(&mut self) -> Option<NormalizedEvent> {
        self.events.recv().await
    }

    /// Non-blocking receive of an already-released event.
    pub fn try_recv(&mut self) -> Option<NormalizedEvent> {
        self.events.try_recv().ok()
    }

    /// Convert into a [`Stream`] of released events.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream { inner: self }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let _ = self.commands.send(QueueCommand::Unsubscribe { id: self.id });
    }
}

/// [`Stream`] adapter over an [`EventSubscription`]. Demand must still be
/// signalled through [`EventStream::request`].
pub struct EventStream {
    inner: EventSubscription,
}

impl EventStream {
    /// Signal readiness for `amount` more events.
    pub fn request(&self, amount: usize) -> Result<(), QueueClosed> {
        self.inner.request(amount)
    }
}

impl Stream for EventStream {
    type Item = NormalizedEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.events.poll_recv(cx)
    }
}
