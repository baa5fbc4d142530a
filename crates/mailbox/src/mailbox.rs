// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2026 The Troupe Authors
//
// This file is part of Troupe.
//
// Troupe is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Troupe is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Troupe. If not, see <https://www.gnu.org/licenses/>.

//! Per-actor mailbox with two priority lanes
//!
//! A mailbox is an MPSC queue owned by exactly one actor. Producers push from
//! any thread; only the worker currently executing the owning actor pops.
//! Two internal FIFO lanes implement priority: pop drains the entire
//! high-priority lane before touching the normal lane, and each lane is
//! strictly FIFO with respect to the happens-before order of its producers.
//!
//! The state word is the scheduling handshake. A push that observes `Blocked`
//! flips the mailbox to `Ready` and reports [`PushResult::Unblocked`]; the
//! caller must then make the owning actor ready in the scheduler. Pop flips
//! the mailbox back to `Blocked` when it runs dry. This keeps exactly one
//! scheduling token alive per actor, which is what makes per-actor execution
//! strictly serial.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::{ActorId, Message, MessageId};

/// One unit in a mailbox: sender, message id, payload.
///
/// The sender is carried as a plain [`ActorId`]; resolving it to a live
/// handle goes through the registry, which keeps id lookup safe after the
/// sender has terminated.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// Id of the originating actor, `None` for anonymous sends.
    pub sender: Option<ActorId>,
    /// Routing token (priority, request/response correlation).
    pub mid: MessageId,
    /// The type-erased payload.
    pub content: Message,
}

/// Observable mailbox states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MailboxState {
    /// Created, owner scheduled for its initial run, nothing queued yet.
    Empty = 0,
    /// At least one envelope is queued (or was, moments ago).
    Ready = 1,
    /// Drained; the owner is descheduled and must be woken by a push.
    Blocked = 2,
    /// Closed; pushes are rejected, pops drain what remains.
    Closed = 3,
}

impl MailboxState {
    fn from_u8(raw: u8) -> MailboxState {
        match raw {
            0 => MailboxState::Empty,
            1 => MailboxState::Ready,
            2 => MailboxState::Blocked,
            _ => MailboxState::Closed,
        }
    }
}

/// Outcome of [`Mailbox::push`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushResult {
    /// The push flipped the mailbox from `Blocked` to `Ready`. The caller
    /// must now hand the owning actor to the scheduler.
    Unblocked,
    /// The envelope was queued; the owner is already scheduled or running.
    Queued,
    /// The mailbox is closed; the envelope was dropped.
    Closed,
    /// A configured capacity cap was exceeded; the envelope was dropped.
    Full,
}

/// Counters maintained by a mailbox over its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MailboxStats {
    /// Envelopes accepted by `push`.
    pub total_enqueued: u64,
    /// Envelopes handed out by `pop`.
    pub total_dequeued: u64,
    /// Envelopes rejected (closed mailbox or capacity cap).
    pub total_dropped: u64,
    /// Envelopes currently queued.
    pub current_size: usize,
}

struct Lanes {
    high: VecDeque<Envelope>,
    normal: VecDeque<Envelope>,
}

impl Lanes {
    fn len(&self) -> usize {
        self.high.len() + self.normal.len()
    }
}

/// Per-actor MPSC queue with priority lanes and a scheduling state word.
///
/// All queue mutations happen under the lane mutex; the state word is an
/// atomic so `state()`/`is_closed()` never block. State transitions are only
/// performed while the lane mutex is held, which rules out the lost-wakeup
/// race between a producer observing an empty queue and the consumer
/// blocking.
pub struct Mailbox {
    state: AtomicU8,
    lanes: Mutex<Lanes>,
    capacity: Option<usize>,
    total_enqueued: AtomicU64,
    total_dequeued: AtomicU64,
    total_dropped: AtomicU64,
    current_size: AtomicUsize,
}

impl Mailbox {
    /// Creates an unbounded mailbox.
    pub fn new() -> Self {
        Mailbox::with_capacity(None)
    }

    /// Creates a mailbox with an optional capacity cap.
    ///
    /// With a cap in place, a push against a full mailbox returns
    /// [`PushResult::Full`] and drops the envelope; it is up to the caller to
    /// notify the sender.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Mailbox {
            state: AtomicU8::new(MailboxState::Empty as u8),
            lanes: Mutex::new(Lanes {
                high: VecDeque::new(),
                normal: VecDeque::new(),
            }),
            capacity,
            total_enqueued: AtomicU64::new(0),
            total_dequeued: AtomicU64::new(0),
            total_dropped: AtomicU64::new(0),
            current_size: AtomicUsize::new(0),
        }
    }

    /// Enqueues one envelope. Thread-safe for any number of producers.
    ///
    /// Returns [`PushResult::Unblocked`] iff this push caused the
    /// `Blocked -> Ready` transition; the caller must then schedule the
    /// owning actor.
    pub fn push(&self, sender: Option<ActorId>, mid: MessageId, content: Message) -> PushResult {
        let mut lanes = self.lanes.lock();
        if self.state.load(Ordering::Acquire) == MailboxState::Closed as u8 {
            self.total_dropped.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(sender = ?sender, "push on closed mailbox dropped");
            return PushResult::Closed;
        }
        if let Some(cap) = self.capacity {
            if lanes.len() >= cap {
                self.total_dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(sender = ?sender, cap, "mailbox over capacity, envelope dropped");
                return PushResult::Full;
            }
        }
        let envelope = Envelope {
            sender,
            mid,
            content,
        };
        if mid.is_high_priority() {
            lanes.high.push_back(envelope);
        } else {
            lanes.normal.push_back(envelope);
        }
        self.total_enqueued.fetch_add(1, Ordering::Relaxed);
        self.current_size.fetch_add(1, Ordering::Relaxed);
        let previous = self.state.swap(MailboxState::Ready as u8, Ordering::AcqRel);
        if previous == MailboxState::Blocked as u8 {
            PushResult::Unblocked
        } else {
            PushResult::Queued
        }
    }

    /// Dequeues the next envelope, high lane first.
    ///
    /// Must only be called by the worker currently executing the owning
    /// actor. Returns `None` iff the mailbox is empty, transitioning the
    /// state to `Blocked` in that case (a closed mailbox stays `Closed`).
    pub fn pop(&self) -> Option<Envelope> {
        let mut lanes = self.lanes.lock();
        let next = match lanes.high.pop_front() {
            Some(envelope) => Some(envelope),
            None => lanes.normal.pop_front(),
        };
        match next {
            Some(envelope) => {
                self.total_dequeued.fetch_add(1, Ordering::Relaxed);
                self.current_size.fetch_sub(1, Ordering::Relaxed);
                Some(envelope)
            }
            None => {
                if self.state.load(Ordering::Acquire) != MailboxState::Closed as u8 {
                    self.state
                        .store(MailboxState::Blocked as u8, Ordering::Release);
                }
                None
            }
        }
    }

    /// Closes the mailbox. Idempotent.
    ///
    /// Subsequent pushes return [`PushResult::Closed`]; pop keeps draining
    /// the remaining envelopes and then reports empty.
    pub fn close(&self) {
        let _lanes = self.lanes.lock();
        self.state
            .store(MailboxState::Closed as u8, Ordering::Release);
    }

    /// Whether the mailbox has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) == MailboxState::Closed as u8
    }

    /// Current state word.
    pub fn state(&self) -> MailboxState {
        MailboxState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of queued envelopes.
    pub fn len(&self) -> usize {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Whether no envelopes are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the lifetime counters.
    pub fn stats(&self) -> MailboxStats {
        MailboxStats {
            total_enqueued: self.total_enqueued.load(Ordering::Relaxed),
            total_dequeued: self.total_dequeued.load(Ordering::Relaxed),
            total_dropped: self.total_dropped.load(Ordering::Relaxed),
            current_size: self.current_size.load(Ordering::Relaxed),
        }
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::new()
    }
}
