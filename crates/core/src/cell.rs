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

//! Actor control block and handles
//!
//! ## Purpose
//! The control block ([`ActorCell`]) is the stable identity of an actor:
//! id, mailbox, behavior slot, link/monitor sets and lifecycle flags. It is
//! created exclusively by `spawn`, owned jointly by all strong handles, and
//! reclaimed when the last handle (strong or weak) is gone.
//!
//! ## Reference counting
//! The two-counter scheme is realized with `Arc`/`Weak`: strong handles keep
//! the actor reachable, weak handles keep only the storage alive so id
//! lookup stays safe after death. `Arc` provides the acquire/release
//! publication a freshly spawned cell needs before other threads observe its
//! handle.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::behavior::{Behavior, UnhandledMessagePolicy};
use crate::exit_reason::ExitReason;
use crate::system::SystemState;
use crate::system_messages::{ErrorMsg, SysErrorCode};
use crate::{make_message, ActorId, Mailbox, MailboxStats, Message, MessageId, PushResult};

/// Lifecycle states of an actor. Transitions are strictly one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Lifecycle {
    /// Created and registered, not yet executed.
    Spawned = 0,
    /// Executed at least once.
    Running = 1,
    /// Termination in progress; no further behavior invocations happen.
    Terminating = 2,
    /// Fully retired from the registry.
    Retired = 3,
}

impl Lifecycle {
    fn from_u8(raw: u8) -> Lifecycle {
        match raw {
            0 => Lifecycle::Spawned,
            1 => Lifecycle::Running,
            2 => Lifecycle::Terminating,
            _ => Lifecycle::Retired,
        }
    }
}

/// The actor control block.
pub struct ActorCell {
    pub(crate) id: ActorId,
    pub(crate) mailbox: Mailbox,
    /// The behavior slot. `None` once the actor terminated. The executing
    /// worker holds this lock for the whole dispatch quantum, which closes
    /// the handoff window between a final empty pop and a concurrent wakeup.
    pub(crate) behavior: Mutex<Option<Box<dyn Behavior>>>,
    /// Linked peers. Symmetric: `a` in `b.links` iff `b` in `a.links`.
    pub(crate) links: Mutex<HashSet<ActorId>>,
    /// Actors to notify with a down message on termination.
    pub(crate) monitors: Mutex<HashSet<ActorId>>,
    pub(crate) lifecycle: AtomicU8,
    pub(crate) exit_reason: AtomicU32,
    pub(crate) trap_exit: AtomicBool,
    pub(crate) unhandled_policy: UnhandledMessagePolicy,
    pub(crate) system: Weak<SystemState>,
}

impl ActorCell {
    pub(crate) fn new(
        id: ActorId,
        mailbox: Mailbox,
        behavior: Box<dyn Behavior>,
        unhandled_policy: UnhandledMessagePolicy,
        trap_exit: bool,
        system: Weak<SystemState>,
    ) -> Self {
        ActorCell {
            id,
            mailbox,
            behavior: Mutex::new(Some(behavior)),
            links: Mutex::new(HashSet::new()),
            monitors: Mutex::new(HashSet::new()),
            lifecycle: AtomicU8::new(Lifecycle::Spawned as u8),
            exit_reason: AtomicU32::new(ExitReason::NORMAL.code()),
            trap_exit: AtomicBool::new(trap_exit),
            unhandled_policy,
            system,
        }
    }

    /// The actor's id.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_u8(self.lifecycle.load(Ordering::Acquire))
    }

    /// Whether the actor reached Terminating (or Retired).
    pub fn is_terminating(&self) -> bool {
        self.lifecycle() >= Lifecycle::Terminating
    }

    /// The exit reason, meaningful once the actor is Terminating.
    pub fn exit_reason(&self) -> ExitReason {
        ExitReason::from_code(self.exit_reason.load(Ordering::Acquire))
    }

    pub(crate) fn mark_running(&self) {
        let _ = self.lifecycle.compare_exchange(
            Lifecycle::Spawned as u8,
            Lifecycle::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Enters Terminating. Entering twice is a runtime bug.
    pub(crate) fn begin_terminating(&self, reason: ExitReason) {
        self.exit_reason.store(reason.code(), Ordering::Release);
        let previous = Lifecycle::from_u8(
            self.lifecycle
                .swap(Lifecycle::Terminating as u8, Ordering::AcqRel),
        );
        assert!(
            previous < Lifecycle::Terminating,
            "actor {} entered Terminating twice",
            self.id
        );
    }

    pub(crate) fn retire(&self) {
        self.lifecycle
            .store(Lifecycle::Retired as u8, Ordering::Release);
    }

    pub(crate) fn traps_exit(&self) -> bool {
        self.trap_exit.load(Ordering::Acquire)
    }

    pub(crate) fn set_trap_exit(&self, enabled: bool) {
        self.trap_exit.store(enabled, Ordering::Release);
    }

    /// Inserts `watcher` into the monitor set unless this actor is
    /// terminating. Returns false in the latter case; the caller then
    /// delivers the down notification immediately instead.
    pub(crate) fn try_insert_monitor(&self, watcher: ActorId) -> bool {
        let mut monitors = self.monitors.lock();
        if self.is_terminating() {
            return false;
        }
        monitors.insert(watcher);
        true
    }

    pub(crate) fn remove_link(&self, peer: ActorId) {
        self.links.lock().remove(&peer);
    }

    pub(crate) fn remove_monitor(&self, watcher: ActorId) {
        self.monitors.lock().remove(&watcher);
    }

    pub(crate) fn take_links(&self) -> HashSet<ActorId> {
        std::mem::take(&mut *self.links.lock())
    }

    pub(crate) fn take_monitors(&self) -> HashSet<ActorId> {
        std::mem::take(&mut *self.monitors.lock())
    }
}

/// Owning handle to an actor. The actor stays reachable while at least one
/// strong handle exists.
///
/// `StrongHandle::enqueue` is the single message-delivery verb of the core:
/// send helpers, timers and inbound adapters all compose it.
#[derive(Clone)]
pub struct StrongHandle {
    cell: Arc<ActorCell>,
}

impl StrongHandle {
    pub(crate) fn from_cell(cell: Arc<ActorCell>) -> Self {
        StrongHandle { cell }
    }

    pub(crate) fn cell(&self) -> &Arc<ActorCell> {
        &self.cell
    }

    /// The actor's id.
    pub fn id(&self) -> ActorId {
        self.cell.id
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.cell.lifecycle()
    }

    /// Downgrades to a non-owning handle.
    pub fn downgrade(&self) -> WeakHandle {
        WeakHandle {
            cell: Arc::downgrade(&self.cell),
        }
    }

    /// Snapshot of the target mailbox counters.
    pub fn mailbox_stats(&self) -> MailboxStats {
        self.cell.mailbox.stats()
    }

    /// Delivers one message to this actor.
    ///
    /// Never fails from the caller's perspective: delivery to a closed
    /// mailbox is silently dropped (linked peers and monitors were already
    /// notified when the target terminated), and a capacity overflow is
    /// reported back to `sender` as a system [`ErrorMsg`].
    ///
    /// If the push unblocked the mailbox, the actor is handed to the
    /// scheduler.
    pub fn enqueue(&self, sender: Option<ActorId>, mid: MessageId, content: Message) {
        match self.cell.mailbox.push(sender, mid, content) {
            PushResult::Unblocked => {
                if let Some(system) = self.cell.system.upgrade() {
                    system.observer.message_enqueued(self.id(), mid);
                    system.scheduler.schedule(self.clone());
                }
            }
            PushResult::Queued => {
                if let Some(system) = self.cell.system.upgrade() {
                    system.observer.message_enqueued(self.id(), mid);
                }
            }
            PushResult::Closed => {
                tracing::trace!(target_id = self.id(), "delivery to closed mailbox dropped");
            }
            PushResult::Full => {
                tracing::debug!(target_id = self.id(), "mailbox full, notifying sender");
                let system = self.cell.system.upgrade();
                if let (Some(system), Some(sender_id)) = (system, sender) {
                    if let Some(origin) = system.registry.get_id(sender_id) {
                        origin.enqueue(
                            None,
                            MessageId::new().with_high_priority(),
                            make_message!(ErrorMsg {
                                code: SysErrorCode::MailboxFull,
                                mid,
                            }),
                        );
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for StrongHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrongHandle")
            .field("id", &self.id())
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

/// Non-owning handle: never keeps the actor alive, but keeps the control
/// block's storage valid so id queries remain safe after death.
#[derive(Clone)]
pub struct WeakHandle {
    cell: Weak<ActorCell>,
}

impl WeakHandle {
    /// Attempts to recover a strong handle.
    pub fn upgrade(&self) -> Option<StrongHandle> {
        self.cell.upgrade().map(StrongHandle::from_cell)
    }
}
