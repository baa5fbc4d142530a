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

//! The actor system: ownership root and spawn entry point
//!
//! ## Purpose
//! Owns the scheduler, the registry and the configuration. `spawn` is the
//! only way control blocks come into existence; `shutdown` drains the
//! system and joins the worker pool.
//!
//! ## Send surface
//! The single delivery verb is [`StrongHandle::enqueue`]; everything here
//! (`send_as`, `anon_send`, `anon_send_exit`, …) composes it with a message
//! id.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::cell::{ActorCell, StrongHandle};
use crate::config::SystemConfig;
use crate::error::SpawnError;
use crate::exit_reason::ExitReason;
use crate::observer::{NoopObserver, RuntimeObserver};
use crate::registry::Registry;
use crate::scheduler::Scheduler;
use crate::system_messages::{DownMsg, ExitMsg};
use crate::{
    behavior::UnhandledMessagePolicy, make_message, ActorId, Mailbox, Message, MessageId,
    INVALID_ACTOR_ID,
};

/// Priority lane selector for the send helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessagePriority {
    /// Normal-priority lane.
    Normal,
    /// High-priority lane, drained before any normal-priority traffic.
    High,
}

impl MessagePriority {
    fn tag(self, mid: MessageId) -> MessageId {
        match self {
            MessagePriority::Normal => mid,
            MessagePriority::High => mid.with_high_priority(),
        }
    }
}

/// Per-actor options applied at spawn time.
#[derive(Default)]
pub struct SpawnOptions {
    /// Registers the actor under a well-known name.
    pub name: Option<String>,
    /// Overrides the system-wide unhandled-message policy.
    pub unhandled_message_policy: Option<UnhandledMessagePolicy>,
    /// Starts the actor with exit trapping enabled.
    pub trap_exit: bool,
    /// Links the new actor with an existing one before it runs.
    pub link_to: Option<StrongHandle>,
    /// Registers an existing actor as monitor of the new one.
    pub monitored_by: Option<StrongHandle>,
}

impl SpawnOptions {
    /// Registers the actor under `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the unhandled-message policy for this actor.
    pub fn with_unhandled_message_policy(mut self, policy: UnhandledMessagePolicy) -> Self {
        self.unhandled_message_policy = Some(policy);
        self
    }

    /// Starts with exit trapping enabled.
    pub fn with_trap_exit(mut self) -> Self {
        self.trap_exit = true;
        self
    }

    /// Links the new actor with `peer` atomically at spawn.
    pub fn with_link_to(mut self, peer: &StrongHandle) -> Self {
        self.link_to = Some(peer.clone());
        self
    }

    /// Makes `watcher` a monitor of the new actor.
    pub fn with_monitored_by(mut self, watcher: &StrongHandle) -> Self {
        self.monitored_by = Some(watcher.clone());
        self
    }
}

pub(crate) struct SystemState {
    pub(crate) config: SystemConfig,
    pub(crate) registry: Registry,
    pub(crate) scheduler: Scheduler,
    pub(crate) observer: Arc<dyn RuntimeObserver>,
    next_actor_id: AtomicU64,
    shutting_down: AtomicBool,
}

impl SystemState {
    /// Runs the on-exit actions of `handle` exactly once: close the mailbox,
    /// notify links and monitors, retire from the registry.
    ///
    /// Called only by the worker currently executing the actor, which is
    /// what makes the exactly-once guarantee hold without extra locking.
    pub(crate) fn terminate(&self, handle: &StrongHandle, reason: ExitReason) {
        let cell = handle.cell();
        let id = cell.id();
        cell.begin_terminating(reason);
        cell.mailbox.close();
        tracing::debug!(actor_id = id, reason = %reason, "actor terminating");

        let links: HashSet<ActorId> = cell.take_links();
        for peer in links {
            let Some(peer_handle) = self.registry.get_id(peer) else {
                continue;
            };
            // drop the back-edge so the peer's own termination cannot
            // produce a second notification for this pair
            peer_handle.cell().remove_link(id);
            if !reason.is_normal() {
                peer_handle.enqueue(
                    Some(id),
                    MessageId::new().with_high_priority(),
                    make_message!(ExitMsg { source: id, reason }),
                );
            }
        }

        // monitors fire for every exit, normal ones included
        let monitors: HashSet<ActorId> = cell.take_monitors();
        for watcher in monitors {
            let Some(watcher_handle) = self.registry.get_id(watcher) else {
                continue;
            };
            watcher_handle.enqueue(
                Some(id),
                MessageId::new().with_high_priority(),
                make_message!(DownMsg { source: id, reason }),
            );
        }

        self.observer.actor_terminated(id, reason);
        self.registry.erase_names_of(id);
        self.registry.erase_id(id);
        cell.retire();
    }
}

/// A running actor system.
///
/// Cheap to clone; all clones refer to the same system. Dropping the last
/// clone does not stop the workers: [`shutdown`](ActorSystem::shutdown) is
/// the orderly way out.
#[derive(Clone)]
pub struct ActorSystem {
    state: Arc<SystemState>,
}

impl ActorSystem {
    /// Starts a system with the default (no-op) observer.
    pub fn new(config: SystemConfig) -> Self {
        ActorSystem::with_observer(config, Arc::new(NoopObserver))
    }

    /// Starts a system with an installed [`RuntimeObserver`].
    pub fn with_observer(config: SystemConfig, observer: Arc<dyn RuntimeObserver>) -> Self {
        let worker_count = config.worker_count.max(1);
        let (scheduler, locals) = Scheduler::new(worker_count);
        let state = Arc::new(SystemState {
            config,
            registry: Registry::new(),
            scheduler,
            observer,
            next_actor_id: AtomicU64::new(1),
            shutting_down: AtomicBool::new(false),
        });
        state.scheduler.start(locals, &state);
        tracing::debug!(worker_count, "actor system started");
        ActorSystem { state }
    }

    pub(crate) fn from_state(state: Arc<SystemState>) -> Self {
        ActorSystem { state }
    }

    pub(crate) fn state(&self) -> &Arc<SystemState> {
        &self.state
    }

    /// The system's registry.
    pub fn registry(&self) -> &Registry {
        &self.state.registry
    }

    /// The configuration the system was started with.
    pub fn config(&self) -> &SystemConfig {
        &self.state.config
    }

    /// Whether shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.state.shutting_down.load(Ordering::Acquire)
    }

    /// Spawns a new actor and returns its strong handle.
    ///
    /// The control block is allocated, registered under its fresh id, added
    /// to the running set, and scheduled for an initial run. Spawn is
    /// refused once shutdown has been initiated.
    pub fn spawn(
        &self,
        behavior: impl Behavior,
        options: SpawnOptions,
    ) -> Result<StrongHandle, SpawnError> {
        if self.is_shutting_down() {
            return Err(SpawnError::SystemShuttingDown);
        }
        let id = self.state.next_actor_id.fetch_add(1, Ordering::Relaxed);
        let policy = options
            .unhandled_message_policy
            .unwrap_or(self.state.config.unhandled_message_policy);
        let cell = ActorCell::new(
            id,
            Mailbox::with_capacity(self.state.config.max_mailbox_size),
            Box::new(behavior),
            policy,
            options.trap_exit,
            Arc::downgrade(&self.state),
        );
        let handle = StrongHandle::from_cell(Arc::new(cell));
        self.state.registry.put_id(id, handle.clone());
        self.state.registry.inc_running(id);
        if let Some(name) = options.name {
            self.state.registry.put_name(name, handle.clone());
        }
        if let Some(peer) = &options.link_to {
            self.link(&handle, peer);
        }
        if let Some(watcher) = &options.monitored_by {
            self.monitor(&handle, watcher);
        }
        tracing::debug!(actor_id = id, "actor spawned");
        // initial activation run; the first empty pop blocks the mailbox
        self.state.scheduler.schedule(handle.clone());
        Ok(handle)
    }

    /// Sends `content` to `to` under `from`'s identity at `priority`.
    pub fn send_as(
        &self,
        from: &StrongHandle,
        priority: MessagePriority,
        to: &StrongHandle,
        content: Message,
    ) {
        to.enqueue(Some(from.id()), priority.tag(MessageId::new()), content);
    }

    /// Sends `content` to `to` anonymously at normal priority.
    pub fn anon_send(&self, to: &StrongHandle, content: Message) {
        to.enqueue(None, MessageId::new(), content);
    }

    /// Sends `content` to `to` anonymously at high priority.
    pub fn anon_send_high(&self, to: &StrongHandle, content: Message) {
        to.enqueue(None, MessageId::new().with_high_priority(), content);
    }

    /// Sends an anonymous exit message to `to`.
    ///
    /// Non-trapping receivers terminate with `reason` unless it is normal.
    pub fn anon_send_exit(&self, to: &StrongHandle, reason: ExitReason) {
        to.enqueue(
            None,
            MessageId::new().with_high_priority(),
            make_message!(ExitMsg {
                source: INVALID_ACTOR_ID,
                reason,
            }),
        );
    }

    pub(crate) fn send_exit_from(&self, from: ActorId, to: &StrongHandle, reason: ExitReason) {
        to.enqueue(
            Some(from),
            MessageId::new().with_high_priority(),
            make_message!(ExitMsg {
                source: from,
                reason,
            }),
        );
    }

    /// Links `a` and `b` symmetrically: whichever terminates first with a
    /// non-normal reason sends the other an exit message.
    ///
    /// Linking with an actor that already terminated delivers its exit
    /// notification to the surviving party immediately.
    pub fn link(&self, a: &StrongHandle, b: &StrongHandle) {
        if a.id() == b.id() {
            return;
        }
        // id order fixes the lock order for the pairwise insert
        let (first, second) = if a.id() < b.id() { (a, b) } else { (b, a) };
        let first_links = first.cell().links.lock();
        let second_links = second.cell().links.lock();
        let a_dead = a.cell().is_terminating();
        let b_dead = b.cell().is_terminating();
        match (a_dead, b_dead) {
            (false, false) => {
                let (mut first_links, mut second_links) = (first_links, second_links);
                first_links.insert(second.id());
                second_links.insert(first.id());
            }
            (true, false) => {
                drop(first_links);
                drop(second_links);
                // normal exits never propagate to links, dead peer or not
                let reason = a.cell().exit_reason();
                if !reason.is_normal() {
                    self.send_exit_from(a.id(), b, reason);
                }
            }
            (false, true) => {
                drop(first_links);
                drop(second_links);
                let reason = b.cell().exit_reason();
                if !reason.is_normal() {
                    self.send_exit_from(b.id(), a, reason);
                }
            }
            (true, true) => {}
        }
    }

    /// Dissolves the link between `a` and `b`. No-op if none exists.
    pub fn unlink(&self, a: &StrongHandle, b: &StrongHandle) {
        let (first, second) = if a.id() < b.id() { (a, b) } else { (b, a) };
        let mut first_links = first.cell().links.lock();
        let mut second_links = second.cell().links.lock();
        first_links.remove(&second.id());
        second_links.remove(&first.id());
    }

    /// Makes `watcher` a monitor of `observed`: when `observed` terminates,
    /// `watcher` receives a [`DownMsg`] naming it and the reason.
    ///
    /// Monitoring an actor that already terminated delivers the down
    /// message immediately.
    pub fn monitor(&self, observed: &StrongHandle, watcher: &StrongHandle) {
        if !observed.cell().try_insert_monitor(watcher.id()) {
            let reason = observed.cell().exit_reason();
            watcher.enqueue(
                Some(observed.id()),
                MessageId::new().with_high_priority(),
                make_message!(DownMsg {
                    source: observed.id(),
                    reason,
                }),
            );
        }
    }

    /// Removes `watcher` from `observed`'s monitors.
    pub fn demonitor(&self, observed: &StrongHandle, watcher: &StrongHandle) {
        observed.cell().remove_monitor(watcher.id());
    }

    /// Blocks until the running set is empty.
    ///
    /// Must be called from outside the worker pool.
    pub fn await_quiescence(&self) {
        self.state.registry.await_running_count_equal(0);
    }

    /// Closes the system: refuses further spawns, waits for the registry to
    /// report zero running actors, then stops and joins the workers.
    ///
    /// Cancellation is cooperative; unresponsive actors are not
    /// force-killed. Callers that need a bound should impose it externally.
    pub fn shutdown(&self) {
        self.state.shutting_down.store(true, Ordering::Release);
        tracing::debug!("system shutdown initiated, draining");
        self.state.registry.await_running_count_equal(0);
        self.state.scheduler.shutdown();
        tracing::debug!("system shutdown complete");
    }
}
