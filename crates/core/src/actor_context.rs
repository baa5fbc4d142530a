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

//! Context handed to a behavior while it handles a message
//!
//! The context is how a behavior reaches the rest of the system: sending,
//! spawning, linking, monitoring and trap-exit control all go through here.
//! None of these operations block; effects ordered by one behavior
//! invocation are delivered to each recipient in program order of issue.

use crate::behavior::Behavior;
use crate::cell::StrongHandle;
use crate::error::SpawnError;
use crate::exit_reason::ExitReason;
use crate::system::{ActorSystem, MessagePriority, SpawnOptions};
use crate::{ActorId, Envelope, Message, MessageId};

/// Execution context of the actor currently handling a message.
pub struct ActorContext {
    system: ActorSystem,
    handle: StrongHandle,
}

impl ActorContext {
    pub(crate) fn new(system: ActorSystem, handle: StrongHandle) -> Self {
        ActorContext { system, handle }
    }

    /// Id of the executing actor.
    pub fn id(&self) -> ActorId {
        self.handle.id()
    }

    /// Strong handle to the executing actor.
    pub fn self_handle(&self) -> &StrongHandle {
        &self.handle
    }

    /// The owning system.
    pub fn system(&self) -> &ActorSystem {
        &self.system
    }

    /// Sends `content` to `to` at normal priority under this actor's
    /// identity.
    pub fn send(&self, to: &StrongHandle, content: Message) {
        self.system
            .send_as(&self.handle, MessagePriority::Normal, to, content);
    }

    /// Sends `content` to `to` at high priority under this actor's identity.
    pub fn send_high(&self, to: &StrongHandle, content: Message) {
        self.system
            .send_as(&self.handle, MessagePriority::High, to, content);
    }

    /// Replies to the sender of `envelope`, correlating the response when
    /// the envelope was a request. No-op for anonymous senders and senders
    /// that already retired from the registry.
    pub fn reply(&self, envelope: &Envelope, content: Message) {
        let Some(sender_id) = envelope.sender else {
            return;
        };
        let Some(sender) = self.system.registry().get_id(sender_id) else {
            return;
        };
        let mid = if envelope.mid.is_request() {
            envelope.mid.response_id()
        } else {
            MessageId::new()
        };
        sender.enqueue(Some(self.id()), mid, content);
    }

    /// Sends an exit message to `to` under this actor's identity.
    ///
    /// Delivered at high priority; non-trapping receivers terminate with
    /// `reason` unless it is normal.
    pub fn send_exit(&self, to: &StrongHandle, reason: ExitReason) {
        self.system.send_exit_from(self.id(), to, reason);
    }

    /// Spawns a new actor.
    pub fn spawn(
        &self,
        behavior: impl Behavior,
        options: SpawnOptions,
    ) -> Result<StrongHandle, SpawnError> {
        self.system.spawn(behavior, options)
    }

    /// Links the executing actor with `peer` (symmetric).
    pub fn link(&self, peer: &StrongHandle) {
        self.system.link(&self.handle, peer);
    }

    /// Dissolves a link with `peer`.
    pub fn unlink(&self, peer: &StrongHandle) {
        self.system.unlink(&self.handle, peer);
    }

    /// Starts monitoring `target`: this actor receives a
    /// [`DownMsg`](crate::DownMsg) when `target` terminates.
    pub fn monitor(&self, target: &StrongHandle) {
        self.system.monitor(target, &self.handle);
    }

    /// Stops monitoring `target`.
    pub fn demonitor(&self, target: &StrongHandle) {
        self.system.demonitor(target, &self.handle);
    }

    /// Enables or disables trapping of exit messages.
    ///
    /// While trapping, exit messages are delivered to the behavior instead
    /// of cascading the termination.
    pub fn trap_exit(&self, enabled: bool) {
        self.handle.cell().set_trap_exit(enabled);
    }

    /// Whether this actor currently traps exit messages.
    pub fn traps_exit(&self) -> bool {
        self.handle.cell().traps_exit()
    }
}
