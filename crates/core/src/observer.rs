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

//! Observer hook points for external tracing backends
//!
//! The core emits no telemetry of its own; implementers may wire these
//! callbacks to any backend. All methods default to no-ops, and all are
//! invoked on hot paths: implementations must be cheap and must not block.

use crate::{ActorId, ExitReason, MessageId};

/// Callbacks fired at the core's named hook points.
pub trait RuntimeObserver: Send + Sync {
    /// An envelope was accepted by a mailbox.
    fn message_enqueued(&self, _receiver: ActorId, _mid: MessageId) {}

    /// A worker picked an actor up for execution.
    fn actor_scheduled(&self, _id: ActorId) {}

    /// An actor entered Terminating.
    fn actor_terminated(&self, _id: ActorId, _reason: ExitReason) {}
}

/// The default observer: every hook is a no-op.
pub struct NoopObserver;

impl RuntimeObserver for NoopObserver {}
