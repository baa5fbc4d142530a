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

//! Troupe: an actor runtime with priority mailboxes and a work-stealing
//! scheduler
//!
//! Programs structure computation as a dynamic population of isolated
//! actors that communicate solely by asynchronous message passing, executed
//! on a fixed-size worker pool:
//! - `troupe-mailbox`: type-erased messages and priority-lane mailboxes
//! - `troupe-core`: scheduler, actor lifecycle, registry, exit/link protocol
//!
//! This crate re-exports both members; most users depend on it alone.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use troupe_core as core;
pub use troupe_mailbox as mailbox;

pub use troupe_core::{
    make_message, ActorContext, ActorId, ActorSystem, Behavior, DownMsg, Envelope, ErrorMsg,
    ExitMsg, ExitReason, HandleOutcome, Lifecycle, Mailbox, MailboxState, Message, MessageId,
    MessagePriority, PushResult, Registry, RuntimeObserver, SpawnError, SpawnOptions, StrongHandle,
    SysErrorCode, SystemConfig, UnhandledMessagePolicy, WeakHandle, INVALID_ACTOR_ID,
};
