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

//! Mailboxes and messages for Troupe actors
//!
//! This crate provides the message-passing primitives shared by the rest of
//! the runtime:
//! - Type-erased, immutable, reference-counted messages
//! - A 64-bit message id carrying priority and request/response correlation
//! - Per-actor mailboxes with a high-priority and a normal-priority FIFO lane
//!
//! The mailbox is the synchronization point between producers (any thread)
//! and the single consumer (the worker currently executing the owning actor).
//! Its state word drives scheduling: a push that flips the mailbox from
//! `Blocked` to `Ready` obliges the caller to hand the owning actor to the
//! scheduler.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod mailbox;
mod message;

pub use mailbox::{Envelope, Mailbox, MailboxState, MailboxStats, PushResult};
pub use message::{Message, MessageId};

/// Actor id type: unique within one system, monotonically increasing,
/// never reused.
pub type ActorId = u64;

/// The id that refers to no actor.
pub const INVALID_ACTOR_ID: ActorId = 0;
