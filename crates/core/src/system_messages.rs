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

//! System-level message payloads
//!
//! These travel inside ordinary [`Message`](crate::Message) tuples as the
//! first element; there is no separate system channel. Exit and down
//! notifications are always enqueued at high priority so supervision outruns
//! pending user traffic.

use crate::{ActorId, ExitReason, MessageId};

/// Notifies a linked peer that an actor terminated.
///
/// Delivered to every linked actor when the source terminates with a
/// non-normal reason. Actors that do not trap exits never see this message:
/// the runtime intercepts it and cascades the termination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitMsg {
    /// The terminated actor, [`INVALID_ACTOR_ID`](crate::INVALID_ACTOR_ID)
    /// for anonymous exit requests.
    pub source: ActorId,
    /// The reason the source terminated with.
    pub reason: ExitReason,
}

/// Notifies a monitor that the observed actor terminated.
///
/// Unlike [`ExitMsg`], down messages fire for every termination, normal ones
/// included, and are always delivered to the behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownMsg {
    /// The terminated actor.
    pub source: ActorId,
    /// The reason the source terminated with.
    pub reason: ExitReason,
}

/// Classifies a system-generated error notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SysErrorCode {
    /// The target mailbox had a capacity cap configured and was full.
    MailboxFull,
}

/// Tells a sender that an asynchronous delivery failed.
///
/// Delivery is best-effort and `enqueue` never reports errors to its caller;
/// the only feedback channel is this message, sent back at high priority
/// when a capped mailbox rejects an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorMsg {
    /// What went wrong.
    pub code: SysErrorCode,
    /// The message id of the failed delivery.
    pub mid: MessageId,
}
