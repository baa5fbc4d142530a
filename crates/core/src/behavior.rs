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

//! Behaviors: the message-handling function of an actor
//!
//! ## Purpose
//! A behavior consumes exactly one envelope per invocation and tells the
//! runtime what to do next: keep going, swap in a new behavior, or
//! terminate. Replacing the behavior is the only way to change which
//! messages an actor handles.
//!
//! ## Authoring
//! Implement [`Behavior`] on a struct for stateful actors, or use any
//! `FnMut(&mut ActorContext, Envelope) -> HandleOutcome` closure; the
//! blanket impl covers it:
//!
//! ```rust,ignore
//! let counter = system.spawn(
//!     |ctx: &mut ActorContext, env: Envelope| {
//!         if let Some(n) = env.content.get::<u64>(0) {
//!             tracing::debug!(value = n, "tick");
//!             HandleOutcome::Continue
//!         } else {
//!             HandleOutcome::Unhandled
//!         }
//!     },
//!     SpawnOptions::default(),
//! )?;
//! ```

use serde::{Deserialize, Serialize};

use crate::actor_context::ActorContext;
use crate::exit_reason::ExitReason;
use crate::Envelope;

/// What the runtime does after a behavior consumed an envelope.
pub enum HandleOutcome {
    /// Keep the current behavior and continue with the next envelope.
    Continue,
    /// Swap in a new behavior for subsequent envelopes.
    ReplaceWith(Box<dyn Behavior>),
    /// Terminate the actor with the given reason.
    Terminate(ExitReason),
    /// The behavior did not match this message; the actor's
    /// [`UnhandledMessagePolicy`] decides what happens.
    Unhandled,
}

/// Per-actor policy for messages the behavior reports as unmatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnhandledMessagePolicy {
    /// Log at debug level and drop the envelope.
    #[default]
    DropSilently,
    /// Terminate the actor with [`ExitReason::UNHANDLED_MESSAGE`].
    ExitWithUnhandled,
}

/// The current message-handling function of an actor.
///
/// Invocations are strictly serial per actor; `&mut self` state needs no
/// further synchronization. A behavior must not block: sends, spawns and
/// lifecycle operations through [`ActorContext`] are all asynchronous.
pub trait Behavior: Send + 'static {
    /// Consumes exactly one envelope.
    fn handle(&mut self, ctx: &mut ActorContext, envelope: Envelope) -> HandleOutcome;
}

impl<F> Behavior for F
where
    F: FnMut(&mut ActorContext, Envelope) -> HandleOutcome + Send + 'static,
{
    fn handle(&mut self, ctx: &mut ActorContext, envelope: Envelope) -> HandleOutcome {
        self(ctx, envelope)
    }
}
