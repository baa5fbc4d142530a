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

//! Actor execution core for Troupe
//!
//! This crate is the load-bearing part of the runtime: the work-stealing
//! scheduler, the actor control block and lifecycle, the registry with
//! quiescence tracking, and the exit/link supervision protocol. Mailboxes
//! and messages come from `troupe-mailbox` and are re-exported here.
//!
//! ## Quick tour
//! ```rust,ignore
//! use troupe_core::{
//!     make_message, ActorSystem, HandleOutcome, SpawnOptions, SystemConfig,
//! };
//!
//! let system = ActorSystem::new(SystemConfig::default());
//! let greeter = system.spawn(
//!     |_ctx: &mut troupe_core::ActorContext, env: troupe_core::Envelope| {
//!         if let Some(name) = env.content.get::<String>(0) {
//!             tracing::info!(%name, "hello");
//!             HandleOutcome::Continue
//!         } else {
//!             HandleOutcome::Unhandled
//!         }
//!     },
//!     SpawnOptions::default(),
//! )?;
//! system.anon_send(&greeter, make_message!("world".to_string()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod actor_context;
mod behavior;
mod cell;
mod config;
mod error;
mod exit_reason;
mod observer;
mod registry;
mod scheduler;
mod system;
mod system_messages;

pub use actor_context::ActorContext;
pub use behavior::{Behavior, HandleOutcome, UnhandledMessagePolicy};
pub use cell::{ActorCell, Lifecycle, StrongHandle, WeakHandle};
pub use config::{SystemConfig, DEFAULT_EXECUTION_QUANTUM};
pub use error::SpawnError;
pub use exit_reason::ExitReason;
pub use observer::{NoopObserver, RuntimeObserver};
pub use registry::{NameMap, Registry};
pub use system::{ActorSystem, MessagePriority, SpawnOptions};
pub use system_messages::{DownMsg, ErrorMsg, ExitMsg, SysErrorCode};

// Re-export the messaging primitives so downstream crates depend on one
// surface, the way the facade crate presents it.
pub use troupe_mailbox::{
    make_message, ActorId, Envelope, Mailbox, MailboxState, MailboxStats, Message, MessageId,
    PushResult, INVALID_ACTOR_ID,
};
