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

//! System configuration

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::behavior::UnhandledMessagePolicy;

/// Number of envelopes a worker dispatches to one actor before yielding.
pub const DEFAULT_EXECUTION_QUANTUM: usize = 64;

/// Configuration recognized by the actor core.
///
/// ## Example
/// ```
/// use troupe_core::{SystemConfig, UnhandledMessagePolicy};
///
/// let config = SystemConfig::default()
///     .with_worker_count(4)
///     .with_unhandled_message_policy(UnhandledMessagePolicy::ExitWithUnhandled);
/// assert_eq!(config.worker_count, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Workers in the scheduler pool. Defaults to hardware concurrency.
    pub worker_count: usize,
    /// Envelopes per dispatch before an actor yields its worker.
    pub execution_quantum: usize,
    /// System-wide default for unmatched messages; overridable per actor at
    /// spawn time.
    pub unhandled_message_policy: UnhandledMessagePolicy,
    /// Optional mailbox capacity cap. `None` means unbounded. When a capped
    /// mailbox overflows, the envelope is dropped and the sender receives a
    /// system error message.
    pub max_mailbox_size: Option<usize>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            worker_count: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            execution_quantum: DEFAULT_EXECUTION_QUANTUM,
            unhandled_message_policy: UnhandledMessagePolicy::DropSilently,
            max_mailbox_size: None,
        }
    }
}

impl SystemConfig {
    /// Sets the worker pool size (clamped to at least one).
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    /// Sets the execution quantum (clamped to at least one).
    pub fn with_execution_quantum(mut self, quantum: usize) -> Self {
        self.execution_quantum = quantum.max(1);
        self
    }

    /// Sets the system-wide unhandled-message policy.
    pub fn with_unhandled_message_policy(mut self, policy: UnhandledMessagePolicy) -> Self {
        self.unhandled_message_policy = policy;
        self
    }

    /// Caps every mailbox at `size` envelopes.
    pub fn with_max_mailbox_size(mut self, size: usize) -> Self {
        self.max_mailbox_size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SystemConfig::default();
        assert!(config.worker_count >= 1);
        assert_eq!(config.execution_quantum, DEFAULT_EXECUTION_QUANTUM);
        assert_eq!(
            config.unhandled_message_policy,
            UnhandledMessagePolicy::DropSilently
        );
        assert_eq!(config.max_mailbox_size, None);
    }

    #[test]
    fn builders_clamp() {
        let config = SystemConfig::default()
            .with_worker_count(0)
            .with_execution_quantum(0);
        assert_eq!(config.worker_count, 1);
        assert_eq!(config.execution_quantum, 1);
    }
}
