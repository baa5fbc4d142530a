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

//! Error types surfaced by the core
//!
//! Message delivery is deliberately infallible from the sender's point of
//! view (observability goes through link/monitor messages), so the only
//! fallible entry point is `spawn`.

/// Errors returned by [`ActorSystem::spawn`](crate::ActorSystem::spawn).
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// Shutdown has been initiated; the system no longer accepts spawns.
    #[error("system is shutting down, spawn refused")]
    SystemShuttingDown,
}
