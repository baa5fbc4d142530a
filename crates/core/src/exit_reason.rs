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

//! Exit reasons for actor termination
//!
//! ## Purpose
//! Records why an actor terminated and drives link/monitor propagation:
//! non-normal reasons cascade along links, while monitors are notified of
//! every termination regardless of reason.
//!
//! A reason is any 32-bit value; `0` means *normal*. User code is free to
//! define its own codes above [`ExitReason::USER_DEFINED`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an actor terminated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitReason(u32);

impl ExitReason {
    /// Normal termination; does not propagate along links.
    pub const NORMAL: ExitReason = ExitReason(0);
    /// The actor received a message its behavior did not handle and its
    /// policy was `ExitWithUnhandled`.
    pub const UNHANDLED_MESSAGE: ExitReason = ExitReason(1);
    /// Graceful shutdown was requested.
    pub const USER_SHUTDOWN: ExitReason = ExitReason(2);
    /// The actor was asked to terminate unconditionally.
    pub const KILL: ExitReason = ExitReason(3);
    /// First code available for application-defined reasons.
    pub const USER_DEFINED: ExitReason = ExitReason(16);

    /// Builds a reason from a raw 32-bit code.
    pub const fn from_code(code: u32) -> Self {
        ExitReason(code)
    }

    /// The raw 32-bit code.
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Whether this is a normal (non-error) exit.
    pub const fn is_normal(self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitReason {
    fn default() -> Self {
        ExitReason::NORMAL
    }
}

impl fmt::Debug for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ExitReason::NORMAL => write!(f, "ExitReason::NORMAL"),
            ExitReason::UNHANDLED_MESSAGE => write!(f, "ExitReason::UNHANDLED_MESSAGE"),
            ExitReason::USER_SHUTDOWN => write!(f, "ExitReason::USER_SHUTDOWN"),
            ExitReason::KILL => write!(f, "ExitReason::KILL"),
            ExitReason(code) => write!(f, "ExitReason({code})"),
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
