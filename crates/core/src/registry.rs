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

//! Actor registry: id and name lookup, liveness tracking, quiescence
//!
//! ## Purpose
//! Associates actors with ids and well-known names so collaborators can
//! resolve handles independent of spawn order, and tracks the set of
//! *running* actors so callers can await quiescence (running count reaching
//! an expected value).
//!
//! ## Locking
//! The id and name maps sit behind reader-writer locks: lookups vastly
//! outnumber registrations and must not serialize against each other. The
//! running set uses a mutex + condvar because its writers are rare and its
//! waiters need waking.
//!
//! Lookups return `Option`; a missing entry is "no such actor", never an
//! error.

use std::collections::{HashMap, HashSet};

use parking_lot::{Condvar, Mutex, RwLock};

use crate::cell::StrongHandle;
use crate::ActorId;

/// Snapshot type returned by [`Registry::named_actors`].
pub type NameMap = HashMap<String, StrongHandle>;

/// Name/id ↔ actor mapping with liveness tracking.
pub struct Registry {
    entries: RwLock<HashMap<ActorId, StrongHandle>>,
    named_entries: RwLock<NameMap>,
    running: Mutex<HashSet<ActorId>>,
    running_cv: Condvar,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Registry {
            entries: RwLock::new(HashMap::new()),
            named_entries: RwLock::new(HashMap::new()),
            running: Mutex::new(HashSet::new()),
            running_cv: Condvar::new(),
        }
    }

    /// Associates a local actor with its id.
    pub fn put_id(&self, id: ActorId, handle: StrongHandle) {
        self.entries.write().insert(id, handle);
    }

    /// Returns the actor registered under `id`, or `None`.
    pub fn get_id(&self, id: ActorId) -> Option<StrongHandle> {
        self.entries.read().get(&id).cloned()
    }

    /// Removes an id mapping. Also removes the id from the running set via
    /// [`dec_running`](Registry::dec_running), broadcasting the quiescence
    /// condition if the set shrank.
    pub fn erase_id(&self, id: ActorId) {
        self.entries.write().remove(&id);
        self.dec_running(id);
    }

    /// Associates an actor with a well-known name.
    pub fn put_name(&self, name: impl Into<String>, handle: StrongHandle) {
        self.named_entries.write().insert(name.into(), handle);
    }

    /// Returns the actor registered under `name`, or `None`.
    pub fn get_name(&self, name: &str) -> Option<StrongHandle> {
        self.named_entries.read().get(name).cloned()
    }

    /// Removes a name mapping.
    pub fn erase_name(&self, name: &str) {
        self.named_entries.write().remove(name);
    }

    /// Drops every name entry that points at `id`.
    pub(crate) fn erase_names_of(&self, id: ActorId) {
        self.named_entries
            .write()
            .retain(|_, handle| handle.id() != id);
    }

    /// A consistent point-in-time copy of the name map.
    pub fn named_actors(&self) -> NameMap {
        self.named_entries.read().clone()
    }

    /// Adds `id` to the running set. Returns the new count.
    ///
    /// Invariant: happens before the actor's first observable activity.
    pub fn inc_running(&self, id: ActorId) -> usize {
        let mut running = self.running.lock();
        running.insert(id);
        running.len()
    }

    /// Removes `id` from the running set, broadcasting the quiescence
    /// condition on change. Returns the new count.
    ///
    /// Invariant: happens as part of Terminating → Retired.
    pub fn dec_running(&self, id: ActorId) -> usize {
        let mut running = self.running.lock();
        if running.remove(&id) {
            tracing::trace!(actor_id = id, remaining = running.len(), "actor retired");
            self.running_cv.notify_all();
        }
        running.len()
    }

    /// Number of currently running actors.
    pub fn running(&self) -> usize {
        self.running.lock().len()
    }

    /// Snapshot of the ids of all currently running actors.
    pub fn running_ids(&self) -> HashSet<ActorId> {
        self.running.lock().clone()
    }

    /// Blocks the caller until the running count equals `expected`.
    ///
    /// Must only be called from outside the worker pool; behaviors never
    /// block.
    pub fn await_running_count_equal(&self, expected: usize) {
        let mut running = self.running.lock();
        while running.len() != expected {
            self.running_cv.wait(&mut running);
        }
    }

    /// Like [`await_running_count_equal`](Registry::await_running_count_equal),
    /// additionally invoking `cb` with the new count every time the running
    /// set shrinks. Used for drain progress reporting.
    pub fn await_running_count_equal_with(&self, expected: usize, mut cb: impl FnMut(usize)) {
        let mut running = self.running.lock();
        while running.len() != expected {
            let before = running.len();
            self.running_cv.wait(&mut running);
            if running.len() < before {
                cb(running.len());
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
