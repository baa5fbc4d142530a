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

//! Quiescence: the running set draining to an expected count

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use troupe_core::{
    make_message, ActorContext, ActorSystem, Envelope, ExitReason, HandleOutcome, SpawnOptions,
    SystemConfig,
};

const ACTORS: usize = 50;

fn spawn_one_shot(system: &ActorSystem) -> troupe_core::StrongHandle {
    system
        .spawn(
            |_ctx: &mut ActorContext, _env: Envelope| HandleOutcome::Terminate(ExitReason::NORMAL),
            SpawnOptions::default(),
        )
        .expect("spawn one-shot actor")
}

#[test]
fn await_returns_after_all_terminate() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(4));
    let handles: Vec<_> = (0..ACTORS).map(|_| spawn_one_shot(&system)).collect();
    assert_eq!(system.registry().running(), ACTORS);

    for handle in &handles {
        system.anon_send(handle, make_message!("go"));
    }
    system.registry().await_running_count_equal(0);
    assert_eq!(system.registry().running(), 0);
    system.shutdown();
}

#[test]
fn callback_flavor_reports_drain_progress() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(4));
    let handles: Vec<_> = (0..ACTORS).map(|_| spawn_one_shot(&system)).collect();

    let shrinks = Arc::new(AtomicUsize::new(0));
    let waiter = {
        let system = system.clone();
        let shrinks = Arc::clone(&shrinks);
        std::thread::spawn(move || {
            let mut last = usize::MAX;
            system.registry().await_running_count_equal_with(0, |count| {
                shrinks.fetch_add(1, Ordering::SeqCst);
                // counts reported by shrink callbacks are monotonically
                // decreasing
                assert!(count < last);
                last = count;
            });
        })
    };

    for handle in &handles {
        system.anon_send(handle, make_message!("go"));
    }
    waiter.join().unwrap();
    // wakeups may coalesce several decrements, but at least one shrink is
    // always observed and the set is empty afterwards
    assert!(shrinks.load(Ordering::SeqCst) >= 1);
    assert_eq!(system.registry().running(), 0);
    system.shutdown();
}

#[test]
fn running_ids_snapshot_matches() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(2));
    let handles: Vec<_> = (0..5).map(|_| spawn_one_shot(&system)).collect();
    let ids = system.registry().running_ids();
    for handle in &handles {
        assert!(ids.contains(&handle.id()));
    }
    for handle in &handles {
        system.anon_send(handle, make_message!("go"));
    }
    system.await_quiescence();
    assert!(system.registry().running_ids().is_empty());
    system.shutdown();
}
