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

//! At most one worker executes a given actor at any moment

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use troupe_core::{
    make_message, ActorContext, ActorSystem, Envelope, ExitReason, HandleOutcome, RuntimeObserver,
    SpawnOptions, SystemConfig,
};

const SENDERS: usize = 4;
const PER_SENDER: u64 = 500;

#[test]
fn no_concurrent_behavior_invocations() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(4));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let violations = Arc::new(AtomicUsize::new(0));

    let target = {
        let in_flight = Arc::clone(&in_flight);
        let violations = Arc::clone(&violations);
        let mut seen = 0u64;
        system
            .spawn(
                move |_ctx: &mut ActorContext, _env: Envelope| {
                    if in_flight.fetch_add(1, Ordering::SeqCst) != 0 {
                        violations.fetch_add(1, Ordering::SeqCst);
                    }
                    // widen the window a concurrent invocation would need
                    std::hint::spin_loop();
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    seen += 1;
                    if seen == (SENDERS as u64) * PER_SENDER {
                        HandleOutcome::Terminate(ExitReason::NORMAL)
                    } else {
                        HandleOutcome::Continue
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn target")
    };

    let producers: Vec<_> = (0..SENDERS)
        .map(|_| {
            let system = system.clone();
            let target = target.clone();
            thread::spawn(move || {
                for seq in 0..PER_SENDER {
                    system.anon_send(&target, make_message!(seq));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    system.await_quiescence();
    assert_eq!(violations.load(Ordering::SeqCst), 0);
    system.shutdown();
}

/// Counts hook invocations to check the observer wiring.
struct CountingObserver {
    enqueued: AtomicUsize,
    scheduled: AtomicUsize,
    terminated: AtomicUsize,
}

impl RuntimeObserver for CountingObserver {
    fn message_enqueued(&self, _receiver: troupe_core::ActorId, _mid: troupe_core::MessageId) {
        self.enqueued.fetch_add(1, Ordering::SeqCst);
    }

    fn actor_scheduled(&self, _id: troupe_core::ActorId) {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
    }

    fn actor_terminated(&self, _id: troupe_core::ActorId, _reason: ExitReason) {
        self.terminated.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn observer_hooks_fire() {
    let observer = Arc::new(CountingObserver {
        enqueued: AtomicUsize::new(0),
        scheduled: AtomicUsize::new(0),
        terminated: AtomicUsize::new(0),
    });
    let system = ActorSystem::with_observer(
        SystemConfig::default().with_worker_count(2),
        Arc::clone(&observer) as Arc<dyn RuntimeObserver>,
    );

    let actor = system
        .spawn(
            |_ctx: &mut ActorContext, _env: Envelope| HandleOutcome::Terminate(ExitReason::NORMAL),
            SpawnOptions::default(),
        )
        .expect("spawn");
    system.anon_send(&actor, make_message!("go"));
    system.await_quiescence();
    system.shutdown();

    assert_eq!(observer.enqueued.load(Ordering::SeqCst), 1);
    // initial activation run plus the wakeup for the message
    assert!(observer.scheduled.load(Ordering::SeqCst) >= 1);
    assert_eq!(observer.terminated.load(Ordering::SeqCst), 1);
}
