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

//! Delivery-order guarantees under concurrent fan-in
//!
//! For any (sender, receiver) pair, messages must reach the receiver's
//! behavior in send order; across senders no order is promised.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use troupe_core::{
    make_message, ActorContext, ActorSystem, Envelope, ExitReason, HandleOutcome, SpawnOptions,
    SystemConfig,
};

const SENDERS: u64 = 10;
const PER_SENDER: u64 = 1_000;

#[test]
fn fan_in_preserves_per_sender_order() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(4));
    let reorderings = Arc::new(AtomicUsize::new(0));
    let delivered = Arc::new(AtomicUsize::new(0));

    let receiver = {
        let reorderings = Arc::clone(&reorderings);
        let delivered = Arc::clone(&delivered);
        let mut next_expected = vec![0u64; SENDERS as usize];
        let mut seen = 0u64;
        system
            .spawn(
                move |_ctx: &mut ActorContext, env: Envelope| {
                    let sender = *env.content.get::<u64>(0).expect("sender tag") as usize;
                    let seq = *env.content.get::<u64>(1).expect("sequence");
                    if next_expected[sender] != seq {
                        reorderings.fetch_add(1, Ordering::SeqCst);
                    }
                    next_expected[sender] += 1;
                    seen += 1;
                    delivered.fetch_add(1, Ordering::SeqCst);
                    if seen == SENDERS * PER_SENDER {
                        HandleOutcome::Terminate(ExitReason::NORMAL)
                    } else {
                        HandleOutcome::Continue
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn receiver")
    };

    let producers: Vec<_> = (0..SENDERS)
        .map(|sender| {
            let system = system.clone();
            let receiver = receiver.clone();
            thread::spawn(move || {
                for seq in 0..PER_SENDER {
                    system.anon_send(&receiver, make_message!(sender, seq));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    system.await_quiescence();
    assert_eq!(reorderings.load(Ordering::SeqCst), 0);
    assert_eq!(delivered.load(Ordering::SeqCst), (SENDERS * PER_SENDER) as usize);
    system.shutdown();
}

#[test]
fn sends_within_one_invocation_arrive_in_issue_order() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(2));
    let reorderings = Arc::new(AtomicUsize::new(0));

    let receiver = {
        let reorderings = Arc::clone(&reorderings);
        let mut expected = 0u64;
        system
            .spawn(
                move |_ctx: &mut ActorContext, env: Envelope| {
                    let seq = *env.content.get::<u64>(0).expect("sequence");
                    if seq != expected {
                        reorderings.fetch_add(1, Ordering::SeqCst);
                    }
                    expected += 1;
                    if expected == 200 {
                        HandleOutcome::Terminate(ExitReason::NORMAL)
                    } else {
                        HandleOutcome::Continue
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn receiver")
    };

    let burster = {
        let receiver = receiver.clone();
        system
            .spawn(
                move |ctx: &mut ActorContext, _env: Envelope| {
                    for seq in 0..200u64 {
                        ctx.send(&receiver, make_message!(seq));
                    }
                    HandleOutcome::Terminate(ExitReason::NORMAL)
                },
                SpawnOptions::default(),
            )
            .expect("spawn burster")
    };

    system.anon_send(&burster, make_message!("go"));
    system.await_quiescence();
    assert_eq!(reorderings.load(Ordering::SeqCst), 0);
    system.shutdown();
}
