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

//! Request/response round trip between two actors

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use troupe_core::{
    make_message, ActorContext, ActorSystem, Envelope, ExitReason, HandleOutcome, SpawnOptions,
    SystemConfig,
};

#[test]
fn ping_pong_quiesces() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(2));
    let b_received = Arc::new(AtomicUsize::new(0));
    let a_received = Arc::new(AtomicUsize::new(0));

    let b = {
        let b_received = Arc::clone(&b_received);
        system
            .spawn(
                move |ctx: &mut ActorContext, env: Envelope| {
                    if env.content.get::<&str>(0) == Some(&"ping") {
                        b_received.fetch_add(1, Ordering::SeqCst);
                        ctx.reply(&env, make_message!("pong"));
                        HandleOutcome::Terminate(ExitReason::NORMAL)
                    } else {
                        HandleOutcome::Unhandled
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn b")
    };

    let a = {
        let a_received = Arc::clone(&a_received);
        let b = b.clone();
        system
            .spawn(
                move |ctx: &mut ActorContext, env: Envelope| {
                    match env.content.get::<&str>(0) {
                        Some(&"start") => {
                            ctx.send(&b, make_message!("ping"));
                            HandleOutcome::Continue
                        }
                        Some(&"pong") => {
                            a_received.fetch_add(1, Ordering::SeqCst);
                            HandleOutcome::Terminate(ExitReason::NORMAL)
                        }
                        _ => HandleOutcome::Unhandled,
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn a")
    };

    system.anon_send(&a, make_message!("start"));
    system.await_quiescence();

    assert_eq!(b_received.load(Ordering::SeqCst), 1);
    assert_eq!(a_received.load(Ordering::SeqCst), 1);
    assert_eq!(system.registry().running(), 0);
    system.shutdown();
}

#[test]
fn reply_correlates_requests() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(2));
    let correlated = Arc::new(AtomicUsize::new(0));

    let responder = system
        .spawn(
            |ctx: &mut ActorContext, env: Envelope| {
                ctx.reply(&env, make_message!(99u32));
                HandleOutcome::Terminate(ExitReason::NORMAL)
            },
            SpawnOptions::default(),
        )
        .expect("spawn responder");

    let requester = {
        let correlated = Arc::clone(&correlated);
        let responder = responder.clone();
        system
            .spawn(
                move |ctx: &mut ActorContext, env: Envelope| {
                    if env.content.get::<&str>(0) == Some(&"go") {
                        // issue a correlated request under our own identity
                        responder.enqueue(
                            Some(ctx.id()),
                            troupe_core::MessageId::make_request(7),
                            make_message!("payload"),
                        );
                        HandleOutcome::Continue
                    } else if env.mid.is_response() && env.mid.request_number() == 7 {
                        correlated.fetch_add(1, Ordering::SeqCst);
                        HandleOutcome::Terminate(ExitReason::NORMAL)
                    } else {
                        HandleOutcome::Unhandled
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn requester")
    };

    system.anon_send(&requester, make_message!("go"));
    system.await_quiescence();
    assert_eq!(correlated.load(Ordering::SeqCst), 1);
    system.shutdown();
}
