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

//! System shutdown: drain, worker join, spawn refusal, no leaked cells

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use troupe_core::{
    make_message, ActorContext, ActorSystem, Envelope, ExitReason, HandleOutcome, SpawnError,
    SpawnOptions, SystemConfig,
};

const ACTORS: usize = 300;
const SELF_MESSAGES: u64 = 100;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn shutdown_under_load_drains_and_joins() {
    init_tracing();
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(4));
    let processed = Arc::new(AtomicUsize::new(0));

    let mut weaks = Vec::with_capacity(ACTORS);
    for _ in 0..ACTORS {
        let processed = Arc::clone(&processed);
        let handle = system
            .spawn(
                move |ctx: &mut ActorContext, env: Envelope| {
                    if env.content.get::<&str>(0) == Some(&"kick") {
                        let me = ctx.self_handle().clone();
                        for seq in 0..SELF_MESSAGES {
                            ctx.send(&me, make_message!(seq));
                        }
                        return HandleOutcome::Continue;
                    }
                    let seq = *env.content.get::<u64>(0).expect("sequence");
                    processed.fetch_add(1, Ordering::SeqCst);
                    if seq == SELF_MESSAGES - 1 {
                        HandleOutcome::Terminate(ExitReason::NORMAL)
                    } else {
                        HandleOutcome::Continue
                    }
                },
                SpawnOptions::default(),
            )
            .expect("spawn self-messaging actor");
        system.anon_send(&handle, make_message!("kick"));
        weaks.push(handle.downgrade());
        // strong handle dropped here: only the registry keeps the actor alive
    }

    system.shutdown();

    assert_eq!(
        processed.load(Ordering::SeqCst),
        ACTORS * SELF_MESSAGES as usize
    );
    assert_eq!(system.registry().running(), 0);
    // all control blocks retired from the registry and reclaimed
    for weak in &weaks {
        assert!(weak.upgrade().is_none(), "control block leaked");
    }
}

#[test]
fn spawn_refused_after_shutdown() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(1));
    system.shutdown();
    assert!(system.is_shutting_down());
    let result = system.spawn(
        |_ctx: &mut ActorContext, _env: Envelope| HandleOutcome::Continue,
        SpawnOptions::default(),
    );
    assert!(matches!(result, Err(SpawnError::SystemShuttingDown)));
}

#[test]
fn shutdown_is_idempotent() {
    let system = ActorSystem::new(SystemConfig::default().with_worker_count(1));
    let actor = system
        .spawn(
            |_ctx: &mut ActorContext, _env: Envelope| HandleOutcome::Terminate(ExitReason::NORMAL),
            SpawnOptions::default(),
        )
        .expect("spawn");
    system.anon_send(&actor, make_message!("go"));
    system.shutdown();
    system.shutdown();
    assert_eq!(system.registry().running(), 0);
}
