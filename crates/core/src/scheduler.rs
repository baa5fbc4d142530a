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

//! Work-stealing scheduler
//!
//! ## Architecture
//! A fixed pool of N OS threads. Each worker owns a FIFO deque; a global
//! injection queue feeds the pool from external threads. A worker that runs
//! dry steals from the injector first, then from randomly chosen peers with
//! bounded retries (2·N attempts), then parks on a condition variable.
//! Any scheduling wakes one parked worker.
//!
//! ## Scheduling unit
//! The unit of work is a ready actor (its [`StrongHandle`]). An actor is
//! ready iff its mailbox is non-empty and it is not currently executing;
//! the mailbox state machine guarantees at most one ready-token per actor,
//! which in turn guarantees strictly serial per-actor execution.
//!
//! ## Quantum
//! A worker dispatches at most `execution_quantum` envelopes to one actor
//! before requeueing it, bounding the latency a chatty actor can inflict on
//! its neighbors.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use parking_lot::{Condvar, Mutex};
use rand::Rng;

use crate::actor_context::ActorContext;
use crate::behavior::{Behavior, HandleOutcome, UnhandledMessagePolicy};
use crate::cell::StrongHandle;
use crate::exit_reason::ExitReason;
use crate::system::{ActorSystem, SystemState};
use crate::system_messages::ExitMsg;
use crate::{Envelope, MailboxState};

/// Distinguishes worker threads of different pools living in one process.
static NEXT_POOL_ID: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static LOCAL_QUEUE: RefCell<Option<LocalQueue>> = const { RefCell::new(None) };
}

struct LocalQueue {
    pool_id: usize,
    deque: Rc<Worker<StrongHandle>>,
}

pub(crate) struct Scheduler {
    pool_id: usize,
    injector: Injector<StrongHandle>,
    stealers: Vec<Stealer<StrongHandle>>,
    parked: AtomicUsize,
    park_lock: Mutex<()>,
    park_cv: Condvar,
    stop: AtomicBool,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Builds the scheduler plus the per-worker deques. The deques are
    /// handed back separately because each one moves into its worker thread
    /// in [`start`](Scheduler::start).
    pub(crate) fn new(worker_count: usize) -> (Self, Vec<Worker<StrongHandle>>) {
        let locals: Vec<Worker<StrongHandle>> =
            (0..worker_count).map(|_| Worker::new_fifo()).collect();
        let stealers = locals.iter().map(Worker::stealer).collect();
        let scheduler = Scheduler {
            pool_id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            injector: Injector::new(),
            stealers,
            parked: AtomicUsize::new(0),
            park_lock: Mutex::new(()),
            park_cv: Condvar::new(),
            stop: AtomicBool::new(false),
            threads: Mutex::new(Vec::new()),
        };
        (scheduler, locals)
    }

    /// Spawns the worker threads.
    pub(crate) fn start(&self, locals: Vec<Worker<StrongHandle>>, state: &Arc<SystemState>) {
        let mut threads = self.threads.lock();
        for (index, local) in locals.into_iter().enumerate() {
            let state = Arc::clone(state);
            let handle = std::thread::Builder::new()
                .name(format!("troupe-worker-{index}"))
                .spawn(move || worker_loop(index, local, state))
                .expect("failed to spawn worker thread");
            threads.push(handle);
        }
    }

    /// Makes `handle` ready: pushes it onto the local deque when called from
    /// a thread of this pool, onto the global injection queue otherwise, and
    /// wakes a parked worker either way.
    pub(crate) fn schedule(&self, handle: StrongHandle) {
        let queued_locally = LOCAL_QUEUE.with(|slot| {
            if let Some(local) = slot.borrow().as_ref() {
                if local.pool_id == self.pool_id {
                    local.deque.push(handle.clone());
                    return true;
                }
            }
            false
        });
        if !queued_locally {
            self.injector.push(handle);
        }
        if self.parked.load(Ordering::SeqCst) > 0 {
            let _guard = self.park_lock.lock();
            self.park_cv.notify_one();
        }
    }

    /// Stops and joins the pool. Idempotent.
    pub(crate) fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
        {
            let _guard = self.park_lock.lock();
            self.park_cv.notify_all();
        }
        let threads = std::mem::take(&mut *self.threads.lock());
        for handle in threads {
            let _ = handle.join();
        }
    }

    fn find_task(&self, index: usize, local: &Worker<StrongHandle>) -> Option<StrongHandle> {
        if let Some(task) = local.pop() {
            return Some(task);
        }
        loop {
            match self.injector.steal_batch_and_pop(local) {
                Steal::Success(task) => return Some(task),
                Steal::Empty => break,
                Steal::Retry => continue,
            }
        }
        let peers = self.stealers.len();
        if peers <= 1 {
            return None;
        }
        let mut rng = rand::thread_rng();
        let mut attempts = 0;
        while attempts < 2 * peers {
            let victim = rng.gen_range(0..peers);
            if victim == index {
                attempts += 1;
                continue;
            }
            match self.stealers[victim].steal() {
                Steal::Success(task) => return Some(task),
                Steal::Empty | Steal::Retry => attempts += 1,
            }
        }
        None
    }

    /// Parks until any enqueue wakes the pool or shutdown begins. Re-checks
    /// the injector under the park lock so a push racing the park cannot be
    /// missed.
    fn park(&self) {
        let mut guard = self.park_lock.lock();
        if self.stop.load(Ordering::SeqCst) || !self.injector.is_empty() {
            return;
        }
        self.parked.fetch_add(1, Ordering::SeqCst);
        self.park_cv.wait(&mut guard);
        self.parked.fetch_sub(1, Ordering::SeqCst);
    }
}

fn worker_loop(index: usize, local: Worker<StrongHandle>, state: Arc<SystemState>) {
    let deque = Rc::new(local);
    LOCAL_QUEUE.with(|slot| {
        *slot.borrow_mut() = Some(LocalQueue {
            pool_id: state.scheduler.pool_id,
            deque: Rc::clone(&deque),
        });
    });
    let system = ActorSystem::from_state(Arc::clone(&state));
    let quantum = state.config.execution_quantum;
    loop {
        if state.scheduler.stop.load(Ordering::SeqCst) {
            break;
        }
        match state.scheduler.find_task(index, &deque) {
            Some(handle) => run_actor(&system, &handle, quantum),
            None => state.scheduler.park(),
        }
    }
    LOCAL_QUEUE.with(|slot| slot.borrow_mut().take());
}

enum Flow {
    Continue,
    Terminate(ExitReason),
}

/// Dispatches up to `quantum` envelopes to one actor.
///
/// The behavior slot stays locked for the entire quantum. That lock is what
/// hands the actor off cleanly: a worker woken by a push that raced this
/// worker's final empty pop blocks for the few instructions it takes to
/// release the slot, then proceeds with a coherent mailbox view.
fn run_actor(system: &ActorSystem, handle: &StrongHandle, quantum: usize) {
    let state = system.state();
    let cell = handle.cell();
    let mut slot = cell.behavior.lock();
    if slot.is_none() {
        // terminated while the ready-token was in flight
        return;
    }
    state.observer.actor_scheduled(handle.id());
    cell.mark_running();
    let mut ctx = ActorContext::new(system.clone(), handle.clone());
    for _ in 0..quantum {
        let Some(envelope) = cell.mailbox.pop() else {
            // mailbox is now Blocked (or Closed); the next push reschedules
            return;
        };
        let behavior = slot.as_mut().expect("behavior present until termination");
        match dispatch(&mut ctx, behavior, envelope) {
            Flow::Continue => {}
            Flow::Terminate(reason) => {
                *slot = None;
                drop(slot);
                state.terminate(handle, reason);
                return;
            }
        }
    }
    drop(slot);
    // quantum exhausted: requeue if more work is pending
    if cell.mailbox.state() == MailboxState::Ready {
        state.scheduler.schedule(handle.clone());
    }
}

fn dispatch(
    ctx: &mut ActorContext,
    behavior: &mut Box<dyn Behavior>,
    envelope: Envelope,
) -> Flow {
    let cell = Arc::clone(ctx.self_handle().cell());
    if !cell.traps_exit() {
        if let Some(exit) = envelope.content.get::<ExitMsg>(0) {
            if exit.reason.is_normal() {
                return Flow::Continue;
            }
            return Flow::Terminate(exit.reason);
        }
    }
    match behavior.handle(ctx, envelope) {
        HandleOutcome::Continue => Flow::Continue,
        HandleOutcome::ReplaceWith(next) => {
            *behavior = next;
            Flow::Continue
        }
        HandleOutcome::Terminate(reason) => Flow::Terminate(reason),
        HandleOutcome::Unhandled => match cell.unhandled_policy {
            UnhandledMessagePolicy::DropSilently => {
                tracing::debug!(actor_id = ctx.id(), "unhandled message dropped");
                Flow::Continue
            }
            UnhandledMessagePolicy::ExitWithUnhandled => {
                tracing::debug!(actor_id = ctx.id(), "unhandled message, exiting");
                Flow::Terminate(ExitReason::UNHANDLED_MESSAGE)
            }
        },
    }
}
