//! Concurrent collision scan.
//!
//! Solid entities are *physical* targets; solid entities flagged dynamic are
//! also *movers*. Every mover is tested against every physical entity.
//!
//! The scan snapshots colliders on the calling thread, then fans the movers
//! out to a bounded pool of scoped workers through a shared work queue. Each
//! worker answers every mover it takes with exactly one completion message,
//! and the caller blocks until it has drained one completion per mover.
//! Workers only read the snapshot, so no locking is needed beyond the work
//! queue itself.

use std::sync::{mpsc, Mutex};
use std::thread;

use crate::collider::Collider;
use crate::traits::Collidable;
use crate::types::{EntityId, COLLISION_ENTITIES_PER_WORKER};

/// An unordered pair of colliding entities, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Collision {
    pub a: EntityId,
    pub b: EntityId,
}

impl Collision {
    pub fn new(x: EntityId, y: EntityId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }

    /// The participant that is not `id`.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Pool size for `dynamic` movers: one worker per
/// [`COLLISION_ENTITIES_PER_WORKER`] movers, at least one, at most
/// `max_workers`.
pub fn worker_count(dynamic: usize, max_workers: usize) -> usize {
    (dynamic / COLLISION_ENTITIES_PER_WORKER)
        .max(1)
        .min(max_workers.max(1))
}

/// Detect every collision between movers and physical entities.
///
/// The result is sorted and holds each pair once, no matter how many workers
/// saw it or whether both participants were movers.
pub fn scan_collisions<'a, C, I>(items: I, max_workers: usize) -> Vec<Collision>
where
    C: Collidable + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let mut physical: Vec<(EntityId, Collider)> = Vec::new();
    let mut dynamic: Vec<(EntityId, Collider)> = Vec::new();
    for item in items {
        if !item.is_solid() {
            continue;
        }
        let entry = (item.entity_id(), item.collider());
        if item.is_dynamic() {
            dynamic.push(entry.clone());
        }
        physical.push(entry);
    }

    if dynamic.is_empty() || physical.len() < 2 {
        return Vec::new();
    }

    let workers = worker_count(dynamic.len(), max_workers);
    tracing::trace!(
        dynamic = dynamic.len(),
        physical = physical.len(),
        workers,
        "collision scan"
    );

    let mut found = run_pool(&dynamic, &physical, workers);
    found.sort_unstable();
    found.dedup();
    found
}

fn run_pool(
    dynamic: &[(EntityId, Collider)],
    physical: &[(EntityId, Collider)],
    workers: usize,
) -> Vec<Collision> {
    let (work_tx, work_rx) = mpsc::channel::<usize>();
    let (done_tx, done_rx) = mpsc::channel::<Vec<Collision>>();

    for i in 0..dynamic.len() {
        // The receiver lives until the end of this function.
        let _ = work_tx.send(i);
    }
    drop(work_tx);
    let work_rx = Mutex::new(work_rx);

    thread::scope(|s| {
        for _ in 0..workers {
            let done_tx = done_tx.clone();
            let work_rx = &work_rx;
            s.spawn(move || loop {
                let next = match work_rx.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };
                let Ok(i) = next else {
                    break;
                };
                let (id, collider) = &dynamic[i];
                let hits = physical
                    .iter()
                    .filter(|(other, c)| other != id && collider.collide_with(c))
                    .map(|(other, _)| Collision::new(*id, *other))
                    .collect();
                if done_tx.send(hits).is_err() {
                    break;
                }
            });
        }
        drop(done_tx);

        // Completion barrier: one message per mover.
        let mut found = Vec::new();
        for _ in 0..dynamic.len() {
            match done_rx.recv() {
                Ok(hits) => found.extend(hits),
                Err(_) => break,
            }
        }
        found
    })
}
