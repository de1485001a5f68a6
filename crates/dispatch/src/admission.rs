// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Notify, Semaphore};
use tracing::trace;

use gcs_types::MethodId;

use crate::descriptor::{AdmissionPolicy, MethodDescriptorTable};

/// Result of a non-blocking admission attempt.
#[derive(Debug)]
pub enum AdmissionOutcome {
    /// The call may start now. The token, if any, must be held until the call
    /// completes; dropping it releases the slot.
    Admitted(Option<SlotToken>),
    /// The method's slot pool is saturated. The call must be parked and
    /// re-evaluated on a later dispatch pass.
    WouldBlock,
}

/// Holds one in-use slot of a bounded method. Releasing is tied to `Drop` so
/// the slot cannot leak on any completion or failure path; releasing also
/// wakes the dispatch loop so a parked call can be re-evaluated.
#[derive(Debug)]
pub struct SlotToken {
    method: MethodId,
    permit: Option<tokio::sync::OwnedSemaphorePermit>,
    released: Arc<Notify>,
}

impl Drop for SlotToken {
    fn drop(&mut self) {
        drop(self.permit.take());
        trace!(method = %self.method, "admission slot released");
        // Wake one dispatch worker to re-evaluate parked calls. The permit is
        // returned first, so the woken worker observes the free slot.
        self.released.notify_one();
    }
}

struct SlotPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Per-method bounded slot pools. Shared mutable state of the dispatch layer;
/// `try_acquire`/release pairs are atomic through the underlying semaphores.
pub struct AdmissionController {
    pools: HashMap<MethodId, SlotPool>,
    released: Arc<Notify>,
}

impl AdmissionController {
    /// Build the slot pools from the registered descriptors. Unbounded
    /// methods get no pool and are never counted.
    pub fn new(table: &MethodDescriptorTable) -> Self {
        let pools = table
            .iter()
            .filter_map(|descriptor| match descriptor.policy() {
                AdmissionPolicy::Bounded(capacity) => Some((
                    descriptor.method(),
                    SlotPool {
                        semaphore: Arc::new(Semaphore::new(capacity)),
                        capacity,
                    },
                )),
                AdmissionPolicy::Unbounded => None,
            })
            .collect();
        Self {
            pools,
            released: Arc::new(Notify::new()),
        }
    }

    /// Attempt to admit a call of `method`. Never blocks the calling thread.
    pub fn try_acquire(&self, method: MethodId) -> AdmissionOutcome {
        let Some(pool) = self.pools.get(&method) else {
            return AdmissionOutcome::Admitted(None);
        };
        match pool.semaphore.clone().try_acquire_owned() {
            Ok(permit) => AdmissionOutcome::Admitted(Some(SlotToken {
                method,
                permit: Some(permit),
                released: Arc::clone(&self.released),
            })),
            Err(_) => AdmissionOutcome::WouldBlock,
        }
    }

    /// Resolves on the next slot release. Wake-ups are edge-triggered and a
    /// pending wake-up is stored, so a release that races with a worker that
    /// is not yet waiting is not lost.
    pub async fn slot_released(&self) {
        self.released.notified().await;
    }

    /// In-use slot count of a bounded method; `None` for unbounded methods.
    pub fn in_flight(&self, method: MethodId) -> Option<usize> {
        self.pools
            .get(&method)
            .map(|pool| pool.capacity - pool.semaphore.available_permits())
    }

    /// Capacity of a bounded method; `None` for unbounded methods.
    pub fn capacity(&self, method: MethodId) -> Option<usize> {
        self.pools.get(&method).map(|pool| pool.capacity)
    }
}

static_assertions::assert_impl_all!(AdmissionController: Send, Sync);
static_assertions::assert_impl_all!(SlotToken: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    use crate::descriptor::MethodDescriptorTable;

    fn controller_with(method: MethodId, policy: AdmissionPolicy) -> AdmissionController {
        let mut table = MethodDescriptorTable::default();
        table.register(method, policy).unwrap();
        AdmissionController::new(&table)
    }

    #[test]
    fn bounded_pool_grants_up_to_capacity() {
        let controller = controller_with(MethodId::GetActorInfo, AdmissionPolicy::Bounded(2));

        let first = controller.try_acquire(MethodId::GetActorInfo);
        let second = controller.try_acquire(MethodId::GetActorInfo);
        assert!(matches!(first, AdmissionOutcome::Admitted(Some(_))));
        assert!(matches!(second, AdmissionOutcome::Admitted(Some(_))));
        assert_eq!(controller.in_flight(MethodId::GetActorInfo), Some(2));

        assert!(matches!(
            controller.try_acquire(MethodId::GetActorInfo),
            AdmissionOutcome::WouldBlock
        ));

        // releasing one slot makes the method acquirable again
        drop(first);
        assert_eq!(controller.in_flight(MethodId::GetActorInfo), Some(1));
        assert!(matches!(
            controller.try_acquire(MethodId::GetActorInfo),
            AdmissionOutcome::Admitted(Some(_))
        ));
    }

    #[test]
    fn unbounded_method_is_admitted_without_a_pool() {
        let controller = controller_with(MethodId::RegisterActor, AdmissionPolicy::Unbounded);

        for _ in 0..1000 {
            let outcome = controller.try_acquire(MethodId::RegisterActor);
            assert!(matches!(outcome, AdmissionOutcome::Admitted(None)));
        }
        assert_eq!(controller.in_flight(MethodId::RegisterActor), None);
        assert_eq!(controller.capacity(MethodId::RegisterActor), None);
    }

    #[tokio::test]
    async fn slot_release_wakes_a_waiter() {
        let controller = Arc::new(controller_with(
            MethodId::GetActorInfo,
            AdmissionPolicy::Bounded(1),
        ));

        let AdmissionOutcome::Admitted(token) = controller.try_acquire(MethodId::GetActorInfo)
        else {
            panic!("first acquisition must be granted");
        };

        let waiter = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.slot_released().await })
        };

        drop(token);
        // The stored wake-up must let the waiter through even if it subscribed
        // after the release.
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter must be woken")
            .unwrap();
        assert_eq!(controller.in_flight(MethodId::GetActorInfo), Some(0));
    }
}
