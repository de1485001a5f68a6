// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use metrics::{counter, gauge};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use gcs_types::MethodId;

use crate::admission::{AdmissionController, AdmissionOutcome};
use crate::call::{CallState, InboundCall};
use crate::metric_definitions::{DISPATCH_ADMITTED, DISPATCH_PARKED, DISPATCH_RECEIVED};
use crate::service::ServiceRegistry;
use crate::transport::CallSource;
use crate::SlotToken;

/// Pulls calls off the transport, runs them through admission, and spawns the
/// admitted ones onto their handlers. Safe to drive from several worker tasks
/// over the same instance.
pub(crate) struct Dispatcher {
    admission: Arc<AdmissionController>,
    registry: ServiceRegistry,
    // calls waiting for a slot, FIFO per method
    parked: Mutex<HashMap<MethodId, VecDeque<InboundCall>>>,
}

impl Dispatcher {
    pub(crate) fn new(admission: Arc<AdmissionController>, registry: ServiceRegistry) -> Self {
        Self {
            admission,
            registry,
            parked: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch loop of one worker. Returns when the source is exhausted or
    /// the token is cancelled; parked calls that never got a slot are dropped
    /// at that point and their callers observe a closed channel.
    pub(crate) async fn run<S>(self: Arc<Self>, source: Arc<S>, shutdown: CancellationToken)
    where
        S: CallSource,
    {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("dispatch worker shutting down");
                    return;
                }
                _ = self.admission.slot_released() => {
                    self.admit_parked();
                }
                call = source.next_call() => {
                    let Some(call) = call else {
                        debug!("call source closed, dispatch worker exiting");
                        return;
                    };
                    self.handle_inbound(call);
                }
            }
        }
    }

    fn handle_inbound(&self, mut call: InboundCall) {
        let method = call.method();
        counter!(DISPATCH_RECEIVED, "method" => method.name()).increment(1);

        // The admission attempt and the park happen under the parked lock,
        // the same lock `admit_parked` holds while it drains. A slot released
        // between a failed acquire and the push would otherwise wake another
        // worker that sees an empty queue and consumes the notification,
        // stranding this call until an unrelated event.
        let admitted = {
            let mut parked = self.parked.lock();
            match self.admission.try_acquire(method) {
                AdmissionOutcome::Admitted(slot) => Some((call, slot)),
                AdmissionOutcome::WouldBlock => {
                    call.transition(CallState::WaitingAdmission);
                    trace!(%method, "slot pool saturated, parking call");
                    gauge!(DISPATCH_PARKED, "method" => method.name()).increment(1.0);
                    parked.entry(method).or_default().push_back(call);
                    None
                }
            }
        };
        if let Some((mut call, slot)) = admitted {
            call.transition(CallState::Admitted);
            self.spawn_admitted(call, slot);
        }
    }

    /// Re-evaluate parked calls after a slot release. Calls of one method are
    /// admitted in arrival order; fresh arrivals on another worker may still
    /// win the freed slot, which keeps this pass cheap and lock-light.
    fn admit_parked(&self) {
        let mut runnable: Vec<(InboundCall, Option<SlotToken>)> = Vec::new();
        {
            let mut parked = self.parked.lock();
            parked.retain(|method, queue| {
                while let Some(front) = queue.front() {
                    debug_assert_eq!(front.state(), CallState::WaitingAdmission);
                    match self.admission.try_acquire(*method) {
                        AdmissionOutcome::Admitted(slot) => {
                            let mut call = queue.pop_front().expect("front exists");
                            gauge!(DISPATCH_PARKED, "method" => method.name()).decrement(1.0);
                            trace!(
                                %method,
                                parked_for = ?call.received_at.elapsed(),
                                "admitting parked call"
                            );
                            call.transition(CallState::Admitted);
                            runnable.push((call, slot));
                        }
                        AdmissionOutcome::WouldBlock => break,
                    }
                }
                !queue.is_empty()
            });
        }
        for (call, slot) in runnable {
            self.spawn_admitted(call, slot);
        }
    }

    /// Every admitted call runs as its own task so a slow handler can never
    /// stall the dispatch loop or calls of other methods.
    fn spawn_admitted(&self, call: InboundCall, slot: Option<SlotToken>) -> JoinHandle<()> {
        let method = call.method();
        counter!(DISPATCH_ADMITTED, "method" => method.name()).increment(1);
        let registry = self.registry.clone();
        tokio::spawn(async move {
            registry.invoke(call, slot).await;
        })
    }
}

static_assertions::assert_impl_all!(Dispatcher: Send, Sync);
