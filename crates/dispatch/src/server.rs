// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use gcs_types::{GcsServerOptions, ServiceId};

use crate::admission::AdmissionController;
use crate::descriptor::{AdmissionPolicy, MethodDescriptorTable};
use crate::dispatch::Dispatcher;
use crate::error::ServerBuildError;
use crate::metric_definitions::describe_metrics;
use crate::service::{
    ActorInfoHandler, AdmissionDefault, HeartbeatInfoHandler, InternalKvHandler,
    InternalPubSubHandler, JobInfoHandler, NodeInfoHandler, NodeResourceInfoHandler,
    PlacementGroupInfoHandler, ServiceRegistry, StatsHandler, WorkerInfoHandler,
    METHOD_ADMISSION,
};
use crate::transport::CallSource;

/// Collects the ten handler bindings before the server is assembled. Every
/// service must be bound; a missing binding fails [`build`](Self::build)
/// rather than surfacing as a routing error at runtime.
#[derive(Default)]
pub struct GcsServerBuilder {
    job: Option<Arc<dyn JobInfoHandler>>,
    actor: Option<Arc<dyn ActorInfoHandler>>,
    node: Option<Arc<dyn NodeInfoHandler>>,
    node_resource: Option<Arc<dyn NodeResourceInfoHandler>>,
    heartbeat: Option<Arc<dyn HeartbeatInfoHandler>>,
    stats: Option<Arc<dyn StatsHandler>>,
    worker: Option<Arc<dyn WorkerInfoHandler>>,
    placement_group: Option<Arc<dyn PlacementGroupInfoHandler>>,
    kv: Option<Arc<dyn InternalKvHandler>>,
    pubsub: Option<Arc<dyn InternalPubSubHandler>>,
}

macro_rules! handler_setter {
    ($setter:ident, $field:ident, $handler:ident) => {
        pub fn $setter(mut self, handler: Arc<dyn $handler>) -> Self {
            self.$field = Some(handler);
            self
        }
    };
}

impl GcsServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    handler_setter!(with_job_handler, job, JobInfoHandler);
    handler_setter!(with_actor_handler, actor, ActorInfoHandler);
    handler_setter!(with_node_handler, node, NodeInfoHandler);
    handler_setter!(with_node_resource_handler, node_resource, NodeResourceInfoHandler);
    handler_setter!(with_heartbeat_handler, heartbeat, HeartbeatInfoHandler);
    handler_setter!(with_stats_handler, stats, StatsHandler);
    handler_setter!(with_worker_handler, worker, WorkerInfoHandler);
    handler_setter!(with_placement_group_handler, placement_group, PlacementGroupInfoHandler);
    handler_setter!(with_kv_handler, kv, InternalKvHandler);
    handler_setter!(with_pubsub_handler, pubsub, InternalPubSubHandler);

    /// Assemble the server: register every method descriptor, size the slot
    /// pools from the options, and bind the handlers.
    pub fn build(self, options: &GcsServerOptions) -> Result<GcsServer, ServerBuildError> {
        describe_metrics();

        let registry = ServiceRegistry {
            job: self.job.ok_or(ServerBuildError::MissingHandler(ServiceId::Job))?,
            actor: self
                .actor
                .ok_or(ServerBuildError::MissingHandler(ServiceId::Actor))?,
            node: self
                .node
                .ok_or(ServerBuildError::MissingHandler(ServiceId::Node))?,
            node_resource: self
                .node_resource
                .ok_or(ServerBuildError::MissingHandler(ServiceId::NodeResource))?,
            heartbeat: self
                .heartbeat
                .ok_or(ServerBuildError::MissingHandler(ServiceId::Heartbeat))?,
            stats: self
                .stats
                .ok_or(ServerBuildError::MissingHandler(ServiceId::Stats))?,
            worker: self
                .worker
                .ok_or(ServerBuildError::MissingHandler(ServiceId::Worker))?,
            placement_group: self
                .placement_group
                .ok_or(ServerBuildError::MissingHandler(ServiceId::PlacementGroup))?,
            kv: self
                .kv
                .ok_or(ServerBuildError::MissingHandler(ServiceId::InternalKv))?,
            pubsub: self
                .pubsub
                .ok_or(ServerBuildError::MissingHandler(ServiceId::InternalPubSub))?,
        };

        let shared_limit = options.max_active_calls_per_handler();
        let mut table = MethodDescriptorTable::default();
        for (method, admission) in METHOD_ADMISSION {
            let policy = match admission {
                AdmissionDefault::SharedLimit => AdmissionPolicy::Bounded(shared_limit),
                AdmissionDefault::Unbounded => AdmissionPolicy::Unbounded,
            };
            table.register(*method, policy)?;
            debug!(method = %method, ?policy, "registered method");
        }
        info!(
            methods = table.len(),
            max_active_calls_per_handler = shared_limit,
            "control store server assembled"
        );

        let admission = Arc::new(AdmissionController::new(&table));
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&admission), registry));
        Ok(GcsServer {
            admission,
            dispatcher,
        })
    }
}

/// A fully assembled server. Cloning is cheap and clones share all state, so
/// several dispatch workers can be run off the same instance against a
/// shared call source.
#[derive(Clone)]
pub struct GcsServer {
    admission: Arc<AdmissionController>,
    dispatcher: Arc<Dispatcher>,
}

impl GcsServer {
    /// Drive one dispatch worker until the source closes or `shutdown` fires.
    pub async fn run<S>(&self, source: S, shutdown: CancellationToken) -> anyhow::Result<()>
    where
        S: CallSource,
    {
        info!("dispatch worker starting");
        Arc::clone(&self.dispatcher)
            .run(Arc::new(source), shutdown)
            .await;
        Ok(())
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }
}

static_assertions::assert_impl_all!(GcsServer: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    use googletest::prelude::*;
    use parking_lot::Mutex;
    use strum::IntoEnumIterator;
    use test_log::test;

    use gcs_types::messages::actor::GetActorInfoRequest;
    use gcs_types::messages::job::{AddJobRequest, MarkJobFinishedRequest};
    use gcs_types::{GcsServerOptionsBuilder, JobId, MethodId, StatusCode};

    use crate::test_env::{sample_request, TestEnv};

    fn options_with_limit(limit: usize) -> gcs_types::GcsServerOptions {
        GcsServerOptionsBuilder::default()
            .max_active_calls_per_handler(NonZeroUsize::new(limit).unwrap())
            .build()
            .unwrap()
    }

    #[test(tokio::test)]
    async fn bounded_method_caps_concurrent_handler_executions() {
        let env = TestEnv::spawn(options_with_limit(2)).await;
        env.handlers.close_gate();

        let mut calls = Vec::new();
        for _ in 0..5 {
            let client = env.client.clone();
            calls.push(tokio::spawn(async move {
                client.call(GetActorInfoRequest::default()).await
            }));
        }

        env.handlers
            .wait_for_concurrency(MethodId::GetActorInfo, 2)
            .await;
        // the other three are parked, not running
        assert_eq!(
            env.server.admission().in_flight(MethodId::GetActorInfo),
            Some(2)
        );
        assert_eq!(
            env.handlers.current_concurrency(MethodId::GetActorInfo),
            2
        );

        env.handlers.open_gate();
        for call in calls {
            let reply = call.await.unwrap().expect("reply delivered");
            assert_that!(reply.status().is_ok(), eq(true));
        }
        assert_eq!(
            env.handlers.max_concurrency(MethodId::GetActorInfo),
            2,
            "concurrency must never exceed the slot pool capacity"
        );
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn unbounded_methods_bypass_saturated_pools() {
        let env = TestEnv::spawn(options_with_limit(1)).await;
        env.handlers.close_gate();

        // saturate the bounded GetActorInfo pool
        let blocked = {
            let client = env.client.clone();
            tokio::spawn(async move { client.call(GetActorInfoRequest::default()).await })
        };
        env.handlers
            .wait_for_concurrency(MethodId::GetActorInfo, 1)
            .await;

        // a burst of unbounded registrations all reach their handler anyway
        let mut registrations = Vec::new();
        for _ in 0..50 {
            let client = env.client.clone();
            registrations.push(tokio::spawn(async move {
                client
                    .call(sample_request(MethodId::RegisterActor))
                    .await
            }));
        }
        env.handlers
            .wait_for_concurrency(MethodId::RegisterActor, 50)
            .await;

        env.handlers.open_gate();
        for call in registrations {
            let reply = call.await.unwrap().expect("reply delivered");
            assert_that!(reply.status().is_ok(), eq(true));
        }
        assert_that!(
            blocked.await.unwrap().expect("reply delivered").status().is_ok(),
            eq(true)
        );
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn freed_slot_is_granted_to_a_parked_call() {
        let env = TestEnv::spawn(options_with_limit(1)).await;
        env.handlers.close_gate();

        let first = {
            let client = env.client.clone();
            tokio::spawn(async move { client.call(GetActorInfoRequest::default()).await })
        };
        env.handlers
            .wait_for_concurrency(MethodId::GetActorInfo, 1)
            .await;
        let second = {
            let client = env.client.clone();
            tokio::spawn(async move { client.call(GetActorInfoRequest::default()).await })
        };

        env.handlers.open_gate();
        assert_that!(
            first.await.unwrap().expect("reply delivered").status().is_ok(),
            eq(true)
        );
        assert_that!(
            second.await.unwrap().expect("reply delivered").status().is_ok(),
            eq(true)
        );
        // the second call only ever ran after the first released its slot
        assert_eq!(env.handlers.max_concurrency(MethodId::GetActorInfo), 1);
        assert_eq!(
            env.server.admission().in_flight(MethodId::GetActorInfo),
            Some(0)
        );
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn no_call_is_stranded_when_workers_share_the_dispatcher() {
        // Two workers racing fresh arrivals against slot releases on a pool
        // of one. A release that fires between a failed admission attempt and
        // the park must not be swallowed by the other worker; every call has
        // to come back.
        let env = TestEnv::spawn_workers(options_with_limit(1), 2).await;

        let mut calls = Vec::new();
        for _ in 0..64 {
            let client = env.client.clone();
            calls.push(tokio::spawn(async move {
                client.call(GetActorInfoRequest::default()).await
            }));
        }

        let all_done = async {
            for call in calls {
                let reply = call.await.unwrap().expect("reply delivered");
                assert_that!(reply.status().is_ok(), eq(true));
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(10), all_done)
            .await
            .expect("every call must eventually be admitted and completed");

        assert_eq!(env.handlers.max_concurrency(MethodId::GetActorInfo), 1);
        assert_eq!(
            env.server.admission().in_flight(MethodId::GetActorInfo),
            Some(0)
        );
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn abandoned_caller_still_releases_its_slot() {
        let env = TestEnv::spawn(options_with_limit(1)).await;
        env.handlers.close_gate();

        let abandoned = {
            let client = env.client.clone();
            tokio::spawn(async move { client.call(GetActorInfoRequest::default()).await })
        };
        env.handlers
            .wait_for_concurrency(MethodId::GetActorInfo, 1)
            .await;
        // the caller goes away while its handler still holds the only slot
        abandoned.abort();
        let _ = abandoned.await;

        env.handlers.open_gate();
        let reply = env
            .client
            .call(GetActorInfoRequest::default())
            .await
            .expect("reply delivered");
        assert_that!(reply.status().is_ok(), eq(true));
        assert_eq!(
            env.server.admission().in_flight(MethodId::GetActorInfo),
            Some(0)
        );
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn job_finished_listeners_fire_exactly_once_per_event() {
        let env = TestEnv::spawn(options_with_limit(4)).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            env.handlers
                .job_finished_listeners()
                .subscribe(move |job_id| seen.lock().push(job_id));
        }

        let reply = env
            .client
            .call(MarkJobFinishedRequest {
                job_id: JobId::new(7),
            })
            .await
            .expect("reply delivered");
        assert_that!(reply.status().is_ok(), eq(true));
        assert_eq!(*seen.lock(), vec![JobId::new(7)]);
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn double_completion_keeps_the_first_reply_and_the_slot_balance() {
        let env = TestEnv::spawn(options_with_limit(1)).await;
        env.handlers.set_double_complete_add_job(true);

        let reply = env
            .client
            .call(AddJobRequest {
                job_id: JobId::new(1),
                ..Default::default()
            })
            .await
            .expect("reply delivered");
        // the racing second completion carried an error status; the first wins
        assert_that!(reply.status().code, eq(StatusCode::Ok));
        assert_eq!(env.server.admission().in_flight(MethodId::AddJob), Some(0));

        // and the slot is usable again
        let reply = env
            .client
            .call(AddJobRequest::default())
            .await
            .expect("reply delivered");
        assert_that!(reply.status().is_ok(), eq(true));
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn every_method_round_trips_through_its_handler() {
        let env = TestEnv::spawn(options_with_limit(8)).await;
        for method in MethodId::iter() {
            let request = sample_request(method);
            assert_eq!(request.method(), method);
            let reply = env.client.call(request).await.expect("reply delivered");
            assert_that!(reply.status().is_ok(), eq(true));
        }
        env.shutdown().await;
    }

    #[test(tokio::test)]
    async fn missing_handler_fails_the_build() {
        use crate::error::ServerBuildError;
        use crate::server::GcsServerBuilder;

        let result = GcsServerBuilder::new().build(&options_with_limit(1));
        assert!(matches!(
            result,
            Err(ServerBuildError::MissingHandler(gcs_types::ServiceId::Job))
        ));
    }
}
