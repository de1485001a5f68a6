// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Handler contracts of the ten logical APIs and the glue that forwards an
//! admitted call to its bound handler. Handlers are constructor-injected at
//! server build and live as long as the server.

mod actor;
mod heartbeat;
mod job;
mod kv;
mod node;
mod node_resource;
mod placement_group;
mod pubsub;
mod stats;
mod worker;

pub use actor::ActorInfoHandler;
pub use heartbeat::HeartbeatInfoHandler;
pub use job::{JobFinishedListener, JobInfoHandler};
pub use kv::InternalKvHandler;
pub use node::NodeInfoHandler;
pub use node_resource::NodeResourceInfoHandler;
pub use placement_group::PlacementGroupInfoHandler;
pub use pubsub::InternalPubSubHandler;
pub use stats::StatsHandler;
pub use worker::WorkerInfoHandler;

use std::sync::Arc;

use tracing::trace;

use gcs_types::{GcsRequest, MethodId};

use crate::call::{CallState, InboundCall};
use crate::{ReplyHandle, SlotToken};

/// Default admission of a method before the shared limit is resolved against
/// the server options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDefault {
    /// Bounded by the process-wide per-handler limit.
    SharedLimit,
    /// Admitted immediately, never counted.
    Unbounded,
}

/// The complete method surface of the server with its default admission,
/// iterated once at startup to populate the descriptor table. This replaces
/// per-service registration macros with one table.
pub const METHOD_ADMISSION: &[(MethodId, AdmissionDefault)] = &[
    // Job
    (MethodId::AddJob, AdmissionDefault::SharedLimit),
    (MethodId::MarkJobFinished, AdmissionDefault::SharedLimit),
    (MethodId::GetAllJobInfo, AdmissionDefault::SharedLimit),
    (MethodId::ReportJobError, AdmissionDefault::SharedLimit),
    (MethodId::GetNextJobId, AdmissionDefault::SharedLimit),
    // Actor registration/creation can be blocked on other in-flight control
    // plane calls; bounding them risks a distributed deadlock.
    (MethodId::RegisterActor, AdmissionDefault::Unbounded),
    (MethodId::CreateActor, AdmissionDefault::Unbounded),
    // The remaining actor methods need backpressure.
    (MethodId::GetActorInfo, AdmissionDefault::SharedLimit),
    (MethodId::GetNamedActorInfo, AdmissionDefault::SharedLimit),
    (MethodId::ListNamedActors, AdmissionDefault::SharedLimit),
    (MethodId::GetAllActorInfo, AdmissionDefault::SharedLimit),
    (MethodId::KillActorViaGcs, AdmissionDefault::SharedLimit),
    // Node
    (MethodId::RegisterNode, AdmissionDefault::SharedLimit),
    (MethodId::DrainNode, AdmissionDefault::SharedLimit),
    (MethodId::GetAllNodeInfo, AdmissionDefault::SharedLimit),
    (MethodId::GetInternalConfig, AdmissionDefault::SharedLimit),
    // NodeResource
    (MethodId::GetResources, AdmissionDefault::SharedLimit),
    (
        MethodId::GetAllAvailableResources,
        AdmissionDefault::SharedLimit,
    ),
    (MethodId::ReportResourceUsage, AdmissionDefault::SharedLimit),
    (MethodId::GetAllResourceUsage, AdmissionDefault::SharedLimit),
    // Heartbeats feed failure detection and must never be delayed.
    (MethodId::ReportHeartbeat, AdmissionDefault::Unbounded),
    (MethodId::CheckAlive, AdmissionDefault::Unbounded),
    // Stats
    (MethodId::AddProfileData, AdmissionDefault::SharedLimit),
    (MethodId::GetAllProfileInfo, AdmissionDefault::SharedLimit),
    // Worker
    (MethodId::ReportWorkerFailure, AdmissionDefault::SharedLimit),
    (MethodId::GetWorkerInfo, AdmissionDefault::SharedLimit),
    (MethodId::GetAllWorkerInfo, AdmissionDefault::SharedLimit),
    (MethodId::AddWorkerInfo, AdmissionDefault::SharedLimit),
    // PlacementGroup
    (
        MethodId::CreatePlacementGroup,
        AdmissionDefault::SharedLimit,
    ),
    (
        MethodId::RemovePlacementGroup,
        AdmissionDefault::SharedLimit,
    ),
    (MethodId::GetPlacementGroup, AdmissionDefault::SharedLimit),
    (
        MethodId::GetAllPlacementGroup,
        AdmissionDefault::SharedLimit,
    ),
    (
        MethodId::WaitPlacementGroupUntilReady,
        AdmissionDefault::SharedLimit,
    ),
    (
        MethodId::GetNamedPlacementGroup,
        AdmissionDefault::SharedLimit,
    ),
    // InternalKv
    (MethodId::InternalKvGet, AdmissionDefault::Unbounded),
    (MethodId::InternalKvPut, AdmissionDefault::Unbounded),
    (MethodId::InternalKvDel, AdmissionDefault::Unbounded),
    (MethodId::InternalKvExists, AdmissionDefault::Unbounded),
    (MethodId::InternalKvKeys, AdmissionDefault::Unbounded),
    // Unbounded because of the long poll: subscribers intentionally keep a
    // call outstanding; a bound would deadlock them.
    (MethodId::GcsPublish, AdmissionDefault::Unbounded),
    (MethodId::GcsSubscriberPoll, AdmissionDefault::Unbounded),
    (
        MethodId::GcsSubscriberCommandBatch,
        AdmissionDefault::Unbounded,
    ),
];

/// The ten handler bindings of a server instance.
#[derive(Clone)]
pub(crate) struct ServiceRegistry {
    pub job: Arc<dyn JobInfoHandler>,
    pub actor: Arc<dyn ActorInfoHandler>,
    pub node: Arc<dyn NodeInfoHandler>,
    pub node_resource: Arc<dyn NodeResourceInfoHandler>,
    pub heartbeat: Arc<dyn HeartbeatInfoHandler>,
    pub stats: Arc<dyn StatsHandler>,
    pub worker: Arc<dyn WorkerInfoHandler>,
    pub placement_group: Arc<dyn PlacementGroupInfoHandler>,
    pub kv: Arc<dyn InternalKvHandler>,
    pub pubsub: Arc<dyn InternalPubSubHandler>,
}

impl ServiceRegistry {
    /// Invoke the bound handler for an admitted call. The handler owns the
    /// reply handle from here on; this layer does nothing further with the
    /// call.
    pub(crate) async fn invoke(&self, mut call: InboundCall, slot: Option<SlotToken>) {
        call.transition(CallState::HandlerRunning);
        let method = call.method();
        trace!(%method, service = %method.service(), "invoking handler");
        let InboundCall {
            request, reply_tx, ..
        } = call;

        macro_rules! forward {
            ($handler:ident . $op:ident, $request:expr) => {
                self.$handler
                    .$op($request, ReplyHandle::new(method, reply_tx, slot))
                    .await
            };
        }

        match request {
            // Job
            GcsRequest::AddJob(request) => forward!(job.add_job, request),
            GcsRequest::MarkJobFinished(request) => forward!(job.mark_job_finished, request),
            GcsRequest::GetAllJobInfo(request) => forward!(job.get_all_job_info, request),
            GcsRequest::ReportJobError(request) => forward!(job.report_job_error, request),
            GcsRequest::GetNextJobId(request) => forward!(job.get_next_job_id, request),
            // Actor
            GcsRequest::RegisterActor(request) => forward!(actor.register_actor, request),
            GcsRequest::CreateActor(request) => forward!(actor.create_actor, request),
            GcsRequest::GetActorInfo(request) => forward!(actor.get_actor_info, request),
            GcsRequest::GetNamedActorInfo(request) => forward!(actor.get_named_actor_info, request),
            GcsRequest::ListNamedActors(request) => forward!(actor.list_named_actors, request),
            GcsRequest::GetAllActorInfo(request) => forward!(actor.get_all_actor_info, request),
            GcsRequest::KillActorViaGcs(request) => forward!(actor.kill_actor_via_gcs, request),
            // Node
            GcsRequest::RegisterNode(request) => forward!(node.register_node, request),
            GcsRequest::DrainNode(request) => forward!(node.drain_node, request),
            GcsRequest::GetAllNodeInfo(request) => forward!(node.get_all_node_info, request),
            GcsRequest::GetInternalConfig(request) => forward!(node.get_internal_config, request),
            // NodeResource
            GcsRequest::GetResources(request) => forward!(node_resource.get_resources, request),
            GcsRequest::GetAllAvailableResources(request) => {
                forward!(node_resource.get_all_available_resources, request)
            }
            GcsRequest::ReportResourceUsage(request) => {
                forward!(node_resource.report_resource_usage, request)
            }
            GcsRequest::GetAllResourceUsage(request) => {
                forward!(node_resource.get_all_resource_usage, request)
            }
            // Heartbeat
            GcsRequest::ReportHeartbeat(request) => forward!(heartbeat.report_heartbeat, request),
            GcsRequest::CheckAlive(request) => forward!(heartbeat.check_alive, request),
            // Stats
            GcsRequest::AddProfileData(request) => forward!(stats.add_profile_data, request),
            GcsRequest::GetAllProfileInfo(request) => forward!(stats.get_all_profile_info, request),
            // Worker
            GcsRequest::ReportWorkerFailure(request) => {
                forward!(worker.report_worker_failure, request)
            }
            GcsRequest::GetWorkerInfo(request) => forward!(worker.get_worker_info, request),
            GcsRequest::GetAllWorkerInfo(request) => forward!(worker.get_all_worker_info, request),
            GcsRequest::AddWorkerInfo(request) => forward!(worker.add_worker_info, request),
            // PlacementGroup
            GcsRequest::CreatePlacementGroup(request) => {
                forward!(placement_group.create_placement_group, request)
            }
            GcsRequest::RemovePlacementGroup(request) => {
                forward!(placement_group.remove_placement_group, request)
            }
            GcsRequest::GetPlacementGroup(request) => {
                forward!(placement_group.get_placement_group, request)
            }
            GcsRequest::GetAllPlacementGroup(request) => {
                forward!(placement_group.get_all_placement_group, request)
            }
            GcsRequest::WaitPlacementGroupUntilReady(request) => {
                forward!(placement_group.wait_placement_group_until_ready, request)
            }
            GcsRequest::GetNamedPlacementGroup(request) => {
                forward!(placement_group.get_named_placement_group, request)
            }
            // InternalKv
            GcsRequest::InternalKvGet(request) => forward!(kv.get, request),
            GcsRequest::InternalKvPut(request) => forward!(kv.put, request),
            GcsRequest::InternalKvDel(request) => forward!(kv.del, request),
            GcsRequest::InternalKvExists(request) => forward!(kv.exists, request),
            GcsRequest::InternalKvKeys(request) => forward!(kv.keys, request),
            // InternalPubSub
            GcsRequest::GcsPublish(request) => forward!(pubsub.publish, request),
            GcsRequest::GcsSubscriberPoll(request) => forward!(pubsub.subscriber_poll, request),
            GcsRequest::GcsSubscriberCommandBatch(request) => {
                forward!(pubsub.subscriber_command_batch, request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn admission_table_covers_every_method_exactly_once() {
        let mut seen = std::collections::HashSet::new();
        for (method, _) in METHOD_ADMISSION {
            assert!(seen.insert(*method), "{method} listed twice");
        }
        for method in MethodId::iter() {
            assert!(seen.contains(&method), "{method} missing from the table");
        }
    }

    #[test]
    fn deadlock_sensitive_and_long_poll_methods_are_unbounded() {
        let unbounded: Vec<_> = METHOD_ADMISSION
            .iter()
            .filter(|(_, admission)| *admission == AdmissionDefault::Unbounded)
            .map(|(method, _)| *method)
            .collect();
        for method in [
            MethodId::RegisterActor,
            MethodId::CreateActor,
            MethodId::ReportHeartbeat,
            MethodId::CheckAlive,
            MethodId::InternalKvGet,
            MethodId::InternalKvPut,
            MethodId::InternalKvDel,
            MethodId::InternalKvExists,
            MethodId::InternalKvKeys,
            MethodId::GcsPublish,
            MethodId::GcsSubscriberPoll,
            MethodId::GcsSubscriberCommandBatch,
        ] {
            assert!(unbounded.contains(&method), "{method} must be unbounded");
        }
        assert_eq!(unbounded.len(), 12);
    }
}
