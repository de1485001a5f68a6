// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Typed request/reply surface of the control store RPC server.
//!
//! Every inbound request resolves to exactly one [`MethodId`] before
//! admission, and every reply carries a populated [`GcsStatus`] envelope by
//! the time it is released to the transport. The ten services listed in
//! [`ServiceId`] are the entire RPC surface; there is no dynamic service
//! registration.

pub mod actor;
pub mod heartbeat;
pub mod job;
pub mod kv;
pub mod node;
pub mod node_resource;
pub mod placement_group;
pub mod pubsub;
pub mod stats;
pub mod worker;

use crate::GcsStatus;

use actor::*;
use heartbeat::*;
use job::*;
use kv::*;
use node::*;
use node_resource::*;
use placement_group::*;
use pubsub::*;
use stats::*;
use worker::*;

/// The logical APIs exposed by the control store. Each service is bound to
/// exactly one handler implementation for the lifetime of the server.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display, strum::IntoStaticStr, strum::EnumIter,
)]
pub enum ServiceId {
    Job,
    Actor,
    Node,
    NodeResource,
    Heartbeat,
    Stats,
    Worker,
    PlacementGroup,
    InternalKv,
    InternalPubSub,
}

/// Identity of a single RPC method. Resolved from the decoded request before
/// admission; the admission controller and the descriptor table are keyed by
/// this.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display, strum::IntoStaticStr, strum::EnumIter,
)]
pub enum MethodId {
    // Job
    AddJob,
    MarkJobFinished,
    GetAllJobInfo,
    ReportJobError,
    GetNextJobId,
    // Actor
    RegisterActor,
    CreateActor,
    GetActorInfo,
    GetNamedActorInfo,
    ListNamedActors,
    GetAllActorInfo,
    KillActorViaGcs,
    // Node
    RegisterNode,
    DrainNode,
    GetAllNodeInfo,
    GetInternalConfig,
    // NodeResource
    GetResources,
    GetAllAvailableResources,
    ReportResourceUsage,
    GetAllResourceUsage,
    // Heartbeat
    ReportHeartbeat,
    CheckAlive,
    // Stats
    AddProfileData,
    GetAllProfileInfo,
    // Worker
    ReportWorkerFailure,
    GetWorkerInfo,
    GetAllWorkerInfo,
    AddWorkerInfo,
    // PlacementGroup
    CreatePlacementGroup,
    RemovePlacementGroup,
    GetPlacementGroup,
    GetAllPlacementGroup,
    WaitPlacementGroupUntilReady,
    GetNamedPlacementGroup,
    // InternalKv
    InternalKvGet,
    InternalKvPut,
    InternalKvDel,
    InternalKvExists,
    InternalKvKeys,
    // InternalPubSub
    GcsPublish,
    GcsSubscriberPoll,
    GcsSubscriberCommandBatch,
}

impl MethodId {
    /// The service this method belongs to.
    pub fn service(&self) -> ServiceId {
        use MethodId::*;
        match self {
            AddJob | MarkJobFinished | GetAllJobInfo | ReportJobError | GetNextJobId => {
                ServiceId::Job
            }
            RegisterActor | CreateActor | GetActorInfo | GetNamedActorInfo | ListNamedActors
            | GetAllActorInfo | KillActorViaGcs => ServiceId::Actor,
            RegisterNode | DrainNode | GetAllNodeInfo | GetInternalConfig => ServiceId::Node,
            GetResources | GetAllAvailableResources | ReportResourceUsage
            | GetAllResourceUsage => ServiceId::NodeResource,
            ReportHeartbeat | CheckAlive => ServiceId::Heartbeat,
            AddProfileData | GetAllProfileInfo => ServiceId::Stats,
            ReportWorkerFailure | GetWorkerInfo | GetAllWorkerInfo | AddWorkerInfo => {
                ServiceId::Worker
            }
            CreatePlacementGroup | RemovePlacementGroup | GetPlacementGroup
            | GetAllPlacementGroup | WaitPlacementGroupUntilReady | GetNamedPlacementGroup => {
                ServiceId::PlacementGroup
            }
            InternalKvGet | InternalKvPut | InternalKvDel | InternalKvExists | InternalKvKeys => {
                ServiceId::InternalKv
            }
            GcsPublish | GcsSubscriberPoll | GcsSubscriberCommandBatch => ServiceId::InternalPubSub,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Every reply message carries the status envelope; the dispatch core only
/// touches replies through this trait.
pub trait ReplyEnvelope {
    fn status(&self) -> &GcsStatus;
    fn status_mut(&mut self) -> &mut GcsStatus;
}

/// A decoded inbound request, one variant per RPC method.
#[derive(Debug, Clone, derive_more::From)]
pub enum GcsRequest {
    AddJob(AddJobRequest),
    MarkJobFinished(MarkJobFinishedRequest),
    GetAllJobInfo(GetAllJobInfoRequest),
    ReportJobError(ReportJobErrorRequest),
    GetNextJobId(GetNextJobIdRequest),
    RegisterActor(RegisterActorRequest),
    CreateActor(CreateActorRequest),
    GetActorInfo(GetActorInfoRequest),
    GetNamedActorInfo(GetNamedActorInfoRequest),
    ListNamedActors(ListNamedActorsRequest),
    GetAllActorInfo(GetAllActorInfoRequest),
    KillActorViaGcs(KillActorViaGcsRequest),
    RegisterNode(RegisterNodeRequest),
    DrainNode(DrainNodeRequest),
    GetAllNodeInfo(GetAllNodeInfoRequest),
    GetInternalConfig(GetInternalConfigRequest),
    GetResources(GetResourcesRequest),
    GetAllAvailableResources(GetAllAvailableResourcesRequest),
    ReportResourceUsage(ReportResourceUsageRequest),
    GetAllResourceUsage(GetAllResourceUsageRequest),
    ReportHeartbeat(ReportHeartbeatRequest),
    CheckAlive(CheckAliveRequest),
    AddProfileData(AddProfileDataRequest),
    GetAllProfileInfo(GetAllProfileInfoRequest),
    ReportWorkerFailure(ReportWorkerFailureRequest),
    GetWorkerInfo(GetWorkerInfoRequest),
    GetAllWorkerInfo(GetAllWorkerInfoRequest),
    AddWorkerInfo(AddWorkerInfoRequest),
    CreatePlacementGroup(CreatePlacementGroupRequest),
    RemovePlacementGroup(RemovePlacementGroupRequest),
    GetPlacementGroup(GetPlacementGroupRequest),
    GetAllPlacementGroup(GetAllPlacementGroupRequest),
    WaitPlacementGroupUntilReady(WaitPlacementGroupUntilReadyRequest),
    GetNamedPlacementGroup(GetNamedPlacementGroupRequest),
    InternalKvGet(InternalKvGetRequest),
    InternalKvPut(InternalKvPutRequest),
    InternalKvDel(InternalKvDelRequest),
    InternalKvExists(InternalKvExistsRequest),
    InternalKvKeys(InternalKvKeysRequest),
    GcsPublish(GcsPublishRequest),
    GcsSubscriberPoll(GcsSubscriberPollRequest),
    GcsSubscriberCommandBatch(GcsSubscriberCommandBatchRequest),
}

impl GcsRequest {
    /// Method identity of this request, resolvable before admission.
    pub fn method(&self) -> MethodId {
        match self {
            GcsRequest::AddJob(_) => MethodId::AddJob,
            GcsRequest::MarkJobFinished(_) => MethodId::MarkJobFinished,
            GcsRequest::GetAllJobInfo(_) => MethodId::GetAllJobInfo,
            GcsRequest::ReportJobError(_) => MethodId::ReportJobError,
            GcsRequest::GetNextJobId(_) => MethodId::GetNextJobId,
            GcsRequest::RegisterActor(_) => MethodId::RegisterActor,
            GcsRequest::CreateActor(_) => MethodId::CreateActor,
            GcsRequest::GetActorInfo(_) => MethodId::GetActorInfo,
            GcsRequest::GetNamedActorInfo(_) => MethodId::GetNamedActorInfo,
            GcsRequest::ListNamedActors(_) => MethodId::ListNamedActors,
            GcsRequest::GetAllActorInfo(_) => MethodId::GetAllActorInfo,
            GcsRequest::KillActorViaGcs(_) => MethodId::KillActorViaGcs,
            GcsRequest::RegisterNode(_) => MethodId::RegisterNode,
            GcsRequest::DrainNode(_) => MethodId::DrainNode,
            GcsRequest::GetAllNodeInfo(_) => MethodId::GetAllNodeInfo,
            GcsRequest::GetInternalConfig(_) => MethodId::GetInternalConfig,
            GcsRequest::GetResources(_) => MethodId::GetResources,
            GcsRequest::GetAllAvailableResources(_) => MethodId::GetAllAvailableResources,
            GcsRequest::ReportResourceUsage(_) => MethodId::ReportResourceUsage,
            GcsRequest::GetAllResourceUsage(_) => MethodId::GetAllResourceUsage,
            GcsRequest::ReportHeartbeat(_) => MethodId::ReportHeartbeat,
            GcsRequest::CheckAlive(_) => MethodId::CheckAlive,
            GcsRequest::AddProfileData(_) => MethodId::AddProfileData,
            GcsRequest::GetAllProfileInfo(_) => MethodId::GetAllProfileInfo,
            GcsRequest::ReportWorkerFailure(_) => MethodId::ReportWorkerFailure,
            GcsRequest::GetWorkerInfo(_) => MethodId::GetWorkerInfo,
            GcsRequest::GetAllWorkerInfo(_) => MethodId::GetAllWorkerInfo,
            GcsRequest::AddWorkerInfo(_) => MethodId::AddWorkerInfo,
            GcsRequest::CreatePlacementGroup(_) => MethodId::CreatePlacementGroup,
            GcsRequest::RemovePlacementGroup(_) => MethodId::RemovePlacementGroup,
            GcsRequest::GetPlacementGroup(_) => MethodId::GetPlacementGroup,
            GcsRequest::GetAllPlacementGroup(_) => MethodId::GetAllPlacementGroup,
            GcsRequest::WaitPlacementGroupUntilReady(_) => MethodId::WaitPlacementGroupUntilReady,
            GcsRequest::GetNamedPlacementGroup(_) => MethodId::GetNamedPlacementGroup,
            GcsRequest::InternalKvGet(_) => MethodId::InternalKvGet,
            GcsRequest::InternalKvPut(_) => MethodId::InternalKvPut,
            GcsRequest::InternalKvDel(_) => MethodId::InternalKvDel,
            GcsRequest::InternalKvExists(_) => MethodId::InternalKvExists,
            GcsRequest::InternalKvKeys(_) => MethodId::InternalKvKeys,
            GcsRequest::GcsPublish(_) => MethodId::GcsPublish,
            GcsRequest::GcsSubscriberPoll(_) => MethodId::GcsSubscriberPoll,
            GcsRequest::GcsSubscriberCommandBatch(_) => MethodId::GcsSubscriberCommandBatch,
        }
    }

    pub fn service(&self) -> ServiceId {
        self.method().service()
    }
}

/// A completed reply, one variant per RPC method.
#[derive(Debug, derive_more::From)]
pub enum GcsReply {
    AddJob(AddJobReply),
    MarkJobFinished(MarkJobFinishedReply),
    GetAllJobInfo(GetAllJobInfoReply),
    ReportJobError(ReportJobErrorReply),
    GetNextJobId(GetNextJobIdReply),
    RegisterActor(RegisterActorReply),
    CreateActor(CreateActorReply),
    GetActorInfo(GetActorInfoReply),
    GetNamedActorInfo(GetNamedActorInfoReply),
    ListNamedActors(ListNamedActorsReply),
    GetAllActorInfo(GetAllActorInfoReply),
    KillActorViaGcs(KillActorViaGcsReply),
    RegisterNode(RegisterNodeReply),
    DrainNode(DrainNodeReply),
    GetAllNodeInfo(GetAllNodeInfoReply),
    GetInternalConfig(GetInternalConfigReply),
    GetResources(GetResourcesReply),
    GetAllAvailableResources(GetAllAvailableResourcesReply),
    ReportResourceUsage(ReportResourceUsageReply),
    GetAllResourceUsage(GetAllResourceUsageReply),
    ReportHeartbeat(ReportHeartbeatReply),
    CheckAlive(CheckAliveReply),
    AddProfileData(AddProfileDataReply),
    GetAllProfileInfo(GetAllProfileInfoReply),
    ReportWorkerFailure(ReportWorkerFailureReply),
    GetWorkerInfo(GetWorkerInfoReply),
    GetAllWorkerInfo(GetAllWorkerInfoReply),
    AddWorkerInfo(AddWorkerInfoReply),
    CreatePlacementGroup(CreatePlacementGroupReply),
    RemovePlacementGroup(RemovePlacementGroupReply),
    GetPlacementGroup(GetPlacementGroupReply),
    GetAllPlacementGroup(GetAllPlacementGroupReply),
    WaitPlacementGroupUntilReady(WaitPlacementGroupUntilReadyReply),
    GetNamedPlacementGroup(GetNamedPlacementGroupReply),
    InternalKvGet(InternalKvGetReply),
    InternalKvPut(InternalKvPutReply),
    InternalKvDel(InternalKvDelReply),
    InternalKvExists(InternalKvExistsReply),
    InternalKvKeys(InternalKvKeysReply),
    GcsPublish(GcsPublishReply),
    GcsSubscriberPoll(GcsSubscriberPollReply),
    GcsSubscriberCommandBatch(GcsSubscriberCommandBatchReply),
}

macro_rules! impl_reply_envelope {
    ($($variant:ident($reply:ty)),+ $(,)?) => {
        $(
            impl ReplyEnvelope for $reply {
                fn status(&self) -> &GcsStatus {
                    &self.status
                }

                fn status_mut(&mut self) -> &mut GcsStatus {
                    &mut self.status
                }
            }
        )+

        impl GcsReply {
            /// Status of the underlying reply, whichever method produced it.
            pub fn status(&self) -> &GcsStatus {
                match self {
                    $(GcsReply::$variant(reply) => reply.status(),)+
                }
            }
        }
    };
}

impl_reply_envelope!(
    AddJob(AddJobReply),
    MarkJobFinished(MarkJobFinishedReply),
    GetAllJobInfo(GetAllJobInfoReply),
    ReportJobError(ReportJobErrorReply),
    GetNextJobId(GetNextJobIdReply),
    RegisterActor(RegisterActorReply),
    CreateActor(CreateActorReply),
    GetActorInfo(GetActorInfoReply),
    GetNamedActorInfo(GetNamedActorInfoReply),
    ListNamedActors(ListNamedActorsReply),
    GetAllActorInfo(GetAllActorInfoReply),
    KillActorViaGcs(KillActorViaGcsReply),
    RegisterNode(RegisterNodeReply),
    DrainNode(DrainNodeReply),
    GetAllNodeInfo(GetAllNodeInfoReply),
    GetInternalConfig(GetInternalConfigReply),
    GetResources(GetResourcesReply),
    GetAllAvailableResources(GetAllAvailableResourcesReply),
    ReportResourceUsage(ReportResourceUsageReply),
    GetAllResourceUsage(GetAllResourceUsageReply),
    ReportHeartbeat(ReportHeartbeatReply),
    CheckAlive(CheckAliveReply),
    AddProfileData(AddProfileDataReply),
    GetAllProfileInfo(GetAllProfileInfoReply),
    ReportWorkerFailure(ReportWorkerFailureReply),
    GetWorkerInfo(GetWorkerInfoReply),
    GetAllWorkerInfo(GetAllWorkerInfoReply),
    AddWorkerInfo(AddWorkerInfoReply),
    CreatePlacementGroup(CreatePlacementGroupReply),
    RemovePlacementGroup(RemovePlacementGroupReply),
    GetPlacementGroup(GetPlacementGroupReply),
    GetAllPlacementGroup(GetAllPlacementGroupReply),
    WaitPlacementGroupUntilReady(WaitPlacementGroupUntilReadyReply),
    GetNamedPlacementGroup(GetNamedPlacementGroupReply),
    InternalKvGet(InternalKvGetReply),
    InternalKvPut(InternalKvPutReply),
    InternalKvDel(InternalKvDelReply),
    InternalKvExists(InternalKvExistsReply),
    InternalKvKeys(InternalKvKeysReply),
    GcsPublish(GcsPublishReply),
    GcsSubscriberPoll(GcsSubscriberPollReply),
    GcsSubscriberCommandBatch(GcsSubscriberCommandBatchReply),
);

static_assertions::assert_impl_all!(GcsRequest: Send, Sync);
static_assertions::assert_impl_all!(GcsReply: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_method_maps_to_a_service() {
        // Exercise the mapping for all methods; the match itself is
        // exhaustive, this guards the per-service counts.
        let mut per_service = std::collections::HashMap::new();
        for method in MethodId::iter() {
            *per_service.entry(method.service()).or_insert(0usize) += 1;
        }
        assert_eq!(per_service[&ServiceId::Job], 5);
        assert_eq!(per_service[&ServiceId::Actor], 7);
        assert_eq!(per_service[&ServiceId::Node], 4);
        assert_eq!(per_service[&ServiceId::NodeResource], 4);
        assert_eq!(per_service[&ServiceId::Heartbeat], 2);
        assert_eq!(per_service[&ServiceId::Stats], 2);
        assert_eq!(per_service[&ServiceId::Worker], 4);
        assert_eq!(per_service[&ServiceId::PlacementGroup], 6);
        assert_eq!(per_service[&ServiceId::InternalKv], 5);
        assert_eq!(per_service[&ServiceId::InternalPubSub], 3);
    }

    #[test]
    fn request_resolves_method_identity() {
        let request = GcsRequest::from(GetActorInfoRequest::default());
        assert_eq!(request.method(), MethodId::GetActorInfo);
        assert_eq!(request.service(), ServiceId::Actor);
        assert_eq!(request.method().name(), "GetActorInfo");
    }

    #[test]
    fn reply_status_accessor_reaches_envelope() {
        let mut reply = GetActorInfoReply::default();
        reply.status = GcsStatus::new(crate::StatusCode::NotFound, "nope");
        let reply = GcsReply::from(reply);
        assert_eq!(reply.status().code, crate::StatusCode::NotFound);
    }
}
