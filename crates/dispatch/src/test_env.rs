// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Mock handlers and a ready-made server environment for dispatch tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use gcs_types::messages::actor::*;
use gcs_types::messages::heartbeat::*;
use gcs_types::messages::job::*;
use gcs_types::messages::kv::*;
use gcs_types::messages::node::*;
use gcs_types::messages::node_resource::*;
use gcs_types::messages::placement_group::*;
use gcs_types::messages::pubsub::*;
use gcs_types::messages::stats::*;
use gcs_types::messages::worker::*;
use gcs_types::{GcsRequest, GcsServerOptions, JobId, MethodId};

use crate::listener::ListenerSet;
use crate::server::{GcsServer, GcsServerBuilder};
use crate::service::{
    ActorInfoHandler, HeartbeatInfoHandler, InternalKvHandler, InternalPubSubHandler,
    JobFinishedListener, JobInfoHandler, NodeInfoHandler, NodeResourceInfoHandler,
    PlacementGroupInfoHandler, StatsHandler, WorkerInfoHandler,
};
use crate::transport::{GcsClient, LocalTransport};
use crate::ReplyHandle;

#[derive(Debug, Default, Clone, Copy)]
struct Concurrency {
    current: usize,
    max: usize,
}

struct ConcurrencyGuard<'a> {
    counters: &'a Mutex<HashMap<MethodId, Concurrency>>,
    method: MethodId,
}

impl Drop for ConcurrencyGuard<'_> {
    fn drop(&mut self) {
        self.counters
            .lock()
            .entry(self.method)
            .or_default()
            .current -= 1;
    }
}

/// One mock that implements all ten handler traits. Replies are canned, the
/// KV handler is backed by a real map, and every method passes a shared gate
/// so tests can hold handlers open and observe concurrency.
pub struct MockGcsHandlers {
    gate: watch::Sender<bool>,
    concurrency: Mutex<HashMap<MethodId, Concurrency>>,
    double_complete_add_job: AtomicBool,
    next_job_id: AtomicU32,
    kv: DashMap<Bytes, Bytes>,
    job_finished: ListenerSet<JobId>,
}

impl MockGcsHandlers {
    pub fn new() -> Arc<Self> {
        let (gate, _) = watch::channel(true);
        Arc::new(Self {
            gate,
            concurrency: Mutex::new(HashMap::new()),
            double_complete_add_job: AtomicBool::new(false),
            next_job_id: AtomicU32::new(0),
            kv: DashMap::new(),
            job_finished: ListenerSet::default(),
        })
    }

    /// Make handlers block before completing until the gate reopens.
    pub fn close_gate(&self) {
        self.gate.send_replace(false);
    }

    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    /// Make `add_job` invoke its completion callback a second time.
    pub fn set_double_complete_add_job(&self, enabled: bool) {
        self.double_complete_add_job.store(enabled, Ordering::Relaxed);
    }

    pub fn current_concurrency(&self, method: MethodId) -> usize {
        self.concurrency
            .lock()
            .get(&method)
            .map(|c| c.current)
            .unwrap_or(0)
    }

    /// Highest number of simultaneously running handler invocations observed
    /// for `method` so far.
    pub fn max_concurrency(&self, method: MethodId) -> usize {
        self.concurrency
            .lock()
            .get(&method)
            .map(|c| c.max)
            .unwrap_or(0)
    }

    pub async fn wait_for_concurrency(&self, method: MethodId, target: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.current_concurrency(method) != target {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "{method} never reached concurrency {target}, stuck at {}",
                self.current_concurrency(method)
            )
        });
    }

    pub fn job_finished_listeners(&self) -> &ListenerSet<JobId> {
        &self.job_finished
    }

    fn enter(&self, method: MethodId) -> ConcurrencyGuard<'_> {
        let mut counters = self.concurrency.lock();
        let entry = counters.entry(method).or_default();
        entry.current += 1;
        entry.max = entry.max.max(entry.current);
        ConcurrencyGuard {
            counters: &self.concurrency,
            method,
        }
    }

    async fn pass_gate(&self) {
        let mut rx = self.gate.subscribe();
        // the sender lives in self, wait_for cannot fail
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// Trivial handler body: track concurrency, wait out the gate, reply OK.
macro_rules! gated_ok {
    ($self:ident, $method:ident, $reply:ident) => {{
        let _running = $self.enter(MethodId::$method);
        $self.pass_gate().await;
        $reply.complete_ok();
    }};
}

#[async_trait]
impl JobInfoHandler for MockGcsHandlers {
    async fn add_job(&self, _request: AddJobRequest, reply: ReplyHandle<AddJobReply>) {
        let _running = self.enter(MethodId::AddJob);
        self.pass_gate().await;
        reply.complete_ok();
        if self.double_complete_add_job.load(Ordering::Relaxed) {
            reply.complete_error(gcs_types::StatusCode::Internal, "raced a failure path");
        }
    }

    async fn mark_job_finished(
        &self,
        request: MarkJobFinishedRequest,
        reply: ReplyHandle<MarkJobFinishedReply>,
    ) {
        let _running = self.enter(MethodId::MarkJobFinished);
        self.pass_gate().await;
        self.job_finished.notify(request.job_id);
        reply.complete_ok();
    }

    async fn get_all_job_info(
        &self,
        _request: GetAllJobInfoRequest,
        reply: ReplyHandle<GetAllJobInfoReply>,
    ) {
        gated_ok!(self, GetAllJobInfo, reply)
    }

    async fn report_job_error(
        &self,
        _request: ReportJobErrorRequest,
        reply: ReplyHandle<ReportJobErrorReply>,
    ) {
        gated_ok!(self, ReportJobError, reply)
    }

    async fn get_next_job_id(
        &self,
        _request: GetNextJobIdRequest,
        reply: ReplyHandle<GetNextJobIdReply>,
    ) {
        let _running = self.enter(MethodId::GetNextJobId);
        self.pass_gate().await;
        let id = self.next_job_id.fetch_add(1, Ordering::Relaxed) + 1;
        reply.update(|r| r.job_id = JobId::new(id));
        reply.complete_ok();
    }

    fn add_job_finished_listener(&self, listener: JobFinishedListener) {
        self.job_finished.push(listener);
    }
}

#[async_trait]
impl ActorInfoHandler for MockGcsHandlers {
    async fn register_actor(
        &self,
        _request: RegisterActorRequest,
        reply: ReplyHandle<RegisterActorReply>,
    ) {
        gated_ok!(self, RegisterActor, reply)
    }

    async fn create_actor(
        &self,
        _request: CreateActorRequest,
        reply: ReplyHandle<CreateActorReply>,
    ) {
        gated_ok!(self, CreateActor, reply)
    }

    async fn get_actor_info(
        &self,
        _request: GetActorInfoRequest,
        reply: ReplyHandle<GetActorInfoReply>,
    ) {
        gated_ok!(self, GetActorInfo, reply)
    }

    async fn get_named_actor_info(
        &self,
        _request: GetNamedActorInfoRequest,
        reply: ReplyHandle<GetNamedActorInfoReply>,
    ) {
        gated_ok!(self, GetNamedActorInfo, reply)
    }

    async fn list_named_actors(
        &self,
        _request: ListNamedActorsRequest,
        reply: ReplyHandle<ListNamedActorsReply>,
    ) {
        gated_ok!(self, ListNamedActors, reply)
    }

    async fn get_all_actor_info(
        &self,
        _request: GetAllActorInfoRequest,
        reply: ReplyHandle<GetAllActorInfoReply>,
    ) {
        gated_ok!(self, GetAllActorInfo, reply)
    }

    async fn kill_actor_via_gcs(
        &self,
        _request: KillActorViaGcsRequest,
        reply: ReplyHandle<KillActorViaGcsReply>,
    ) {
        gated_ok!(self, KillActorViaGcs, reply)
    }
}

#[async_trait]
impl NodeInfoHandler for MockGcsHandlers {
    async fn register_node(
        &self,
        _request: RegisterNodeRequest,
        reply: ReplyHandle<RegisterNodeReply>,
    ) {
        gated_ok!(self, RegisterNode, reply)
    }

    async fn drain_node(&self, _request: DrainNodeRequest, reply: ReplyHandle<DrainNodeReply>) {
        gated_ok!(self, DrainNode, reply)
    }

    async fn get_all_node_info(
        &self,
        _request: GetAllNodeInfoRequest,
        reply: ReplyHandle<GetAllNodeInfoReply>,
    ) {
        gated_ok!(self, GetAllNodeInfo, reply)
    }

    async fn get_internal_config(
        &self,
        _request: GetInternalConfigRequest,
        reply: ReplyHandle<GetInternalConfigReply>,
    ) {
        gated_ok!(self, GetInternalConfig, reply)
    }
}

#[async_trait]
impl NodeResourceInfoHandler for MockGcsHandlers {
    async fn get_resources(
        &self,
        _request: GetResourcesRequest,
        reply: ReplyHandle<GetResourcesReply>,
    ) {
        gated_ok!(self, GetResources, reply)
    }

    async fn get_all_available_resources(
        &self,
        _request: GetAllAvailableResourcesRequest,
        reply: ReplyHandle<GetAllAvailableResourcesReply>,
    ) {
        gated_ok!(self, GetAllAvailableResources, reply)
    }

    async fn report_resource_usage(
        &self,
        _request: ReportResourceUsageRequest,
        reply: ReplyHandle<ReportResourceUsageReply>,
    ) {
        gated_ok!(self, ReportResourceUsage, reply)
    }

    async fn get_all_resource_usage(
        &self,
        _request: GetAllResourceUsageRequest,
        reply: ReplyHandle<GetAllResourceUsageReply>,
    ) {
        gated_ok!(self, GetAllResourceUsage, reply)
    }
}

#[async_trait]
impl HeartbeatInfoHandler for MockGcsHandlers {
    async fn report_heartbeat(
        &self,
        _request: ReportHeartbeatRequest,
        reply: ReplyHandle<ReportHeartbeatReply>,
    ) {
        gated_ok!(self, ReportHeartbeat, reply)
    }

    async fn check_alive(&self, request: CheckAliveRequest, reply: ReplyHandle<CheckAliveReply>) {
        let _running = self.enter(MethodId::CheckAlive);
        self.pass_gate().await;
        reply.update(|r| r.alive = vec![true; request.node_ids.len()]);
        reply.complete_ok();
    }
}

#[async_trait]
impl StatsHandler for MockGcsHandlers {
    async fn add_profile_data(
        &self,
        _request: AddProfileDataRequest,
        reply: ReplyHandle<AddProfileDataReply>,
    ) {
        gated_ok!(self, AddProfileData, reply)
    }

    async fn get_all_profile_info(
        &self,
        _request: GetAllProfileInfoRequest,
        reply: ReplyHandle<GetAllProfileInfoReply>,
    ) {
        gated_ok!(self, GetAllProfileInfo, reply)
    }
}

#[async_trait]
impl WorkerInfoHandler for MockGcsHandlers {
    async fn report_worker_failure(
        &self,
        _request: ReportWorkerFailureRequest,
        reply: ReplyHandle<ReportWorkerFailureReply>,
    ) {
        gated_ok!(self, ReportWorkerFailure, reply)
    }

    async fn get_worker_info(
        &self,
        _request: GetWorkerInfoRequest,
        reply: ReplyHandle<GetWorkerInfoReply>,
    ) {
        gated_ok!(self, GetWorkerInfo, reply)
    }

    async fn get_all_worker_info(
        &self,
        _request: GetAllWorkerInfoRequest,
        reply: ReplyHandle<GetAllWorkerInfoReply>,
    ) {
        gated_ok!(self, GetAllWorkerInfo, reply)
    }

    async fn add_worker_info(
        &self,
        _request: AddWorkerInfoRequest,
        reply: ReplyHandle<AddWorkerInfoReply>,
    ) {
        gated_ok!(self, AddWorkerInfo, reply)
    }
}

#[async_trait]
impl PlacementGroupInfoHandler for MockGcsHandlers {
    async fn create_placement_group(
        &self,
        _request: CreatePlacementGroupRequest,
        reply: ReplyHandle<CreatePlacementGroupReply>,
    ) {
        gated_ok!(self, CreatePlacementGroup, reply)
    }

    async fn remove_placement_group(
        &self,
        _request: RemovePlacementGroupRequest,
        reply: ReplyHandle<RemovePlacementGroupReply>,
    ) {
        gated_ok!(self, RemovePlacementGroup, reply)
    }

    async fn get_placement_group(
        &self,
        _request: GetPlacementGroupRequest,
        reply: ReplyHandle<GetPlacementGroupReply>,
    ) {
        gated_ok!(self, GetPlacementGroup, reply)
    }

    async fn get_all_placement_group(
        &self,
        _request: GetAllPlacementGroupRequest,
        reply: ReplyHandle<GetAllPlacementGroupReply>,
    ) {
        gated_ok!(self, GetAllPlacementGroup, reply)
    }

    async fn wait_placement_group_until_ready(
        &self,
        _request: WaitPlacementGroupUntilReadyRequest,
        reply: ReplyHandle<WaitPlacementGroupUntilReadyReply>,
    ) {
        gated_ok!(self, WaitPlacementGroupUntilReady, reply)
    }

    async fn get_named_placement_group(
        &self,
        _request: GetNamedPlacementGroupRequest,
        reply: ReplyHandle<GetNamedPlacementGroupReply>,
    ) {
        gated_ok!(self, GetNamedPlacementGroup, reply)
    }
}

#[async_trait]
impl InternalKvHandler for MockGcsHandlers {
    async fn get(&self, request: InternalKvGetRequest, reply: ReplyHandle<InternalKvGetReply>) {
        let _running = self.enter(MethodId::InternalKvGet);
        self.pass_gate().await;
        let value = self.kv.get(&request.key).map(|entry| entry.value().clone());
        reply.update(|r| r.value = value);
        reply.complete_ok();
    }

    async fn put(&self, request: InternalKvPutRequest, reply: ReplyHandle<InternalKvPutReply>) {
        let _running = self.enter(MethodId::InternalKvPut);
        self.pass_gate().await;
        let added = if !request.overwrite && self.kv.contains_key(&request.key) {
            false
        } else {
            self.kv.insert(request.key, request.value).is_none()
        };
        reply.update(|r| r.added = added);
        reply.complete_ok();
    }

    async fn del(&self, request: InternalKvDelRequest, reply: ReplyHandle<InternalKvDelReply>) {
        let _running = self.enter(MethodId::InternalKvDel);
        self.pass_gate().await;
        let deleted = self.kv.remove(&request.key).is_some();
        reply.update(|r| r.deleted = deleted);
        reply.complete_ok();
    }

    async fn exists(
        &self,
        request: InternalKvExistsRequest,
        reply: ReplyHandle<InternalKvExistsReply>,
    ) {
        let _running = self.enter(MethodId::InternalKvExists);
        self.pass_gate().await;
        let exists = self.kv.contains_key(&request.key);
        reply.update(|r| r.exists = exists);
        reply.complete_ok();
    }

    async fn keys(&self, request: InternalKvKeysRequest, reply: ReplyHandle<InternalKvKeysReply>) {
        let _running = self.enter(MethodId::InternalKvKeys);
        self.pass_gate().await;
        let keys = self
            .kv
            .iter()
            .filter(|entry| entry.key().starts_with(&request.prefix))
            .map(|entry| entry.key().clone())
            .collect();
        reply.update(|r| r.keys = keys);
        reply.complete_ok();
    }
}

#[async_trait]
impl InternalPubSubHandler for MockGcsHandlers {
    async fn publish(&self, _request: GcsPublishRequest, reply: ReplyHandle<GcsPublishReply>) {
        gated_ok!(self, GcsPublish, reply)
    }

    // a real handler long-polls here; the mock replies with an empty batch
    async fn subscriber_poll(
        &self,
        _request: GcsSubscriberPollRequest,
        reply: ReplyHandle<GcsSubscriberPollReply>,
    ) {
        gated_ok!(self, GcsSubscriberPoll, reply)
    }

    async fn subscriber_command_batch(
        &self,
        _request: GcsSubscriberCommandBatchRequest,
        reply: ReplyHandle<GcsSubscriberCommandBatchReply>,
    ) {
        gated_ok!(self, GcsSubscriberCommandBatch, reply)
    }
}

/// A server wired to [`MockGcsHandlers`] over an in-process transport, with
/// dispatch workers running until [`shutdown`](Self::shutdown).
pub struct TestEnv {
    pub client: GcsClient,
    pub handlers: Arc<MockGcsHandlers>,
    pub server: GcsServer,
    shutdown: CancellationToken,
    workers: Vec<JoinHandle<anyhow::Result<()>>>,
}

impl TestEnv {
    pub async fn spawn(options: GcsServerOptions) -> Self {
        Self::spawn_workers(options, 1).await
    }

    /// Like [`spawn`](Self::spawn) with several dispatch workers polling the
    /// same transport.
    pub async fn spawn_workers(options: GcsServerOptions, workers: usize) -> Self {
        let handlers = MockGcsHandlers::new();
        let server = GcsServerBuilder::new()
            .with_job_handler(handlers.clone())
            .with_actor_handler(handlers.clone())
            .with_node_handler(handlers.clone())
            .with_node_resource_handler(handlers.clone())
            .with_heartbeat_handler(handlers.clone())
            .with_stats_handler(handlers.clone())
            .with_worker_handler(handlers.clone())
            .with_placement_group_handler(handlers.clone())
            .with_kv_handler(handlers.clone())
            .with_pubsub_handler(handlers.clone())
            .build(&options)
            .expect("every handler is bound");

        let (client, transport) = LocalTransport::channel(options.inbound_queue_length());
        let transport = Arc::new(transport);
        let shutdown = CancellationToken::new();
        let workers = (0..workers)
            .map(|_| {
                tokio::spawn({
                    let server = server.clone();
                    let transport = Arc::clone(&transport);
                    let shutdown = shutdown.clone();
                    async move { server.run(transport, shutdown).await }
                })
            })
            .collect();
        Self {
            client,
            handlers,
            server,
            shutdown,
            workers,
        }
    }

    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// A populated request of the given method, for coverage-style tests.
pub fn sample_request(method: MethodId) -> GcsRequest {
    match method {
        MethodId::AddJob => AddJobRequest {
            job_id: JobId::new(1),
            driver_hostname: "driver-host".to_owned(),
            driver_pid: 4242,
        }
        .into(),
        MethodId::MarkJobFinished => MarkJobFinishedRequest {
            job_id: JobId::new(1),
        }
        .into(),
        MethodId::GetAllJobInfo => GetAllJobInfoRequest::default().into(),
        MethodId::ReportJobError => ReportJobErrorRequest {
            job_id: JobId::new(1),
            error_message: "driver crashed".to_owned(),
        }
        .into(),
        MethodId::GetNextJobId => GetNextJobIdRequest::default().into(),
        MethodId::RegisterActor => RegisterActorRequest {
            actor_id: gcs_types::ActorId::new(11),
            name: Some("counter".to_owned()),
        }
        .into(),
        MethodId::CreateActor => CreateActorRequest {
            actor_id: gcs_types::ActorId::new(11),
        }
        .into(),
        MethodId::GetActorInfo => GetActorInfoRequest::default().into(),
        MethodId::GetNamedActorInfo => GetNamedActorInfoRequest {
            name: "counter".to_owned(),
        }
        .into(),
        MethodId::ListNamedActors => ListNamedActorsRequest::default().into(),
        MethodId::GetAllActorInfo => GetAllActorInfoRequest::default().into(),
        MethodId::KillActorViaGcs => KillActorViaGcsRequest::default().into(),
        MethodId::RegisterNode => RegisterNodeRequest {
            node_id: gcs_types::NodeId::new(3),
            hostname: "node-3".to_owned(),
        }
        .into(),
        MethodId::DrainNode => DrainNodeRequest::default().into(),
        MethodId::GetAllNodeInfo => GetAllNodeInfoRequest::default().into(),
        MethodId::GetInternalConfig => GetInternalConfigRequest::default().into(),
        MethodId::GetResources => GetResourcesRequest::default().into(),
        MethodId::GetAllAvailableResources => GetAllAvailableResourcesRequest::default().into(),
        MethodId::ReportResourceUsage => ReportResourceUsageRequest::default().into(),
        MethodId::GetAllResourceUsage => GetAllResourceUsageRequest::default().into(),
        MethodId::ReportHeartbeat => ReportHeartbeatRequest {
            node_id: gcs_types::NodeId::new(3),
        }
        .into(),
        MethodId::CheckAlive => CheckAliveRequest {
            node_ids: vec![gcs_types::NodeId::new(3)],
        }
        .into(),
        MethodId::AddProfileData => AddProfileDataRequest::default().into(),
        MethodId::GetAllProfileInfo => GetAllProfileInfoRequest::default().into(),
        MethodId::ReportWorkerFailure => ReportWorkerFailureRequest::default().into(),
        MethodId::GetWorkerInfo => GetWorkerInfoRequest::default().into(),
        MethodId::GetAllWorkerInfo => GetAllWorkerInfoRequest::default().into(),
        MethodId::AddWorkerInfo => AddWorkerInfoRequest::default().into(),
        MethodId::CreatePlacementGroup => CreatePlacementGroupRequest {
            group_id: gcs_types::PlacementGroupId::new(5),
            name: None,
            bundles: vec![ResourceMap::from([("CPU".to_owned(), 1.0)])],
            strategy: PlacementStrategy::Spread,
        }
        .into(),
        MethodId::RemovePlacementGroup => RemovePlacementGroupRequest::default().into(),
        MethodId::GetPlacementGroup => GetPlacementGroupRequest::default().into(),
        MethodId::GetAllPlacementGroup => GetAllPlacementGroupRequest::default().into(),
        MethodId::WaitPlacementGroupUntilReady => {
            WaitPlacementGroupUntilReadyRequest::default().into()
        }
        MethodId::GetNamedPlacementGroup => GetNamedPlacementGroupRequest {
            name: "trainers".to_owned(),
        }
        .into(),
        MethodId::InternalKvGet => InternalKvGetRequest {
            key: Bytes::from_static(b"cluster/id"),
        }
        .into(),
        MethodId::InternalKvPut => InternalKvPutRequest {
            key: Bytes::from_static(b"cluster/id"),
            value: Bytes::from_static(b"deadbeef"),
            overwrite: true,
        }
        .into(),
        MethodId::InternalKvDel => InternalKvDelRequest::default().into(),
        MethodId::InternalKvExists => InternalKvExistsRequest::default().into(),
        MethodId::InternalKvKeys => InternalKvKeysRequest {
            prefix: Bytes::from_static(b"cluster/"),
        }
        .into(),
        MethodId::GcsPublish => GcsPublishRequest {
            messages: vec![PubSubMessage {
                channel: "actors".to_owned(),
                payload: Bytes::from_static(b"update"),
            }],
        }
        .into(),
        MethodId::GcsSubscriberPoll => GcsSubscriberPollRequest::default().into(),
        MethodId::GcsSubscriberCommandBatch => GcsSubscriberCommandBatchRequest {
            subscriber_id: gcs_types::SubscriberId::new(1),
            commands: vec![SubscriberCommand::Subscribe {
                channel: "actors".to_owned(),
            }],
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn sample_requests_resolve_to_their_method() {
        for method in MethodId::iter() {
            assert_eq!(sample_request(method).method(), method);
        }
    }
}
