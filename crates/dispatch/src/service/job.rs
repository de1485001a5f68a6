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

use async_trait::async_trait;

use gcs_types::messages::job::{
    AddJobReply, AddJobRequest, GetAllJobInfoReply, GetAllJobInfoRequest, GetNextJobIdReply,
    GetNextJobIdRequest, MarkJobFinishedReply, MarkJobFinishedRequest, ReportJobErrorReply,
    ReportJobErrorRequest,
};
use gcs_types::JobId;

use crate::ReplyHandle;

/// Callback invoked with the identity of every job the handler records as
/// finished.
pub type JobFinishedListener = Arc<dyn Fn(JobId) + Send + Sync>;

/// Handler of the Job service. Implementations own the job table; every
/// method must complete its reply handle exactly once.
#[async_trait]
pub trait JobInfoHandler: Send + Sync + 'static {
    async fn add_job(&self, request: AddJobRequest, reply: ReplyHandle<AddJobReply>);

    async fn mark_job_finished(
        &self,
        request: MarkJobFinishedRequest,
        reply: ReplyHandle<MarkJobFinishedReply>,
    );

    async fn get_all_job_info(
        &self,
        request: GetAllJobInfoRequest,
        reply: ReplyHandle<GetAllJobInfoReply>,
    );

    async fn report_job_error(
        &self,
        request: ReportJobErrorRequest,
        reply: ReplyHandle<ReportJobErrorReply>,
    );

    async fn get_next_job_id(
        &self,
        request: GetNextJobIdRequest,
        reply: ReplyHandle<GetNextJobIdReply>,
    );

    /// Register a process-lifetime observer of job-finished events. Listeners
    /// are append-only; there is no unsubscribe.
    fn add_job_finished_listener(&self, listener: JobFinishedListener);
}
