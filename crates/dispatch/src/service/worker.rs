// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;

use gcs_types::messages::worker::{
    AddWorkerInfoReply, AddWorkerInfoRequest, GetAllWorkerInfoReply, GetAllWorkerInfoRequest,
    GetWorkerInfoReply, GetWorkerInfoRequest, ReportWorkerFailureReply, ReportWorkerFailureRequest,
};

use crate::ReplyHandle;

/// Handler of the Worker bookkeeping service.
#[async_trait]
pub trait WorkerInfoHandler: Send + Sync + 'static {
    async fn report_worker_failure(
        &self,
        request: ReportWorkerFailureRequest,
        reply: ReplyHandle<ReportWorkerFailureReply>,
    );

    async fn get_worker_info(
        &self,
        request: GetWorkerInfoRequest,
        reply: ReplyHandle<GetWorkerInfoReply>,
    );

    async fn get_all_worker_info(
        &self,
        request: GetAllWorkerInfoRequest,
        reply: ReplyHandle<GetAllWorkerInfoReply>,
    );

    async fn add_worker_info(
        &self,
        request: AddWorkerInfoRequest,
        reply: ReplyHandle<AddWorkerInfoReply>,
    );
}
