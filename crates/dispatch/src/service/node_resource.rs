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

use gcs_types::messages::node_resource::{
    GetAllAvailableResourcesReply, GetAllAvailableResourcesRequest, GetAllResourceUsageReply,
    GetAllResourceUsageRequest, GetResourcesReply, GetResourcesRequest, ReportResourceUsageReply,
    ReportResourceUsageRequest,
};

use crate::ReplyHandle;

/// Handler of the NodeResource accounting service.
#[async_trait]
pub trait NodeResourceInfoHandler: Send + Sync + 'static {
    async fn get_resources(
        &self,
        request: GetResourcesRequest,
        reply: ReplyHandle<GetResourcesReply>,
    );

    async fn get_all_available_resources(
        &self,
        request: GetAllAvailableResourcesRequest,
        reply: ReplyHandle<GetAllAvailableResourcesReply>,
    );

    async fn report_resource_usage(
        &self,
        request: ReportResourceUsageRequest,
        reply: ReplyHandle<ReportResourceUsageReply>,
    );

    async fn get_all_resource_usage(
        &self,
        request: GetAllResourceUsageRequest,
        reply: ReplyHandle<GetAllResourceUsageReply>,
    );
}
