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

use gcs_types::messages::node::{
    DrainNodeReply, DrainNodeRequest, GetAllNodeInfoReply, GetAllNodeInfoRequest,
    GetInternalConfigReply, GetInternalConfigRequest, RegisterNodeReply, RegisterNodeRequest,
};

use crate::ReplyHandle;

/// Handler of the Node membership service.
#[async_trait]
pub trait NodeInfoHandler: Send + Sync + 'static {
    async fn register_node(
        &self,
        request: RegisterNodeRequest,
        reply: ReplyHandle<RegisterNodeReply>,
    );

    async fn drain_node(&self, request: DrainNodeRequest, reply: ReplyHandle<DrainNodeReply>);

    async fn get_all_node_info(
        &self,
        request: GetAllNodeInfoRequest,
        reply: ReplyHandle<GetAllNodeInfoReply>,
    );

    async fn get_internal_config(
        &self,
        request: GetInternalConfigRequest,
        reply: ReplyHandle<GetInternalConfigReply>,
    );
}
