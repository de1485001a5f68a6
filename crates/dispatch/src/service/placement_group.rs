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

use gcs_types::messages::placement_group::{
    CreatePlacementGroupReply, CreatePlacementGroupRequest, GetAllPlacementGroupReply,
    GetAllPlacementGroupRequest, GetNamedPlacementGroupReply, GetNamedPlacementGroupRequest,
    GetPlacementGroupReply, GetPlacementGroupRequest, RemovePlacementGroupReply,
    RemovePlacementGroupRequest, WaitPlacementGroupUntilReadyReply,
    WaitPlacementGroupUntilReadyRequest,
};

use crate::ReplyHandle;

/// Handler of the PlacementGroup lifecycle service. `wait_until_ready` may
/// legitimately hold its call open until the group is scheduled.
#[async_trait]
pub trait PlacementGroupInfoHandler: Send + Sync + 'static {
    async fn create_placement_group(
        &self,
        request: CreatePlacementGroupRequest,
        reply: ReplyHandle<CreatePlacementGroupReply>,
    );

    async fn remove_placement_group(
        &self,
        request: RemovePlacementGroupRequest,
        reply: ReplyHandle<RemovePlacementGroupReply>,
    );

    async fn get_placement_group(
        &self,
        request: GetPlacementGroupRequest,
        reply: ReplyHandle<GetPlacementGroupReply>,
    );

    async fn get_all_placement_group(
        &self,
        request: GetAllPlacementGroupRequest,
        reply: ReplyHandle<GetAllPlacementGroupReply>,
    );

    async fn wait_placement_group_until_ready(
        &self,
        request: WaitPlacementGroupUntilReadyRequest,
        reply: ReplyHandle<WaitPlacementGroupUntilReadyReply>,
    );

    async fn get_named_placement_group(
        &self,
        request: GetNamedPlacementGroupRequest,
        reply: ReplyHandle<GetNamedPlacementGroupReply>,
    );
}
