// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::messages::node_resource::ResourceMap;
use crate::{GcsStatus, PlacementGroupId};

/// Bundle placement strategy, mirroring the scheduler's vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum PlacementStrategy {
    #[default]
    Pack,
    Spread,
    StrictPack,
    StrictSpread,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePlacementGroupRequest {
    pub group_id: PlacementGroupId,
    pub name: Option<String>,
    pub bundles: Vec<ResourceMap>,
    pub strategy: PlacementStrategy,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePlacementGroupReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovePlacementGroupRequest {
    pub group_id: PlacementGroupId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovePlacementGroupReply {
    pub status: GcsStatus,
}

/// Snapshot of a placement group table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementGroupTableEntry {
    pub group_id: PlacementGroupId,
    pub name: Option<String>,
    pub ready: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetPlacementGroupRequest {
    pub group_id: PlacementGroupId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetPlacementGroupReply {
    pub status: GcsStatus,
    pub placement_group: Option<PlacementGroupTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllPlacementGroupRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllPlacementGroupReply {
    pub status: GcsStatus,
    pub placement_groups: Vec<PlacementGroupTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitPlacementGroupUntilReadyRequest {
    pub group_id: PlacementGroupId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitPlacementGroupUntilReadyReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNamedPlacementGroupRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNamedPlacementGroupReply {
    pub status: GcsStatus,
    pub placement_group: Option<PlacementGroupTableEntry>,
}
