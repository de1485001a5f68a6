// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use crate::{GcsStatus, NodeId};

/// Named resource quantities of one node, e.g. `{"CPU": 8.0, "GPU": 1.0}`.
pub type ResourceMap = HashMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetResourcesRequest {
    pub node_id: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetResourcesReply {
    pub status: GcsStatus,
    pub resources: ResourceMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllAvailableResourcesRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailableResources {
    pub node_id: NodeId,
    pub resources: ResourceMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllAvailableResourcesReply {
    pub status: GcsStatus,
    pub resources: Vec<AvailableResources>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportResourceUsageRequest {
    pub node_id: NodeId,
    pub total: ResourceMap,
    pub available: ResourceMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportResourceUsageReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceUsageEntry {
    pub node_id: NodeId,
    pub total: ResourceMap,
    pub available: ResourceMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllResourceUsageRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllResourceUsageReply {
    pub status: GcsStatus,
    pub usage: Vec<ResourceUsageEntry>,
}
