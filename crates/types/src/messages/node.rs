// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{GcsStatus, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterNodeRequest {
    pub node_id: NodeId,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterNodeReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainNodeRequest {
    pub node_id: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainNodeReply {
    pub status: GcsStatus,
}

/// Snapshot of a node table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTableEntry {
    pub node_id: NodeId,
    pub hostname: String,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllNodeInfoRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllNodeInfoReply {
    pub status: GcsStatus,
    pub nodes: Vec<NodeTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetInternalConfigRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetInternalConfigReply {
    pub status: GcsStatus,
    /// Serialized system configuration, opaque to the dispatch layer.
    pub config: String,
}
