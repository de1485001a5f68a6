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
pub struct ReportHeartbeatRequest {
    pub node_id: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportHeartbeatReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckAliveRequest {
    pub node_ids: Vec<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckAliveReply {
    pub status: GcsStatus,
    /// One entry per requested node, in request order.
    pub alive: Vec<bool>,
}
