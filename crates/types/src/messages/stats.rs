// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;

use crate::{GcsStatus, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileTableEntry {
    pub component_type: String,
    pub node_id: NodeId,
    /// Serialized profile events, opaque to the dispatch layer.
    pub payload: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddProfileDataRequest {
    pub profile_data: ProfileTableEntry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddProfileDataReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllProfileInfoRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllProfileInfoReply {
    pub status: GcsStatus,
    pub profiles: Vec<ProfileTableEntry>,
}
