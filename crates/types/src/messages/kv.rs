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

use crate::GcsStatus;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvGetRequest {
    pub key: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvGetReply {
    pub status: GcsStatus,
    pub value: Option<Bytes>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvPutRequest {
    pub key: Bytes,
    pub value: Bytes,
    /// Replace an existing value instead of failing the put.
    pub overwrite: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvPutReply {
    pub status: GcsStatus,
    /// Whether a new entry was added (false if an existing one was kept or
    /// overwritten).
    pub added: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvDelRequest {
    pub key: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvDelReply {
    pub status: GcsStatus,
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvExistsRequest {
    pub key: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvExistsReply {
    pub status: GcsStatus,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvKeysRequest {
    pub prefix: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalKvKeysReply {
    pub status: GcsStatus,
    pub keys: Vec<Bytes>,
}
