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

use gcs_types::messages::kv::{
    InternalKvDelReply, InternalKvDelRequest, InternalKvExistsReply, InternalKvExistsRequest,
    InternalKvGetReply, InternalKvGetRequest, InternalKvKeysReply, InternalKvKeysRequest,
    InternalKvPutReply, InternalKvPutRequest,
};

use crate::ReplyHandle;

/// Handler of the internal key-value store.
#[async_trait]
pub trait InternalKvHandler: Send + Sync + 'static {
    async fn get(&self, request: InternalKvGetRequest, reply: ReplyHandle<InternalKvGetReply>);

    async fn put(&self, request: InternalKvPutRequest, reply: ReplyHandle<InternalKvPutReply>);

    async fn del(&self, request: InternalKvDelRequest, reply: ReplyHandle<InternalKvDelReply>);

    async fn exists(
        &self,
        request: InternalKvExistsRequest,
        reply: ReplyHandle<InternalKvExistsReply>,
    );

    async fn keys(&self, request: InternalKvKeysRequest, reply: ReplyHandle<InternalKvKeysReply>);
}
