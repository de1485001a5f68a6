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

use gcs_types::messages::pubsub::{
    GcsPublishReply, GcsPublishRequest, GcsSubscriberCommandBatchReply,
    GcsSubscriberCommandBatchRequest, GcsSubscriberPollReply, GcsSubscriberPollRequest,
};

use crate::ReplyHandle;

/// Handler of the internal pubsub channel. `subscriber_poll` is a long poll:
/// the handler holds the call open until messages are available, which is why
/// the whole service is admitted without a bound.
#[async_trait]
pub trait InternalPubSubHandler: Send + Sync + 'static {
    async fn publish(&self, request: GcsPublishRequest, reply: ReplyHandle<GcsPublishReply>);

    async fn subscriber_poll(
        &self,
        request: GcsSubscriberPollRequest,
        reply: ReplyHandle<GcsSubscriberPollReply>,
    );

    async fn subscriber_command_batch(
        &self,
        request: GcsSubscriberCommandBatchRequest,
        reply: ReplyHandle<GcsSubscriberCommandBatchReply>,
    );
}
