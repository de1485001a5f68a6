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

use crate::{GcsStatus, SubscriberId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PubSubMessage {
    pub channel: String,
    pub payload: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcsPublishRequest {
    pub messages: Vec<PubSubMessage>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcsPublishReply {
    pub status: GcsStatus,
}

/// Long-poll request: the handler holds the call open until messages are
/// available for the subscriber.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcsSubscriberPollRequest {
    pub subscriber_id: SubscriberId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcsSubscriberPollReply {
    pub status: GcsStatus,
    pub messages: Vec<PubSubMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriberCommand {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcsSubscriberCommandBatchRequest {
    pub subscriber_id: SubscriberId,
    pub commands: Vec<SubscriberCommand>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcsSubscriberCommandBatchReply {
    pub status: GcsStatus,
}
