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

use gcs_types::messages::heartbeat::{
    CheckAliveReply, CheckAliveRequest, ReportHeartbeatReply, ReportHeartbeatRequest,
};

use crate::ReplyHandle;

/// Handler of the Heartbeat service. Heartbeats are on the failure-detection
/// path and are never throttled.
#[async_trait]
pub trait HeartbeatInfoHandler: Send + Sync + 'static {
    async fn report_heartbeat(
        &self,
        request: ReportHeartbeatRequest,
        reply: ReplyHandle<ReportHeartbeatReply>,
    );

    async fn check_alive(&self, request: CheckAliveRequest, reply: ReplyHandle<CheckAliveReply>);
}
