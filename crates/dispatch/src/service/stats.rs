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

use gcs_types::messages::stats::{
    AddProfileDataReply, AddProfileDataRequest, GetAllProfileInfoReply, GetAllProfileInfoRequest,
};

use crate::ReplyHandle;

/// Handler of the Stats (profiling) service.
#[async_trait]
pub trait StatsHandler: Send + Sync + 'static {
    async fn add_profile_data(
        &self,
        request: AddProfileDataRequest,
        reply: ReplyHandle<AddProfileDataReply>,
    );

    async fn get_all_profile_info(
        &self,
        request: GetAllProfileInfoRequest,
        reply: ReplyHandle<GetAllProfileInfoReply>,
    );
}
