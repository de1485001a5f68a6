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

use gcs_types::messages::actor::{
    CreateActorReply, CreateActorRequest, GetActorInfoReply, GetActorInfoRequest,
    GetAllActorInfoReply, GetAllActorInfoRequest, GetNamedActorInfoReply, GetNamedActorInfoRequest,
    KillActorViaGcsReply, KillActorViaGcsRequest, ListNamedActorsReply, ListNamedActorsRequest,
    RegisterActorReply, RegisterActorRequest,
};

use crate::ReplyHandle;

/// Handler of the Actor service.
///
/// `register_actor` and `create_actor` may stay in flight for a long time and
/// are admitted without a bound; see the admission table.
#[async_trait]
pub trait ActorInfoHandler: Send + Sync + 'static {
    async fn register_actor(
        &self,
        request: RegisterActorRequest,
        reply: ReplyHandle<RegisterActorReply>,
    );

    async fn create_actor(
        &self,
        request: CreateActorRequest,
        reply: ReplyHandle<CreateActorReply>,
    );

    async fn get_actor_info(
        &self,
        request: GetActorInfoRequest,
        reply: ReplyHandle<GetActorInfoReply>,
    );

    async fn get_named_actor_info(
        &self,
        request: GetNamedActorInfoRequest,
        reply: ReplyHandle<GetNamedActorInfoReply>,
    );

    async fn list_named_actors(
        &self,
        request: ListNamedActorsRequest,
        reply: ReplyHandle<ListNamedActorsReply>,
    );

    async fn get_all_actor_info(
        &self,
        request: GetAllActorInfoRequest,
        reply: ReplyHandle<GetAllActorInfoReply>,
    );

    async fn kill_actor_via_gcs(
        &self,
        request: KillActorViaGcsRequest,
        reply: ReplyHandle<KillActorViaGcsReply>,
    );
}
