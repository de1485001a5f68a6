// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{ActorId, GcsStatus, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterActorRequest {
    pub actor_id: ActorId,
    /// Name for named actors, if any. Named actors are resolvable through
    /// `GetNamedActorInfo`.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterActorReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateActorRequest {
    pub actor_id: ActorId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateActorReply {
    pub status: GcsStatus,
}

/// Snapshot of an actor table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorTableEntry {
    pub actor_id: ActorId,
    pub name: Option<String>,
    pub node_id: Option<NodeId>,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetActorInfoRequest {
    pub actor_id: ActorId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetActorInfoReply {
    pub status: GcsStatus,
    pub actor: Option<ActorTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNamedActorInfoRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNamedActorInfoReply {
    pub status: GcsStatus,
    pub actor: Option<ActorTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListNamedActorsRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListNamedActorsReply {
    pub status: GcsStatus,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllActorInfoRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllActorInfoReply {
    pub status: GcsStatus,
    pub actors: Vec<ActorTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KillActorViaGcsRequest {
    pub actor_id: ActorId,
    pub force_kill: bool,
    pub no_restart: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KillActorViaGcsReply {
    pub status: GcsStatus,
}
