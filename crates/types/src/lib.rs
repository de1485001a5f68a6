// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Shared types for the global control store (GCS) server: identifiers,
//! the reply status envelope, server options, and the typed request/reply
//! surface of the ten logical RPC services.

mod config;
mod identifiers;
pub mod messages;
mod status;

pub use config::{GcsServerOptions, GcsServerOptionsBuilder};
pub use identifiers::{ActorId, JobId, NodeId, PlacementGroupId, SubscriberId, WorkerId};
pub use messages::{GcsReply, GcsRequest, MethodId, ReplyEnvelope, ServiceId};
pub use status::{GcsStatus, StatusCode};
