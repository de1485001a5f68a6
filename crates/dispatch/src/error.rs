// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gcs_types::ServiceId;

/// Structural error while registering methods into the descriptor table.
/// Fatal at startup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistrationError {
    #[error("method {service}.{method} has already been registered")]
    DuplicateRegistration {
        service: ServiceId,
        method: &'static str,
    },
}

/// Error assembling a [`crate::GcsServer`].
#[derive(Debug, thiserror::Error)]
pub enum ServerBuildError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("no handler bound for service {0}")]
    MissingHandler(ServiceId),
}

/// The in-process transport was closed before the call could be submitted or
/// before its reply was delivered.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("transport closed")]
pub struct TransportError;
