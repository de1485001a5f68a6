// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Request-admission and dispatch core of the control store server.
//!
//! The server multiplexes ten independent logical APIs over a single call
//! source. For every inbound call it resolves the method identity, consults
//! the per-method admission controller (a bounded slot pool, or no pool for
//! methods that must never backpressure), and hands admitted calls to the
//! externally supplied handler implementation. Handlers finish a call through
//! a one-shot [`ReplyHandle`]; completion delivers the reply, releases the
//! admission slot, and is idempotent against racing completion paths.
//!
//! Domain logic (job bookkeeping, actor lifecycle, placement groups, the KV
//! store, pubsub fan-out) lives behind the handler traits in [`service`] and
//! is not part of this crate.

mod admission;
mod call;
mod descriptor;
mod dispatch;
mod error;
mod listener;
mod metric_definitions;
mod server;
pub mod service;
mod transport;

pub use admission::{AdmissionController, AdmissionOutcome, SlotToken};
pub use call::{CallState, InboundCall, ReplyHandle};
pub use descriptor::{AdmissionPolicy, MethodDescriptor, MethodDescriptorTable};
pub use error::{RegistrationError, ServerBuildError, TransportError};
pub use listener::ListenerSet;
pub use server::{GcsServer, GcsServerBuilder};
pub use transport::{CallSource, GcsClient, LocalTransport};

#[cfg(any(test, feature = "test-util"))]
pub mod test_env;
