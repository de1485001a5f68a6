// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Options of the control store RPC server. These are injected at server
/// construction; the server does not read configuration sources itself.
#[derive(Debug, Clone, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct GcsServerOptions {
    /// # Max active calls per handler
    ///
    /// Ceiling on concurrently running calls for every method that uses the
    /// shared admission limit. Methods registered as unbounded (long-poll
    /// subscription, actor registration/creation, heartbeats, internal KV)
    /// ignore this value entirely.
    max_active_calls_per_handler: NonZeroUsize,

    /// # Inbound queue length
    ///
    /// Depth of the inbound call queue of the in-process transport. Submitting
    /// callers are backpressured once the queue is full.
    inbound_queue_length: NonZeroUsize,
}

impl GcsServerOptions {
    pub fn max_active_calls_per_handler(&self) -> usize {
        self.max_active_calls_per_handler.get()
    }

    pub fn inbound_queue_length(&self) -> usize {
        self.inbound_queue_length.get()
    }
}

impl Default for GcsServerOptions {
    fn default() -> Self {
        Self {
            max_active_calls_per_handler: NonZeroUsize::new(100).expect("non zero"),
            inbound_queue_length: NonZeroUsize::new(1024).expect("non zero"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_shared_limit() {
        let options = GcsServerOptionsBuilder::default()
            .max_active_calls_per_handler(NonZeroUsize::new(2).unwrap())
            .build()
            .unwrap();
        assert_eq!(options.max_active_calls_per_handler(), 2);
        assert_eq!(options.inbound_queue_length(), 1024);
    }
}
