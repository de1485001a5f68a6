// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Mutex};

use gcs_types::{GcsReply, GcsRequest};

use crate::call::InboundCall;
use crate::TransportError;

/// Source of decoded inbound calls. The wire protocol behind it is not this
/// crate's concern; the only contract is that each pulled call already
/// resolves to one method identity. Multiple dispatch workers may poll the
/// same source concurrently.
#[async_trait]
pub trait CallSource: Send + Sync + 'static {
    /// Next inbound call, or `None` once the source is closed and drained.
    async fn next_call(&self) -> Option<InboundCall>;
}

#[async_trait]
impl<S: CallSource> CallSource for Arc<S> {
    async fn next_call(&self) -> Option<InboundCall> {
        (**self).next_call().await
    }
}

/// In-process transport: a bounded call queue with a client handle on the
/// submitting side. Used by tests and by embedders that host the control
/// store in the same process.
pub struct LocalTransport {
    rx: Mutex<mpsc::Receiver<InboundCall>>,
}

impl LocalTransport {
    pub fn channel(queue_length: usize) -> (GcsClient, LocalTransport) {
        let (tx, rx) = mpsc::channel(queue_length);
        (GcsClient { tx }, LocalTransport { rx: Mutex::new(rx) })
    }
}

#[async_trait]
impl CallSource for LocalTransport {
    async fn next_call(&self) -> Option<InboundCall> {
        self.rx.lock().await.recv().await
    }
}

/// Submits calls to a [`LocalTransport`] and awaits their replies.
#[derive(Clone)]
pub struct GcsClient {
    tx: mpsc::Sender<InboundCall>,
}

impl GcsClient {
    /// Submit a request and wait for its reply. An error means the server is
    /// gone (queue closed, or the server dropped the call without replying);
    /// there is no partial-reply state.
    pub async fn call(&self, request: impl Into<GcsRequest>) -> Result<GcsReply, TransportError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(InboundCall::new(request.into(), reply_tx))
            .await
            .map_err(|_| TransportError)?;
        reply_rx.await.map_err(|_| TransportError)
    }
}

static_assertions::assert_impl_all!(GcsClient: Send, Sync, Clone);
static_assertions::assert_impl_all!(LocalTransport: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    use gcs_types::messages::heartbeat::ReportHeartbeatRequest;
    use gcs_types::MethodId;

    #[tokio::test]
    async fn submitted_call_arrives_with_resolved_method() {
        let (client, transport) = LocalTransport::channel(4);

        let pending = tokio::spawn(async move {
            client.call(ReportHeartbeatRequest::default()).await
        });

        let call = transport.next_call().await.expect("one queued call");
        assert_eq!(call.method(), MethodId::ReportHeartbeat);

        // dropping the call without completing it surfaces as a transport
        // error on the caller side
        drop(call);
        assert!(pending.await.unwrap().is_err());
    }

    #[tokio::test]
    async fn closed_transport_fails_the_caller() {
        let (client, transport) = LocalTransport::channel(1);
        drop(transport);
        let result = client.call(ReportHeartbeatRequest::default()).await;
        assert!(result.is_err());
    }
}
