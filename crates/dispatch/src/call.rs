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
use std::time::Instant;

use metrics::counter;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use gcs_types::{GcsReply, GcsRequest, GcsStatus, MethodId, ReplyEnvelope, StatusCode};

use crate::metric_definitions::{
    DISPATCH_COMPLETED, DISPATCH_DOUBLE_COMPLETION, DISPATCH_REPLY_DROPPED,
};
use crate::SlotToken;

/// Lifecycle of one inbound call. `WaitingAdmission` only occurs when the
/// method's bounded pool is saturated; `Done` is reached exactly once. There
/// is no cancelled state: an admitted call runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum CallState {
    New,
    WaitingAdmission,
    Admitted,
    HandlerRunning,
    Completing,
    Done,
}

/// One inbound request pulled off the transport, together with the channel
/// its reply must eventually travel back over.
#[derive(Debug)]
pub struct InboundCall {
    pub request: GcsRequest,
    pub(crate) reply_tx: oneshot::Sender<GcsReply>,
    pub(crate) state: CallState,
    pub(crate) received_at: Instant,
}

impl InboundCall {
    pub fn new(request: GcsRequest, reply_tx: oneshot::Sender<GcsReply>) -> Self {
        Self {
            request,
            reply_tx,
            state: CallState::New,
            received_at: Instant::now(),
        }
    }

    pub fn method(&self) -> MethodId {
        self.request.method()
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub(crate) fn transition(&mut self, state: CallState) {
        trace!(method = %self.method(), from = %self.state, to = %state, "call state transition");
        self.state = state;
    }
}

struct PendingReply<R> {
    reply: R,
    reply_tx: oneshot::Sender<GcsReply>,
    // slot of the bounded pool, `None` for unbounded methods
    slot: Option<SlotToken>,
}

struct ReplyState<R> {
    method: MethodId,
    pending: Mutex<Option<PendingReply<R>>>,
}

/// One-shot completion handle of a call, handed to the handler together with
/// the request.
///
/// The handler must call [`complete`](Self::complete) exactly once on every
/// code path, synchronously or after arbitrary asynchronous delay and from
/// any task. A handler that never completes leaks the method's admission slot
/// for good; this layer provides no timeout on its behalf.
///
/// Completing twice is a handler defect (typically racing error and success
/// paths); the second invocation is rejected with a diagnostic and has no
/// effect on the delivered reply or the slot pool.
pub struct ReplyHandle<R> {
    inner: Arc<ReplyState<R>>,
}

impl<R> Clone for ReplyHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> ReplyHandle<R>
where
    R: ReplyEnvelope + Into<GcsReply> + Default + Send + 'static,
{
    pub(crate) fn new(
        method: MethodId,
        reply_tx: oneshot::Sender<GcsReply>,
        slot: Option<SlotToken>,
    ) -> Self {
        Self {
            inner: Arc::new(ReplyState {
                method,
                pending: Mutex::new(Some(PendingReply {
                    reply: R::default(),
                    reply_tx,
                    slot,
                })),
            }),
        }
    }

    pub fn method(&self) -> MethodId {
        self.inner.method
    }

    pub fn is_completed(&self) -> bool {
        self.inner.pending.lock().is_none()
    }

    /// Mutate the reply payload prior to completion. Ignored with a
    /// diagnostic if the call has already been completed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut R),
    {
        let mut guard = self.inner.pending.lock();
        match guard.as_mut() {
            Some(pending) => f(&mut pending.reply),
            None => {
                warn!(
                    method = %self.inner.method,
                    "reply update after completion has no effect"
                );
            }
        }
    }

    /// Finish the call: write the status into the reply envelope, hand the
    /// reply to the transport, and release the admission slot if one is held.
    ///
    /// Returns false on the second and later invocations, which are rejected.
    /// A caller that disconnected before delivery does not count as a handler
    /// error; the slot is released all the same.
    pub fn complete(&self, status: GcsStatus) -> bool {
        let method = self.inner.method;
        let Some(pending) = self.inner.pending.lock().take() else {
            counter!(DISPATCH_DOUBLE_COMPLETION, "method" => method.name()).increment(1);
            warn!(
                %method,
                rejected_status = %status,
                "completion callback invoked on an already-completed call; ignoring"
            );
            return false;
        };

        let PendingReply {
            mut reply,
            reply_tx,
            slot,
        } = pending;
        trace!(%method, %status, state = %CallState::Completing, "completing call");
        *reply.status_mut() = status;

        if reply_tx.send(reply.into()).is_err() {
            // Best-effort delivery: the caller went away. The call is
            // abandoned but the slot below is still returned to the pool.
            counter!(DISPATCH_REPLY_DROPPED, "method" => method.name()).increment(1);
            debug!(%method, "caller disconnected before reply delivery");
        }
        drop(slot);
        counter!(DISPATCH_COMPLETED, "method" => method.name()).increment(1);
        trace!(%method, state = %CallState::Done, "call done");
        true
    }

    /// Complete with the designated success status (OK, empty message).
    pub fn complete_ok(&self) -> bool {
        self.complete(GcsStatus::ok())
    }

    /// Complete with an error status.
    pub fn complete_error(&self, code: StatusCode, message: impl Into<String>) -> bool {
        self.complete(GcsStatus::new(code, message))
    }
}

static_assertions::assert_impl_all!(
    ReplyHandle<gcs_types::messages::job::AddJobReply>: Send, Sync, Clone
);

#[cfg(test)]
mod tests {
    use super::*;

    use gcs_types::messages::job::{AddJobReply, GetNextJobIdReply};
    use gcs_types::JobId;

    fn handle<R>(method: MethodId) -> (ReplyHandle<R>, oneshot::Receiver<GcsReply>)
    where
        R: ReplyEnvelope + Into<GcsReply> + Default + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        (ReplyHandle::new(method, tx, None), rx)
    }

    #[tokio::test]
    async fn complete_populates_status_and_delivers_reply() {
        let (handle, rx) = handle::<GetNextJobIdReply>(MethodId::GetNextJobId);
        handle.update(|reply| reply.job_id = JobId::new(9));
        assert!(handle.complete_ok());

        let GcsReply::GetNextJobId(reply) = rx.await.unwrap() else {
            panic!("reply variant must match the method");
        };
        assert!(reply.status.is_ok());
        assert_eq!(reply.job_id, JobId::new(9));
    }

    #[tokio::test]
    async fn second_completion_is_rejected_and_first_status_is_kept() {
        let (handle, rx) = handle::<AddJobReply>(MethodId::AddJob);
        let racing = handle.clone();

        assert!(handle.complete_ok());
        assert!(!racing.complete_error(StatusCode::Internal, "lost the race"));
        assert!(handle.is_completed());

        let reply = rx.await.unwrap();
        assert!(reply.status().is_ok());
    }

    #[tokio::test]
    async fn update_after_completion_is_ignored() {
        let (handle, rx) = handle::<GetNextJobIdReply>(MethodId::GetNextJobId);
        handle.complete_ok();
        handle.update(|reply| reply.job_id = JobId::new(77));

        let GcsReply::GetNextJobId(reply) = rx.await.unwrap() else {
            panic!("reply variant must match the method");
        };
        assert_eq!(reply.job_id, JobId::default());
    }

    #[tokio::test]
    async fn disconnected_caller_does_not_fail_completion() {
        let (handle, rx) = handle::<AddJobReply>(MethodId::AddJob);
        drop(rx);
        // TransportFailure path: completion still succeeds locally.
        assert!(handle.complete_ok());
    }
}
