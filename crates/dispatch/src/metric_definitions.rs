// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use metrics::{describe_counter, describe_gauge, Unit};

/// dimensioned by "method"
pub const DISPATCH_RECEIVED: &str = "gcs.dispatch.calls_received.total";
/// dimensioned by "method"
pub const DISPATCH_ADMITTED: &str = "gcs.dispatch.calls_admitted.total";
/// dimensioned by "method"
pub const DISPATCH_PARKED: &str = "gcs.dispatch.calls_parked";
/// dimensioned by "method"
pub const DISPATCH_COMPLETED: &str = "gcs.dispatch.calls_completed.total";
/// dimensioned by "method"
pub const DISPATCH_DOUBLE_COMPLETION: &str = "gcs.dispatch.double_completion.total";
/// dimensioned by "method"
pub const DISPATCH_REPLY_DROPPED: &str = "gcs.dispatch.reply_delivery_failed.total";

pub fn describe_metrics() {
    describe_counter!(
        DISPATCH_RECEIVED,
        Unit::Count,
        "Number of calls pulled off the transport, per method"
    );
    describe_counter!(
        DISPATCH_ADMITTED,
        Unit::Count,
        "Number of calls admitted to a handler, per method"
    );
    describe_gauge!(
        DISPATCH_PARKED,
        "Calls currently parked waiting for an admission slot, per method"
    );
    describe_counter!(
        DISPATCH_COMPLETED,
        Unit::Count,
        "Number of calls completed, per method"
    );
    describe_counter!(
        DISPATCH_DOUBLE_COMPLETION,
        Unit::Count,
        "Completion callbacks invoked on an already-completed call"
    );
    describe_counter!(
        DISPATCH_REPLY_DROPPED,
        Unit::Count,
        "Replies that could not be delivered because the caller went away"
    );
}
