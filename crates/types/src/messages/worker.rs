// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{GcsStatus, WorkerId};

/// Snapshot of a worker table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerTableEntry {
    pub worker_id: WorkerId,
    pub pid: u32,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportWorkerFailureRequest {
    pub worker_id: WorkerId,
    pub exit_code: i32,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportWorkerFailureReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetWorkerInfoRequest {
    pub worker_id: WorkerId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetWorkerInfoReply {
    pub status: GcsStatus,
    pub worker: Option<WorkerTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllWorkerInfoRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllWorkerInfoReply {
    pub status: GcsStatus,
    pub workers: Vec<WorkerTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddWorkerInfoRequest {
    pub worker: WorkerTableEntry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddWorkerInfoReply {
    pub status: GcsStatus,
}
