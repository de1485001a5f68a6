// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{GcsStatus, JobId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddJobRequest {
    pub job_id: JobId,
    pub driver_hostname: String,
    pub driver_pid: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddJobReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkJobFinishedRequest {
    pub job_id: JobId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkJobFinishedReply {
    pub status: GcsStatus,
}

/// Snapshot of a job table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTableEntry {
    pub job_id: JobId,
    pub driver_hostname: String,
    pub driver_pid: u32,
    pub is_dead: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllJobInfoRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllJobInfoReply {
    pub status: GcsStatus,
    pub job_info: Vec<JobTableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportJobErrorRequest {
    pub job_id: JobId,
    pub error_message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportJobErrorReply {
    pub status: GcsStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNextJobIdRequest {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNextJobIdReply {
    pub status: GcsStatus,
    pub job_id: JobId,
}
