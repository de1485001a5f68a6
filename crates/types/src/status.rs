// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Status code carried by every reply envelope.
///
/// The dispatch core never interprets these beyond `Ok`; they are the
/// vocabulary handlers use to terminate domain errors locally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum StatusCode {
    #[default]
    Ok,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    ResourceExhausted,
    TimedOut,
    Unavailable,
    Internal,
}

/// The status portion of a reply envelope. Always populated before a reply is
/// handed back to the transport; success is `Ok` with an empty message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GcsStatus {
    pub code: StatusCode,
    pub message: String,
}

impl GcsStatus {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl std::fmt::Display for GcsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ok_with_empty_message() {
        let status = GcsStatus::default();
        assert!(status.is_ok());
        assert_eq!(status.message, "");
        assert_eq!(status.to_string(), "Ok");
    }

    #[test]
    fn error_status_displays_message() {
        let status = GcsStatus::new(StatusCode::NotFound, "no such actor");
        assert!(!status.is_ok());
        assert_eq!(status.to_string(), "NotFound: no such actor");
    }
}
