// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use gcs_types::MethodId;

use crate::RegistrationError;

/// Admission policy of one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// At most this many calls of the method may be in flight at once.
    Bounded(usize),
    /// Every arriving call is admitted immediately. Used for long-poll
    /// subscription and for methods whose callers may themselves be blocked
    /// on another in-flight call of the same kind.
    Unbounded,
}

/// Immutable record of one registered method.
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    method: MethodId,
    policy: AdmissionPolicy,
}

impl MethodDescriptor {
    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn name(&self) -> &'static str {
        self.method.name()
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }
}

/// Registry of every method the server exposes, built once at startup and
/// read-only afterwards. Each method has exactly one descriptor.
#[derive(Debug, Default)]
pub struct MethodDescriptorTable {
    descriptors: HashMap<MethodId, MethodDescriptor>,
}

impl MethodDescriptorTable {
    /// Register a method. Registering the same method twice is a startup
    /// defect; the first registration is kept.
    pub fn register(
        &mut self,
        method: MethodId,
        policy: AdmissionPolicy,
    ) -> Result<(), RegistrationError> {
        if self.descriptors.contains_key(&method) {
            return Err(RegistrationError::DuplicateRegistration {
                service: method.service(),
                method: method.name(),
            });
        }
        self.descriptors
            .insert(method, MethodDescriptor { method, policy });
        Ok(())
    }

    pub fn get(&self, method: MethodId) -> Option<&MethodDescriptor> {
        self.descriptors.get(&method)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptors.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    #[test]
    fn duplicate_registration_is_rejected_and_keeps_first_entry() {
        let mut table = MethodDescriptorTable::default();
        table
            .register(MethodId::AddJob, AdmissionPolicy::Bounded(8))
            .unwrap();

        let err = table
            .register(MethodId::AddJob, AdmissionPolicy::Unbounded)
            .unwrap_err();
        assert_that!(
            err.to_string(),
            eq("method Job.AddJob has already been registered")
        );

        // first registration survives
        assert_eq!(
            table.get(MethodId::AddJob).unwrap().policy(),
            AdmissionPolicy::Bounded(8)
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unregistered_method_resolves_to_none() {
        let table = MethodDescriptorTable::default();
        assert!(table.get(MethodId::CheckAlive).is_none());
        assert!(table.is_empty());
    }
}
