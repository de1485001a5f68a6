// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Identifiers of the entities tracked by the control store. These are plain
//! newtypes; the wire representation of ids is owned by the transport layer.

macro_rules! control_store_id {
    ($(#[$m:meta])* $name:ident($repr:ty)) => {
        $(#[$m])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            Hash,
            PartialEq,
            Eq,
            Ord,
            PartialOrd,
            derive_more::Display,
            derive_more::From,
            derive_more::Into,
        )]
        pub struct $name($repr);

        impl $name {
            pub const fn new(value: $repr) -> Self {
                Self(value)
            }
        }
    };
}

control_store_id!(
    /// Identifies a driver job. Assigned sequentially by the job service.
    JobId(u32)
);

control_store_id!(ActorId(u64));

control_store_id!(NodeId(u64));

control_store_id!(WorkerId(u64));

control_store_id!(PlacementGroupId(u64));

control_store_id!(
    /// Identifies a long-poll subscriber of the internal pubsub channel.
    SubscriberId(u64)
);

static_assertions::assert_impl_all!(JobId: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_inner_value() {
        assert_eq!(JobId::new(7).to_string(), "7");
        assert_eq!(u64::from(NodeId::new(42)), 42);
    }
}
