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

use parking_lot::Mutex;

/// Append-only list of event subscribers, notified synchronously when a
/// domain event occurs inside a handler. There is no unsubscribe; listeners
/// live as long as the process.
///
/// Notification snapshots the current listeners before invoking them, so a
/// subscription racing with a notification either sees the event or does not,
/// but never invalidates the iteration.
pub struct ListenerSet<E> {
    listeners: Mutex<Vec<Arc<dyn Fn(E) + Send + Sync>>>,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> ListenerSet<E> {
    pub fn subscribe(&self, listener: impl Fn(E) + Send + Sync + 'static) {
        self.push(Arc::new(listener));
    }

    pub fn push(&self, listener: Arc<dyn Fn(E) + Send + Sync>) {
        self.listeners.lock().push(listener);
    }

    pub fn notify(&self, event: E) {
        let snapshot: Vec<_> = self.listeners.lock().iter().cloned().collect();
        for listener in snapshot {
            listener(event.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use gcs_types::JobId;

    #[test]
    fn every_listener_sees_the_event_exactly_once() {
        let set = ListenerSet::<JobId>::default();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        {
            let first = Arc::clone(&first);
            set.subscribe(move |job_id| {
                assert_eq!(job_id, JobId::new(3));
                first.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let second = Arc::clone(&second);
            set.subscribe(move |_| {
                second.fetch_add(1, Ordering::SeqCst);
            });
        }

        set.notify(JobId::new(3));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn subscribing_from_a_listener_does_not_deadlock() {
        let set = Arc::new(ListenerSet::<JobId>::default());
        {
            let set2 = Arc::clone(&set);
            set.subscribe(move |_| {
                // the iteration works off a snapshot, so this append is safe
                set2.push(Arc::new(|_| {}));
            });
        }
        set.notify(JobId::new(1));
        assert_eq!(set.len(), 2);
    }
}
