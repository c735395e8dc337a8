//! Document-level pointer listeners and the "click outside closes" scope.
//!
//! [`DocumentEvents`] stands in for the page: the UI layer reports every
//! pointer-down to it. A [`DismissalScope`] registers one listener for a
//! search area and deregisters it when dropped, so a remount never leaves
//! an old listener behind.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Identity of a UI region (page, search container, input...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u64);

/// Where a pointer-down landed: every region containing the hit, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerTarget {
    path: Vec<RegionId>,
}

impl PointerTarget {
    pub fn new(path: impl IntoIterator<Item = RegionId>) -> Self {
        Self {
            path: path.into_iter().collect(),
        }
    }

    pub fn is_within(&self, region: RegionId) -> bool {
        self.path.contains(&region)
    }
}

type Listener = Arc<dyn Fn(&PointerTarget) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Page-wide pointer-down dispatch. Clones share the same listener set.
#[derive(Clone, Default)]
pub struct DocumentEvents {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for DocumentEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl DocumentEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for pointer-down events until the guard is dropped.
    pub fn on_pointer_down<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&PointerTarget) + Send + Sync + 'static,
    {
        let mut reg = self.registry.lock();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.listeners.insert(id, Arc::new(listener));
        trace!(listener = id, "pointer listener registered");
        ListenerGuard {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver one pointer-down to every registered listener.
    pub fn pointer_down(&self, target: &PointerTarget) {
        // Snapshot so listeners may (de)register without deadlocking.
        let listeners: Vec<Listener> = self.registry.lock().listeners.values().cloned().collect();
        for listener in listeners {
            listener(target);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

/// Keeps one listener registered; dropping it deregisters exactly once.
pub struct ListenerGuard {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().listeners.remove(&self.id);
            trace!(listener = self.id, "pointer listener released");
        }
    }
}

/// The search area's claim on outside clicks.
#[derive(Debug)]
pub struct DismissalScope {
    region: RegionId,
    _guard: ListenerGuard,
}

impl DismissalScope {
    /// Call `on_outside` for every pointer-down whose target is not inside `region`.
    pub fn acquire<F>(events: &DocumentEvents, region: RegionId, on_outside: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let guard = events.on_pointer_down(move |target| {
            if !target.is_within(region) {
                on_outside();
            }
        });
        Self {
            region,
            _guard: guard,
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: RegionId = RegionId(1);
    const SEARCH: RegionId = RegionId(2);
    const INPUT: RegionId = RegionId(3);
    const POSTER: RegionId = RegionId(4);

    fn counting_scope(events: &DocumentEvents) -> (DismissalScope, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let scope = DismissalScope::acquire(events, SEARCH, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (scope, hits)
    }

    #[test]
    fn only_outside_targets_dismiss() {
        let events = DocumentEvents::new();
        let (_scope, hits) = counting_scope(&events);

        events.pointer_down(&PointerTarget::new([PAGE, SEARCH, INPUT]));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        events.pointer_down(&PointerTarget::new([PAGE, POSTER]));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_scope_releases_listener() {
        let events = DocumentEvents::new();
        let (scope, hits) = counting_scope(&events);
        assert_eq!(events.listener_count(), 1);

        drop(scope);
        assert_eq!(events.listener_count(), 0);
        events.pointer_down(&PointerTarget::new([PAGE]));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remounting_never_accumulates_listeners() {
        let events = DocumentEvents::new();
        for _ in 0..5 {
            let (scope, _) = counting_scope(&events);
            assert_eq!(events.listener_count(), 1);
            drop(scope);
        }
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn guard_outliving_document_is_harmless() {
        let events = DocumentEvents::new();
        let guard = events.on_pointer_down(|_| {});
        drop(events);
        drop(guard);
    }
}
