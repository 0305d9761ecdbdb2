// ── Ordered entity collection ──
//
// `DashMap` index for O(1) lookups plus a `watch` snapshot that preserves
// provider order for listing.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use super::Keyed;
use crate::model::ResourceId;

/// Provider-ordered, immutable view of a collection.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// Concurrent collection of one entity type.
///
/// The snapshot is the source of ordering: a full replace adopts the
/// provider's order, an upsert of a known id keeps its position, and an
/// upsert of a new id appends.
pub(crate) struct EntityCollection<T: Keyed + Send + Sync + 'static> {
    by_id: DashMap<ResourceId, Arc<T>>,
    snapshot: watch::Sender<Snapshot<T>>,
}

impl<T: Keyed + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_id: DashMap::new(),
            snapshot,
        }
    }

    /// Replace the whole collection with `items`, in the given order.
    pub(crate) fn replace_all(&self, items: Vec<Arc<T>>) {
        self.by_id.clear();
        for item in &items {
            self.by_id.insert(item.key().clone(), Arc::clone(item));
        }
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(items));
    }

    /// Insert or update one entity. Returns `true` if the id was new.
    pub(crate) fn upsert(&self, entity: Arc<T>) -> bool {
        let is_new = self
            .by_id
            .insert(entity.key().clone(), Arc::clone(&entity))
            .is_none();

        self.snapshot.send_modify(|snap| {
            let mut items: Vec<Arc<T>> = (**snap).clone();
            match items.iter_mut().find(|e| e.key() == entity.key()) {
                Some(slot) => *slot = entity,
                None => items.push(entity),
            }
            *snap = Arc::new(items);
        });

        is_new
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<T>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: ResourceId,
        value: u32,
    }

    impl Keyed for Item {
        fn key(&self) -> &ResourceId {
            &self.id
        }
    }

    fn item(id: &str, value: u32) -> Arc<Item> {
        Arc::new(Item {
            id: ResourceId::new(id),
            value,
        })
    }

    fn order(col: &EntityCollection<Item>) -> Vec<(String, u32)> {
        col.snapshot()
            .iter()
            .map(|i| (i.id.to_string(), i.value))
            .collect()
    }

    #[test]
    fn replace_all_keeps_provider_order() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("c", 1), item("a", 2), item("b", 3)]);
        assert_eq!(
            order(&col),
            vec![("c".into(), 1), ("a".into(), 2), ("b".into(), 3)]
        );
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn replace_all_drops_missing_entries() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", 1), item("b", 2)]);
        col.replace_all(vec![item("b", 5)]);
        assert!(col.get("a").is_none());
        assert_eq!(col.get("b").unwrap().value, 5);
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn upsert_updates_in_place() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", 1), item("b", 2), item("c", 3)]);
        assert!(!col.upsert(item("b", 20)));
        assert_eq!(
            order(&col),
            vec![("a".into(), 1), ("b".into(), 20), ("c".into(), 3)]
        );
    }

    #[test]
    fn upsert_appends_new_ids() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", 1)]);
        assert!(col.upsert(item("z", 9)));
        assert_eq!(order(&col), vec![("a".into(), 1), ("z".into(), 9)]);
    }
}
