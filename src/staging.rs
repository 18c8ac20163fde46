use std::collections::BTreeMap;
use std::ops::Bound;

use cosmwasm_std::{Order, Record, Storage};

/// Write overlay over another store. Reads see pending writes first, and
/// nothing reaches the base store until [`StagedStorage::commit`]. Dropping
/// the overlay discards every pending write.
pub struct StagedStorage<'a> {
    base: &'a mut dyn Storage,
    /// `None` marks a pending removal
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StagedStorage<'a> {
    pub fn new(base: &'a mut dyn Storage) -> Self {
        StagedStorage {
            base,
            pending: BTreeMap::new(),
        }
    }

    pub fn commit(self) {
        let StagedStorage { base, pending } = self;
        for (key, value) in pending {
            match value {
                Some(value) => base.set(&key, &value),
                None => base.remove(&key),
            }
        }
    }
}

impl Storage for StagedStorage<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(staged) => staged.clone(),
            None => self.base.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Box::new(std::iter::empty());
            }
        }

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .base
            .range(start, end, Order::Ascending)
            .collect();
        let bounds = (
            start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec())),
            end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec())),
        );
        for (key, staged) in self.pending.range::<Vec<u8>, _>(bounds) {
            match staged {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }

        let records: Vec<Record> = merged.into_iter().collect();
        match order {
            Order::Ascending => Box::new(records.into_iter()),
            Order::Descending => Box::new(records.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    fn keys(store: &dyn Storage, order: Order) -> Vec<Vec<u8>> {
        store.range(None, None, order).map(|(k, _)| k).collect()
    }

    #[test]
    fn writes_are_invisible_until_commit() {
        let mut base = MockStorage::new();
        base.set(b"a", b"1");

        let mut staged = StagedStorage::new(&mut base);
        staged.set(b"b", b"2");
        staged.remove(b"a");
        assert_eq!(staged.get(b"a"), None);
        assert_eq!(staged.get(b"b"), Some(b"2".to_vec()));
        drop(staged);

        assert_eq!(base.get(b"a"), Some(b"1".to_vec()));
        assert_eq!(base.get(b"b"), None);
    }

    #[test]
    fn commit_applies_sets_and_removals() {
        let mut base = MockStorage::new();
        base.set(b"a", b"1");

        let mut staged = StagedStorage::new(&mut base);
        staged.set(b"b", b"2");
        staged.remove(b"a");
        staged.commit();

        assert_eq!(base.get(b"a"), None);
        assert_eq!(base.get(b"b"), Some(b"2".to_vec()));
    }

    #[test]
    fn range_merges_pending_writes() {
        let mut base = MockStorage::new();
        base.set(b"a", b"1");
        base.set(b"c", b"3");
        base.set(b"e", b"5");

        let mut staged = StagedStorage::new(&mut base);
        staged.set(b"b", b"2");
        staged.remove(b"c");
        staged.set(b"e", b"50");

        assert_eq!(
            keys(&staged, Order::Ascending),
            vec![b"a".to_vec(), b"b".to_vec(), b"e".to_vec()]
        );
        assert_eq!(
            keys(&staged, Order::Descending),
            vec![b"e".to_vec(), b"b".to_vec(), b"a".to_vec()]
        );
        let bounded: Vec<Record> = staged
            .range(Some(&b"b"[..]), Some(&b"e"[..]), Order::Ascending)
            .collect();
        assert_eq!(bounded, vec![(b"b".to_vec(), b"2".to_vec())]);
        assert_eq!(staged.range(Some(&b"e"[..]), Some(&b"a"[..]), Order::Ascending).count(), 0);
    }

    #[test]
    fn stages_nest() {
        let mut base = MockStorage::new();
        let mut outer = StagedStorage::new(&mut base);
        {
            let mut inner = StagedStorage::new(&mut outer);
            inner.set(b"k", b"v");
            inner.commit();
        }
        assert_eq!(outer.get(b"k"), Some(b"v".to_vec()));
        drop(outer);
        assert_eq!(base.get(b"k"), None);
    }
}
