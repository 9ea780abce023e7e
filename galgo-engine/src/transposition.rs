use std::hash::BuildHasherDefault;

use dashmap::DashMap;
use galgo_core::Move;
use rustc_hash::FxHasher;

use crate::evaluation::Score;

// Both caches are keyed by the position's Zobrist hash and are
// replace-always: a store simply overwrites whatever entry was there.
// The sharded map keeps the brief overlap between a dying ponder
// search and the next foreground search memory-safe; the cleanse
// handshake in the engine is what keeps it logically serial.
type FxDashMap<V> = DashMap<u64, V, BuildHasherDefault<FxHasher>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub score: Score,
    pub depth: u16,
    pub best_move: Move,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalEntry {
    pub score: Score,
    pub age: u32,
}

pub struct TranspositionTable {
    entries: FxDashMap<TableEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self { entries: DashMap::with_hasher(Default::default()) }
    }

    // An entry stored at depth D answers any query at depth <= D; the
    // caller checks that bound itself since a shallower hit still
    // seeds its move ordering
    pub fn probe(&self, hash: u64) -> Option<TableEntry> {
        self.entries.get(&hash).map(|entry| *entry)
    }

    pub fn store(&self, hash: u64, entry: TableEntry) {
        self.entries.insert(hash, entry);
    }

    // Drops every entry whose age lags the current move number by more
    // than `max_age` full moves
    pub fn evict_older_than(&self, move_number: u32, max_age: u32) {
        self.entries.retain(|_, entry| move_number.saturating_sub(entry.age) <= max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct EvalCache {
    entries: FxDashMap<EvalEntry>,
}

impl EvalCache {
    pub fn new() -> Self {
        Self { entries: DashMap::with_hasher(Default::default()) }
    }

    pub fn probe(&self, hash: u64) -> Option<EvalEntry> {
        self.entries.get(&hash).map(|entry| *entry)
    }

    pub fn store(&self, hash: u64, entry: EvalEntry) {
        self.entries.insert(hash, entry);
    }

    pub fn evict_older_than(&self, move_number: u32, max_age: u32) {
        self.entries.retain(|_, entry| move_number.saturating_sub(entry.age) <= max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use galgo_core::Move;
    use super::{EvalCache, EvalEntry, TableEntry, TranspositionTable};

    fn entry(score: i64, depth: u16, age: u32) -> TableEntry {
        TableEntry { score, depth, best_move: Move::from_notation("e2e4").unwrap(), age }
    }

    #[test]
    fn store_and_probe() {
        let table = TranspositionTable::new();
        assert!(table.probe(1).is_none());

        table.store(1, entry(42, 3, 1));
        let found = table.probe(1).unwrap();
        assert_eq!(found.score, 42);
        assert_eq!(found.depth, 3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn stores_replace_unconditionally() {
        let table = TranspositionTable::new();
        table.store(1, entry(42, 5, 1));
        table.store(1, entry(-7, 2, 2));

        let found = table.probe(1).unwrap();
        assert_eq!(found.score, -7);
        assert_eq!(found.depth, 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn eviction_keeps_recent_entries() {
        let table = TranspositionTable::new();
        table.store(1, entry(1, 1, 10)); // age gap 0
        table.store(2, entry(2, 1, 8));  // age gap 2
        table.store(3, entry(3, 1, 7));  // age gap 3, evicted

        table.evict_older_than(10, 2);
        assert!(table.probe(1).is_some());
        assert!(table.probe(2).is_some());
        assert!(table.probe(3).is_none());
    }

    #[test]
    fn eval_cache_eviction() {
        let cache = EvalCache::new();
        cache.store(1, EvalEntry { score: 5, age: 6 });
        cache.store(2, EvalEntry { score: 9, age: 2 });

        cache.evict_older_than(6, 3);
        assert_eq!(cache.probe(1).unwrap().score, 5);
        assert!(cache.probe(2).is_none());
        assert_eq!(cache.len(), 1);
    }
}
