//! Per-pointer allocation/free counters, kept in the order pointers
//! first show up in the log.

use ahash::AHashMap;

use crate::log::{Action, Record};

#[derive(Debug)]
pub struct Entry {
    pub pointer: String,
    pub allocs: u64,
    pub frees: u64,
}

impl Entry {
    pub fn is_balanced(&self) -> bool {
        self.allocs == self.frees
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    // entries own the first-appearance order, the map only indexes into them
    index: AHashMap<String, usize>,
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: Record<'_>) {
        let entry = self.entry_mut(record.pointer);
        match record.action {
            Action::Alloc => entry.allocs += 1,
            Action::Free => entry.frees += 1,
        }
    }

    fn entry_mut(&mut self, pointer: &str) -> &mut Entry {
        if let Some(&idx) = self.index.get(pointer) {
            return &mut self.entries[idx];
        }
        let idx = self.entries.len();
        self.index.insert(pointer.to_string(), idx);
        self.entries.push(Entry {
            pointer: pointer.to_string(),
            allocs: 0,
            frees: 0,
        });
        &mut self.entries[idx]
    }

    /// Entries whose counts disagree, in first-appearance order.
    pub fn mismatches(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| !entry.is_balanced())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_of(records: &[(Action, &str)]) -> Ledger {
        let mut ledger = Ledger::new();
        for &(action, pointer) in records {
            ledger.record(Record { action, pointer });
        }
        ledger
    }

    #[test]
    fn balanced_pointers_are_not_mismatches() {
        let ledger = ledger_of(&[(Action::Alloc, "0x1"), (Action::Free, "0x1")]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.mismatches().count(), 0);
    }

    #[test]
    fn counts_every_event_for_a_pointer() {
        let ledger = ledger_of(&[
            (Action::Alloc, "0x1"),
            (Action::Alloc, "0x1"),
            (Action::Free, "0x1"),
        ]);
        let entry = ledger.mismatches().next().unwrap();
        assert_eq!(entry.allocs, 2);
        assert_eq!(entry.frees, 1);
    }

    #[test]
    fn free_without_alloc_starts_from_zero_allocs() {
        let ledger = ledger_of(&[(Action::Free, "0x2")]);
        let entry = ledger.mismatches().next().unwrap();
        assert_eq!(entry.allocs, 0);
        assert_eq!(entry.frees, 1);
    }

    #[test]
    fn order_follows_first_appearance() {
        let ledger = ledger_of(&[
            (Action::Alloc, "0xc"),
            (Action::Free, "0xb"),
            (Action::Alloc, "0xa"),
            (Action::Alloc, "0xc"),
        ]);
        let pointers: Vec<_> = ledger
            .mismatches()
            .map(|entry| entry.pointer.as_str())
            .collect();
        assert_eq!(pointers, vec!["0xc", "0xb", "0xa"]);
    }

    #[test]
    fn balanced_entry_keeps_its_slot_out_of_the_report() {
        let ledger = ledger_of(&[
            (Action::Free, "0xb"),
            (Action::Alloc, "0xa"),
            (Action::Alloc, "0xb"),
            (Action::Alloc, "0xa"),
        ]);
        let pointers: Vec<_> = ledger
            .mismatches()
            .map(|entry| entry.pointer.as_str())
            .collect();
        // 0xb balances out to 1/1, only 0xa is left
        assert_eq!(pointers, vec!["0xa"]);
        assert_eq!(ledger.len(), 2);
    }
}
