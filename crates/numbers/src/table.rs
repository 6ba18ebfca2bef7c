use crate::key::Key;
use std::collections::HashMap;

/// Working entry while the universe is being built
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    pub name: String,
    pub value: f64,
    pub complexity: f64,
    /// Closure products may be renamed by a cheaper synonym; seeds never are
    pub overridable: bool,
}

/// What a merge did (or would do) to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Merge {
    Insert,
    Replace,
    Lower,
    Keep,
}

/// Operand of a closure pass, detached from the table
#[derive(Debug, Clone)]
pub(crate) struct Operand {
    pub key: Key,
    pub name: String,
    pub value: f64,
    pub complexity: f64,
}

/// Key -> entry map used during the closure phases.
///
/// Merge lookups are the hot path of the build, hence a hash map; the
/// ordered sequence is only materialized by the finalizer.
#[derive(Debug, Default)]
pub(crate) struct Table {
    entries: HashMap<Key, Entry>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn get(&self, key: &Key) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Decide how a candidate of `complexity` would land on `key`
    pub fn assess(&self, key: &Key, complexity: f64) -> Merge {
        match self.entries.get(key) {
            None => Merge::Insert,
            Some(existing) if existing.complexity > complexity => {
                if existing.overridable {
                    Merge::Replace
                } else {
                    Merge::Lower
                }
            }
            Some(_) => Merge::Keep,
        }
    }

    /// Keep-lowest-complexity merge shared by every generation step
    pub fn merge(&mut self, key: Key, candidate: Entry) -> Merge {
        let outcome = self.assess(&key, candidate.complexity);
        self.apply(key, outcome, candidate);
        outcome
    }

    /// Apply a decision taken by [`Table::assess`]
    pub fn apply(&mut self, key: Key, outcome: Merge, candidate: Entry) {
        match outcome {
            Merge::Insert | Merge::Replace => {
                self.entries.insert(key, candidate);
            }
            Merge::Lower => {
                if let Some(existing) = self.entries.get_mut(&key) {
                    existing.complexity = candidate.complexity;
                }
            }
            Merge::Keep => {}
        }
    }

    /// Lower the stored complexity without building a candidate
    pub fn lower(&mut self, key: &Key, complexity: f64) {
        if let Some(existing) = self.entries.get_mut(key) {
            existing.complexity = complexity;
        }
    }

    /// Entries passing `keep`, cheapest first (ties by value, then key)
    pub fn snapshot(&self, keep: impl Fn(&Entry) -> bool) -> Vec<Operand> {
        let mut operands: Vec<Operand> = self
            .entries
            .iter()
            .filter(|(_, entry)| keep(entry))
            .map(|(key, entry)| Operand {
                key: *key,
                name: entry.name.clone(),
                value: entry.value,
                complexity: entry.complexity,
            })
            .collect();
        operands.sort_by(|a, b| {
            a.complexity
                .total_cmp(&b.complexity)
                .then_with(|| a.value.total_cmp(&b.value))
                .then_with(|| a.key.cmp(&b.key))
        });
        operands
    }

    pub fn into_entries(self) -> impl Iterator<Item = (Key, Entry)> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, value: f64, complexity: f64, overridable: bool) -> Entry {
        Entry {
            name: name.to_string(),
            value,
            complexity,
            overridable,
        }
    }

    fn key(value: f64) -> Key {
        Key::of(value).unwrap()
    }

    #[test]
    fn inserts_when_absent() {
        let mut table = Table::new();
        assert_eq!(table.merge(key(2.0), entry("2", 2.0, 2.0, false)), Merge::Insert);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn seeds_are_only_lowered_never_renamed() {
        let mut table = Table::new();
        table.merge(key(5.0), entry("5", 5.0, 5.0, false));

        let outcome = table.merge(key(5.0), entry("5[Pri]", 5.0, 4.0, false));
        assert_eq!(outcome, Merge::Lower);

        let outcome = table.merge(key(5.0), entry("2+3", 5.0, 1.0, true));
        assert_eq!(outcome, Merge::Lower);

        let stored = table.get(&key(5.0)).unwrap();
        assert_eq!(stored.name, "5");
        assert_eq!(stored.complexity, 1.0);
        assert!(!stored.overridable);
    }

    #[test]
    fn overridable_entries_are_renamed_by_cheaper_synonyms() {
        let mut table = Table::new();
        table.merge(key(0.75), entry("3/4", 0.75, 15.0, true));

        let outcome = table.merge(key(0.75), entry("6/8", 0.75, 29.0, true));
        assert_eq!(outcome, Merge::Keep);

        let outcome = table.merge(key(0.75), entry("π/x", 0.75, 9.0, true));
        assert_eq!(outcome, Merge::Replace);
        assert_eq!(table.get(&key(0.75)).unwrap().name, "π/x");
    }

    #[test]
    fn equal_complexity_keeps_the_first_entry() {
        let mut table = Table::new();
        table.merge(key(1.5), entry("3/2", 1.5, 11.0, true));
        let outcome = table.merge(key(1.5), entry("6/4", 1.5, 11.0, true));
        assert_eq!(outcome, Merge::Keep);
        assert_eq!(table.get(&key(1.5)).unwrap().name, "3/2");
    }

    #[test]
    fn snapshot_orders_by_complexity_then_value() {
        let mut table = Table::new();
        table.merge(key(7.0), entry("7", 7.0, 7.0, false));
        table.merge(key(2.0), entry("2", 2.0, 2.0, false));
        table.merge(key(3.5), entry("7/2", 3.5, 2.0, true));
        table.merge(key(0.0), entry("0", 0.0, 0.0, false));

        let names: Vec<String> = table
            .snapshot(|e| e.complexity <= 5.0)
            .into_iter()
            .map(|op| op.name)
            .collect();
        assert_eq!(names, vec!["0", "2", "7/2"]);
    }
}
