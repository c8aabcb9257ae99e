//! Observable effect collection.

use std::collections::HashSet;

use tokio::sync::watch;

use crate::effect::Effect;
use crate::state::cell::StateCell;

/// The growing, ordered list of all effects seen in the current sync run.
///
/// Written only by the pagination synchronizer; read by any number of
/// observers via snapshot or subscription. Append-only within a run, with
/// de-duplication by effect id so a record re-sent by the server merges
/// as a no-op.
#[derive(Debug, Default)]
pub struct EffectCollection {
    cell: StateCell<Vec<Effect>>,
}

impl EffectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch, skipping ids already present. Order of the kept
    /// records matches arrival order. Returns how many were appended; an
    /// empty batch is a no-op.
    pub fn append(&self, batch: &[Effect]) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let mut appended = 0;
        self.cell.set(|effects| {
            let mut seen: HashSet<String> = effects.iter().map(|e| e.id.clone()).collect();
            for effect in batch {
                if seen.insert(effect.id.clone()) {
                    effects.push(effect.clone());
                    appended += 1;
                }
            }
        });
        appended
    }

    /// Returns a snapshot of the current collection.
    pub fn snapshot(&self) -> Vec<Effect> {
        self.cell.get()
    }

    /// Registers an observer woken after every merge.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Effect>> {
        self.cell.subscribe()
    }

    /// Clears the collection. Called at the start of each sync run.
    pub fn reset(&self) {
        self.cell.set(|effects| effects.clear());
    }

    pub fn len(&self) -> usize {
        self.cell.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.get().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(id: &str, name: &str) -> Effect {
        Effect {
            id: id.to_string(),
            name: name.to_string(),
            hash_id: format!("h{id}"),
        }
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let collection = EffectCollection::new();
        collection.append(&[effect("1", "Fire"), effect("2", "Ice")]);
        collection.append(&[effect("3", "Wind")]);

        let names: Vec<_> = collection.snapshot().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["Fire", "Ice", "Wind"]);
    }

    #[tokio::test]
    async fn test_append_dedups_by_id() {
        let collection = EffectCollection::new();
        assert_eq!(collection.append(&[effect("1", "Fire")]), 1);
        assert_eq!(collection.append(&[effect("1", "Fire again"), effect("2", "Ice")]), 1);

        let snapshot = collection.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].name, "Fire");
    }

    #[tokio::test]
    async fn test_empty_append_is_noop() {
        let collection = EffectCollection::new();
        collection.append(&[effect("1", "Fire")]);
        assert_eq!(collection.append(&[]), 0);
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears() {
        let collection = EffectCollection::new();
        collection.append(&[effect("1", "Fire")]);
        collection.reset();
        assert!(collection.is_empty());
    }
}
