//! Generic observable state cell.

use tokio::sync::watch;

/// An observable value with atomic updates.
///
/// Built on `tokio::sync::watch`: `set` runs its updater under the
/// channel's internal lock, so concurrent `set` calls are applied in some
/// serial order and each updater sees the previous one's result. Every
/// `set` wakes all subscribers.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    /// Creates a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            tx: watch::Sender::new(initial),
        }
    }

    /// Returns a snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Applies `update` to the value atomically and notifies subscribers.
    pub fn set<F>(&self, update: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(update);
    }

    /// Registers an observer. The receiver is marked changed on every
    /// subsequent `set`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_returns_snapshot() {
        let cell = StateCell::new(vec![1, 2]);
        let snapshot = cell.get();
        cell.set(|v| v.push(3));
        assert_eq!(snapshot, vec![1, 2]);
        assert_eq!(cell.get(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_concurrent_sets_are_not_lost() {
        let cell = Arc::new(StateCell::new(0u64));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cell = Arc::clone(&cell);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    cell.set(|n| *n += 1);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cell.get(), 800);
    }

    #[tokio::test]
    async fn test_subscriber_sees_update() {
        let cell = StateCell::new(String::new());
        let mut rx = cell.subscribe();
        cell.set(|s| s.push_str("hello"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "hello");
    }
}
