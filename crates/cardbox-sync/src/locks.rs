//! Per-file-name mutual exclusion.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// A table of async locks keyed by file name.
///
/// Entries are created on demand and removed once no caller holds or awaits
/// them, so the table only ever contains names that are in use.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
  slots: Mutex<HashMap<String, Slot>>,
}

impl KeyedLocks {
  /// Wait for exclusive access to `key`.
  pub(crate) async fn lock(&self, key: &str) -> KeyGuard<'_> {
    let slot = {
      let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
      Arc::clone(slots.entry(key.to_string()).or_default())
    };
    let guard = slot.lock_owned().await;
    KeyGuard { table: self, key: key.to_string(), guard: Some(guard) }
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
  }
}

/// Held for the duration of one read-then-write sequence.
pub(crate) struct KeyGuard<'a> {
  table: &'a KeyedLocks,
  key:   String,
  guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
  fn drop(&mut self) {
    // Release first so the strong count reflects only the table and waiters.
    drop(self.guard.take());
    let mut slots = self.table.slots.lock().unwrap_or_else(PoisonError::into_inner);
    if slots.get(&self.key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
      slots.remove(&self.key);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[tokio::test]
  async fn entry_removed_after_release() {
    let locks = KeyedLocks::default();
    {
      let _g = locks.lock("alice.vcf").await;
      assert_eq!(locks.len(), 1);
    }
    assert_eq!(locks.len(), 0);
  }

  #[tokio::test]
  async fn distinct_keys_do_not_block() {
    let locks = KeyedLocks::default();
    let _a = locks.lock("a.vcf").await;
    let b = tokio::time::timeout(Duration::from_millis(100), locks.lock("b.vcf")).await;
    assert!(b.is_ok());
  }

  #[tokio::test]
  async fn same_key_waits_for_release() {
    let locks = KeyedLocks::default();
    let held = locks.lock("a.vcf").await;

    let blocked = tokio::time::timeout(Duration::from_millis(50), locks.lock("a.vcf")).await;
    assert!(blocked.is_err());

    drop(held);
    let after = tokio::time::timeout(Duration::from_millis(100), locks.lock("a.vcf")).await;
    assert!(after.is_ok());
  }
}
