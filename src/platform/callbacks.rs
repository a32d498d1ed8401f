//! Bookkeeping for host callbacks that must outlive the call that created them
//!
//! Browser hosts hand a closure to the JS side and get a numeric handle back.
//! The closure has to stay alive until it has run or been cancelled, and it
//! must not be dropped while it is running. A spent or cancelled callback is
//! therefore retired first and only dropped two sweeps later: the sweep in
//! the current callback moves it aside, the sweep in the next one drops it.

use std::collections::HashMap;
use std::hash::Hash;

/// Live callbacks keyed by token, plus callbacks waiting to be dropped
#[derive(Debug)]
pub struct CallbackSlots<K, C> {
    live: HashMap<K, (i32, C)>,
    retired: Vec<C>,
    draining: Vec<C>,
}

impl<K, C> Default for CallbackSlots<K, C> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            retired: Vec::new(),
            draining: Vec::new(),
        }
    }
}

impl<K: Eq + Hash, C> CallbackSlots<K, C> {
    /// Keep `callback` alive under `token`
    pub fn insert(&mut self, token: K, handle: i32, callback: C) {
        if let Some((_, old)) = self.live.insert(token, (handle, callback)) {
            self.retired.push(old);
        }
    }

    /// A one-shot callback ran; retire it. Returns false for unknown tokens.
    pub fn fire(&mut self, token: &K) -> bool {
        match self.live.remove(token) {
            Some((_, callback)) => {
                self.retired.push(callback);
                true
            }
            None => false,
        }
    }

    /// Retire a callback before it runs, returning its host handle
    pub fn cancel(&mut self, token: &K) -> Option<i32> {
        let (handle, callback) = self.live.remove(token)?;
        self.retired.push(callback);
        Some(handle)
    }

    /// Drop callbacks retired before the previous sweep
    pub fn sweep(&mut self) {
        self.draining = std::mem::take(&mut self.retired);
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    /// Retired callbacks not yet dropped
    pub fn pending_drop(&self) -> usize {
        self.retired.len() + self.draining.len()
    }
}
