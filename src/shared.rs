// 8.2 shared.rs: thread-safe handle for multi-threaded hosts.
// a mutating call holds the write lock for its whole duration, so calls stay
// one-at-a-time transactions exactly as on a single thread.

use crate::engine::Maker;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone)]
pub struct SharedMaker {
    inner: Arc<RwLock<Maker>>,
}

impl SharedMaker {
    pub fn new(maker: Maker) -> Self {
        Self {
            inner: Arc::new(RwLock::new(maker)),
        }
    }

    /// Run one mutating call under the write lock.
    pub fn transact<T>(&self, call: impl FnOnce(&mut Maker) -> T) -> T {
        // rollback covers returned errors only. a panic mid-call skips it, so
        // after recovering a poisoned lock the state is whatever the panic left
        let mut maker = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        call(&mut maker)
    }

    pub fn read<T>(&self, query: impl FnOnce(&Maker) -> T) -> T {
        let maker = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        query(&maker)
    }
}
