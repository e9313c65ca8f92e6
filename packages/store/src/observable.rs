//! Observable state cell.
//!
//! A thin wrapper over [`tokio::sync::watch`] that every piece of client state
//! is stored in. Mutations go through [`Observable::update`], which runs under
//! the channel lock and notifies subscribers once.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared, subscribable value.
#[derive(Debug)]
pub struct Observable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value, returning the previous one.
    pub fn set(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut result = None;
        self.tx.send_modify(|value| result = Some(f(value)));
        match result {
            Some(result) => result,
            None => unreachable!("send_modify always runs its closure"),
        }
    }

    /// Read the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}
