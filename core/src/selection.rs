//! Shared "currently selected record" store.
//!
//! # Design
//! A `Selection` is created once per session and passed by reference (or
//! inside an `Arc`) to every consumer that needs it. It is either empty or
//! holds exactly one record; `select` replaces, `clear` empties. Consumers
//! that want to react to changes call `subscribe` and keep the returned
//! `SelectionWatcher`.
//!
//! Backed by `tokio::sync::watch`: writes are visible to every reader as
//! soon as `select`/`clear` return, and no runtime is needed unless a
//! watcher awaits `changed`.

use thiserror::Error;
use tokio::sync::watch;

/// The `Selection` a watcher was subscribed to has been dropped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("selection store closed")]
pub struct SelectionClosed;

#[derive(Debug)]
pub struct Selection<R> {
    tx: watch::Sender<Option<R>>,
}

impl<R> Selection<R> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Hold `record`, dropping whatever was held before.
    pub fn select(&self, record: R) {
        self.tx.send_replace(Some(record));
    }

    /// Empty the store. Watchers are only notified if something was held.
    pub fn clear(&self) {
        self.tx.send_if_modified(|current| current.take().is_some());
    }

    pub fn is_selected(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn current(&self) -> Option<R>
    where
        R: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Read the current record without cloning it.
    pub fn with_current<U>(&self, f: impl FnOnce(Option<&R>) -> U) -> U {
        f(self.tx.borrow().as_ref())
    }

    pub fn subscribe(&self) -> SelectionWatcher<R> {
        SelectionWatcher { rx: self.tx.subscribe() }
    }

    pub fn watcher_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<R> Default for Selection<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A consumer's view of a `Selection`.
#[derive(Debug, Clone)]
pub struct SelectionWatcher<R> {
    rx: watch::Receiver<Option<R>>,
}

impl<R> SelectionWatcher<R> {
    pub fn is_selected(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn current(&self) -> Option<R>
    where
        R: Clone,
    {
        self.rx.borrow().clone()
    }

    /// Whether the store changed since this watcher last called `seen` or
    /// `changed`. False once the store is gone.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Read the current record and mark it as seen.
    pub fn seen(&mut self) -> Option<R>
    where
        R: Clone,
    {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next change and return the new value.
    pub async fn changed(&mut self) -> Result<Option<R>, SelectionClosed>
    where
        R: Clone,
    {
        self.rx.changed().await.map_err(|_| SelectionClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
