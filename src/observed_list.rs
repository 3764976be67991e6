//! A list that reports every structural change to an observer
//!
//! Knowing exactly what changed lets the differ patch its current generation instead
//! of rebuilding it. All mutation goes through the methods below; the contents are
//! only exposed read-only, since a raw mutable view could not keep the observer in
//! sync.
use log::{debug, warn};
use std::ops::{Deref, DerefMut, Range};

use crate::diff_engine::DiffEngine;
use crate::errors::DiffError;
use crate::types::{KeyedItem, OperationSink};
use crate::update_ops::OperationScript;

/// Receives fine-grained change notifications from an [`ObservedList`].
///
/// Insertions and changes are reported before the list is modified, so an observer
/// that rejects them leaves the list untouched.
pub trait ListObserver<T> {
    fn on_range_inserted(&mut self, start: usize, items: &[T]) -> Result<(), DiffError>;

    fn on_range_removed(&mut self, start: usize, count: usize) -> Result<(), DiffError>;

    /// Content of `items.len()` items starting at `start` changed, keys are unchanged.
    fn on_range_changed(&mut self, _start: usize, _items: &[T]) -> Result<(), DiffError> {
        Ok(())
    }

    fn on_item_moved(&mut self, from: usize, to: usize) -> Result<(), DiffError>;

    /// The observer's view of the list can no longer be patched; rebuild it from
    /// `items`. Sent on attach and after changes made while notifications were paused.
    fn on_reset(&mut self, _items: &[T]) -> Result<(), DiffError> {
        Ok(())
    }
}

pub struct ObservedList<T, O = DiffEngine> {
    items: Vec<T>,
    observer: Option<O>,
    notifications_paused: bool,
    needs_resync: bool,
}

impl<T, O> Default for ObservedList<T, O> {
    fn default() -> Self {
        ObservedList {
            items: Vec::new(),
            observer: None,
            notifications_paused: false,
            needs_resync: false,
        }
    }
}

impl<T: KeyedItem, O: ListObserver<T>> ObservedList<T, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ObservedList {
            items: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn with_observer(observer: O) -> Self {
        ObservedList {
            observer: Some(observer),
            ..Self::default()
        }
    }

    /// Attach `observer`, returning the one it replaces.
    ///
    /// The observer is first reset to the current contents; if it rejects them it is
    /// not attached.
    pub fn set_observer(&mut self, mut observer: O) -> Result<Option<O>, DiffError> {
        if self.notifications_paused {
            self.needs_resync = true;
        } else {
            observer.on_reset(&self.items)?;
            self.needs_resync = false;
        }
        Ok(self.observer.replace(observer))
    }

    pub fn take_observer(&mut self) -> Option<O> {
        self.observer.take()
    }

    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    pub fn observer_mut(&mut self) -> Option<&mut O> {
        self.observer.as_mut()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn notifications_paused(&self) -> bool {
        self.notifications_paused
    }

    /// True when the observer no longer mirrors the list, after changes made while
    /// notifications were paused. Nothing is forwarded until it has been reset.
    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    pub fn pause_notifications(&mut self) -> Result<(), DiffError> {
        if self.notifications_paused {
            return Err(DiffError::NotificationsAlreadyPaused);
        }
        self.notifications_paused = true;
        Ok(())
    }

    /// Resume notifications, resetting the observer if anything changed meanwhile.
    pub fn resume_notifications(&mut self) -> Result<(), DiffError> {
        if !self.notifications_paused {
            return Err(DiffError::NotificationsAlreadyResumed);
        }
        self.notifications_paused = false;
        self.resync()
    }

    /// Reset the observer to the current contents if it has fallen behind.
    ///
    /// On failure the list stays marked as out of sync and later changes are still
    /// withheld from the observer.
    pub fn resync(&mut self) -> Result<(), DiffError> {
        if !self.needs_resync || self.notifications_paused {
            return Ok(());
        }
        if let Some(observer) = self.observer.as_mut() {
            debug!("resetting observer to {} items", self.items.len());
            observer.on_reset(&self.items)?;
        }
        self.needs_resync = false;
        Ok(())
    }

    /// Pause notifications until the returned guard is dropped.
    pub fn paused(&mut self) -> Result<PausedNotifications<'_, T, O>, DiffError> {
        self.pause_notifications()?;
        Ok(PausedNotifications { list: self })
    }

    /// The observer to notify, or `None` when it is absent or must not see
    /// incremental changes right now.
    fn forwarding_observer(&mut self) -> Option<&mut O> {
        if self.notifications_paused || self.needs_resync {
            self.needs_resync = true;
            return None;
        }
        self.observer.as_mut()
    }

    /// Run `notify` against the observer unless notifications are withheld or there
    /// is no observer.
    fn notify<F>(&mut self, notify: F) -> Result<(), DiffError>
    where
        F: FnOnce(&mut O) -> Result<(), DiffError>,
    {
        match self.forwarding_observer() {
            Some(observer) => notify(observer),
            None => Ok(()),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), DiffError> {
        if index >= self.items.len() {
            return Err(DiffError::out_of_bounds(index, self.items.len()));
        }
        Ok(())
    }

    fn check_insert_index(&self, index: usize) -> Result<(), DiffError> {
        if index > self.items.len() {
            return Err(DiffError::out_of_bounds(index, self.items.len()));
        }
        Ok(())
    }

    pub fn push(&mut self, item: T) -> Result<(), DiffError> {
        let index = self.items.len();
        self.insert(index, item)
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<(), DiffError> {
        self.check_insert_index(index)?;
        self.notify(|observer| observer.on_range_inserted(index, std::slice::from_ref(&item)))?;
        self.items.insert(index, item);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<(), DiffError> {
        let index = self.items.len();
        self.insert_all(index, items)
    }

    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, index: usize, items: I) -> Result<(), DiffError> {
        self.check_insert_index(index)?;
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Ok(());
        }
        self.notify(|observer| observer.on_range_inserted(index, &items))?;
        self.items.splice(index..index, items);
        Ok(())
    }

    /// Replace the item at `index`, returning the old one.
    ///
    /// Same key: reported as a content change. Different key: reported as a removal
    /// followed by an insertion; if the insertion is rejected the removal is reported
    /// back as an insertion of the old item.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, DiffError> {
        self.check_index(index)?;
        if self.items[index].key() == item.key() {
            self.notify(|observer| observer.on_range_changed(index, std::slice::from_ref(&item)))?;
        } else {
            self.notify(|observer| observer.on_range_removed(index, 1))?;
            if let Err(err) =
                self.notify(|observer| observer.on_range_inserted(index, std::slice::from_ref(&item)))
            {
                let previous = &self.items[index];
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_range_inserted(index, std::slice::from_ref(previous))?;
                }
                return Err(err);
            }
        }
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    pub fn remove(&mut self, index: usize) -> Result<T, DiffError> {
        self.check_index(index)?;
        self.notify(|observer| observer.on_range_removed(index, 1))?;
        Ok(self.items.remove(index))
    }

    /// Remove the first item equal to `item`. Returns whether one was found.
    pub fn remove_item(&mut self, item: &T) -> Result<bool, DiffError>
    where
        T: PartialEq,
    {
        match self.items.iter().position(|candidate| candidate == item) {
            Some(index) => self.remove(index).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn remove_range(&mut self, range: Range<usize>) -> Result<(), DiffError> {
        if range.start > range.end {
            return Err(DiffError::out_of_bounds(range.start, range.end));
        }
        if range.end > self.items.len() {
            return Err(DiffError::out_of_bounds(range.end, self.items.len()));
        }
        if range.is_empty() {
            return Ok(());
        }
        let (start, count) = (range.start, range.len());
        self.notify(|observer| observer.on_range_removed(start, count))?;
        self.items.drain(range);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), DiffError> {
        let len = self.items.len();
        self.remove_range(0..len)
    }

    /// Keep only the items matching `keep`, reporting each removal.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> Result<(), DiffError> {
        let mut index = 0;
        while index < self.items.len() {
            if keep(&self.items[index]) {
                index += 1;
            } else {
                self.remove(index)?;
            }
        }
        Ok(())
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), DiffError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        self.notify(|observer| observer.on_item_moved(from, to))?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Report that the content of the item at `index` changed in place.
    pub fn notify_item_changed(&mut self, index: usize) -> Result<(), DiffError> {
        self.check_index(index)?;
        let item = &self.items[index];
        if self.notifications_paused || self.needs_resync {
            self.needs_resync = true;
            return Ok(());
        }
        match self.observer.as_mut() {
            Some(observer) => observer.on_range_changed(index, std::slice::from_ref(item)),
            None => Ok(()),
        }
    }
}

impl<T: KeyedItem> ObservedList<T, DiffEngine> {
    /// Run a diff cycle for the list's current contents and emit it to `sink`.
    ///
    /// A differ is created on first use. If it has fallen behind the list, its current
    /// generation is rebuilt from the whole list first, even while paused.
    pub fn notify_changes<S>(&mut self, sink: &mut S) -> Result<OperationScript, DiffError>
    where
        S: OperationSink + ?Sized,
    {
        if self.observer.is_none() {
            self.needs_resync = true;
        }
        let engine = self.observer.get_or_insert_with(DiffEngine::new);
        if self.needs_resync {
            debug!(
                "{}: resyncing {} items",
                engine.config().debug_tag,
                self.items.len()
            );
            engine.set_items(&self.items)?;
            self.needs_resync = false;
        }
        engine.compute_and_emit_changes(sink)
    }
}

impl<T, O> Deref for ObservedList<T, O> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

/// Notifications stay paused while this guard lives. Mutate the list through it.
pub struct PausedNotifications<'a, T: KeyedItem, O: ListObserver<T>> {
    list: &'a mut ObservedList<T, O>,
}

impl<T: KeyedItem, O: ListObserver<T>> Deref for PausedNotifications<'_, T, O> {
    type Target = ObservedList<T, O>;

    fn deref(&self) -> &Self::Target {
        self.list
    }
}

impl<T: KeyedItem, O: ListObserver<T>> DerefMut for PausedNotifications<'_, T, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.list
    }
}

impl<T: KeyedItem, O: ListObserver<T>> Drop for PausedNotifications<'_, T, O> {
    fn drop(&mut self) {
        self.list.notifications_paused = false;
        if let Err(err) = self.list.resync() {
            warn!("observer reset failed after paused changes: {err}");
        }
    }
}
