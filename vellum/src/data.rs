//! An observable, identity-keyed item collection shared by list views.

use core::cell::{Cell, RefCell};
use core::cmp::Ordering;
use core::fmt;
use std::rc::Rc;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeKind {
    Add,
    Remove,
    RemoveAll,
    Replace,
    Sort,
    Invalidate,
    InvalidateAll,
}

/// A structural change notification.
///
/// `start_index..=end_index` is the range touched, except for `RemoveAll`/`InvalidateAll` where
/// `end_index` is the collection length before the change.
#[derive(Debug)]
pub struct ChangeEvent<T> {
    pub kind: ChangeKind,
    /// Added, removed, replaced (old values) or invalidated items. For `Sort`, the new order.
    pub items: Vec<Rc<T>>,
    pub start_index: usize,
    pub end_index: usize,
    /// For `Sort` only: `permutation[new_index] == old_index`.
    pub permutation: Option<Vec<usize>>,
}

impl<T> ChangeEvent<T> {
    fn new(kind: ChangeKind, items: Vec<Rc<T>>, start_index: usize, end_index: usize) -> Self {
        Self {
            kind,
            items,
            start_index,
            end_index,
            permutation: None,
        }
    }

    /// Number of indexes in the touched range.
    pub fn span(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ChangeListener<T> = Rc<dyn Fn(&ChangeEvent<T>)>;

struct Shared<T> {
    items: RefCell<Vec<Rc<T>>>,
    listeners: RefCell<Vec<(SubscriptionId, ChangeListener<T>)>>,
    next_id: Cell<u64>,
}

/// An ordered list of shared items that notifies subscribers of every mutation.
///
/// Items are compared by identity (`Rc` pointer), so the same value may appear twice as two
/// distinct items. Cloning the provider clones the handle; all clones see the same items.
///
/// Every mutation emits exactly one [`ChangeEvent`], after the items are updated and no internal
/// borrow is held, so listeners may read (or even mutate) the provider.
pub struct DataProvider<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for DataProvider<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> Default for DataProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DataProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProvider")
            .field("len", &self.len())
            .field("listeners", &self.shared.listeners.borrow().len())
            .finish()
    }
}

impl<T> DataProvider<T> {
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn from_items(items: Vec<Rc<T>>) -> Self {
        Self {
            shared: Rc::new(Shared {
                items: RefCell::new(items),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Wraps each value in its own allocation.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self::from_items(values.into_iter().map(Rc::new).collect())
    }

    /// Returns `true` if both handles share the same items.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn len(&self) -> usize {
        self.shared.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item_at(&self, index: usize) -> Result<Rc<T>> {
        let items = self.shared.items.borrow();
        items
            .get(index)
            .cloned()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            })
    }

    /// The index of the first occurrence of `item`, by identity.
    pub fn item_index(&self, item: &Rc<T>) -> Option<usize> {
        self.shared
            .items
            .borrow()
            .iter()
            .position(|i| Rc::ptr_eq(i, item))
    }

    /// A snapshot of the current items.
    pub fn items(&self) -> Vec<Rc<T>> {
        self.shared.items.borrow().clone()
    }

    pub fn add_item(&self, item: impl Into<Rc<T>>) {
        let item = item.into();
        let index = {
            let mut items = self.shared.items.borrow_mut();
            items.push(Rc::clone(&item));
            items.len() - 1
        };
        self.dispatch(ChangeEvent::new(ChangeKind::Add, vec![item], index, index));
    }

    /// Inserts at `index`, which may equal `len()`.
    pub fn add_item_at(&self, item: impl Into<Rc<T>>, index: usize) -> Result<()> {
        let item = item.into();
        {
            let mut items = self.shared.items.borrow_mut();
            check_insert(index, items.len())?;
            items.insert(index, Rc::clone(&item));
        }
        self.dispatch(ChangeEvent::new(ChangeKind::Add, vec![item], index, index));
        Ok(())
    }

    pub fn add_items(&self, items: impl IntoIterator<Item = Rc<T>>) {
        let index = self.len();
        // Appending is always in range.
        let _ = self.add_items_at(items, index);
    }

    /// Inserts a batch at `index`. An empty batch changes nothing and emits nothing.
    pub fn add_items_at(&self, items: impl IntoIterator<Item = Rc<T>>, index: usize) -> Result<()> {
        let added: Vec<Rc<T>> = items.into_iter().collect();
        {
            let mut items = self.shared.items.borrow_mut();
            check_insert(index, items.len())?;
            if added.is_empty() {
                return Ok(());
            }
            items.splice(index..index, added.iter().cloned());
        }
        let end = index + added.len() - 1;
        self.dispatch(ChangeEvent::new(ChangeKind::Add, added, index, end));
        Ok(())
    }

    pub fn remove_item_at(&self, index: usize) -> Result<Rc<T>> {
        let removed = {
            let mut items = self.shared.items.borrow_mut();
            check_access(index, items.len())?;
            items.remove(index)
        };
        self.dispatch(ChangeEvent::new(
            ChangeKind::Remove,
            vec![Rc::clone(&removed)],
            index,
            index,
        ));
        Ok(removed)
    }

    /// Removes the first occurrence of `item`, by identity.
    pub fn remove_item(&self, item: &Rc<T>) -> Option<Rc<T>> {
        let index = self.item_index(item)?;
        self.remove_item_at(index).ok()
    }

    pub fn remove_all(&self) -> Vec<Rc<T>> {
        let removed = core::mem::take(&mut *self.shared.items.borrow_mut());
        let len = removed.len();
        self.dispatch(ChangeEvent::new(
            ChangeKind::RemoveAll,
            removed.clone(),
            0,
            len,
        ));
        removed
    }

    /// Replaces the item at `index` and returns the previous one.
    pub fn replace_item_at(&self, item: impl Into<Rc<T>>, index: usize) -> Result<Rc<T>> {
        let item = item.into();
        let old = {
            let mut items = self.shared.items.borrow_mut();
            check_access(index, items.len())?;
            core::mem::replace(&mut items[index], item)
        };
        self.dispatch(ChangeEvent::new(
            ChangeKind::Replace,
            vec![Rc::clone(&old)],
            index,
            index,
        ));
        Ok(old)
    }

    pub fn replace_item(&self, item: impl Into<Rc<T>>, old: &Rc<T>) -> Option<Rc<T>> {
        let index = self.item_index(old)?;
        self.replace_item_at(item, index).ok()
    }

    /// Stable sort. The emitted event carries the permutation from new to old indexes.
    pub fn sort_by(&self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        let (sorted, permutation) = {
            let mut items = self.shared.items.borrow_mut();
            let mut order: Vec<usize> = (0..items.len()).collect();
            order.sort_by(|&a, &b| compare(&*items[a], &*items[b]));
            let sorted: Vec<Rc<T>> = order.iter().map(|&i| Rc::clone(&items[i])).collect();
            items.clone_from(&sorted);
            (sorted, order)
        };
        let end = sorted.len().saturating_sub(1);
        let mut event = ChangeEvent::new(ChangeKind::Sort, sorted, 0, end);
        event.permutation = Some(permutation);
        self.dispatch(event);
    }

    pub fn invalidate_item_at(&self, index: usize) -> Result<()> {
        let item = self.item_at(index)?;
        self.dispatch(ChangeEvent::new(
            ChangeKind::Invalidate,
            vec![item],
            index,
            index,
        ));
        Ok(())
    }

    /// Returns `false` if `item` is not in the provider.
    pub fn invalidate_item(&self, item: &Rc<T>) -> bool {
        match self.item_index(item) {
            Some(index) => self.invalidate_item_at(index).is_ok(),
            None => false,
        }
    }

    /// Asks every view to rebuild all of its item renderers.
    pub fn invalidate(&self) {
        let items = self.items();
        let len = items.len();
        self.dispatch(ChangeEvent::new(ChangeKind::InvalidateAll, items, 0, len));
    }

    pub fn subscribe(&self, listener: impl Fn(&ChangeEvent<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_id.get());
        self.shared.next_id.set(id.0 + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    fn dispatch(&self, event: ChangeEvent<T>) {
        vtrace!(
            kind = ?event.kind,
            start = event.start_index,
            end = event.end_index,
            "data change"
        );
        let listeners: Vec<ChangeListener<T>> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl<T: Ord> DataProvider<T> {
    pub fn sort(&self) {
        self.sort_by(T::cmp);
    }
}

impl<T> FromIterator<T> for DataProvider<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

fn check_insert(index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(())
}

fn check_access(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(())
}
