use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Identity of a data item: the address of its shared allocation.
///
/// Two `Rc`s pointing at the same allocation share a key; equal values in distinct allocations do
/// not. This is what "identity-based, duplicates allowed" means for a [`crate::DataProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(usize);

impl ItemKey {
    pub fn of<T>(item: &Rc<T>) -> Self {
        Self(Rc::as_ptr(item) as *const () as usize)
    }
}

pub(crate) type ItemMap<V> = HashMap<ItemKey, V>;
pub(crate) type ItemSet = HashSet<ItemKey>;
