//! Identity map: one shared handle per primary key.
//!
//! The map is an explicit object so each repository (or test) can own or
//! inject its own instance. It never evicts on its own.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity map handle shared between repositories on one thread.
pub type SharedIdentityMap<T> = Rc<RefCell<IdentityMap<T>>>;

/// Cache from primary key to the single live handle for that row.
#[derive(Debug)]
pub struct IdentityMap<T> {
    entries: HashMap<i64, Rc<RefCell<T>>>,
}

impl<T> Default for IdentityMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> IdentityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map wrapped for sharing.
    pub fn shared() -> SharedIdentityMap<T> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Returns a clone of the handle registered for `id`.
    pub fn get(&self, id: i64) -> Option<Rc<RefCell<T>>> {
        self.entries.get(&id).cloned()
    }

    /// Registers `handle` for `id`, replacing any previous handle.
    pub fn put(&mut self, id: i64, handle: Rc<RefCell<T>>) {
        self.entries.insert(id, handle);
    }

    pub fn remove(&mut self, id: i64) -> Option<Rc<RefCell<T>>> {
        self.entries.remove(&id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
