//! Shared single-threaded state.
//!
//! Core components never hold a borrow across an `.await`; they read or write
//! through short closures. In the app the handle is a Dioxus `Signal`, so every
//! write re-renders the views that read it.

use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub trait StateHandle<T>: Clone + 'static {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;

    fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.read_with(T::clone)
    }
}

impl<T: 'static> StateHandle<T> for Rc<RefCell<T>> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.borrow())
    }

    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

// `peek` so that async tasks reading state do not subscribe the caller.
impl<T: 'static> StateHandle<T> for Signal<T> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.peek())
    }

    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut signal = *self;
        let mut guard = signal.write();
        f(&mut *guard)
    }
}

/// Fresh `Rc<RefCell<T>>` handle.
#[cfg(test)]
pub fn local_state<T: 'static>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}
