//! # Session State
//!
//! The register's one active cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several commands read and modify it
//! 2. A payment task snapshots and later clears it from another task
//!
//! Every critical section is short and synchronous; nothing awaits while
//! holding the lock.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Cart Operations                              │
//! │                                                                         │
//! │  Front-end Action         Command                 Cart Change           │
//! │  ────────────────         ───────                 ───────────           │
//! │                                                                         │
//! │  Tap Product ────────────► add_to_cart() ───────► add_item()           │
//! │  Change Quantity ────────► update_cart_item() ──► set_quantity()       │
//! │  Tap Remove ─────────────► remove_from_cart() ──► remove_item()        │
//! │  Pick Customer ──────────► select_customer() ───► select_customer()    │
//! │  Enter Discount ─────────► set_discount() ──────► set_discount_*()     │
//! │  Clear / Sale Complete ──► clear_cart() ────────► clear()              │
//! │  View Cart ──────────────► get_cart() ──────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use till_core::Cart;

/// Shared handle to the active cart. Clones share the same cart.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    cart: Arc<Mutex<Cart>>,
}

impl SessionState {
    /// Creates a session with an empty cart.
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = session.with_cart(|cart| cart.discounted_totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let outcome = session.with_cart_mut(|cart| cart.add_item(&product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock())
    }

    /// A copy of the cart as it is right now.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    // Cart methods never panic mid-update, so a poisoned lock still holds a
    // consistent cart.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
