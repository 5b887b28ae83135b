//! Cart/order state holder.
//!
//! [`CartState`] carries the business rules (lock flag, customer role, age
//! gate, duplicate confirmation) as a pure struct so they are testable
//! without a UI runtime. [`CartContext`] wraps it in a signal and mirrors
//! every transition to local storage; a stored cart is adopted on startup so
//! the order survives a reload.
//!
//! This module makes no network calls. Submission is an explicit action on
//! the cart page, which calls [`CartContext::clear_request`] on success.

use std::rc::Rc;

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use super::api::{Drink, Table};
use super::storage::{self, KeyValueStore};

/// Youngest age allowed to order alcoholic drinks.
pub const LEGAL_DRINKING_AGE: u32 = 18;

/// The facts about the current user that the cart rules need.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orderer {
    pub is_customer: bool,
    /// Account flagged by staff as locked out of ordering.
    pub locked: bool,
    /// Computed age; `None` when no birth date is on file.
    pub age: Option<u32>,
}

/// Local order lifecycle. Once submitted the local copy is cleared, so a
/// persisted cart is only ever `Building`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CartStatus {
    #[default]
    Building,
    Submitted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AddOutcome {
    Added,
    /// Drink already in the cart; caller must confirm before the duplicate
    /// unit is appended via [`CartState::add_confirmed`].
    NeedsConfirmation,
    Rejected(RejectReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    OrdersLocked,
    NotCustomer,
    UnderAge,
    AlreadySubmitted,
}

impl RejectReason {
    pub fn user_message(self) -> &'static str {
        match self {
            RejectReason::OrdersLocked => "Your account is currently locked for ordering.",
            RejectReason::NotCustomer => "Only customer accounts can place orders.",
            RejectReason::UnderAge => "Alcoholic drinks require a verified age of 18 or older.",
            RejectReason::AlreadySubmitted => "This order has already been submitted.",
        }
    }
}

/// The cart: one entry per unit ordered, duplicates allowed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub drinks: Vec<Drink>,
    pub table: Option<Table>,
    pub status: CartStatus,
}

impl CartState {
    pub fn is_building(&self) -> bool {
        self.status == CartStatus::Building
    }

    pub fn item_count(&self) -> usize {
        self.drinks.len()
    }

    pub fn total_cents(&self) -> i64 {
        self.drinks.iter().map(|d| d.price_cents).sum()
    }

    pub fn contains(&self, drink_id: u64) -> bool {
        self.drinks.iter().any(|d| d.id == drink_id)
    }

    /// Append one unit, subject to the ordering rules. A rejection leaves
    /// the cart untouched; `NeedsConfirmation` defers the append until the
    /// user confirms the duplicate.
    pub fn add_drink(&mut self, who: &Orderer, drink: &Drink) -> AddOutcome {
        if let Some(reason) = self.gate(who, drink) {
            return AddOutcome::Rejected(reason);
        }
        if self.contains(drink.id) {
            return AddOutcome::NeedsConfirmation;
        }
        self.drinks.push(drink.clone());
        AddOutcome::Added
    }

    /// Append a confirmed duplicate unit. The gates are re-checked: the
    /// confirmation is asynchronous and the session may have changed.
    pub fn add_confirmed(&mut self, who: &Orderer, drink: &Drink) -> AddOutcome {
        if let Some(reason) = self.gate(who, drink) {
            return AddOutcome::Rejected(reason);
        }
        self.drinks.push(drink.clone());
        AddOutcome::Added
    }

    /// Remove a single unit of the given drink, if present.
    pub fn remove_one(&mut self, drink_id: u64) {
        if !self.is_building() {
            return;
        }
        if let Some(pos) = self.drinks.iter().position(|d| d.id == drink_id) {
            self.drinks.remove(pos);
        }
    }

    pub fn set_table(&mut self, table: Option<Table>) {
        if self.is_building() {
            self.table = table;
        }
    }

    /// Reset to the empty initial state.
    pub fn clear(&mut self) {
        *self = CartState::default();
    }

    fn gate(&self, who: &Orderer, drink: &Drink) -> Option<RejectReason> {
        if !self.is_building() {
            return Some(RejectReason::AlreadySubmitted);
        }
        if who.locked {
            return Some(RejectReason::OrdersLocked);
        }
        if !who.is_customer {
            return Some(RejectReason::NotCustomer);
        }
        // Unknown age counts as under age for alcohol.
        if drink.alcoholic && who.age.map_or(true, |a| a < LEGAL_DRINKING_AGE) {
            return Some(RejectReason::UnderAge);
        }
        None
    }
}

// =============================================================================
// Context
// =============================================================================

/// Cart holder shared via context. Single owner of the cart state; every
/// mutation is mirrored to local storage under [`storage::CART_KEY`].
#[derive(Clone)]
pub struct CartContext {
    state: Signal<CartState>,
    store: Rc<dyn KeyValueStore>,
}

impl CartContext {
    /// Build a holder over the given store, adopting any previously
    /// persisted cart.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let initial = store
            .get(storage::CART_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            state: Signal::new(initial),
            store,
        }
    }

    pub fn snapshot(&self) -> CartState {
        (self.state)()
    }

    pub fn item_count(&self) -> usize {
        self.state.read().item_count()
    }

    pub fn total_cents(&self) -> i64 {
        self.state.read().total_cents()
    }

    pub fn add_drink(&self, who: &Orderer, drink: &Drink) -> AddOutcome {
        let mut state = self.state;
        let outcome = state.with_mut(|s| s.add_drink(who, drink));
        if outcome == AddOutcome::Added {
            self.persist();
        }
        outcome
    }

    pub fn add_confirmed(&self, who: &Orderer, drink: &Drink) -> AddOutcome {
        let mut state = self.state;
        let outcome = state.with_mut(|s| s.add_confirmed(who, drink));
        if outcome == AddOutcome::Added {
            self.persist();
        }
        outcome
    }

    pub fn remove_one(&self, drink_id: u64) {
        let mut state = self.state;
        state.with_mut(|s| s.remove_one(drink_id));
        self.persist();
    }

    pub fn change_table(&self, table: Option<Table>) {
        let mut state = self.state;
        state.with_mut(|s| s.set_table(table));
        self.persist();
    }

    /// Reset to the empty initial state (after submit or logout).
    pub fn clear_request(&self) {
        let mut state = self.state;
        state.with_mut(CartState::clear);
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&*self.state.read()) {
            Ok(raw) => self.store.set(storage::CART_KEY, &raw),
            Err(e) => tracing::warn!("failed to serialize cart: {e}"),
        }
    }
}

/// Initialize the cart context provider - call once at app root.
pub fn use_cart_provider() {
    use_context_provider(|| CartContext::load(storage::durable()));
}

/// Get the cart context - use in any component.
pub fn use_cart() -> CartContext {
    use_context::<CartContext>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app::storage::MemoryStore;

    fn drink(id: u64, name: &str, price_cents: i64, alcoholic: bool) -> Drink {
        Drink {
            id,
            name: name.to_string(),
            price_cents,
            alcoholic,
            additives: Vec::new(),
            picture_url: None,
        }
    }

    fn adult_customer() -> Orderer {
        Orderer {
            is_customer: true,
            locked: false,
            age: Some(25),
        }
    }

    #[test]
    fn adding_distinct_drinks_grows_by_one_each() {
        let mut cart = CartState::default();
        let who = adult_customer();
        for (id, name) in [(1, "Cola"), (2, "Spezi"), (3, "Apple spritzer")] {
            let before = cart.item_count();
            assert_eq!(cart.add_drink(&who, &drink(id, name, 350, false)), AddOutcome::Added);
            assert_eq!(cart.item_count(), before + 1);
        }
    }

    #[test]
    fn duplicate_add_defers_until_confirmed() {
        let mut cart = CartState::default();
        let who = adult_customer();
        let cola = drink(1, "Cola", 350, false);

        assert_eq!(cart.add_drink(&who, &cola), AddOutcome::Added);
        assert_eq!(cart.add_drink(&who, &cola), AddOutcome::NeedsConfirmation);
        assert_eq!(cart.item_count(), 1);

        assert_eq!(cart.add_confirmed(&who, &cola), AddOutcome::Added);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn underage_never_mutates_cart_for_alcohol() {
        let mut cart = CartState::default();
        let minor = Orderer {
            is_customer: true,
            locked: false,
            age: Some(17),
        };
        let beer = drink(9, "Pilsner", 420, true);

        for _ in 0..5 {
            assert_eq!(
                cart.add_drink(&minor, &beer),
                AddOutcome::Rejected(RejectReason::UnderAge)
            );
        }
        assert_eq!(cart.item_count(), 0);

        // Unknown age is treated the same way.
        let unknown = Orderer {
            is_customer: true,
            locked: false,
            age: None,
        };
        assert_eq!(
            cart.add_drink(&unknown, &beer),
            AddOutcome::Rejected(RejectReason::UnderAge)
        );

        // Non-alcoholic drinks are fine for the same user.
        assert_eq!(cart.add_drink(&minor, &drink(1, "Cola", 350, false)), AddOutcome::Added);
    }

    #[test]
    fn locked_and_non_customer_accounts_are_rejected() {
        let mut cart = CartState::default();
        let locked = Orderer {
            is_customer: true,
            locked: true,
            age: Some(30),
        };
        assert_eq!(
            cart.add_drink(&locked, &drink(1, "Cola", 350, false)),
            AddOutcome::Rejected(RejectReason::OrdersLocked)
        );

        let waiter = Orderer {
            is_customer: false,
            locked: false,
            age: Some(30),
        };
        assert_eq!(
            cart.add_drink(&waiter, &drink(1, "Cola", 350, false)),
            AddOutcome::Rejected(RejectReason::NotCustomer)
        );
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn totals_count_one_entry_per_unit() {
        let mut cart = CartState::default();
        let who = adult_customer();
        let a = drink(1, "Negroni Zero", 1000, false);
        let b = drink(2, "Tonic", 550, false);

        assert_eq!(cart.add_drink(&who, &a), AddOutcome::Added);
        assert_eq!(cart.add_confirmed(&who, &a), AddOutcome::Added);
        assert_eq!(cart.add_drink(&who, &b), AddOutcome::Added);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_cents(), 2550);
        assert_eq!(crate::app::api::format_cents(cart.total_cents()), "25.50");
    }

    #[test]
    fn remove_one_drops_a_single_unit() {
        let mut cart = CartState::default();
        let who = adult_customer();
        let a = drink(1, "Cola", 350, false);
        cart.add_drink(&who, &a);
        cart.add_confirmed(&who, &a);

        cart.remove_one(1);
        assert_eq!(cart.item_count(), 1);
        cart.remove_one(1);
        cart.remove_one(1);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn submitted_cart_is_immutable() {
        let mut cart = CartState::default();
        let who = adult_customer();
        cart.add_drink(&who, &drink(1, "Cola", 350, false));
        cart.status = CartStatus::Submitted;

        assert_eq!(
            cart.add_drink(&who, &drink(2, "Spezi", 350, false)),
            AddOutcome::Rejected(RejectReason::AlreadySubmitted)
        );
        cart.set_table(Some(Table {
            id: 1,
            number: 4,
            seats: 4,
        }));
        assert_eq!(cart.table, None);
        cart.remove_one(1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn cart_state_survives_a_reload_through_storage() {
        let store = MemoryStore::new();
        let mut cart = CartState::default();
        let who = adult_customer();
        cart.add_drink(&who, &drink(1, "Cola", 350, false));
        cart.set_table(Some(Table {
            id: 2,
            number: 7,
            seats: 2,
        }));
        store.set(storage::CART_KEY, &serde_json::to_string(&cart).unwrap());

        // Reload: a fresh holder over the same store adopts the stored cart.
        let restored: CartState =
            serde_json::from_str(&store.get(storage::CART_KEY).unwrap()).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.table.as_ref().map(|t| t.number), Some(7));
    }

    #[test]
    fn cleared_cart_reloads_as_default() {
        let store = MemoryStore::new();
        let mut cart = CartState::default();
        cart.add_drink(&adult_customer(), &drink(1, "Cola", 350, false));
        cart.clear();
        store.set(storage::CART_KEY, &serde_json::to_string(&cart).unwrap());

        let restored: CartState =
            serde_json::from_str(&store.get(storage::CART_KEY).unwrap()).unwrap();
        assert_eq!(restored, CartState::default());
    }
}
