//! Shop session state and its reducer.
//!
//! All state transitions go through [`ShopState::apply`] as discrete named
//! [`Action`]s. Transitions are pure and synchronous; the surrounding
//! [`ShopStore`](super::ShopStore) owns locking and every side effect
//! (service calls, toast timers).

use rust_decimal::Decimal;
use tidemark_core::{AddressId, CartKey, ToastId};

use crate::api::types::{Address, CartItem, CheckoutSnapshot, Order, Product};

use super::toast::Toast;

/// Category filter sentinel meaning "unfiltered".
pub const ALL_CATEGORIES: &str = "All";

/// Fixed tax rate applied to the cart subtotal (8%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Flat shipping fee added to any non-empty cart.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::new(7, 0)
}

/// Catalog filter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    /// Case-insensitive substring matched against name and description.
    pub search: String,
    /// Category name, or [`ALL_CATEGORIES`].
    pub category: String,
    /// Keep only products with at least one in-stock variant.
    pub in_stock_only: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_owned(),
            in_stock_only: false,
        }
    }
}

/// Partial filter update, shallow-merged over the current filters.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub search: Option<String>,
    pub category: Option<String>,
    pub in_stock_only: Option<bool>,
}

/// Ordering applied to the filtered product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceLowHigh,
    /// Most expensive first.
    PriceHighLow,
    /// Newest first (by id, descending).
    Newest,
}

/// Transient payment-step state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentStatus {
    /// A payment attempt is in flight.
    pub loading: bool,
    /// Message from the last failed attempt, empty otherwise.
    pub error: String,
    /// Provider reference from the last successful attempt.
    pub provider_ref: String,
}

/// Partial payment-status update, shallow-merged.
#[derive(Debug, Clone, Default)]
pub struct PaymentStatusUpdate {
    pub loading: Option<bool>,
    pub error: Option<String>,
    pub provider_ref: Option<String>,
}

/// A discrete state transition.
#[derive(Debug, Clone)]
pub enum Action {
    SetProducts(Vec<Product>),
    SetProductsLoading(bool),
    SetAddresses(Vec<Address>),
    SetAddressesLoading(bool),
    SetFilters(FilterUpdate),
    SetSelectedAddress(AddressId),
    AddToCart(CartItem),
    UpdateCartQuantity { key: CartKey, quantity: u32 },
    RemoveFromCart(CartKey),
    SetCheckoutSnapshot(Option<CheckoutSnapshot>),
    SetPaymentStatus(PaymentStatusUpdate),
    SetLatestOrder(Order),
    ClearCart,
    AddToast(Toast),
    RemoveToast(ToastId),
}

/// The whole session state.
#[derive(Debug, Default)]
pub struct ShopState {
    pub products: Vec<Product>,
    pub products_loading: bool,
    pub addresses: Vec<Address>,
    pub addresses_loading: bool,
    pub cart: Vec<CartItem>,
    pub filters: Filters,
    pub selected_address: Option<AddressId>,
    pub checkout_snapshot: Option<CheckoutSnapshot>,
    pub payment: PaymentStatus,
    pub latest_order: Option<Order>,
    pub toasts: Vec<Toast>,
}

impl ShopState {
    /// Apply one action. Pure state transition; no side effects.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetProducts(products) => self.products = products,
            Action::SetProductsLoading(loading) => self.products_loading = loading,
            Action::SetAddresses(addresses) => self.addresses = addresses,
            Action::SetAddressesLoading(loading) => self.addresses_loading = loading,
            Action::SetFilters(update) => {
                if let Some(search) = update.search {
                    self.filters.search = search;
                }
                if let Some(category) = update.category {
                    self.filters.category = category;
                }
                if let Some(in_stock_only) = update.in_stock_only {
                    self.filters.in_stock_only = in_stock_only;
                }
            }
            Action::SetSelectedAddress(id) => self.selected_address = Some(id),
            Action::AddToCart(item) => self.add_to_cart(item),
            Action::UpdateCartQuantity { key, quantity } => {
                if let Some(item) = self.cart.iter_mut().find(|item| item.key == key) {
                    item.quantity = quantity.clamp(1, item.stock.max(1));
                }
            }
            Action::RemoveFromCart(key) => self.cart.retain(|item| item.key != key),
            Action::SetCheckoutSnapshot(snapshot) => self.checkout_snapshot = snapshot,
            Action::SetPaymentStatus(update) => {
                if let Some(loading) = update.loading {
                    self.payment.loading = loading;
                }
                if let Some(error) = update.error {
                    self.payment.error = error;
                }
                if let Some(provider_ref) = update.provider_ref {
                    self.payment.provider_ref = provider_ref;
                }
            }
            Action::SetLatestOrder(order) => self.latest_order = Some(order),
            Action::ClearCart => self.cart.clear(),
            Action::AddToast(toast) => self.toasts.push(toast),
            Action::RemoveToast(id) => self.toasts.retain(|toast| toast.id != id),
        }
    }

    /// Upsert a cart line keyed by (product, variant), clamping quantity to
    /// the stock snapshot.
    fn add_to_cart(&mut self, item: CartItem) {
        if let Some(existing) = self.cart.iter_mut().find(|entry| entry.key == item.key) {
            existing.quantity = (existing.quantity + item.quantity).min(item.stock).max(1);
            return;
        }

        let mut item = item;
        item.quantity = item.quantity.clamp(1, item.stock.max(1));
        self.cart.push(item);
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// `"All"` plus the distinct product categories, in order of first
    /// appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_owned()];
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    /// Products matching the current filters.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        let term = self.filters.search.trim().to_lowercase();
        self.products
            .iter()
            .filter(|product| {
                let matches_search = term.is_empty()
                    || product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term);
                let matches_category = self.filters.category == ALL_CATEGORIES
                    || product.category == self.filters.category;
                let matches_stock = !self.filters.in_stock_only || product.in_stock();

                matches_search && matches_category && matches_stock
            })
            .collect()
    }

    /// Filtered products in the requested order.
    #[must_use]
    pub fn listed_products(&self, sort: ProductSort) -> Vec<&Product> {
        let mut products = self.filtered_products();
        match sort {
            ProductSort::Featured => {}
            ProductSort::PriceLowHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceHighLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Newest => products.sort_by(|a, b| b.id.as_str().cmp(a.id.as_str())),
        }
        products
    }

    /// Sum of line totals.
    #[must_use]
    pub fn cart_subtotal(&self) -> Decimal {
        self.cart.iter().map(CartItem::line_total).sum()
    }

    /// Tax on the subtotal.
    #[must_use]
    pub fn cart_tax(&self) -> Decimal {
        self.cart_subtotal() * tax_rate()
    }

    /// Grand total: zero for an empty cart, else subtotal + tax + flat
    /// shipping.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        if self.cart.is_empty() {
            return Decimal::ZERO;
        }
        self.cart_subtotal() + self.cart_tax() + shipping_fee()
    }

    /// The currently selected address, when it exists in the fetched list.
    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        let id = self.selected_address.as_ref()?;
        self.addresses.iter().find(|address| &address.id == id)
    }

    /// Check the cart against its stock snapshots.
    ///
    /// Returns a user-facing message for the first over-stock line, or for
    /// an empty cart; `None` means the cart is valid.
    #[must_use]
    pub fn validate_cart(&self) -> Option<String> {
        if let Some(item) = self.cart.iter().find(|item| item.quantity > item.stock) {
            return Some(format!(
                "Only {} unit(s) available for {}.",
                item.stock, item.name
            ));
        }
        if self.cart.is_empty() {
            return Some("Your cart is empty.".to_owned());
        }
        None
    }
}
