//! The shop store: session state plus orchestration.
//!
//! [`ShopStore`] owns a [`ShopState`] behind a mutex and is the only writer.
//! Synchronous methods (cart edits, filters) apply one action and return;
//! async methods (bootstrap, checkout, payment) sequence service calls and
//! apply actions as results land. Every transition is atomic: the lock is
//! held only for the synchronous `apply`, never across an await.
//!
//! Orchestration methods never panic and never return a raw [`ApiError`];
//! failures surface as toasts plus typed rejection values, and the worst
//! case is an unchanged state.

mod state;
mod toast;

pub use state::{
    Action, Filters, FilterUpdate, PaymentStatus, PaymentStatusUpdate, ProductSort, ShopState,
    ALL_CATEGORIES, shipping_fee, tax_rate,
};
pub use toast::{Toast, TOAST_TTL};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use thiserror::Error;
use tidemark_core::{AddressId, CartKey, OrderId, PaymentMethod, ToastId, ToastKind};
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

use crate::api::types::{
    Address, CartItem, CheckoutSnapshot, Order, OrderRequest, PaymentRequest, Product, Variant,
};
use crate::api::Services;

/// Why checkout preparation was rejected. Recoverable by user correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The cart failed validation (empty, or a line exceeds its stock).
    #[error("{0}")]
    InvalidCart(String),
    /// No shipping address is selected.
    #[error("Address is required.")]
    MissingAddress,
}

/// Why the payment step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Payment was started without a frozen checkout.
    #[error("Checkout details are missing.")]
    MissingCheckout,
    /// Payment or order creation failed; the checkout snapshot is kept so
    /// the payment can be retried.
    #[error("{0}")]
    Failed(String),
}

/// The shop session store.
///
/// Explicitly constructed with its dependencies and dropped at session end;
/// cheaply cloneable via `Arc` for sharing with UI layers.
#[derive(Clone)]
pub struct ShopStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<ShopState>,
    services: Services,
    toast_timers: Mutex<HashMap<ToastId, JoinHandle<()>>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        if let Ok(timers) = self.toast_timers.lock() {
            for handle in timers.values() {
                handle.abort();
            }
        }
    }
}

impl ShopStore {
    /// Create a store over the given services.
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(ShopState::default()),
                services,
                toast_timers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Apply one action atomically.
    fn apply(&self, action: Action) {
        self.inner
            .state
            .lock()
            .expect("shop state lock poisoned")
            .apply(action);
    }

    /// Read from the state under the lock.
    fn with_state<T>(&self, read: impl FnOnce(&ShopState) -> T) -> T {
        read(&self.inner.state.lock().expect("shop state lock poisoned"))
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Fetch products and addresses concurrently and seed the session.
    ///
    /// Both-or-nothing: a catalog failure leaves prior data untouched and
    /// surfaces one error toast. The first address, when present, becomes
    /// the default selection. Never fails; the session stays usable.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) {
        self.apply(Action::SetProductsLoading(true));
        self.apply(Action::SetAddressesLoading(true));

        let (products, addresses) = tokio::join!(
            self.inner.services.catalog.list(),
            self.inner.services.addresses.list(),
        );

        match products {
            Ok(products) => {
                let default_address = addresses.first().map(|address| address.id.clone());
                self.apply(Action::SetProducts(products));
                self.apply(Action::SetAddresses(addresses));
                if let Some(id) = default_address {
                    self.apply(Action::SetSelectedAddress(id));
                }
            }
            Err(err) => {
                warn!("bootstrap failed: {err}");
                self.notify(ToastKind::Error, err.to_string());
            }
        }

        self.apply(Action::SetProductsLoading(false));
        self.apply(Action::SetAddressesLoading(false));
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Add a variant to the cart.
    ///
    /// Rejected with an error toast (and no mutation) when no variant is
    /// given or the variant is out of stock. Otherwise upserts the line
    /// keyed by (product, variant) with quantity clamped to the stock
    /// snapshot, and toasts success naming the product.
    pub fn add_to_cart(&self, product: &Product, variant: Option<&Variant>, quantity: u32) {
        let Some(variant) = variant else {
            self.notify(ToastKind::Error, "Select a product variant first.");
            return;
        };
        if variant.stock == 0 {
            self.notify(ToastKind::Error, "This variant is currently out of stock.");
            return;
        }

        self.apply(Action::AddToCart(CartItem {
            key: CartKey::for_line(&product.id, &variant.id),
            product_id: product.id.clone(),
            variant_id: variant.id.clone(),
            name: product.name.clone(),
            variant_label: variant.label.clone(),
            price: product.price,
            stock: variant.stock,
            image: product.image.clone(),
            quantity,
        }));
        self.notify(
            ToastKind::Success,
            format!("{} added to cart.", product.name),
        );
    }

    /// Set a line's quantity, clamped to `[1, stock snapshot]`. No-op for
    /// an unknown key.
    pub fn update_quantity(&self, key: &CartKey, quantity: u32) {
        self.apply(Action::UpdateCartQuantity {
            key: key.clone(),
            quantity,
        });
    }

    /// Remove a line and toast the removal.
    pub fn remove_from_cart(&self, key: &CartKey) {
        self.apply(Action::RemoveFromCart(key.clone()));
        self.notify(ToastKind::Info, "Item removed from cart.");
    }

    /// Check the cart against its stock snapshots; `None` means valid.
    #[must_use]
    pub fn validate_cart(&self) -> Option<String> {
        self.with_state(ShopState::validate_cart)
    }

    // =========================================================================
    // Filters & Selection
    // =========================================================================

    /// Shallow-merge a filter update.
    pub fn set_filters(&self, update: FilterUpdate) {
        self.apply(Action::SetFilters(update));
    }

    /// Select the shipping address to use at checkout.
    pub fn select_address(&self, id: AddressId) {
        self.apply(Action::SetSelectedAddress(id));
    }

    // =========================================================================
    // Checkout & Payment
    // =========================================================================

    /// Validate the cart and freeze a checkout snapshot.
    ///
    /// Rejections (invalid cart, missing address) toast and leave all state
    /// untouched. On success the snapshot is stored and submitted to the
    /// checkout service; the acknowledgement is not otherwise used, so a
    /// submission failure is logged without failing the checkout.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] when the cart is invalid or no address is
    /// selected.
    #[instrument(skip(self))]
    pub async fn prepare_checkout(&self) -> Result<CheckoutSnapshot, CheckoutError> {
        if let Some(message) = self.validate_cart() {
            self.notify(ToastKind::Error, message.clone());
            return Err(CheckoutError::InvalidCart(message));
        }

        let snapshot = self.with_state(|state| {
            state.selected_address().cloned().map(|address| {
                let address_label = address.formatted();
                CheckoutSnapshot {
                    items: state.cart.clone(),
                    subtotal: state.cart_subtotal(),
                    tax: state.cart_tax(),
                    shipping: shipping_fee(),
                    total: state.cart_total(),
                    address,
                    address_label,
                }
            })
        });
        let Some(snapshot) = snapshot else {
            self.notify(ToastKind::Error, "Please select a shipping address.");
            return Err(CheckoutError::MissingAddress);
        };

        self.apply(Action::SetCheckoutSnapshot(Some(snapshot.clone())));

        if let Err(err) = self.inner.services.checkout.submit(&snapshot).await {
            warn!("checkout submission failed: {err}");
        }

        Ok(snapshot)
    }

    /// Run the payment step for the frozen checkout.
    ///
    /// Only a successful payment proceeds to order creation. On full
    /// success: the provider reference is recorded, the order becomes the
    /// latest order, the cart is cleared, and the new order ID is returned.
    /// On failure at either step the error lands in the payment status and
    /// a toast; cart and snapshot stay untouched so payment can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingCheckout`] without a snapshot, or
    /// [`PaymentError::Failed`] when payment or order creation fails.
    #[instrument(skip(self), fields(method = %method))]
    pub async fn start_payment(&self, method: PaymentMethod) -> Result<OrderId, PaymentError> {
        let Some(snapshot) = self.with_state(|state| state.checkout_snapshot.clone()) else {
            return Err(PaymentError::MissingCheckout);
        };

        self.apply(Action::SetPaymentStatus(PaymentStatusUpdate {
            loading: Some(true),
            error: Some(String::new()),
            provider_ref: Some(String::new()),
        }));

        match self.pay_and_place_order(method, snapshot).await {
            Ok((order, provider_ref)) => {
                self.apply(Action::SetPaymentStatus(PaymentStatusUpdate {
                    loading: Some(false),
                    error: Some(String::new()),
                    provider_ref: Some(provider_ref),
                }));
                let order_id = order.id.clone();
                self.apply(Action::SetLatestOrder(order));
                self.apply(Action::ClearCart);
                self.notify(ToastKind::Success, "Payment successful. Order placed.");
                Ok(order_id)
            }
            Err(err) => {
                let message = err.to_string();
                self.apply(Action::SetPaymentStatus(PaymentStatusUpdate {
                    loading: Some(false),
                    error: Some(message.clone()),
                    provider_ref: Some(String::new()),
                }));
                self.notify(ToastKind::Error, message.clone());
                Err(PaymentError::Failed(message))
            }
        }
    }

    async fn pay_and_place_order(
        &self,
        method: PaymentMethod,
        snapshot: CheckoutSnapshot,
    ) -> Result<(Order, String), crate::api::ApiError> {
        let receipt = self
            .inner
            .services
            .payment
            .initiate(&PaymentRequest {
                method,
                amount: snapshot.total,
                checkout: snapshot.clone(),
            })
            .await?;

        let order = self
            .inner
            .services
            .orders
            .create(&OrderRequest {
                payment_id: receipt.payment_id.clone(),
                payment_method: method,
                provider_ref: receipt.provider_ref.clone(),
                checkout: snapshot,
            })
            .await?;

        Ok((order, receipt.provider_ref))
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    /// Push a toast and schedule its expiry.
    fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let toast = Toast::new(kind, message);
        let id = toast.id.clone();
        self.apply(Action::AddToast(toast));

        // The timer holds a weak reference so pending expiries never keep a
        // dropped store alive.
        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let expire_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            if let Some(inner) = weak.upgrade() {
                inner
                    .state
                    .lock()
                    .expect("shop state lock poisoned")
                    .apply(Action::RemoveToast(expire_id.clone()));
                if let Ok(mut timers) = inner.toast_timers.lock() {
                    timers.remove(&expire_id);
                }
            }
        });

        self.inner
            .toast_timers
            .lock()
            .expect("toast timer lock poisoned")
            .insert(id, handle);
    }

    /// Dismiss a toast early, cancelling its expiry timer.
    pub fn dismiss_toast(&self, id: &ToastId) {
        if let Some(handle) = self
            .inner
            .toast_timers
            .lock()
            .expect("toast timer lock poisoned")
            .remove(id)
        {
            handle.abort();
        }
        self.apply(Action::RemoveToast(id.clone()));
    }

    // =========================================================================
    // Snapshot Accessors
    // =========================================================================

    /// Current toasts, newest last.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.with_state(|state| state.toasts.clone())
    }

    /// All fetched products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.with_state(|state| state.products.clone())
    }

    /// Whether the catalog fetch is in flight.
    #[must_use]
    pub fn products_loading(&self) -> bool {
        self.with_state(|state| state.products_loading)
    }

    /// All fetched addresses.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        self.with_state(|state| state.addresses.clone())
    }

    /// Whether the address fetch is in flight.
    #[must_use]
    pub fn addresses_loading(&self) -> bool {
        self.with_state(|state| state.addresses_loading)
    }

    /// Current cart lines.
    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        self.with_state(|state| state.cart.clone())
    }

    /// Current filters.
    #[must_use]
    pub fn filters(&self) -> Filters {
        self.with_state(|state| state.filters.clone())
    }

    /// `"All"` plus the distinct product categories.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.with_state(ShopState::categories)
    }

    /// Products matching the current filters, in catalog order.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<Product> {
        self.with_state(|state| state.filtered_products().into_iter().cloned().collect())
    }

    /// Products matching the current filters, in the requested order.
    #[must_use]
    pub fn listed_products(&self, sort: ProductSort) -> Vec<Product> {
        self.with_state(|state| state.listed_products(sort).into_iter().cloned().collect())
    }

    /// Sum of cart line totals.
    #[must_use]
    pub fn cart_subtotal(&self) -> rust_decimal::Decimal {
        self.with_state(ShopState::cart_subtotal)
    }

    /// Tax on the subtotal.
    #[must_use]
    pub fn cart_tax(&self) -> rust_decimal::Decimal {
        self.with_state(ShopState::cart_tax)
    }

    /// Grand total (zero for an empty cart).
    #[must_use]
    pub fn cart_total(&self) -> rust_decimal::Decimal {
        self.with_state(ShopState::cart_total)
    }

    /// The selected shipping address, when one is selected and known.
    #[must_use]
    pub fn selected_address(&self) -> Option<Address> {
        self.with_state(|state| state.selected_address().cloned())
    }

    /// The frozen checkout, once `prepare_checkout` has succeeded.
    #[must_use]
    pub fn checkout_snapshot(&self) -> Option<CheckoutSnapshot> {
        self.with_state(|state| state.checkout_snapshot.clone())
    }

    /// Current payment-step state.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.with_state(|state| state.payment.clone())
    }

    /// The most recently placed order, if any.
    #[must_use]
    pub fn latest_order(&self) -> Option<Order> {
        self.with_state(|state| state.latest_order.clone())
    }
}
