//! Cart Synchronizer
//!
//! Keeps the local cart mirror consistent with `/me/cart`.
//!
//! Nothing is applied before the server answers: each mutation goes
//! `Begin -> ApplyServerCart | Fail` through [`reduce`], and a success always
//! replaces the mirror with the server's cart body. Mutations are keyed by
//! intent so an identical request already in flight is not sent twice, and
//! sequence numbers keep a late response from overwriting a newer cart.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::api::{ApiError, ApiResult, CartApi, CartItemUpdate, CartLineInput};
use crate::models::Cart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MutationKind {
    Initialize,
    Add,
    Update,
    Remove,
    Clear,
    MarkSeen,
}

/// Intent of a request: what it does and to which target
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationKey {
    pub kind: MutationKind,
    pub target: String,
}

impl MutationKey {
    pub fn new(kind: MutationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Begin { key: MutationKey, seq: u64 },
    ApplyServerCart { key: MutationKey, seq: u64, cart: Cart },
    Fail { key: MutationKey, seq: u64, message: String },
    DismissError,
    /// Signed out: forget the mirror
    Reset,
}

/// Cart mirror plus request bookkeeping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartState {
    /// Last cart confirmed by the server
    pub cart: Arc<Cart>,
    pub error: Option<String>,
    in_flight: BTreeSet<MutationKey>,
    issued_seq: u64,
    applied_seq: u64,
}

impl CartState {
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_in_flight(&self, key: &MutationKey) -> bool {
        self.in_flight.contains(key)
    }

    pub fn next_seq(&self) -> u64 {
        self.issued_seq + 1
    }

    /// Add-to-cart waits for every in-flight request and never duplicates a line
    pub fn can_add(&self, product_id: &str) -> bool {
        !self.is_loading() && !self.cart.contains_product(product_id)
    }
}

/// Cart reducer: `(state, action) -> state`
pub fn reduce(mut state: CartState, action: CartAction) -> CartState {
    match action {
        CartAction::Begin { key, seq } => {
            state.in_flight.insert(key);
            state.issued_seq = state.issued_seq.max(seq);
            state.error = None;
        }
        CartAction::ApplyServerCart { key, seq, cart } => {
            state.in_flight.remove(&key);
            if seq > state.applied_seq {
                state.cart = Arc::new(cart);
                state.applied_seq = seq;
            } else {
                debug!("[CART] dropping stale response #{} (applied #{})", seq, state.applied_seq);
            }
        }
        CartAction::Fail { key, seq, message } => {
            state.in_flight.remove(&key);
            if seq > state.applied_seq {
                state.error = Some(message);
            } else {
                debug!("[CART] dropping stale failure #{}: {}", seq, message);
            }
        }
        CartAction::DismissError => state.error = None,
        CartAction::Reset => {
            // responses to anything issued before the reset are stale
            let issued = state.issued_seq;
            state = CartState {
                issued_seq: issued,
                applied_seq: issued,
                ..Default::default()
            };
        }
    }
    state
}

/// Where the synchronizer reads and writes cart state
pub trait CartSink {
    fn snapshot(&self) -> CartState;
    fn dispatch(&self, action: CartAction);
}

impl CartSink for RefCell<CartState> {
    fn snapshot(&self) -> CartState {
        self.borrow().clone()
    }

    fn dispatch(&self, action: CartAction) {
        let next = reduce(self.borrow().clone(), action);
        *self.borrow_mut() = next;
    }
}

/// Result of one synchronizer call
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Server answered; its cart is now the mirror
    Applied,
    /// Guard short-circuited; no request sent
    Skipped,
    /// Identical request already in flight; no request sent
    Joined,
    Failed(ApiError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

pub struct CartSynchronizer<A, S> {
    api: A,
    sink: S,
}

impl<A: CartApi, S: CartSink> CartSynchronizer<A, S> {
    pub fn new(api: A, sink: S) -> Self {
        Self { api, sink }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load the server cart
    pub async fn initialize_cart(&self) -> MutationOutcome {
        let key = MutationKey::new(MutationKind::Initialize, "");
        self.run(key, self.api.get_cart()).await
    }

    /// Add one unit of a product unless it is already in the cart
    pub async fn add_to_cart(&self, product_id: &str) -> MutationOutcome {
        if self.sink.snapshot().cart.contains_product(product_id) {
            debug!("[CART] product {} already in cart", product_id);
            return MutationOutcome::Skipped;
        }
        let lines = [CartLineInput {
            product_id: product_id.to_string(),
            quantity: 1,
        }];
        let key = MutationKey::new(MutationKind::Add, product_id);
        self.run(key, self.api.add_items(&lines)).await
    }

    /// Set an item's quantity; zero removes the item
    pub async fn update_cart(&self, cart_item_id: &str, quantity: u32) -> MutationOutcome {
        if quantity == 0 {
            return self.remove_from_cart(cart_item_id).await;
        }
        let update = CartItemUpdate {
            cart_item_id: cart_item_id.to_string(),
            quantity,
            seen: None,
        };
        let key = MutationKey::new(MutationKind::Update, format!("{}:{}", cart_item_id, quantity));
        self.run(key, self.api.update_item(&update)).await
    }

    pub async fn remove_from_cart(&self, cart_item_id: &str) -> MutationOutcome {
        let key = MutationKey::new(MutationKind::Remove, cart_item_id);
        self.run(key, self.api.remove_item(cart_item_id)).await
    }

    pub async fn clear_cart(&self) -> MutationOutcome {
        if self.sink.snapshot().cart.is_empty() {
            return MutationOutcome::Skipped;
        }
        let key = MutationKey::new(MutationKind::Clear, "");
        self.run(key, self.api.clear_cart()).await
    }

    pub async fn mark_item_as_seen(&self, cart_item_id: &str) -> MutationOutcome {
        let state = self.sink.snapshot();
        let Some(item) = state.cart.item(cart_item_id) else {
            return MutationOutcome::Skipped;
        };
        if item.seen {
            return MutationOutcome::Skipped;
        }
        let update = CartItemUpdate {
            cart_item_id: cart_item_id.to_string(),
            quantity: item.quantity,
            seen: Some(true),
        };
        let key = MutationKey::new(MutationKind::MarkSeen, cart_item_id);
        self.run(key, self.api.update_item(&update)).await
    }

    /// Mark every unseen item, one request at a time
    pub async fn mark_all_as_seen(&self) -> Vec<MutationOutcome> {
        let unseen: Vec<String> = self
            .sink
            .snapshot()
            .cart
            .items
            .iter()
            .filter(|item| !item.seen)
            .map(|item| item.id.clone())
            .collect();
        let mut outcomes = Vec::with_capacity(unseen.len());
        for id in unseen {
            outcomes.push(self.mark_item_as_seen(&id).await);
        }
        outcomes
    }

    pub fn dismiss_error(&self) {
        self.sink.dispatch(CartAction::DismissError);
    }

    pub fn reset(&self) {
        self.sink.dispatch(CartAction::Reset);
    }

    async fn run<F>(&self, key: MutationKey, request: F) -> MutationOutcome
    where
        F: Future<Output = ApiResult<Cart>>,
    {
        let state = self.sink.snapshot();
        if state.is_in_flight(&key) {
            debug!("[CART] {:?} {} already in flight", key.kind, key.target);
            return MutationOutcome::Joined;
        }
        let seq = state.next_seq();
        self.sink.dispatch(CartAction::Begin { key: key.clone(), seq });

        match request.await {
            Ok(cart) => {
                info!("[CART] {:?} applied, {} items", key.kind, cart.total_items);
                self.sink.dispatch(CartAction::ApplyServerCart { key, seq, cart });
                MutationOutcome::Applied
            }
            Err(err) => {
                warn!("[CART] {:?} failed: {}", key.kind, err);
                self.sink.dispatch(CartAction::Fail {
                    key,
                    seq,
                    message: err.user_message(),
                });
                MutationOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CartItem, Product};
    use async_trait::async_trait;
    use std::cell::Cell;

    fn make_product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            slug: id.to_lowercase(),
            description: String::new(),
            price,
            stock: 10,
            images: vec![],
            category: None,
            seller_id: None,
            average_rating: None,
            review_count: 0,
        }
    }

    fn make_item(id: &str, product: &str, quantity: u32, price: i64, seen: bool) -> CartItem {
        CartItem {
            id: id.to_string(),
            quantity,
            product: make_product(product, price),
            seen,
        }
    }

    /// Server-side totals, as the backend would report them
    fn with_totals(items: Vec<CartItem>) -> Cart {
        Cart {
            total_items: items.iter().map(|i| i.quantity).sum(),
            total_items_fetched: items.len() as u32,
            total_price: items.iter().map(|i| i.quantity as i64 * i.product.price).sum(),
            not_seen_count: items.iter().filter(|i| !i.seen).count() as u32,
            items,
        }
    }

    /// In-memory `/me/cart` that records every request
    #[derive(Default)]
    struct FakeCartServer {
        cart: RefCell<Cart>,
        calls: RefCell<Vec<String>>,
        fail_next: Cell<bool>,
        next_id: Cell<u32>,
    }

    impl FakeCartServer {
        fn with_cart(cart: Cart) -> Self {
            Self {
                cart: RefCell::new(cart),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn respond(&self, call: String) -> ApiResult<Cart> {
            self.calls.borrow_mut().push(call);
            if self.fail_next.replace(false) {
                return Err(ApiError::from_status(500, r#"{"detail":"Cart service unavailable"}"#));
            }
            let cart = with_totals(self.cart.borrow().items.clone());
            *self.cart.borrow_mut() = cart.clone();
            Ok(cart)
        }
    }

    #[async_trait(?Send)]
    impl CartApi for FakeCartServer {
        async fn get_cart(&self) -> ApiResult<Cart> {
            self.calls.borrow_mut().push("GET".to_string());
            Ok(self.cart.borrow().clone())
        }

        async fn add_items(&self, items: &[CartLineInput]) -> ApiResult<Cart> {
            if !self.fail_next.get() {
                for line in items {
                    let id = self.next_id.get() + 1;
                    self.next_id.set(id);
                    let item = make_item(&format!("ci-{}", id), &line.product_id, line.quantity, 100, false);
                    self.cart.borrow_mut().items.push(item);
                }
            }
            self.respond(format!("POST {}", items.len()))
        }

        async fn update_item(&self, update: &CartItemUpdate) -> ApiResult<Cart> {
            if !self.fail_next.get() {
                let mut cart = self.cart.borrow_mut();
                if let Some(item) = cart.items.iter_mut().find(|i| i.id == update.cart_item_id) {
                    item.quantity = update.quantity;
                    if let Some(seen) = update.seen {
                        item.seen = seen;
                    }
                }
            }
            self.respond(format!("PATCH {}", update.cart_item_id))
        }

        async fn remove_item(&self, cart_item_id: &str) -> ApiResult<Cart> {
            if !self.fail_next.get() {
                self.cart.borrow_mut().items.retain(|i| i.id != cart_item_id);
            }
            self.respond(format!("DELETE {}", cart_item_id))
        }

        async fn clear_cart(&self) -> ApiResult<Cart> {
            if !self.fail_next.get() {
                self.cart.borrow_mut().items.clear();
            }
            self.respond("DELETE".to_string())
        }
    }

    type TestSync = CartSynchronizer<FakeCartServer, RefCell<CartState>>;

    async fn synced(server_cart: Cart) -> TestSync {
        let sync = CartSynchronizer::new(
            FakeCartServer::with_cart(server_cart),
            RefCell::new(CartState::default()),
        );
        assert!(sync.initialize_cart().await.is_applied());
        sync.api().calls.borrow_mut().clear();
        sync
    }

    #[tokio::test]
    async fn test_initialize_mirrors_server_totals() {
        let server_cart = with_totals(vec![
            make_item("a", "P1", 2, 500, true),
            make_item("b", "P2", 3, 1000, true),
        ]);
        let sync = synced(server_cart).await;
        let state = sync.sink().snapshot();
        assert_eq!(state.cart.total_items, 5);
        assert_eq!(state.cart.total_price, 4000);
        assert!(!state.is_loading());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_initialize_takes_server_totals_verbatim() {
        let mut server_cart = with_totals(vec![make_item("a", "P1", 2, 500, true)]);
        server_cart.total_items = 9;
        let sync = synced(server_cart).await;
        assert_eq!(sync.sink().snapshot().cart.total_items, 9);
    }

    #[tokio::test]
    async fn test_initialize_failure_records_error() {
        let sync = CartSynchronizer::new(
            FailingCartApi,
            RefCell::new(CartState::default()),
        );
        let outcome = sync.initialize_cart().await;
        assert!(matches!(outcome, MutationOutcome::Failed(_)));
        let state = sync.sink().snapshot();
        assert_eq!(state.error.as_deref(), Some("Please sign in to continue"));
        assert!(state.cart.is_empty());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_add_to_cart_posts_single_unit() {
        let sync = synced(Cart::default()).await;
        assert!(sync.add_to_cart("P1").await.is_applied());
        assert_eq!(sync.api().calls(), vec!["POST 1"]);

        let state = sync.sink().snapshot();
        assert_eq!(state.cart.items.len(), 1);
        assert_eq!(state.cart.items[0].quantity, 1);
        assert_eq!(state.cart.not_seen_count, 1);
    }

    #[tokio::test]
    async fn test_add_to_cart_twice_sends_one_post() {
        let sync = synced(Cart::default()).await;
        sync.add_to_cart("P1").await;
        let outcome = sync.add_to_cart("P1").await;
        assert_eq!(outcome, MutationOutcome::Skipped);
        assert_eq!(sync.api().calls(), vec!["POST 1"]);
        let state = sync.sink().snapshot();
        assert_eq!(state.cart.items.iter().filter(|i| i.product.id == "P1").count(), 1);
    }

    #[tokio::test]
    async fn test_add_existing_product_makes_no_request() {
        let sync = synced(with_totals(vec![make_item("a", "P1", 1, 500, true)])).await;
        assert_eq!(sync.add_to_cart("P1").await, MutationOutcome::Skipped);
        assert!(sync.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_failure_keeps_cart_pointer() {
        let sync = synced(with_totals(vec![make_item("a", "P1", 1, 500, true)])).await;
        let before = sync.sink().snapshot().cart;
        sync.api().fail_next.set(true);

        let outcome = sync.update_cart("a", 4).await;
        assert!(matches!(outcome, MutationOutcome::Failed(_)));

        let state = sync.sink().snapshot();
        assert!(Arc::ptr_eq(&before, &state.cart));
        assert!(state.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_update_replaces_cart_with_response() {
        let sync = synced(with_totals(vec![make_item("a", "P1", 1, 500, true)])).await;
        assert!(sync.update_cart("a", 3).await.is_applied());
        let state = sync.sink().snapshot();
        assert_eq!(state.cart.items[0].quantity, 3);
        assert_eq!(state.cart.total_items, 3);
        assert_eq!(state.cart.total_price, 1500);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let sync = synced(with_totals(vec![make_item("a", "P1", 2, 500, true)])).await;
        assert!(sync.update_cart("a", 0).await.is_applied());
        assert_eq!(sync.api().calls(), vec!["DELETE a"]);
        assert!(sync.sink().snapshot().cart.is_empty());
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_attempt() {
        let sync = synced(with_totals(vec![make_item("a", "P1", 1, 500, true)])).await;
        sync.api().fail_next.set(true);
        sync.remove_from_cart("a").await;
        assert!(sync.sink().snapshot().error.is_some());

        assert!(sync.remove_from_cart("a").await.is_applied());
        let state = sync.sink().snapshot();
        assert!(state.error.is_none());
        assert!(state.cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_empty_cart_is_noop() {
        let sync = synced(Cart::default()).await;
        assert_eq!(sync.clear_cart().await, MutationOutcome::Skipped);
        assert!(sync.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_clear_cart_adopts_server_response() {
        let sync = synced(with_totals(vec![
            make_item("a", "P1", 1, 500, false),
            make_item("b", "P2", 2, 700, true),
        ]))
        .await;
        assert!(sync.clear_cart().await.is_applied());
        assert_eq!(sync.api().calls(), vec!["DELETE"]);
        let state = sync.sink().snapshot();
        assert!(state.cart.is_empty());
        assert_eq!(state.cart.total_items, 0);
        assert_eq!(state.cart.not_seen_count, 0);
    }

    #[tokio::test]
    async fn test_mark_seen_on_seen_item_is_noop() {
        let sync = synced(with_totals(vec![
            make_item("a", "P1", 1, 500, true),
            make_item("b", "P2", 1, 500, false),
        ]))
        .await;
        assert_eq!(sync.mark_item_as_seen("a").await, MutationOutcome::Skipped);
        assert!(sync.api().calls().is_empty());
        assert_eq!(sync.sink().snapshot().cart.not_seen_count, 1);
    }

    #[tokio::test]
    async fn test_mark_seen_decrements_unseen_count() {
        let sync = synced(with_totals(vec![
            make_item("a", "P1", 2, 500, false),
            make_item("b", "P2", 1, 500, false),
            make_item("c", "P3", 1, 500, false),
        ]))
        .await;
        assert_eq!(sync.sink().snapshot().cart.not_seen_count, 3);

        assert!(sync.mark_item_as_seen("a").await.is_applied());
        assert_eq!(sync.api().calls(), vec!["PATCH a"]);

        let state = sync.sink().snapshot();
        assert_eq!(state.cart.not_seen_count, 2);
        let item = state.cart.item("a").unwrap();
        assert!(item.seen);
        assert_eq!(item.quantity, 2, "quantity sent unchanged");
    }

    #[tokio::test]
    async fn test_mark_all_as_seen() {
        let sync = synced(with_totals(vec![
            make_item("a", "P1", 1, 500, false),
            make_item("b", "P2", 1, 500, true),
            make_item("c", "P3", 1, 500, false),
        ]))
        .await;
        let outcomes = sync.mark_all_as_seen().await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(sync.api().calls(), vec!["PATCH a", "PATCH c"]);
        assert_eq!(sync.sink().snapshot().cart.not_seen_count, 0);
    }

    #[test]
    fn test_identical_in_flight_mutation_joins() {
        let key = MutationKey::new(MutationKind::Add, "P1");
        let sink = RefCell::new(CartState::default());
        sink.dispatch(CartAction::Begin { key: key.clone(), seq: 1 });
        let state = sink.snapshot();
        assert!(state.is_loading());
        assert!(state.is_in_flight(&key));
        assert!(!state.is_in_flight(&MutationKey::new(MutationKind::Add, "P2")));
    }

    #[tokio::test]
    async fn test_in_flight_duplicate_sends_nothing() {
        let sync = synced(Cart::default()).await;
        let seq = sync.sink().snapshot().next_seq();
        sync.sink().dispatch(CartAction::Begin {
            key: MutationKey::new(MutationKind::Remove, "a"),
            seq,
        });
        assert_eq!(sync.remove_from_cart("a").await, MutationOutcome::Joined);
        assert!(sync.api().calls().is_empty());
    }

    #[test]
    fn test_stale_response_does_not_overwrite_newer_cart() {
        let older = MutationKey::new(MutationKind::Update, "a:2");
        let newer = MutationKey::new(MutationKind::Update, "a:3");
        let mut state = CartState::default();
        state = reduce(state, CartAction::Begin { key: older.clone(), seq: 1 });
        state = reduce(state, CartAction::Begin { key: newer.clone(), seq: 2 });

        let newer_cart = with_totals(vec![make_item("a", "P1", 3, 100, true)]);
        let older_cart = with_totals(vec![make_item("a", "P1", 2, 100, true)]);
        state = reduce(state, CartAction::ApplyServerCart { key: newer, seq: 2, cart: newer_cart });
        state = reduce(state, CartAction::ApplyServerCart { key: older, seq: 1, cart: older_cart });

        assert_eq!(state.cart.items[0].quantity, 3);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_reset_discards_pending_responses() {
        let key = MutationKey::new(MutationKind::Initialize, "");
        let mut state = CartState::default();
        state = reduce(state, CartAction::Begin { key: key.clone(), seq: 1 });
        state = reduce(state, CartAction::Reset);
        assert!(!state.is_loading());

        let cart = with_totals(vec![make_item("a", "P1", 1, 100, false)]);
        state = reduce(state, CartAction::ApplyServerCart { key, seq: 1, cart });
        assert!(state.cart.is_empty());
        assert_eq!(state.next_seq(), 2);
    }

    #[test]
    fn test_can_add_gated_by_any_request_in_flight() {
        let mut state = CartState::default();
        assert!(state.can_add("P1"));

        let update = MutationKey::new(MutationKind::Update, "a");
        state = reduce(state, CartAction::Begin { key: update.clone(), seq: 1 });
        assert!(!state.can_add("P1"));

        let cart = with_totals(vec![make_item("a", "P2", 2, 100, true)]);
        state = reduce(state, CartAction::ApplyServerCart { key: update, seq: 1, cart });
        assert!(state.can_add("P1"));
        assert!(!state.can_add("P2"));
    }

    #[test]
    fn test_reset_discards_pending_failures() {
        let key = MutationKey::new(MutationKind::Initialize, "");
        let mut state = CartState::default();
        state = reduce(state, CartAction::Begin { key: key.clone(), seq: 1 });
        state = reduce(state, CartAction::Reset);
        state = reduce(
            state,
            CartAction::Fail { key, seq: 1, message: "Please sign in to continue".to_string() },
        );
        assert!(state.error.is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_failure_after_reset_request_is_reported() {
        let mut state = reduce(CartState::default(), CartAction::Reset);
        let key = MutationKey::new(MutationKind::Add, "P1");
        let seq = state.next_seq();
        state = reduce(state, CartAction::Begin { key: key.clone(), seq });
        state = reduce(state, CartAction::Fail { key, seq, message: "boom".to_string() });
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    struct FailingCartApi;

    #[async_trait(?Send)]
    impl CartApi for FailingCartApi {
        async fn get_cart(&self) -> ApiResult<Cart> {
            Err(ApiError::from_status(401, ""))
        }
        async fn add_items(&self, _items: &[CartLineInput]) -> ApiResult<Cart> {
            Err(ApiError::Network("offline".to_string()))
        }
        async fn update_item(&self, _update: &CartItemUpdate) -> ApiResult<Cart> {
            Err(ApiError::Network("offline".to_string()))
        }
        async fn remove_item(&self, _cart_item_id: &str) -> ApiResult<Cart> {
            Err(ApiError::Network("offline".to_string()))
        }
        async fn clear_cart(&self) -> ApiResult<Cart> {
            Err(ApiError::Network("offline".to_string()))
        }
    }
}
