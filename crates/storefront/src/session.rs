//! A single shopper's session.

use common::ItemId;
use domain::{
    Cart, Catalog, CatalogError, CatalogItem, CatalogSource, Checkout, CheckoutError,
    CheckoutStep, OrderReceipt, OrderSubmitter, PaymentDetails, ShippingInfo,
};

/// Owns the catalog snapshot, the cart and the checkout of one shopper,
/// and talks to the API through `A`.
pub struct Storefront<A> {
    api: A,
    catalog: Catalog,
    catalog_error: Option<CatalogError>,
    search: String,
    cart: Cart,
    checkout: Checkout,
}

impl<A: CatalogSource + OrderSubmitter> Storefront<A> {
    /// Starts an empty session. Call [`Storefront::load_catalog`] before
    /// browsing.
    pub fn new(api: A) -> Self {
        Self {
            api,
            catalog: Catalog::new(),
            catalog_error: None,
            search: String::new(),
            cart: Cart::new(),
            checkout: Checkout::new(),
        }
    }

    /// Returns the API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the catalog once. A failure is kept so the view can show it
    /// instead of the listing.
    pub async fn load_catalog(&mut self) -> Result<usize, CatalogError> {
        match self.catalog.load(&self.api).await {
            Ok(()) => {
                self.catalog_error = None;
                Ok(self.catalog.len())
            }
            Err(err) => {
                self.catalog_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// The catalog snapshot from the last successful load.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The error of the last catalog load, if it failed.
    pub fn catalog_error(&self) -> Option<&CatalogError> {
        self.catalog_error.as_ref()
    }

    /// Sets the search term used by [`Storefront::visible_items`].
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// The current search term.
    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Items matching the current search term.
    pub fn visible_items(&self) -> Vec<&CatalogItem> {
        self.catalog.search(&self.search)
    }

    /// The shopper's cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The checkout wizard.
    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Adds one unit of a catalog item. Returns false if the item is not
    /// in the loaded catalog or the cart is locked.
    pub fn add_to_cart(&mut self, item_id: ItemId) -> bool {
        if self.cart_locked() {
            return false;
        }
        match self.catalog.get(item_id) {
            Some(item) => {
                self.cart.add(item);
                true
            }
            None => false,
        }
    }

    /// Removes an item's line. Returns false if the cart is locked.
    pub fn remove_from_cart(&mut self, item_id: ItemId) -> bool {
        if self.cart_locked() {
            return false;
        }
        self.cart.remove(item_id);
        true
    }

    /// Changes an item's quantity by `delta`; zero or less removes the
    /// line. Returns false if the cart is locked.
    pub fn adjust_quantity(&mut self, item_id: ItemId, delta: i64) -> bool {
        if self.cart_locked() {
            return false;
        }
        self.cart.adjust_quantity(item_id, delta);
        true
    }

    /// True once the order is confirmed: the cart then holds what was
    /// ordered and stays as is until [`Storefront::close_cart`].
    pub fn cart_locked(&self) -> bool {
        self.checkout.step().is_terminal()
    }

    /// Cart → Shipping. Refused for an empty cart.
    pub fn proceed_to_shipping(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.checkout.proceed_to_shipping(&self.cart)
    }

    /// Shipping → Payment once every shipping field is filled in.
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<CheckoutStep, CheckoutError> {
        self.checkout.submit_shipping(info)
    }

    /// Places the order for the current cart.
    pub async fn submit_payment(
        &mut self,
        payment: &PaymentDetails,
    ) -> Result<OrderReceipt, CheckoutError> {
        self.checkout
            .submit_payment(payment, &self.cart, &self.api)
            .await
    }

    /// Steps the checkout back once.
    pub fn back(&mut self) -> CheckoutStep {
        self.checkout.back()
    }

    /// Clears the submission failure notice.
    pub fn dismiss_notice(&mut self) {
        self.checkout.dismiss_notice();
    }

    /// Closes the cart drawer. After a confirmed order this empties the
    /// cart and starts over; otherwise the cart is kept and checkout
    /// returns to the Cart step.
    pub fn close_cart(&mut self) -> CheckoutStep {
        match self.checkout.close(&mut self.cart) {
            Ok(step) => step,
            Err(_) => self.checkout.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use common::{Money, OrderId};
    use domain::{OrderRequest, SubmissionError};

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        catalog_down: bool,
        reject_with: Option<String>,
        orders: Mutex<Vec<OrderRequest>>,
    }

    #[async_trait]
    impl CatalogSource for FakeApi {
        async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
            if self.catalog_down {
                return Err(CatalogError::Unavailable("connection refused".to_string()));
            }
            Ok(vec![
                CatalogItem::new(1, "Aspirin", "Pain relief", Money::from_paise(500), "a.jpg"),
                CatalogItem::new(2, "Cetirizine", "Allergy", Money::from_paise(275), "c.jpg"),
            ])
        }
    }

    #[async_trait]
    impl OrderSubmitter for FakeApi {
        async fn submit_order(
            &self,
            request: &OrderRequest,
        ) -> Result<OrderReceipt, SubmissionError> {
            if let Some(message) = &self.reject_with {
                return Err(SubmissionError::Failed(message.clone()));
            }
            let mut orders = self.orders.lock().unwrap();
            orders.push(request.clone());
            Ok(OrderReceipt {
                order_id: OrderId::new(orders.len() as i64),
                message: "Order placed successfully".to_string(),
            })
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo::new("Nisha", "nisha@example.com", "3 Ring Rd", "Jaipur", "302001")
    }

    fn card() -> PaymentDetails {
        PaymentDetails::new("Nisha", "4111111111111111", "09/29", "123")
    }

    async fn loaded(api: FakeApi) -> Storefront<FakeApi> {
        let mut session = Storefront::new(api);
        session.load_catalog().await.unwrap();
        session
    }

    #[tokio::test]
    async fn failed_catalog_load_is_remembered() {
        let mut session = Storefront::new(FakeApi {
            catalog_down: true,
            ..FakeApi::default()
        });

        assert!(session.load_catalog().await.is_err());
        assert!(session.catalog().is_empty());
        assert!(session.catalog_error().is_some());
    }

    #[tokio::test]
    async fn search_filters_visible_items() {
        let mut session = loaded(FakeApi::default()).await;

        session.set_search("CETI");
        let names: Vec<_> = session.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Cetirizine"]);

        session.set_search("");
        assert_eq!(session.visible_items().len(), 2);
    }

    #[tokio::test]
    async fn unknown_item_is_not_added() {
        let mut session = loaded(FakeApi::default()).await;
        assert!(!session.add_to_cart(ItemId::new(42)));
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn full_checkout_then_close_empties_cart() {
        let mut session = loaded(FakeApi::default()).await;
        session.add_to_cart(ItemId::new(1));
        session.add_to_cart(ItemId::new(1));
        session.add_to_cart(ItemId::new(2));

        session.proceed_to_shipping().unwrap();
        session.submit_shipping(shipping()).unwrap();
        let receipt = session.submit_payment(&card()).await.unwrap();

        assert_eq!(receipt.order_id, OrderId::new(1));
        assert_eq!(session.checkout().step(), CheckoutStep::Confirmation);
        assert_eq!(session.cart().item_count(), 3);

        let sent = session.api().orders.lock().unwrap()[0].clone();
        assert_eq!(sent.total, Money::from_paise(1275));

        assert_eq!(session.close_cart(), CheckoutStep::Cart);
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn rejected_order_keeps_cart_and_payment_step() {
        let mut session = loaded(FakeApi {
            reject_with: Some("Insufficient stock for item 1".to_string()),
            ..FakeApi::default()
        })
        .await;
        session.add_to_cart(ItemId::new(1));
        session.proceed_to_shipping().unwrap();
        session.submit_shipping(shipping()).unwrap();

        assert!(session.submit_payment(&card()).await.is_err());

        assert_eq!(session.checkout().step(), CheckoutStep::Payment);
        assert_eq!(
            session.checkout().notice(),
            Some("Insufficient stock for item 1")
        );
        assert_eq!(session.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn cart_is_locked_after_confirmation() {
        let mut session = loaded(FakeApi::default()).await;
        session.add_to_cart(ItemId::new(1));
        session.proceed_to_shipping().unwrap();
        session.submit_shipping(shipping()).unwrap();
        session.submit_payment(&card()).await.unwrap();

        assert!(session.cart_locked());
        assert!(!session.add_to_cart(ItemId::new(2)));
        assert!(!session.adjust_quantity(ItemId::new(1), 4));
        assert!(!session.remove_from_cart(ItemId::new(1)));
        assert_eq!(session.cart().item_count(), 1);
        assert!(!session.cart().contains(ItemId::new(2)));

        session.close_cart();
        assert!(!session.cart_locked());
        assert!(session.add_to_cart(ItemId::new(2)));
    }

    #[tokio::test]
    async fn closing_mid_checkout_keeps_cart() {
        let mut session = loaded(FakeApi::default()).await;
        session.add_to_cart(ItemId::new(2));
        session.proceed_to_shipping().unwrap();

        assert_eq!(session.close_cart(), CheckoutStep::Cart);
        assert_eq!(session.cart().item_count(), 1);
    }
}
