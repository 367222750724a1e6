//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::{
        accounts::models::AccountUuid,
        addresses::repository::PgAddressesRepository,
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        checkout::{
            data::CheckoutRequest,
            errors::CheckoutError,
            pricing::{RedemptionPolicy, quote},
        },
        ledger::{
            LedgerServiceError,
            data::LedgerEntry,
            postings::{post_credit, post_debit},
            repository::PgLedgerRepository,
        },
        notifications::Notifier,
        orders::{
            data::NewOrder,
            models::{Order, OrderUuid},
            repository::PgOrdersRepository,
        },
    },
};

const ORDER_PAYMENT: &str = "order payment";

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    addresses_repository: PgAddressesRepository,
    ledger_repository: PgLedgerRepository,
    orders_repository: PgOrdersRepository,
    notifier: Arc<dyn Notifier>,
    policy: RedemptionPolicy,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn Notifier>, policy: RedemptionPolicy) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
            ledger_repository: PgLedgerRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            notifier,
            policy,
        }
    }

    async fn place_order(
        &self,
        account: AccountUuid,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let mut tx = self.db.begin().await?;

        // Held until commit: a concurrent checkout of the same cart waits
        // here, then sees it inactive.
        let cart = self
            .carts_repository
            .lock_cart(&mut tx, request.cart_uuid)
            .await?
            .filter(|cart| cart.account_uuid == account && cart.is_active)
            .ok_or(CheckoutError::CartMismatch)?;

        self.addresses_repository
            .get_address(&mut tx, account, request.address_uuid)
            .await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let balance = self
            .ledger_repository
            .lock_balance(&mut tx, account)
            .await
            .map_err(LedgerServiceError::from)?;

        let quote = quote(&items, balance, request.points_to_redeem, self.policy)?;

        if quote.points_redeemed < request.points_to_redeem {
            debug!(
                account = %account,
                requested = request.points_to_redeem,
                redeemed = quote.points_redeemed,
                "redemption clamped to balance"
            );
        }

        let order_uuid = OrderUuid::new();
        let reference = order_uuid.to_string();

        if quote.points_redeemed > 0 {
            post_debit(
                &self.ledger_repository,
                &mut tx,
                account,
                LedgerEntry::new(quote.points_redeemed, ORDER_PAYMENT).with_reference(&reference),
            )
            .await?;
        }

        let order = self
            .orders_repository
            .create_order(
                &mut tx,
                NewOrder {
                    uuid: order_uuid,
                    account_uuid: account,
                    cart_uuid: cart.uuid,
                    address_uuid: request.address_uuid,
                    comment: request.comment,
                    subtotal: quote.subtotal,
                    total_price: quote.total_price,
                    points_redeemed: quote.points_redeemed,
                    points_earned: quote.points_earned,
                    items: quote.lines,
                },
            )
            .await?;

        for line in order.items.iter().filter(|line| line.points_earned > 0) {
            post_credit(
                &self.ledger_repository,
                &mut tx,
                account,
                LedgerEntry::new(line.points_earned, format!("purchase: {}", line.product_name))
                    .with_reference(&reference),
            )
            .await?;
        }

        if self.carts_repository.close_cart(&mut tx, cart.uuid).await? == 0 {
            return Err(CheckoutError::CartMismatch);
        }

        tx.commit().await?;

        Ok(order)
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn checkout(
        &self,
        account: AccountUuid,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let order = self.place_order(account, request).await?;

        info!(
            order = %order.uuid,
            account = %account,
            total_price = %order.total_price,
            points_redeemed = order.points_redeemed,
            points_earned = order.points_earned,
            "checkout committed"
        );

        if let Err(error) = self.notifier.notify_order_created(&order).await {
            warn!(order = %order.uuid, %error, "order notification failed");
        }

        Ok(order)
    }
}

#[automock]
#[async_trait]
/// Converts a cart into an order.
pub trait CheckoutService: Send + Sync {
    /// Place an order for the caller's active cart, redeeming up to
    /// `points_to_redeem` points.
    async fn checkout(
        &self,
        account: AccountUuid,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        domain::{
            addresses::models::AddressUuid,
            carts::{CartsService, data::NewCartItem, models::CartUuid},
            ledger::{LedgerService, models::TransactionKind},
            notifications::{LogNotifier, MockNotifier, NotifyError},
            orders::OrdersService,
            products::{ProductsService, data::ProductUpdate, models::Product},
        },
        test::{
            TestContext,
            helpers::{create_address, create_product},
        },
    };

    use super::*;

    /// 2 × (50, 5 points) + 1 × (30, 2 points).
    async fn fill_cart(ctx: &TestContext) -> TestResult<(CartUuid, Product, Product)> {
        let plov = create_product(ctx, "Plov", dec!(50.00), 5).await?;
        let kompot = create_product(ctx, "Kompot", dec!(30.00), 2).await?;

        for (product, quantity) in [(&plov, 2), (&kompot, 1)] {
            ctx.carts
                .add_item(
                    ctx.account_uuid,
                    NewCartItem {
                        product_uuid: product.uuid,
                        quantity,
                    },
                )
                .await?;
        }

        let cart = ctx.carts.active_cart(ctx.account_uuid).await?;

        Ok((cart.uuid, plov, kompot))
    }

    fn request(
        cart_uuid: CartUuid,
        address_uuid: AddressUuid,
        points_to_redeem: u64,
    ) -> CheckoutRequest {
        CheckoutRequest {
            cart_uuid,
            address_uuid,
            points_to_redeem,
            comment: None,
        }
    }

    #[tokio::test]
    async fn checkout_without_redemption_earns_points() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        let order = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 0))
            .await?;

        assert_eq!(order.subtotal, dec!(130.00));
        assert_eq!(order.total_price, dec!(130.00));
        assert_eq!(order.points_redeemed, 0);
        assert_eq!(order.points_earned, 12);
        assert_eq!(order.items.len(), 2);
        assert_eq!(ctx.ledger.balance(ctx.account_uuid).await?, 12);

        let history = ctx.ledger.transactions(ctx.account_uuid).await?;

        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|t| t.kind == TransactionKind::Earned));
        assert!(
            history
                .iter()
                .any(|t| t.description == "purchase: Plov" && t.points == 10)
        );
        assert!(
            history
                .iter()
                .all(|t| t.reference.as_deref() == Some(order.uuid.to_string().as_str()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn over_redemption_is_clamped_to_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.ledger
            .credit(ctx.account_uuid, LedgerEntry::new(100, "welcome bonus"))
            .await?;

        let order = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 150))
            .await?;

        assert_eq!(order.points_redeemed, 100);
        assert_eq!(order.total_price, dec!(30.00));
        assert_eq!(ctx.ledger.balance(ctx.account_uuid).await?, 12);

        let spent: Vec<_> = ctx
            .ledger
            .transactions(ctx.account_uuid)
            .await?
            .into_iter()
            .filter(|t| t.kind == TransactionKind::Spent)
            .collect();

        assert_eq!(spent.len(), 1);
        assert_eq!(spent[0].points, 100);
        assert_eq!(spent[0].description, "order payment");
        assert!(ctx.ledger.reconcile(ctx.account_uuid).await?.is_balanced());

        Ok(())
    }

    #[tokio::test]
    async fn redemption_larger_than_subtotal_charges_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.ledger
            .credit(ctx.account_uuid, LedgerEntry::new(500, "promo"))
            .await?;

        let order = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 500))
            .await?;

        assert_eq!(order.total_price, Decimal::ZERO);
        assert_eq!(order.points_redeemed, 500);
        assert_eq!(ctx.ledger.balance(ctx.account_uuid).await?, 12);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_closes_cart_exactly_once() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 0))
            .await?;

        let closed = ctx.carts.get_cart(ctx.account_uuid, cart).await?;

        assert!(!closed.is_active);
        assert!(closed.closed_at.is_some());
        assert_eq!(closed.items.len(), 2);

        let again = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 0))
            .await;

        assert!(
            matches!(again, Err(CheckoutError::CartMismatch)),
            "expected CartMismatch, got {again:?}"
        );

        let fresh = ctx.carts.active_cart(ctx.account_uuid).await?;

        assert_ne!(fresh.uuid, cart);
        assert!(fresh.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn order_keeps_prices_after_catalog_change() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, plov, _) = fill_cart(&ctx).await?;

        let order = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 0))
            .await?;

        ctx.products
            .update_product(
                plov.uuid,
                ProductUpdate {
                    name: "Plov deluxe".to_string(),
                    price: dec!(99.00),
                    discount_percent: None,
                    bonus_points: 50,
                },
            )
            .await?;

        let stored = ctx.orders.get_order(ctx.account_uuid, order.uuid).await?;
        let line = stored
            .items
            .iter()
            .find(|line| line.product_uuid == plov.uuid)
            .ok_or("plov line missing")?;

        assert_eq!(line.unit_price, dec!(50.00));
        assert_eq!(line.bonus_points, 5);
        assert_eq!(line.product_name, "Plov");
        assert_eq!(stored.total_price, dec!(130.00));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_returns_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let cart = ctx.carts.active_cart(ctx.account_uuid).await?;

        let result = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart.uuid, address.uuid, 0))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
        assert!(ctx.carts.get_cart(ctx.account_uuid, cart.uuid).await?.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn other_accounts_cart_returns_cart_mismatch() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_account("other@example.kg").await;
        let address = create_address(&ctx, other).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        let result = ctx
            .checkout
            .checkout(other, request(cart, address.uuid, 0))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::CartMismatch)),
            "expected CartMismatch, got {result:?}"
        );

        let unknown = ctx
            .checkout
            .checkout(ctx.account_uuid, request(CartUuid::new(), address.uuid, 0))
            .await;

        assert!(
            matches!(unknown, Err(CheckoutError::CartMismatch)),
            "expected CartMismatch for unknown cart, got {unknown:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_accounts_address_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_account("other@example.kg").await;
        let address = create_address(&ctx, other).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        let result = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 0))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::NotFound)),
            "expected NotFound, got {result:?}"
        );
        assert_eq!(ctx.carts.active_cart(ctx.account_uuid).await?.uuid, cart);

        Ok(())
    }

    #[tokio::test]
    async fn reject_policy_leaves_everything_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.ledger
            .credit(ctx.account_uuid, LedgerEntry::new(40, "scan"))
            .await?;

        let mut notifier = MockNotifier::new();
        notifier.expect_notify_order_created().never();

        let checkout = ctx.checkout_with(Arc::new(notifier), RedemptionPolicy::Reject);

        let result = checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 41))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutError::InsufficientBalance {
                    requested: 41,
                    available: 40
                })
            ),
            "expected InsufficientBalance, got {result:?}"
        );
        assert_eq!(ctx.ledger.balance(ctx.account_uuid).await?, 40);
        assert!(ctx.orders.list_orders(ctx.account_uuid).await?.is_empty());

        let active = ctx.carts.active_cart(ctx.account_uuid).await?;

        assert_eq!(active.uuid, cart);
        assert_eq!(active.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn failure_after_debit_rolls_back_debit() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.ledger
            .credit(ctx.account_uuid, LedgerEntry::new(100, "welcome bonus"))
            .await?;

        // Occupy orders.cart_uuid so the order insert fails after the debit.
        sqlx::query(
            "INSERT INTO orders (uuid, account_uuid, cart_uuid, address_uuid, subtotal, total_price) \
             VALUES ($1, $2, $3, $4, 0, 0)",
        )
        .bind(OrderUuid::new().into_uuid())
        .bind(ctx.account_uuid.into_uuid())
        .bind(cart.into_uuid())
        .bind(address.uuid.into_uuid())
        .execute(ctx.db.pool())
        .await?;

        let result = ctx
            .checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 60))
            .await;

        assert!(result.is_err(), "expected checkout to fail, got {result:?}");
        assert_eq!(ctx.ledger.balance(ctx.account_uuid).await?, 100);
        assert_eq!(ctx.ledger.transactions(ctx.account_uuid).await?.len(), 1);

        let active = ctx.carts.active_cart(ctx.account_uuid).await?;

        assert_eq!(active.uuid, cart);
        assert_eq!(active.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_checkout() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_order_created()
            .times(1)
            .returning(|_| Err(NotifyError::Unavailable("push gateway down".to_string())));

        let checkout = ctx.checkout_with(Arc::new(notifier), RedemptionPolicy::Clamp);

        let order = checkout
            .checkout(ctx.account_uuid, request(cart, address.uuid, 0))
            .await?;

        let stored = ctx.orders.get_order(ctx.account_uuid, order.uuid).await?;

        assert_eq!(stored.uuid, order.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_of_one_cart_place_one_order() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        let (first, second) = tokio::join!(
            ctx.checkout
                .checkout(ctx.account_uuid, request(cart, address.uuid, 0)),
            ctx.checkout
                .checkout(ctx.account_uuid, request(cart, address.uuid, 0)),
        );

        let placed = [&first, &second].iter().filter(|r| r.is_ok()).count();

        assert_eq!(placed, 1, "exactly one checkout should win: {first:?} {second:?}");
        assert!(
            [&first, &second]
                .iter()
                .any(|r| matches!(r, Err(CheckoutError::CartMismatch)))
        );
        assert_eq!(ctx.orders.list_orders(ctx.account_uuid).await?.len(), 1);
        assert_eq!(ctx.ledger.balance(ctx.account_uuid).await?, 12);

        Ok(())
    }

    #[tokio::test]
    async fn redemption_racing_a_debit_never_overdraws() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.ledger
            .credit(ctx.account_uuid, LedgerEntry::new(100, "welcome bonus"))
            .await?;

        let checkout = ctx.checkout_with(Arc::new(LogNotifier), RedemptionPolicy::Reject);

        let (ordered, debited) = tokio::join!(
            checkout.checkout(ctx.account_uuid, request(cart, address.uuid, 100)),
            ctx.ledger
                .debit(ctx.account_uuid, LedgerEntry::new(100, "store purchase")),
        );

        assert!(
            ordered.is_ok() != debited.is_ok(),
            "exactly one spender should win: {ordered:?} {debited:?}"
        );

        let balance = ctx.ledger.balance(ctx.account_uuid).await?;

        if let Ok(order) = &ordered {
            assert_eq!(order.points_redeemed, 100);
            assert!(matches!(
                debited,
                Err(LedgerServiceError::InsufficientBalance { .. })
            ));
            assert_eq!(balance, 12);
        } else {
            assert!(matches!(
                ordered,
                Err(CheckoutError::InsufficientBalance { .. })
            ));
            assert_eq!(balance, 0);
        }

        assert!(ctx.ledger.reconcile(ctx.account_uuid).await?.is_balanced());

        Ok(())
    }

    #[tokio::test]
    async fn clamped_redemption_racing_a_debit_spends_at_most_the_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;

        ctx.ledger
            .credit(ctx.account_uuid, LedgerEntry::new(100, "welcome bonus"))
            .await?;

        let (ordered, debited) = tokio::join!(
            ctx.checkout
                .checkout(ctx.account_uuid, request(cart, address.uuid, 100)),
            ctx.ledger
                .debit(ctx.account_uuid, LedgerEntry::new(60, "store purchase")),
        );

        let order = ordered?;
        let debited_points = debited.map_or(0, |transaction| transaction.points);

        assert!(order.points_redeemed + debited_points <= 100);
        assert_eq!(
            ctx.ledger.balance(ctx.account_uuid).await?,
            100 - order.points_redeemed - debited_points + order.points_earned
        );
        assert!(ctx.ledger.reconcile(ctx.account_uuid).await?.is_balanced());

        Ok(())
    }

    #[tokio::test]
    async fn item_added_during_checkout_never_lands_in_closed_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let address = create_address(&ctx, ctx.account_uuid).await?;
        let (cart, _, _) = fill_cart(&ctx).await?;
        let samsa = create_product(&ctx, "Samsa", dec!(15.00), 1).await?;

        let (ordered, added) = tokio::join!(
            ctx.checkout
                .checkout(ctx.account_uuid, request(cart, address.uuid, 0)),
            ctx.carts.add_item(
                ctx.account_uuid,
                NewCartItem {
                    product_uuid: samsa.uuid,
                    quantity: 1,
                },
            ),
        );

        let order = ordered?;
        let added = added?;

        let closed = ctx.carts.get_cart(ctx.account_uuid, cart).await?;
        let ordered_products: Vec<_> = order.items.iter().map(|i| i.product_uuid).collect();
        let closed_products: Vec<_> = closed.items.iter().map(|i| i.product_uuid).collect();

        assert!(!closed.is_active);
        assert_eq!(
            closed_products.len(),
            ordered_products.len(),
            "closed cart must hold exactly what was ordered"
        );
        assert!(closed_products.iter().all(|p| ordered_products.contains(p)));

        if added.cart_uuid == cart {
            assert!(ordered_products.contains(&samsa.uuid));
        } else {
            assert!(!ordered_products.contains(&samsa.uuid));

            let active = ctx.carts.active_cart(ctx.account_uuid).await?;

            assert_eq!(active.uuid, added.cart_uuid);
            assert!(active.items.iter().any(|i| i.product_uuid == samsa.uuid));
        }

        Ok(())
    }
}
