//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::models::AccountUuid,
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            models::{Cart, CartItem, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::models::ProductUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn active_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .carts_repository
            .lock_or_create_active_cart(&mut tx, account)
            .await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }

    async fn get_cart(
        &self,
        account: AccountUuid,
        cart: CartUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.carts_repository.get_cart(&mut tx, account, cart).await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }

    async fn add_item(
        &self,
        account: AccountUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_or_create_active_cart(&mut tx, account)
            .await?;

        let item = self
            .items_repository
            .upsert_cart_item(&mut tx, cart.uuid, item)
            .await?
            .ok_or(CartsServiceError::InvalidReference)?;

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn update_quantity(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<CartItem>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_or_create_active_cart(&mut tx, account)
            .await?;

        let item = if quantity == 0 {
            let rows_affected = self
                .items_repository
                .delete_cart_item(&mut tx, cart.uuid, product)
                .await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::NotFound);
            }

            None
        } else {
            let item = self
                .items_repository
                .set_cart_item_quantity(&mut tx, cart.uuid, product, quantity)
                .await?
                .ok_or(CartsServiceError::NotFound)?;

            Some(item)
        };

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn remove_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_or_create_active_cart(&mut tx, account)
            .await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart.uuid, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self, account: AccountUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_or_create_active_cart(&mut tx, account)
            .await?;

        self.items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
/// The account's shopping basket.
///
/// Operations without a cart id act on the active cart, creating it on
/// first use.
pub trait CartsService: Send + Sync {
    /// The active cart with its items at current prices.
    async fn active_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError>;

    /// Any cart owned by the account, active or closed.
    async fn get_cart(&self, account: AccountUuid, cart: CartUuid)
    -> Result<Cart, CartsServiceError>;

    /// Add a product, incrementing the quantity if it is already in the cart.
    async fn add_item(
        &self,
        account: AccountUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Set the quantity of a product already in the cart. Zero removes the
    /// line and returns `None`.
    async fn update_quantity(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<CartItem>, CartsServiceError>;

    /// Remove a product from the cart.
    async fn remove_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError>;

    /// Remove every item; the cart stays active.
    async fn clear(&self, account: AccountUuid) -> Result<(), CartsServiceError>;
}
