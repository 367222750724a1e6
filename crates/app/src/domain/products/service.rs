//! Products service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductUpdate},
        errors::ProductsServiceError,
        models::{Product, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        validate_pricing(product.price, product.discount_percent)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        validate_pricing(update.price, update.discount_percent)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

fn validate_pricing(
    price: Decimal,
    discount_percent: Option<Decimal>,
) -> Result<(), ProductsServiceError> {
    if price.is_sign_negative() {
        return Err(ProductsServiceError::InvalidPrice("price cannot be negative"));
    }

    if let Some(percent) = discount_percent
        && (percent.is_sign_negative() || percent > Decimal::ONE_HUNDRED)
    {
        return Err(ProductsServiceError::InvalidPrice(
            "discount must be between 0 and 100 percent",
        ));
    }

    Ok(())
}

#[automock]
#[async_trait]
/// Read/write access to the product catalog.
pub trait ProductsService: Send + Sync {
    /// Retrieves all live products.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces the catalog fields of a product. Orders already placed keep
    /// the prices they were placed at.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Soft-deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_product(uuid: ProductUuid, price: Decimal) -> NewProduct {
        NewProduct {
            uuid,
            name: "Lepyoshka".to_string(),
            price,
            discount_percent: None,
            bonus_points: 3,
        }
    }

    #[test]
    fn validate_pricing_rejects_negative_price() {
        let result = validate_pricing(dec!(-0.01), None);

        assert!(matches!(result, Err(ProductsServiceError::InvalidPrice(_))));
    }

    #[test]
    fn validate_pricing_rejects_out_of_range_discount() {
        assert!(validate_pricing(dec!(10), Some(dec!(100.01))).is_err());
        assert!(validate_pricing(dec!(10), Some(dec!(-1))).is_err());
        assert!(validate_pricing(dec!(10), Some(dec!(100))).is_ok());
    }

    #[tokio::test]
    async fn create_product_returns_catalog_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                discount_percent: Some(dec!(10)),
                ..new_product(uuid, dec!(120.00))
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, dec!(120.00));
        assert_eq!(product.discount_percent, Some(dec!(10)));
        assert_eq!(product.final_price(), dec!(108.00));
        assert_eq!(product.bonus_points, 3);
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_returns_created_products() -> TestResult {
        let ctx = TestContext::new().await;

        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid_a, dec!(1.00)))
            .await?;
        ctx.products
            .create_product(new_product(uuid_b, dec!(2.00)))
            .await?;

        let products = ctx.products.list_products().await?;
        let uuids: Vec<ProductUuid> = products.iter().map(|p| p.uuid).collect();

        assert!(uuids.contains(&uuid_a), "product A should be in the list");
        assert!(uuids.contains(&uuid_b), "product B should be in the list");

        Ok(())
    }

    #[tokio::test]
    async fn update_product_reflects_new_price() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid, dec!(5.00)))
            .await?;

        let updated = ctx
            .products
            .update_product(
                uuid,
                ProductUpdate {
                    name: "Lepyoshka XL".to_string(),
                    price: dec!(7.50),
                    discount_percent: None,
                    bonus_points: 4,
                },
            )
            .await?;

        assert_eq!(updated.uuid, uuid);
        assert_eq!(updated.name, "Lepyoshka XL");
        assert_eq!(updated.price, dec!(7.50));
        assert_eq!(updated.bonus_points, 4);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid, dec!(3.00)))
            .await?;

        ctx.products.delete_product(uuid).await?;

        let result = ctx.products.get_product(uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let again = ctx.products.delete_product(uuid).await;

        assert!(
            matches!(again, Err(ProductsServiceError::NotFound)),
            "expected NotFound on second delete, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid, dec!(1.00)))
            .await?;

        let result = ctx
            .products
            .create_product(new_product(uuid, dec!(2.00)))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}
