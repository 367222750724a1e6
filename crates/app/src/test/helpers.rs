//! Test Helpers

use rust_decimal::Decimal;
use testresult::TestResult;

use crate::{
    domain::{
        accounts::models::AccountUuid,
        addresses::{
            AddressesService, AddressesServiceError,
            data::NewAddress,
            models::{Address, AddressUuid},
        },
        carts::{CartsService, data::NewCartItem},
        checkout::{CheckoutService, data::CheckoutRequest},
        orders::models::Order,
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            models::{Product, ProductUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: Decimal,
    bonus_points: u64,
) -> Result<Product, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            price,
            discount_percent: None,
            bonus_points,
        })
        .await
}

pub(crate) async fn create_address(
    ctx: &TestContext,
    account: AccountUuid,
) -> Result<Address, AddressesServiceError> {
    ctx.addresses
        .create_address(
            account,
            NewAddress {
                uuid: AddressUuid::new(),
                label: Some("Home".to_string()),
                street: "Chui Ave 120".to_string(),
                city: "Bishkek".to_string(),
                region: None,
                details: None,
            },
        )
        .await
}

/// Check out a single-line cart for the default account without redeeming
/// points.
pub(crate) async fn place_order(
    ctx: &TestContext,
    price: Decimal,
    quantity: u32,
) -> TestResult<Order> {
    let product = create_product(ctx, "Boorsok", price, 1).await?;
    let address = create_address(ctx, ctx.account_uuid).await?;

    ctx.carts
        .add_item(
            ctx.account_uuid,
            NewCartItem {
                product_uuid: product.uuid,
                quantity,
            },
        )
        .await?;

    let cart = ctx.carts.active_cart(ctx.account_uuid).await?;

    let order = ctx
        .checkout
        .checkout(
            ctx.account_uuid,
            CheckoutRequest {
                cart_uuid: cart.uuid,
                address_uuid: address.uuid,
                points_to_redeem: 0,
                comment: None,
            },
        )
        .await?;

    Ok(order)
}
