use alma_app::{
    context::AppContext,
    domain::{
        accounts::models::AccountUuid,
        addresses::models::AddressUuid,
        carts::models::CartUuid,
        checkout::{CheckoutService, data::CheckoutRequest},
    },
};
use clap::Args;

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    /// The account's active cart
    #[arg(long)]
    cart_uuid: CartUuid,

    /// Delivery address owned by the account
    #[arg(long)]
    address_uuid: AddressUuid,

    /// Loyalty points to spend on the order
    #[arg(long, default_value_t = 0)]
    points_to_redeem: u64,

    /// Note for the courier
    #[arg(long)]
    comment: Option<String>,
}

pub(crate) async fn run(args: CheckoutArgs, ctx: &AppContext) -> Result<(), String> {
    let order = ctx
        .checkout
        .checkout(
            args.account_uuid,
            CheckoutRequest {
                cart_uuid: args.cart_uuid,
                address_uuid: args.address_uuid,
                points_to_redeem: args.points_to_redeem,
                comment: args.comment,
            },
        )
        .await
        .map_err(|error| {
            if error.is_retryable() {
                format!("checkout failed, try again: {error}")
            } else {
                format!("checkout failed: {error}")
            }
        })?;

    print_json(&order)
}
