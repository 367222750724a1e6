use alma_app::{
    context::AppContext,
    domain::{
        accounts::models::AccountUuid,
        carts::{CartsService, data::NewCartItem, models::Cart},
        products::models::ProductUuid,
    },
};
use clap::{Args, Subcommand};

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the active cart at current prices
    Show(AccountArgs),

    /// Add a product to the active cart
    Add(QuantityArgs),

    /// Set the quantity of a product in the active cart; 0 removes it
    SetQuantity(QuantityArgs),

    /// Remove a product from the active cart
    Remove(ProductArgs),

    /// Remove every item from the active cart
    Clear(AccountArgs),
}

#[derive(Debug, Args)]
struct AccountArgs {
    #[arg(long)]
    account_uuid: AccountUuid,
}

#[derive(Debug, Args)]
struct ProductArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    #[arg(long)]
    product_uuid: ProductUuid,
}

#[derive(Debug, Args)]
struct QuantityArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    #[arg(long)]
    product_uuid: ProductUuid,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

pub(crate) async fn run(command: CartCommand, ctx: &AppContext) -> Result<(), String> {
    let account = match command.command {
        CartSubcommand::Show(args) => args.account_uuid,
        CartSubcommand::Add(args) => {
            ctx.carts
                .add_item(
                    args.account_uuid,
                    NewCartItem {
                        product_uuid: args.product_uuid,
                        quantity: args.quantity,
                    },
                )
                .await
                .map_err(|error| format!("failed to add item: {error}"))?;

            args.account_uuid
        }
        CartSubcommand::SetQuantity(args) => {
            ctx.carts
                .update_quantity(args.account_uuid, args.product_uuid, args.quantity)
                .await
                .map_err(|error| format!("failed to update quantity: {error}"))?;

            args.account_uuid
        }
        CartSubcommand::Remove(args) => {
            ctx.carts
                .remove_item(args.account_uuid, args.product_uuid)
                .await
                .map_err(|error| format!("failed to remove item: {error}"))?;

            args.account_uuid
        }
        CartSubcommand::Clear(args) => {
            ctx.carts
                .clear(args.account_uuid)
                .await
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            args.account_uuid
        }
    };

    let cart = ctx
        .carts
        .active_cart(account)
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?;

    print_cart(&cart)
}

fn print_cart(cart: &Cart) -> Result<(), String> {
    print_json(&serde_json::json!({
        "cart": cart,
        "subtotal": cart.subtotal(),
    }))
}
