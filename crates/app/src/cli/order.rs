use alma_app::{
    context::AppContext,
    domain::{
        accounts::models::AccountUuid,
        orders::{
            OrdersService,
            models::{OrderStatus, OrderUuid},
        },
    },
};
use clap::{Args, Subcommand};

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// List an account's orders, newest first
    List(AccountArgs),

    /// Show an order with its line items
    Get(OrderArgs),

    /// Move an order to a new status
    SetStatus(SetStatusArgs),
}

#[derive(Debug, Args)]
struct AccountArgs {
    #[arg(long)]
    account_uuid: AccountUuid,
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    #[arg(long)]
    order_uuid: OrderUuid,
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    #[arg(long)]
    order_uuid: OrderUuid,

    /// pending, confirmed, delivered or canceled
    #[arg(long)]
    status: OrderStatus,
}

pub(crate) async fn run(command: OrderCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        OrderSubcommand::List(args) => {
            let orders = ctx
                .orders
                .list_orders(args.account_uuid)
                .await
                .map_err(|error| format!("failed to list orders: {error}"))?;

            print_json(&orders)
        }
        OrderSubcommand::Get(args) => {
            let order = ctx
                .orders
                .get_order(args.account_uuid, args.order_uuid)
                .await
                .map_err(|error| format!("failed to get order: {error}"))?;

            print_json(&order)
        }
        OrderSubcommand::SetStatus(args) => {
            let order = ctx
                .orders
                .update_status(args.account_uuid, args.order_uuid, args.status)
                .await
                .map_err(|error| format!("failed to update order status: {error}"))?;

            print_json(&order)
        }
    }
}
