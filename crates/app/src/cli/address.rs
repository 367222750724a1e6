use alma_app::{
    context::AppContext,
    domain::{
        accounts::models::AccountUuid,
        addresses::{AddressesService, data::NewAddress, models::AddressUuid},
    },
};
use clap::{Args, Subcommand};

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct AddressCommand {
    #[command(subcommand)]
    command: AddressSubcommand,
}

#[derive(Debug, Subcommand)]
enum AddressSubcommand {
    /// Add a delivery address
    Create(CreateAddressArgs),

    /// List an account's delivery addresses
    List(AccountArgs),

    /// Show a delivery address
    Get(AddressArgs),

    /// Remove a delivery address
    Delete(AddressArgs),
}

#[derive(Debug, Args)]
struct AccountArgs {
    #[arg(long)]
    account_uuid: AccountUuid,
}

#[derive(Debug, Args)]
struct AddressArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    #[arg(long)]
    address_uuid: AddressUuid,
}

#[derive(Debug, Args)]
struct CreateAddressArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    /// Short name such as "Home" or "Office"
    #[arg(long)]
    label: Option<String>,

    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    region: Option<String>,

    /// Entrance, floor, apartment and similar
    #[arg(long)]
    details: Option<String>,
}

pub(crate) async fn run(command: AddressCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        AddressSubcommand::Create(args) => {
            let address = ctx
                .addresses
                .create_address(
                    args.account_uuid,
                    NewAddress {
                        uuid: AddressUuid::new(),
                        label: args.label,
                        street: args.street,
                        city: args.city,
                        region: args.region,
                        details: args.details,
                    },
                )
                .await
                .map_err(|error| format!("failed to create address: {error}"))?;

            print_json(&address)
        }
        AddressSubcommand::List(args) => {
            let addresses = ctx
                .addresses
                .list_addresses(args.account_uuid)
                .await
                .map_err(|error| format!("failed to list addresses: {error}"))?;

            print_json(&addresses)
        }
        AddressSubcommand::Get(args) => {
            let address = ctx
                .addresses
                .get_address(args.account_uuid, args.address_uuid)
                .await
                .map_err(|error| format!("failed to get address: {error}"))?;

            print_json(&address)
        }
        AddressSubcommand::Delete(args) => {
            ctx.addresses
                .delete_address(args.account_uuid, args.address_uuid)
                .await
                .map_err(|error| format!("failed to delete address: {error}"))?;

            print_json(&serde_json::json!({ "deleted": args.address_uuid }))
        }
    }
}
