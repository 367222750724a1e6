use alma_app::{
    context::AppContext,
    domain::accounts::{AccountsService, data::NewAccount, models::AccountUuid},
};
use clap::{Args, Subcommand};

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    /// Register a customer account
    Create(CreateAccountArgs),

    /// Show a customer account
    Get(GetAccountArgs),
}

#[derive(Debug, Args)]
struct CreateAccountArgs {
    /// Login email
    #[arg(long)]
    email: String,

    /// Contact phone number
    #[arg(long)]
    phone: Option<String>,

    /// Optional account UUID; generated when omitted
    #[arg(long)]
    account_uuid: Option<AccountUuid>,
}

#[derive(Debug, Args)]
struct GetAccountArgs {
    #[arg(long)]
    account_uuid: AccountUuid,
}

pub(crate) async fn run(command: AccountCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        AccountSubcommand::Create(args) => {
            let account = ctx
                .accounts
                .create_account(NewAccount {
                    uuid: args.account_uuid.unwrap_or_default(),
                    email: args.email,
                    phone: args.phone,
                })
                .await
                .map_err(|error| format!("failed to create account: {error}"))?;

            print_json(&account)
        }
        AccountSubcommand::Get(args) => {
            let account = ctx
                .accounts
                .get_account(args.account_uuid)
                .await
                .map_err(|error| format!("failed to get account: {error}"))?;

            print_json(&account)
        }
    }
}
