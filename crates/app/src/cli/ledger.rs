use alma_app::{
    context::AppContext,
    domain::{
        accounts::models::AccountUuid,
        ledger::{LedgerService, data::LedgerEntry},
    },
};
use clap::{Args, Subcommand};

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct LedgerCommand {
    #[command(subcommand)]
    command: LedgerSubcommand,
}

#[derive(Debug, Subcommand)]
enum LedgerSubcommand {
    /// Show the current points balance
    Balance(AccountArgs),

    /// List the points history, oldest first
    History(AccountArgs),

    /// Add points to an account
    Credit(EntryArgs),

    /// Spend points from an account
    Debit(EntryArgs),

    /// Compare the balance against a replay of the history
    Reconcile(AccountArgs),
}

#[derive(Debug, Args)]
struct AccountArgs {
    #[arg(long)]
    account_uuid: AccountUuid,
}

#[derive(Debug, Args)]
struct EntryArgs {
    #[arg(long)]
    account_uuid: AccountUuid,

    #[arg(long)]
    points: u64,

    /// Shown in the account's history
    #[arg(long)]
    description: String,

    /// Correlation reference such as a scanned code
    #[arg(long)]
    reference: Option<String>,
}

impl EntryArgs {
    fn entry(&self) -> LedgerEntry {
        LedgerEntry {
            points: self.points,
            description: self.description.clone(),
            reference: self.reference.clone(),
        }
    }
}

pub(crate) async fn run(command: LedgerCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        LedgerSubcommand::Balance(args) => {
            let balance = ctx
                .ledger
                .balance(args.account_uuid)
                .await
                .map_err(|error| format!("failed to read balance: {error}"))?;

            print_json(&serde_json::json!({
                "account_uuid": args.account_uuid,
                "balance": balance,
            }))
        }
        LedgerSubcommand::History(args) => {
            let transactions = ctx
                .ledger
                .transactions(args.account_uuid)
                .await
                .map_err(|error| format!("failed to list transactions: {error}"))?;

            print_json(&transactions)
        }
        LedgerSubcommand::Credit(args) => {
            let transaction = ctx
                .ledger
                .credit(args.account_uuid, args.entry())
                .await
                .map_err(|error| format!("failed to credit points: {error}"))?;

            print_json(&transaction)
        }
        LedgerSubcommand::Debit(args) => {
            let transaction = ctx
                .ledger
                .debit(args.account_uuid, args.entry())
                .await
                .map_err(|error| format!("failed to debit points: {error}"))?;

            print_json(&transaction)
        }
        LedgerSubcommand::Reconcile(args) => {
            let reconciliation = ctx
                .ledger
                .reconcile(args.account_uuid)
                .await
                .map_err(|error| format!("failed to reconcile ledger: {error}"))?;

            print_json(&serde_json::json!({
                "reconciliation": reconciliation,
                "balanced": reconciliation.is_balanced(),
            }))
        }
    }
}
