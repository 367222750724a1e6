use alma_app::{
    config::{CheckoutConfig, DatabaseConfig, LoggingConfig},
    context::AppContext,
    observability,
};
use clap::{Parser, Subcommand};

mod account;
mod address;
mod cart;
mod checkout;
mod db;
mod ledger;
mod order;
mod output;
mod product;

#[derive(Debug, Parser)]
#[command(name = "alma-app", about = "Alma checkout and loyalty points CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    checkout: CheckoutConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Account(account::AccountCommand),
    Product(product::ProductCommand),
    Address(address::AddressCommand),
    Cart(cart::CartCommand),
    Checkout(checkout::CheckoutArgs),
    Ledger(ledger::LedgerCommand),
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Db(command) => db::run(command, &self.database).await,
            Commands::Account(command) => {
                account::run(command, &connect(&self.database, &self.checkout).await?).await
            }
            Commands::Product(command) => {
                product::run(command, &connect(&self.database, &self.checkout).await?).await
            }
            Commands::Address(command) => {
                address::run(command, &connect(&self.database, &self.checkout).await?).await
            }
            Commands::Cart(command) => {
                cart::run(command, &connect(&self.database, &self.checkout).await?).await
            }
            Commands::Checkout(args) => {
                checkout::run(args, &connect(&self.database, &self.checkout).await?).await
            }
            Commands::Ledger(command) => {
                ledger::run(command, &connect(&self.database, &self.checkout).await?).await
            }
            Commands::Order(command) => {
                order::run(command, &connect(&self.database, &self.checkout).await?).await
            }
        }
    }
}

async fn connect(
    database: &DatabaseConfig,
    checkout: &CheckoutConfig,
) -> Result<AppContext, String> {
    AppContext::from_config(database, checkout)
        .await
        .map_err(|error| error.to_string())
}
