//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{CheckoutConfig, DatabaseConfig},
    database::{self, Db},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        ledger::{LedgerService, PgLedgerService},
        notifications::LogNotifier,
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database: {0}")]
    Database(#[source] sqlx::Error),
}

/// Every service the application exposes, wired to one connection pool.
#[derive(Clone)]
pub struct AppContext {
    pub accounts: Arc<dyn AccountsService>,
    pub products: Arc<dyn ProductsService>,
    pub addresses: Arc<dyn AddressesService>,
    pub carts: Arc<dyn CartsService>,
    pub ledger: Arc<dyn LedgerService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from database and checkout settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_config(
        database: &DatabaseConfig,
        checkout: &CheckoutConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(&database.database_url, database.database_max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            accounts: Arc::new(PgAccountsService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            ledger: Arc::new(PgLedgerService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(
                db,
                Arc::new(LogNotifier),
                checkout.redemption_policy,
            )),
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
