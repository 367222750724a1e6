//! Accounts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::accounts::{
        data::NewAccount,
        errors::AccountsServiceError,
        models::{Account, AccountUuid},
        repository::PgAccountsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn create_account(&self, account: NewAccount) -> Result<Account, AccountsServiceError> {
        if account.email.trim().is_empty() {
            return Err(AccountsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_account(&mut tx, account).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_account(&self, account: AccountUuid) -> Result<Account, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let account = self.repository.get_account(&mut tx, account).await?;

        tx.commit().await?;

        Ok(account)
    }
}

#[automock]
#[async_trait]
/// Directory of end-customer accounts.
pub trait AccountsService: Send + Sync {
    /// Registers a new account.
    async fn create_account(&self, account: NewAccount) -> Result<Account, AccountsServiceError>;

    /// Retrieve a single account.
    async fn get_account(&self, account: AccountUuid) -> Result<Account, AccountsServiceError>;
}
