//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::models::AccountUuid,
        addresses::{
            data::NewAddress,
            errors::AddressesServiceError,
            models::{Address, AddressUuid},
            repository::PgAddressesRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn create_address(
        &self,
        account: AccountUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        if address.street.trim().is_empty() || address.city.trim().is_empty() {
            return Err(AddressesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_address(&mut tx, account, address)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_address(
        &self,
        account: AccountUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_address(&mut tx, account, address).await?;

        tx.commit().await?;

        Ok(address)
    }

    async fn list_addresses(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<Address>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let addresses = self.repository.list_addresses(&mut tx, account).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    async fn delete_address(
        &self,
        account: AccountUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_address(&mut tx, account, address)
            .await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
/// Per-account delivery address book.
pub trait AddressesService: Send + Sync {
    /// Adds a delivery address to the account.
    async fn create_address(
        &self,
        account: AccountUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError>;

    /// Retrieve an address owned by the account; addresses of other accounts
    /// are reported as not found.
    async fn get_address(
        &self,
        account: AccountUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError>;

    /// Lists the account's addresses.
    async fn list_addresses(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<Address>, AddressesServiceError>;

    /// Soft-deletes an address. Orders keep referencing it.
    async fn delete_address(
        &self,
        account: AccountUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_address(uuid: AddressUuid) -> NewAddress {
        NewAddress {
            uuid,
            label: Some("home".to_string()),
            street: "Chui Ave 120".to_string(),
            city: "Bishkek".to_string(),
            region: Some("Pervomaisky".to_string()),
            details: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_address() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = AddressUuid::new();

        let created = ctx
            .addresses
            .create_address(ctx.account_uuid, new_address(uuid))
            .await?;

        let fetched = ctx.addresses.get_address(ctx.account_uuid, uuid).await?;

        assert_eq!(created.uuid, uuid);
        assert_eq!(fetched.account_uuid, ctx.account_uuid);
        assert_eq!(fetched.city, "Bishkek");

        Ok(())
    }

    #[tokio::test]
    async fn address_not_visible_to_other_account() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = AddressUuid::new();
        let other = ctx.create_account("other@example.kg").await;

        ctx.addresses
            .create_address(ctx.account_uuid, new_address(uuid))
            .await?;

        let result = ctx.addresses.get_address(other, uuid).await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound for another account, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_street_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .addresses
            .create_address(
                ctx.account_uuid,
                NewAddress {
                    street: " ".to_string(),
                    ..new_address(AddressUuid::new())
                },
            )
            .await;

        assert!(
            matches!(result, Err(AddressesServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn deleted_address_is_not_listed() -> TestResult {
        let ctx = TestContext::new().await;
        let kept = AddressUuid::new();
        let removed = AddressUuid::new();

        ctx.addresses
            .create_address(ctx.account_uuid, new_address(kept))
            .await?;
        ctx.addresses
            .create_address(ctx.account_uuid, new_address(removed))
            .await?;

        ctx.addresses
            .delete_address(ctx.account_uuid, removed)
            .await?;

        let listed: Vec<AddressUuid> = ctx
            .addresses
            .list_addresses(ctx.account_uuid)
            .await?
            .into_iter()
            .map(|address| address.uuid)
            .collect();

        assert_eq!(listed, vec![kept]);

        Ok(())
    }
}
