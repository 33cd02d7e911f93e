use async_trait::async_trait;
use shared::domain::{Did, UserId};
use storage::{Storage, StorageError, StoredCategory, StoredPizza, StoredUser};
use uuid::Uuid;

/// The storage operations the page handlers rely on.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, did: &Did) -> Result<Option<StoredUser>, StorageError>;

    async fn list_pizzas(&self) -> Result<Vec<StoredPizza>, StorageError>;

    async fn select_pizza(&self, did: &Did, pizza_uuid: Uuid) -> Result<UserId, StorageError>;

    async fn create_page_category(
        &self,
        name: &str,
        created_by: UserId,
    ) -> Result<StoredCategory, StorageError>;

    async fn list_page_categories(&self) -> Result<Vec<StoredCategory>, StorageError>;
}

#[async_trait]
impl Store for Storage {
    async fn find_user(&self, did: &Did) -> Result<Option<StoredUser>, StorageError> {
        self.find_user_by_did(did).await
    }

    async fn list_pizzas(&self) -> Result<Vec<StoredPizza>, StorageError> {
        Storage::list_pizzas(self).await
    }

    async fn select_pizza(&self, did: &Did, pizza_uuid: Uuid) -> Result<UserId, StorageError> {
        Storage::select_pizza(self, did, pizza_uuid).await
    }

    async fn create_page_category(
        &self,
        name: &str,
        created_by: UserId,
    ) -> Result<StoredCategory, StorageError> {
        Storage::create_page_category(self, name, created_by).await
    }

    async fn list_page_categories(&self) -> Result<Vec<StoredCategory>, StorageError> {
        Storage::list_page_categories(self).await
    }
}
