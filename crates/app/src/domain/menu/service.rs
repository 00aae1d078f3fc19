//! Menu service.

use async_trait::async_trait;
use canteen::menu::MenuItem;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        menu::{
            errors::MenuServiceError,
            records::{MenuItemRecord, MenuItemUuid},
            repository::PgMenuRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgMenuService {
    db: Db,
    repository: PgMenuRepository,
}

impl PgMenuService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgMenuRepository::new(),
        }
    }
}

#[async_trait]
impl MenuService for PgMenuService {
    async fn list_available(&self) -> Result<Vec<MenuItemRecord>, MenuServiceError> {
        let mut tx = self.db.begin_viewer_transaction(None).await?;

        let items = self.repository.list_available_items(&mut tx).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn get_item(&self, item: MenuItemUuid) -> Result<MenuItemRecord, MenuServiceError> {
        let mut tx = self.db.begin_viewer_transaction(None).await?;

        let item = self.repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn upsert_items(
        &self,
        actor: Option<UserUuid>,
        items: Vec<MenuItem>,
    ) -> Result<Vec<MenuItemRecord>, MenuServiceError> {
        let mut tx = self.db.begin_viewer_transaction(actor).await?;

        let mut upserted = Vec::with_capacity(items.len());

        for item in &items {
            upserted.push(self.repository.upsert_item(&mut tx, item).await?);
        }

        tx.commit().await?;

        Ok(upserted)
    }
}

#[automock]
#[async_trait]
pub trait MenuService: Send + Sync {
    /// Retrieves every item currently served, ordered by category then name.
    async fn list_available(&self) -> Result<Vec<MenuItemRecord>, MenuServiceError>;

    /// Retrieve a single served item.
    async fn get_item(&self, item: MenuItemUuid) -> Result<MenuItemRecord, MenuServiceError>;

    /// Insert or replace items by UUID, all or nothing.
    async fn upsert_items(
        &self,
        actor: Option<UserUuid>,
        items: Vec<MenuItem>,
    ) -> Result<Vec<MenuItemRecord>, MenuServiceError>;
}
