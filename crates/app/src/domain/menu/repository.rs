//! Menu Repository

use canteen::menu::{Category, MenuItem};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::menu::records::{MenuItemRecord, MenuItemUuid},
};

const LIST_AVAILABLE_ITEMS_SQL: &str = include_str!("sql/list_available_items.sql");
const GET_ITEM_SQL: &str = include_str!("sql/get_item.sql");
const UPSERT_ITEM_SQL: &str = include_str!("sql/upsert_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMenuRepository;

impl PgMenuRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_available_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<MenuItemRecord>, sqlx::Error> {
        query_as::<Postgres, MenuItemRecord>(LIST_AVAILABLE_ITEMS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: MenuItemUuid,
    ) -> Result<MenuItemRecord, sqlx::Error> {
        query_as::<Postgres, MenuItemRecord>(GET_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &MenuItem,
    ) -> Result<MenuItemRecord, sqlx::Error> {
        let estimated_time =
            i32::try_from(item.estimated_time).map_err(|e| sqlx::Error::ColumnDecode {
                index: "estimated_time".to_string(),
                source: Box::new(e),
            })?;

        query_as::<Postgres, MenuItemRecord>(UPSERT_ITEM_SQL)
            .bind(item.uuid)
            .bind(&item.name)
            .bind(item.category.as_str())
            .bind(amount_to_i64(item.price, "price")?)
            .bind(estimated_time)
            .bind(item.available)
            .bind(item.is_special)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for MenuItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let category: String = row.try_get("category")?;
        let category = category
            .parse::<Category>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "category".to_string(),
                source: Box::new(e),
            })?;

        let estimated_time: i32 = row.try_get("estimated_time")?;
        let estimated_time =
            u32::try_from(estimated_time).map_err(|e| sqlx::Error::ColumnDecode {
                index: "estimated_time".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: MenuItemUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            category,
            price: try_get_amount(row, "price")?,
            estimated_time,
            available: row.try_get("available")?,
            is_special: row.try_get("is_special")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
