//! Menu Index Handler

use std::sync::Arc;

use canteen::{
    menu::{Category, MenuItem, filter_by_category, filter_specials},
    money::format_minor,
};
use rusty_money::iso::Currency;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, state::State};

/// Menu Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MenuItemResponse {
    pub uuid: Uuid,
    pub name: String,

    /// One of `beverages`, `breakfast`, `desserts`, `meals`, `snacks`
    pub category: String,

    /// Unit price in minor currency units
    pub price: u64,

    /// Unit price formatted for display
    pub price_display: String,

    /// Estimated preparation time in minutes
    pub estimated_time: u32,

    pub is_special: bool,
}

impl MenuItemResponse {
    fn new(item: &MenuItem, currency: &'static Currency) -> Self {
        Self {
            uuid: item.uuid,
            name: item.name.clone(),
            category: item.category.to_string(),
            price: item.price,
            price_display: format_minor(item.price, currency),
            estimated_time: item.estimated_time,
            is_special: item.is_special,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MenuResponse {
    /// Available items, ordered by category then name
    pub items: Vec<MenuItemResponse>,
}

/// Menu Index Handler
///
/// Lists the items the kitchen is serving. `category` narrows the list to one
/// category and `specials=true` to today's specials; both may be combined.
#[endpoint(
    tags("menu"),
    summary = "List Menu",
    responses(
        (status_code = StatusCode::OK, description = "Available menu items"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown category"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    specials: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<MenuResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = category
        .into_inner()
        .map(|value| value.parse::<Category>())
        .transpose()
        .or_400("could not parse \"category\" query parameter")?;

    let mut items: Vec<MenuItem> = state
        .app
        .menu
        .list_available()
        .await
        .or_500("failed to fetch menu")?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    if specials.into_inner().unwrap_or(false) {
        items = filter_specials(&items).into_iter().cloned().collect();
    }

    let selected = match category {
        Some(category) => filter_by_category(&items, category),
        None => items.iter().collect(),
    };

    Ok(Json(MenuResponse {
        items: selected
            .into_iter()
            .map(|item| MenuItemResponse::new(item, state.currency))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use canteen_app::domain::menu::MenuServiceError;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, anonymous_service};

    use super::{super::tests::make_record, *};

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("menu").get(handler))
    }

    fn serving_menu() -> Mocks {
        let mut special = make_record("Masala Dosa", Category::Breakfast, 6000);
        special.is_special = true;

        let records = vec![
            make_record("Chai", Category::Beverages, 1500),
            special,
            make_record("Idli", Category::Breakfast, 4000),
            make_record("Thali", Category::Meals, 12000),
        ];

        let mut mocks = Mocks::default();

        mocks
            .menu
            .expect_list_available()
            .once()
            .return_once(move || Ok(records));

        mocks
    }

    #[tokio::test]
    async fn test_index_returns_every_available_item() -> TestResult {
        let response: MenuResponse = TestClient::get("http://example.com/menu")
            .send(&make_service(serving_menu()))
            .await
            .take_json()
            .await?;

        let names: Vec<&str> = response.items.iter().map(|item| item.name.as_str()).collect();

        assert_eq!(names, ["Chai", "Masala Dosa", "Idli", "Thali"]);
        assert!(
            response.items[0].price_display.contains("15"),
            "expected formatted price, got {}",
            response.items[0].price_display
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_filters_by_category() -> TestResult {
        let response: MenuResponse = TestClient::get("http://example.com/menu?category=breakfast")
            .send(&make_service(serving_menu()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.items.len(), 2, "expected both breakfast items");
        assert!(
            response.items.iter().all(|item| item.category == "breakfast"),
            "expected only breakfast items"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_filters_specials_within_category() -> TestResult {
        let response: MenuResponse =
            TestClient::get("http://example.com/menu?category=breakfast&specials=true")
                .send(&make_service(serving_menu()))
                .await
                .take_json()
                .await?;

        assert_eq!(response.items.len(), 1, "expected the one special");
        assert_eq!(response.items[0].name, "Masala Dosa");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_category_returns_400_without_fetching() -> TestResult {
        let res = TestClient::get("http://example.com/menu?category=brunch")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_backend_error_returns_500() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .menu
            .expect_list_available()
            .once()
            .return_once(|| Err(MenuServiceError::InvalidData));

        let res = TestClient::get("http://example.com/menu")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
