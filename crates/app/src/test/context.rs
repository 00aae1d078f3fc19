//! Test context for service-level integration tests.

use std::sync::Arc;

use canteen::menu::{Category, MenuItem};
use sqlx::{Connection, PgConnection, PgPool, query};
use testresult::TestResult;

use crate::{
    auth::PgAuthService,
    database::{APP_ROLE_TABLE_GRANTS, Db},
    domain::{
        carts::{CartsService, InMemoryCartsService, data::NewCart, records::CartUuid},
        checkout::{CheckoutService, PgCheckoutService},
        menu::{
            MenuService, MenuServiceError, PgMenuService,
            records::{MenuItemRecord, MenuItemUuid},
        },
        orders::{PgOrdersService, records::OrderRecord},
        users::{
            PgUsersService, UsersService,
            data::NewUser,
            records::{Role, UserUuid},
        },
    },
};

use super::{db::TestDb, helpers::menu_item};

/// Name of the non-superuser app role used for RLS testing.
const APP_ROLE: &str = "canteen_app_test";
const APP_ROLE_PASSWORD: &str = "canteen_app_test_pass";

pub struct TestContext {
    pub db: TestDb,

    /// Handle on the row-level-security enforcing app role.
    pub app_db: Db,

    /// Users service on the superuser pool, for provisioning fixtures.
    pub provisioning: PgUsersService,
    pub users: PgUsersService,
    pub menu: PgMenuService,
    pub carts: Arc<InMemoryCartsService>,
    pub checkout: PgCheckoutService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,

    seeding: PgMenuService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;

        // Build a non-superuser app pool so RLS policies are enforced.
        // The superuser pool is only used for provisioning users and menu rows.
        let app_pool = Self::setup_app_pool(&test_db).await;
        let app_db = Db::new(app_pool);
        let superuser_db = Db::new(test_db.pool().clone());

        let menu = PgMenuService::new(app_db.clone());
        let carts = Arc::new(InMemoryCartsService::new(Arc::new(menu.clone())));

        Self {
            provisioning: PgUsersService::new(superuser_db.clone()),
            seeding: PgMenuService::new(superuser_db),
            users: PgUsersService::new(app_db.clone()),
            checkout: PgCheckoutService::new(app_db.clone(), carts.clone()),
            orders: PgOrdersService::new(app_db.clone()),
            auth: PgAuthService::new(app_db.clone()),
            menu,
            carts,
            app_db,
            db: test_db,
        }
    }

    /// Provision a user without any roles.
    pub async fn create_customer(&self, name: &str) -> UserUuid {
        self.create_user(name, Vec::new()).await
    }

    /// Provision a user holding the admin role.
    pub async fn create_admin(&self, name: &str) -> UserUuid {
        self.create_user(name, vec![Role::Admin]).await
    }

    async fn create_user(&self, name: &str, roles: Vec<Role>) -> UserUuid {
        let uuid = UserUuid::new();

        self.provisioning
            .create_user(NewUser {
                uuid,
                name: name.to_string(),
                roles,
            })
            .await
            .expect("Failed to create test user");

        uuid
    }

    /// Write menu rows past row-level security, like the seed command does.
    pub async fn seed_menu(
        &self,
        items: Vec<MenuItem>,
    ) -> Result<Vec<MenuItemRecord>, MenuServiceError> {
        self.seeding.upsert_items(None, items).await
    }

    /// Check out a fresh cart holding one new menu item per `(price, quantity)`.
    pub async fn place_order(
        &self,
        user: UserUuid,
        lines: &[(u64, i64)],
    ) -> TestResult<OrderRecord> {
        let items: Vec<MenuItem> = lines
            .iter()
            .enumerate()
            .map(|(index, (price, _))| menu_item(&format!("Item {index}"), Category::Meals, *price))
            .collect();

        self.seed_menu(items.clone()).await?;

        let cart = CartUuid::new();

        self.carts.create_cart(NewCart { uuid: cart }).await?;

        for (item, (_, quantity)) in items.iter().zip(lines) {
            let item = MenuItemUuid::from_uuid(item.uuid);

            self.carts.add_item(cart, item).await?;

            if *quantity != 1 {
                self.carts.update_quantity(cart, item, *quantity).await?;
            }
        }

        let order = self
            .checkout
            .checkout(user, cart)
            .await?
            .ok_or("checkout of a non-empty cart should place an order")?;

        Ok(order)
    }

    /// Create a non-superuser role (once per server) and return a pool connected as it.
    ///
    /// PostgreSQL superusers bypass RLS even with `FORCE ROW LEVEL SECURITY`, so service
    /// tests that exercise authorization must connect via this restricted role.
    async fn setup_app_pool(test_db: &TestDb) -> PgPool {
        let su_url = &test_db.superuser_url;

        // CREATE ROLE is server-scoped, so run it against the maintenance database.
        let postgres_url = su_url.rsplit_once('/').map(|x| x.0).unwrap_or(su_url);
        let postgres_url = format!("{postgres_url}/postgres");

        let mut server_conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to postgres database for role setup");

        // Parallel tests race here; "role already exists" (42710) or the
        // underlying unique violation (23505) both mean the role is present.
        let create_result = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE NOBYPASSRLS"
        ))
        .execute(&mut server_conn)
        .await;

        if let Err(sqlx::Error::Database(ref e)) = create_result {
            if !matches!(e.code().as_deref(), Some("42710") | Some("23505")) {
                create_result.expect("Failed to create app role");
            }
        } else {
            create_result.expect("Failed to create app role");
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            test_db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        let mut db_conn = PgConnection::connect(su_url)
            .await
            .expect("Failed to connect to test database for privilege setup");

        let statements = [format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}")]
            .into_iter()
            .chain(
                APP_ROLE_TABLE_GRANTS
                    .iter()
                    .map(|(table, privileges)| format!("GRANT {privileges} ON {table} TO {APP_ROLE}")),
            )
            .chain([format!(
                "GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {APP_ROLE}"
            )]);

        for stmt in statements {
            query(&stmt)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant table privileges to app role");
        }

        db_conn
            .close()
            .await
            .expect("Failed to close db connection");

        let app_url = su_url.replacen(
            "canteen_test:canteen_test_password",
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}
