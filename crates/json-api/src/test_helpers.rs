//! Test helpers.

use std::sync::Arc;

use canteen::{
    money::DEFAULT_CURRENCY,
    orders::{FulfillmentStatus, PaymentStatus},
};
use canteen_app::{
    auth::{MockAuthService, Viewer},
    context::AppContext,
    domain::{
        carts::MockCartsService,
        checkout::MockCheckoutService,
        menu::{MockMenuService, records::MenuItemUuid},
        orders::{
            MockOrdersService,
            records::{OrderLineRecord, OrderLineUuid, OrderRecord, OrderUuid},
        },
        users::{
            MockUsersService,
            records::{Role, UserUuid},
        },
    },
};
use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::max());

/// Service mocks with no expectations; any unexpected call panics.
#[derive(Default)]
pub(crate) struct Mocks {
    pub menu: MockMenuService,
    pub carts: MockCartsService,
    pub checkout: MockCheckoutService,
    pub orders: MockOrdersService,
    pub users: MockUsersService,
    pub auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(
            AppContext {
                menu: Arc::new(self.menu),
                carts: Arc::new(self.carts),
                checkout: Arc::new(self.checkout),
                orders: Arc::new(self.orders),
                users: Arc::new(self.users),
                auth: Arc::new(self.auth),
            },
            DEFAULT_CURRENCY,
        )
    }
}

pub(crate) fn customer_viewer() -> Viewer {
    Viewer {
        user: TEST_CUSTOMER_UUID,
        name: "Meera".to_string(),
        roles: Vec::new(),
    }
}

pub(crate) fn admin_viewer() -> Viewer {
    Viewer {
        user: TEST_ADMIN_UUID,
        name: "Chef".to_string(),
        roles: vec![Role::Admin],
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_viewer(customer_viewer());
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_viewer(admin_viewer());
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

/// Serve `route` to an anonymous visitor.
pub(crate) fn anonymous_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Serve `route` to a signed-in customer.
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Serve `route` to a signed-in admin.
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

/// A paid order of two samosas at 50 and one lassi at 30.
pub(crate) fn make_order(
    uuid: OrderUuid,
    user: UserUuid,
    status: FulfillmentStatus,
) -> OrderRecord {
    OrderRecord {
        uuid,
        user_uuid: user,
        customer_name: None,
        total_price: 130,
        payment_status: PaymentStatus::Paid,
        status,
        token_number: 7,
        created_at: Timestamp::UNIX_EPOCH,
        lines: vec![
            make_order_line(uuid, "Samosa", 2, 50),
            make_order_line(uuid, "Lassi", 1, 30),
        ],
    }
}

fn make_order_line(order: OrderUuid, name: &str, quantity: u32, price: u64) -> OrderLineRecord {
    OrderLineRecord {
        uuid: OrderLineUuid::new(),
        order_uuid: order,
        menu_item_uuid: MenuItemUuid::new(),
        name: Some(name.to_string()),
        quantity,
        price,
    }
}
