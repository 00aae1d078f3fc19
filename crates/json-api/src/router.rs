//! App Router

use salvo::Router;

use crate::{auth, carts, checkout, menu, orders, session};

/// Routes that resolve the viewer from the bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("menu").get(menu::index::handler))
        .push(Router::with_path("session").get(session::handler))
        .push(
            Router::with_path("carts")
                .post(carts::create::handler)
                .push(
                    Router::with_path("{cart}")
                        .get(carts::get::handler)
                        .delete(carts::delete::handler)
                        .push(Router::with_path("checkout").post(checkout::create::handler))
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("admin/orders")
                .get(orders::board::handler)
                .push(
                    Router::with_path("{order}/transitions").post(orders::transition::handler),
                ),
        )
}
