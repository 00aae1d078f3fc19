//! Viewer resolution middleware.
//!
//! Requests without an `Authorization` header continue anonymously. A bearer
//! token that does not resolve to a live session is rejected outright rather
//! than downgraded, so a stale browser session is noticed.

use std::sync::Arc;

use canteen_app::auth::AuthServiceError;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        ctrl.call_next(req, depot, res).await;

        return;
    };

    let Some(token) = header.to_str().ok().and_then(extract_bearer_token) else {
        res.render(StatusError::unauthorized().brief("Malformed Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    let authenticated = state.app.auth.authenticate_bearer(token).await;

    match authenticated {
        Ok(viewer) => depot.insert_viewer(viewer),
        Err(AuthServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Session expired or revoked"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to resolve session: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Token(source)) => {
            error!("failed to process session token: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use canteen_app::{
        auth::{MockAuthService, Viewer},
        domain::users::records::{Role, UserUuid},
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::state_with_auth;

    use super::*;

    #[salvo::handler]
    async fn echo_viewer(depot: &mut Depot, res: &mut Response) {
        let viewer = depot.viewer().map_or_else(
            || "anonymous".to_string(),
            |viewer| format!("{}:{}", viewer.user, viewer.is_admin()),
        );

        res.render(viewer);
    }

    fn make_service(auth: MockAuthService) -> Service {
        Service::new(
            Router::new()
                .hoop(salvo::affix_state::inject(state_with_auth(auth)))
                .hoop(handler)
                .push(Router::new().get(echo_viewer)),
        )
    }

    #[tokio::test]
    async fn test_missing_authorization_header_continues_anonymously() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let mut res = TestClient::get("http://example.com")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "anonymous");

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_revoked_session_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "cs_v1_abc.def")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer cs_v1_abc.def", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_session_injects_viewer() -> TestResult {
        let user = UserUuid::from_uuid(Uuid::nil());

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "cs_v1_abc.def")
            .return_once(move |_| {
                Ok(Viewer {
                    user,
                    name: "Chef".to_string(),
                    roles: vec![Role::Admin],
                })
            });

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer cs_v1_abc.def", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, format!("{user}:true"));

        Ok(())
    }

    #[test]
    fn bearer_token_extraction_requires_scheme_and_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer   "), None);
        assert_eq!(extract_bearer_token("Token abc"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
    }
}
