//! Depot helper extensions.

use std::any::Any;

use canteen_app::auth::Viewer;
use salvo::prelude::{Depot, StatusError};

const VIEWER_DEPOT_KEY: &str = "viewer";

/// Helpers for depot extraction and the request-scoped viewer.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_viewer(&mut self, viewer: Viewer);

    /// The signed-in user, or `None` for anonymous requests.
    fn viewer(&self) -> Option<&Viewer>;

    fn viewer_or_401(&self) -> Result<&Viewer, StatusError>;

    /// A signed-in admin; 401 when anonymous, 403 for customers.
    fn admin_or_403(&self) -> Result<&Viewer, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_viewer(&mut self, viewer: Viewer) {
        self.insert(VIEWER_DEPOT_KEY, viewer);
    }

    fn viewer(&self) -> Option<&Viewer> {
        self.get::<Viewer>(VIEWER_DEPOT_KEY).ok()
    }

    fn viewer_or_401(&self) -> Result<&Viewer, StatusError> {
        self.viewer()
            .ok_or_else(|| StatusError::unauthorized().brief("Sign in to continue"))
    }

    fn admin_or_403(&self) -> Result<&Viewer, StatusError> {
        let viewer = self.viewer_or_401()?;

        if !viewer.is_admin() {
            return Err(StatusError::forbidden().brief("Admin access required"));
        }

        Ok(viewer)
    }
}
