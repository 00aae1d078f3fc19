//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use canteen::menu::MenuItem;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    carts::{
        data::NewCart,
        errors::CartsServiceError,
        records::{CartRecord, CartUuid},
    },
    menu::{MenuService, records::MenuItemUuid},
};

#[derive(Debug)]
struct StoredCart {
    record: CartRecord,

    /// Set while a checkout holds the cart; every mutation is refused.
    checking_out: bool,
}

impl StoredCart {
    fn writable(&self) -> Result<&CartRecord, CartsServiceError> {
        if self.checking_out {
            Err(CartsServiceError::CheckoutInProgress)
        } else {
            Ok(&self.record)
        }
    }
}

/// Process-local cart store.
pub struct InMemoryCartsService {
    menu: Arc<dyn MenuService>,
    carts: RwLock<FxHashMap<CartUuid, StoredCart>>,
}

impl InMemoryCartsService {
    #[must_use]
    pub fn new(menu: Arc<dyn MenuService>) -> Self {
        Self {
            menu,
            carts: RwLock::new(FxHashMap::default()),
        }
    }

    async fn mutate<F>(&self, cart: CartUuid, f: F) -> Result<CartRecord, CartsServiceError>
    where
        F: FnOnce(&mut CartRecord) -> Result<(), CartsServiceError> + Send,
    {
        let mut carts = self.carts.write().await;

        let stored = carts.get_mut(&cart).ok_or(CartsServiceError::NotFound)?;

        stored.writable()?;

        f(&mut stored.record)?;
        stored.record.touch();

        Ok(stored.record.clone())
    }

    async fn release<F>(&self, cart: CartUuid, f: F) -> Result<CartRecord, CartsServiceError>
    where
        F: FnOnce(&mut CartRecord) + Send,
    {
        let mut carts = self.carts.write().await;

        let stored = carts.get_mut(&cart).ok_or(CartsServiceError::NotFound)?;

        stored.checking_out = false;

        f(&mut stored.record);
        stored.record.touch();

        Ok(stored.record.clone())
    }

    async fn ensure_exists(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        if self.carts.read().await.contains_key(&cart) {
            Ok(())
        } else {
            Err(CartsServiceError::NotFound)
        }
    }
}

#[async_trait]
impl CartsService for InMemoryCartsService {
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError> {
        let mut carts = self.carts.write().await;

        if carts.contains_key(&cart.uuid) {
            return Err(CartsServiceError::AlreadyExists);
        }

        let record = CartRecord::new(cart.uuid);

        carts.insert(
            cart.uuid,
            StoredCart {
                record: record.clone(),
                checking_out: false,
            },
        );

        Ok(record)
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        self.carts
            .read()
            .await
            .get(&cart)
            .map(|stored| stored.record.clone())
            .ok_or(CartsServiceError::NotFound)
    }

    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut carts = self.carts.write().await;

        carts.get(&cart).ok_or(CartsServiceError::NotFound)?.writable()?;
        carts.remove(&cart);

        Ok(())
    }

    async fn add_item(
        &self,
        cart: CartUuid,
        item: MenuItemUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        // Fail fast before the menu round trip; the write below re-checks.
        self.ensure_exists(cart).await?;

        let item: MenuItem = self.menu.get_item(item).await?.into();

        self.mutate(cart, |record| {
            record.cart.add(&item)?;

            Ok(())
        })
        .await
    }

    async fn update_quantity(
        &self,
        cart: CartUuid,
        item: MenuItemUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        self.mutate(cart, |record| {
            record.cart.update_quantity(item.into_uuid(), quantity)?;

            Ok(())
        })
        .await
    }

    async fn remove_item(
        &self,
        cart: CartUuid,
        item: MenuItemUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.mutate(cart, |record| {
            record.cart.remove_item(item.into_uuid())?;

            Ok(())
        })
        .await
    }

    async fn clear_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        self.mutate(cart, |record| {
            record.cart.clear();

            Ok(())
        })
        .await
    }

    async fn begin_checkout(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        let mut carts = self.carts.write().await;

        let stored = carts.get_mut(&cart).ok_or(CartsServiceError::NotFound)?;

        stored.writable()?;

        if !stored.record.is_empty() {
            stored.checking_out = true;
            stored.record.touch();
        }

        Ok(stored.record.clone())
    }

    async fn complete_checkout(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        self.release(cart, |record| record.cart.clear()).await
    }

    async fn abandon_checkout(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        self.release(cart, |_record| ()).await
    }

    async fn evict_idle(&self, idle_since: Timestamp) -> usize {
        let mut carts = self.carts.write().await;
        let before = carts.len();

        carts.retain(|_, stored| stored.record.updated_at >= idle_since);

        let evicted = before - carts.len();

        debug!(evicted, remaining = carts.len(), "evicted idle carts");

        evicted
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Creates an empty cart under a caller-chosen UUID.
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError>;

    /// Retrieve a snapshot of a cart.
    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Deletes a cart and its lines.
    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;

    /// Add one unit of a served menu item, snapshotting its name and price.
    async fn add_item(
        &self,
        cart: CartUuid,
        item: MenuItemUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set a line's quantity; zero or less removes the line.
    async fn update_quantity(
        &self,
        cart: CartUuid,
        item: MenuItemUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove a line regardless of quantity.
    async fn remove_item(
        &self,
        cart: CartUuid,
        item: MenuItemUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line, keeping the cart.
    async fn clear_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Hold a cart for checkout and return the lines being ordered.
    ///
    /// Until [`complete_checkout`](Self::complete_checkout) or
    /// [`abandon_checkout`](Self::abandon_checkout) is called, mutations and
    /// further checkouts of the cart fail with `CheckoutInProgress`. An empty
    /// cart is returned without being held.
    async fn begin_checkout(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Release a held cart after its order committed, emptying it.
    async fn complete_checkout(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Release a held cart unchanged after a failed checkout.
    async fn abandon_checkout(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Drop every cart last touched before `idle_since`, returning how many went.
    async fn evict_idle(&self, idle_since: Timestamp) -> usize;
}
