//! Cart Records

use canteen::cart::{Cart, CartError, CartLine};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub cart: Cart,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    pub(crate) fn new(uuid: CartUuid) -> Self {
        let now = Timestamp::now();

        Self {
            uuid,
            cart: Cart::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Sum of the lines in minor units.
    ///
    /// # Errors
    ///
    /// Returns an error when the total overflows.
    pub fn total(&self) -> Result<u64, CartError> {
        self.cart.total()
    }

    #[must_use]
    pub fn tax(&self) -> u64 {
        self.cart.tax()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}
