//! Cart

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::menu::{Category, MenuItem};

/// Errors raised by cart mutations and totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The menu item is not currently being served.
    #[error("menu item {0} is not available")]
    ItemUnavailable(Uuid),

    /// The cart has no line for the given menu item.
    #[error("cart has no line for menu item {0}")]
    LineNotFound(Uuid),

    /// A quantity exceeded the supported range.
    #[error("quantity is too large")]
    QuantityOverflow,

    /// A total exceeded the supported range.
    #[error("cart total is too large")]
    TotalOverflow,
}

/// A menu item snapshot held in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Menu item identifier
    pub item: Uuid,

    /// Menu item name at the time it was added
    pub name: String,

    /// Menu item category at the time it was added
    pub category: Category,

    /// Unit price in minor units at the time it was added
    pub price: u64,

    quantity: u32,
}

impl CartLine {
    fn from_item(item: &MenuItem) -> Self {
        Self {
            item: item.uuid,
            name: item.name.clone(),
            category: item.category,
            price: item.price,
            quantity: 1,
        }
    }

    /// Number of units, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity` for this line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] when the product does not fit in a `u64`.
    pub fn line_total(&self) -> Result<u64, CartError> {
        self.price
            .checked_mul(u64::from(self.quantity))
            .ok_or(CartError::TotalOverflow)
    }
}

/// A session cart.
///
/// Lines keep insertion order and never hold a quantity below one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of the item, inserting a new line if it is not in the cart yet.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemUnavailable`]: the item is not being served.
    /// - [`CartError::QuantityOverflow`]: the line quantity would overflow.
    pub fn add(&mut self, item: &MenuItem) -> Result<&CartLine, CartError> {
        if !item.available {
            return Err(CartError::ItemUnavailable(item.uuid));
        }

        let index = match self.position(item.uuid) {
            Some(index) => {
                let line = self
                    .lines
                    .get_mut(index)
                    .ok_or(CartError::LineNotFound(item.uuid))?;

                line.quantity = line
                    .quantity
                    .checked_add(1)
                    .ok_or(CartError::QuantityOverflow)?;

                index
            }
            None => {
                self.lines.push(CartLine::from_item(item));
                self.lines.len() - 1
            }
        };

        self.lines.get(index).ok_or(CartError::LineNotFound(item.uuid))
    }

    /// Set the quantity of a line. A quantity of zero or less removes the line.
    ///
    /// Returns the updated line, or `None` when the line was removed.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: the item is not in the cart.
    /// - [`CartError::QuantityOverflow`]: the quantity does not fit in a `u32`.
    pub fn update_quantity(
        &mut self,
        item: Uuid,
        quantity: i64,
    ) -> Result<Option<&CartLine>, CartError> {
        let index = self.position(item).ok_or(CartError::LineNotFound(item))?;

        if quantity <= 0 {
            self.lines.remove(index);

            return Ok(None);
        }

        let quantity = u32::try_from(quantity).map_err(|_overflow| CartError::QuantityOverflow)?;

        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::LineNotFound(item))?;

        line.quantity = quantity;

        Ok(Some(line))
    }

    /// Remove a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] when the item is not in the cart.
    pub fn remove_item(&mut self, item: Uuid) -> Result<CartLine, CartError> {
        let index = self.position(item).ok_or(CartError::LineNotFound(item))?;

        Ok(self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price × quantity` over all lines, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] when the sum does not fit in a `u64`.
    pub fn total(&self) -> Result<u64, CartError> {
        self.lines.iter().try_fold(0_u64, |acc, line| {
            acc.checked_add(line.line_total()?)
                .ok_or(CartError::TotalOverflow)
        })
    }

    /// Tax charged on the cart. Always zero.
    pub fn tax(&self) -> u64 {
        0
    }

    /// Look up a line by menu item.
    pub fn line(&self, item: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item == item)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, item: Uuid) -> Option<usize> {
        self.lines.iter().position(|line| line.item == item)
    }
}
