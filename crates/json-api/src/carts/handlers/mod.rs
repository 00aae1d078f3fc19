//! Cart Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;

#[cfg(test)]
pub(crate) mod tests {
    use canteen::{
        cart::{Cart, CartError},
        menu::{Category, MenuItem},
    };
    use canteen_app::domain::carts::records::{CartRecord, CartUuid};
    use jiff::Timestamp;
    use uuid::Uuid;

    pub(crate) fn make_cart(uuid: CartUuid) -> CartRecord {
        CartRecord {
            uuid,
            cart: Cart::new(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(crate) fn make_item(name: &str, price: u64) -> MenuItem {
        MenuItem {
            uuid: Uuid::now_v7(),
            name: name.to_string(),
            category: Category::Snacks,
            price,
            estimated_time: 5,
            available: true,
            is_special: false,
        }
    }

    /// A cart holding `quantity` of each item.
    pub(crate) fn make_filled_cart(
        uuid: CartUuid,
        lines: &[(&MenuItem, i64)],
    ) -> Result<CartRecord, CartError> {
        let mut record = make_cart(uuid);

        for (item, quantity) in lines {
            record.cart.add(item)?;
            record.cart.update_quantity(item.uuid, *quantity)?;
        }

        Ok(record)
    }
}
