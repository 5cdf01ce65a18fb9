use serde::{Deserialize, Serialize};

use vidatea_core::ProductId;

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (cents).
    pub price: u64,
    pub quantity: u32,
}

/// A cart document, keyed by user or session.
///
/// Carts are disposable caches of client state, not authoritative: the
/// janitor may delete one that was updated between its scan and its delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total_cents(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.price * u64::from(item.quantity))
            .sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cart_document_shape_round_trips() {
        let data = json!({
            "items": [
                {"productId": "p1", "name": "Green Tea", "price": 1299, "quantity": 2},
                {"productId": "p2", "name": "Oolong", "price": 1599, "quantity": 1}
            ]
        });

        let cart: Cart = serde_json::from_value(data).unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total_cents(), 2 * 1299 + 1599);
        assert_eq!(cart.item_count(), 3);
    }
}
