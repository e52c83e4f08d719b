//! Cart line items and the ordered cart sequence.
//!
//! [`Cart`] is an ordered, id-unique list of [`LineItem`]s. Insertion order is
//! display order. The operations here are pure list updates; persistence and
//! sharing live in the `go-marketplace-cart` crate.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, Quantity};

/// A product as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

/// One product entry in the cart with its quantity.
///
/// Serialized field names match the persisted blob format:
/// `id`, `title`, `image_url`, `price`, `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl LineItem {
    /// A new line item for `product` with a quantity of one.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: Quantity::ONE,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.price * self.quantity
    }
}

impl From<Product> for LineItem {
    fn from(product: Product) -> Self {
        Self::from_product(product)
    }
}

/// Outcome of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line item was appended with a quantity of one.
    Added,
    /// An existing line item now has this quantity.
    Updated { quantity: Quantity },
    /// The line item was removed.
    Removed,
    /// No line item matched; the cart is untouched.
    Unchanged,
}

impl CartChange {
    /// Whether the cart contents differ after this change.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Errors raised when a line item list violates cart invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartLoadError {
    /// Two line items share an id.
    #[error("duplicate line item id: {0}")]
    DuplicateId(ProductId),
}

/// The ordered, id-unique collection of line items for a session.
///
/// Serializes as a plain JSON array of line items. Deserializing a list with
/// duplicate ids fails, as does any item with a quantity of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CartLoadError::DuplicateId`] if two items share an id.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartLoadError> {
        for (index, item) in items.iter().enumerate() {
            if items.iter().skip(index + 1).any(|other| other.id == item.id) {
                return Err(CartLoadError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Add one unit of `product`.
    ///
    /// An existing line item with the same id gets its quantity bumped and
    /// keeps its position and other fields; otherwise the product is
    /// appended with a quantity of one.
    pub fn add(&mut self, product: Product) -> CartChange {
        match self.increment(&product.id) {
            CartChange::Unchanged => {
                self.items.push(LineItem::from_product(product));
                CartChange::Added
            }
            change => change,
        }
    }

    /// Add one unit to the line item with `id`, if present.
    pub fn increment(&mut self, id: &ProductId) -> CartChange {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return CartChange::Unchanged;
        };
        item.quantity = item.quantity.incremented();
        CartChange::Updated {
            quantity: item.quantity,
        }
    }

    /// Remove one unit from the line item with `id`, if present.
    ///
    /// The line item is removed entirely when its last unit goes.
    pub fn decrement(&mut self, id: &ProductId) -> CartChange {
        let Some((position, item)) = self
            .items
            .iter_mut()
            .enumerate()
            .find(|(_, item)| &item.id == id)
        else {
            return CartChange::Unchanged;
        };
        if let Some(quantity) = item.quantity.decremented() {
            item.quantity = quantity;
            CartChange::Updated { quantity }
        } else {
            self.items.remove(position);
            CartChange::Removed
        }
    }

    /// The line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line item with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of every line item's price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_price).sum()
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartLoadError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            image_url: format!("https://cdn.example.com/{id}.png"),
            price: Price::from(10),
        }
    }

    fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|item| (item.id.as_str(), item.quantity.get()))
            .collect()
    }

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = Cart::new();
        let shirt = Product {
            id: ProductId::new("p1"),
            title: "Shirt".to_string(),
            image_url: "u".to_string(),
            price: Price::from(10),
        };

        assert_eq!(cart.add(shirt), CartChange::Added);
        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.id.as_str(), "p1");
        assert_eq!(item.title, "Shirt");
        assert_eq!(item.image_url, "u");
        assert_eq!(item.price, Price::from(10));
        assert_eq!(item.quantity, Quantity::ONE);
    }

    #[test]
    fn test_add_existing_increments() {
        let mut cart = Cart::new();
        cart.add(product("p1"));

        let change = cart.add(product("p1"));
        assert_eq!(
            change,
            CartChange::Updated {
                quantity: Quantity::new(2).unwrap()
            }
        );
        assert_eq!(quantities(&cart), vec![("p1", 2)]);
    }

    #[test]
    fn test_add_existing_keeps_position_and_fields() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        cart.add(product("p2"));
        cart.add(product("p3"));

        let mut renamed = product("p2");
        renamed.title = "Different".to_string();
        renamed.price = Price::from(99);
        cart.add(renamed);

        assert_eq!(quantities(&cart), vec![("p1", 1), ("p2", 2), ("p3", 1)]);
        let p2 = cart.get(&ProductId::new("p2")).unwrap();
        assert_eq!(p2.title, "Product p2");
        assert_eq!(p2.price, Price::from(10));
    }

    #[test]
    fn test_add_new_appends() {
        let mut cart = Cart::new();
        cart.add(product("b"));
        cart.add(product("a"));
        cart.add(product("c"));
        assert_eq!(quantities(&cart), vec![("b", 1), ("a", 1), ("c", 1)]);
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        let before = cart.clone();

        assert_eq!(cart.increment(&ProductId::new("nope")), CartChange::Unchanged);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_to_removal() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        cart.add(product("p1"));

        assert_eq!(
            cart.decrement(&ProductId::new("p1")),
            CartChange::Updated {
                quantity: Quantity::ONE
            }
        );
        assert_eq!(quantities(&cart), vec![("p1", 1)]);

        assert_eq!(cart.decrement(&ProductId::new("p1")), CartChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_removes_only_target() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        cart.add(product("p2"));
        cart.add(product("p3"));

        cart.decrement(&ProductId::new("p2"));
        assert_eq!(quantities(&cart), vec![("p1", 1), ("p3", 1)]);
    }

    #[test]
    fn test_decrement_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        let before = cart.clone();

        assert_eq!(cart.decrement(&ProductId::new("p2")), CartChange::Unchanged);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        cart.add(product("p1"));
        cart.add(Product {
            price: Price::from_cents(550),
            ..product("p2")
        });

        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(2550));
        assert_eq!(Cart::new().subtotal(), Price::ZERO);
    }

    #[test]
    fn test_serialized_blob_shape() {
        let mut cart = Cart::new();
        cart.add(product("p1"));
        cart.add(product("p1"));

        let value = serde_json::to_value(&cart).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "p1");
        assert_eq!(items[0]["title"], "Product p1");
        assert_eq!(items[0]["image_url"], "https://cdn.example.com/p1.png");
        assert_eq!(items[0]["quantity"], 2);
        assert!(items[0]["price"].is_number());
    }

    #[test]
    fn test_deserialize_blob() {
        let blob = r#"[
            {"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":2},
            {"id":"p2","title":"Hat","image_url":"v","price":4.5,"quantity":1}
        ]"#;
        let cart: Cart = serde_json::from_str(blob).unwrap();
        assert_eq!(quantities(&cart), vec![("p1", 2), ("p2", 1)]);
        assert_eq!(cart.items()[1].price, Price::from_cents(450));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let blob = r#"[
            {"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":2},
            {"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":1}
        ]"#;
        assert!(serde_json::from_str::<Cart>(blob).is_err());
        assert_eq!(
            Cart::from_items(Vec::new()).map(|cart| cart.len()),
            Ok(0)
        );
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let blob = r#"[{"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":0}]"#;
        assert!(serde_json::from_str::<Cart>(blob).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Increment(u8),
        Decrement(u8),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6).prop_map(Op::Add),
            (0u8..6).prop_map(Op::Increment),
            (0u8..6).prop_map(Op::Decrement),
        ]
    }

    proptest! {
        #[test]
        fn random_ops_keep_ids_unique_and_quantities_positive(
            ops in proptest::collection::vec(arb_op(), 0..64)
        ) {
            let mut cart = Cart::new();
            for op in ops {
                match op {
                    Op::Add(n) => { cart.add(product(&format!("p{n}"))); }
                    Op::Increment(n) => { cart.increment(&ProductId::new(format!("p{n}"))); }
                    Op::Decrement(n) => { cart.decrement(&ProductId::new(format!("p{n}"))); }
                }

                let mut ids: Vec<&str> = cart.items().iter().map(|item| item.id.as_str()).collect();
                let len = ids.len();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), len);
                prop_assert!(cart.items().iter().all(|item| item.quantity.get() >= 1));
            }
        }

        #[test]
        fn random_ops_survive_serialization(
            ops in proptest::collection::vec(arb_op(), 0..32)
        ) {
            let mut cart = Cart::new();
            for op in ops {
                if let Op::Add(n) | Op::Increment(n) = op {
                    cart.add(product(&format!("p{n}")));
                } else if let Op::Decrement(n) = op {
                    cart.decrement(&ProductId::new(format!("p{n}")));
                }
            }
            let blob = serde_json::to_string(&cart).unwrap();
            let restored: Cart = serde_json::from_str(&blob).unwrap();
            prop_assert_eq!(restored, cart);
        }
    }
}
