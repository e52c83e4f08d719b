//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// IDs are opaque: no validation is performed, so empty or otherwise
/// unusual values are accepted as-is.
///
/// # Example
///
/// ```rust
/// # use go_marketplace_core::define_id;
/// define_id!(SkuId);
/// define_id!(VendorId);
///
/// let sku = SkuId::new("p1");
/// let vendor = VendorId::new("p1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = vendor;
/// assert_eq!(sku.as_str(), vendor.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display_and_conversions() {
        let id = ProductId::new("p1");
        assert_eq!(id.to_string(), "p1");
        assert_eq!(id.as_str(), "p1");
        assert_eq!(ProductId::from("p1"), id);
        assert_eq!(String::from(id), "p1");
    }

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let id = ProductId::new("abc-123");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"abc-123\""));

        let parsed: Result<ProductId, _> = serde_json::from_str("\"abc-123\"");
        assert_eq!(parsed.ok(), Some(id));
    }

    #[test]
    fn test_product_id_accepts_empty() {
        assert_eq!(ProductId::new("").as_str(), "");
    }
}
