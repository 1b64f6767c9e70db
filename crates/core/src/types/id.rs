//! Shopify global ID newtypes.
//!
//! Shopify addresses every resource with a GID such as
//! `gid://shopify/Product/123`. Handlers receive either that form or the bare
//! numeric id (webhook payloads, storefront links), so the `define_gid!`
//! wrappers accept both and always store the canonical GID.

use thiserror::Error;

/// Errors that can occur when parsing a Shopify GID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GidError {
    /// The input was empty or whitespace.
    #[error("id cannot be empty")]
    Empty,
    /// The input was a GID for another resource type.
    #[error("expected a {expected} id, got {actual}")]
    WrongResource {
        /// Resource name the wrapper expects.
        expected: &'static str,
        /// The offending input.
        actual: String,
    },
    /// The trailing id is not numeric.
    #[error("invalid numeric id: {0}")]
    InvalidNumericId(String),
}

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype around `String` with:
/// - `Serialize`/`Deserialize` through the canonical string form
/// - `parse()` accepting a full GID or a bare numeric id
/// - `Display`, `FromStr`, `TryFrom<String>` and `Into<String>`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use product_configurator_core::define_gid;
/// define_gid!(CollectionGid, "Collection");
///
/// let id = CollectionGid::parse("42").unwrap();
/// assert_eq!(id.as_str(), "gid://shopify/Collection/42");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
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
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name embedded in the GID.
            pub const RESOURCE: &'static str = $resource;

            const PREFIX: &'static str = concat!("gid://shopify/", $resource, "/");

            /// Parse a full GID or a bare numeric id.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty, names another resource,
            /// or does not end in a numeric id.
            pub fn parse(input: &str) -> Result<Self, $crate::types::id::GidError> {
                let input = input.trim();
                if input.is_empty() {
                    return Err($crate::types::id::GidError::Empty);
                }

                let tail = match input.strip_prefix(Self::PREFIX) {
                    Some(tail) => tail,
                    None if input.starts_with("gid://") => {
                        return Err($crate::types::id::GidError::WrongResource {
                            expected: $resource,
                            actual: input.to_owned(),
                        });
                    }
                    None => input,
                };

                if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
                    return Err($crate::types::id::GidError::InvalidNumericId(
                        input.to_owned(),
                    ));
                }

                Ok(Self(format!("{}{tail}", Self::PREFIX)))
            }

            /// Build a GID from a numeric id.
            #[must_use]
            pub fn from_numeric(id: u64) -> Self {
                Self(format!("{}{id}", Self::PREFIX))
            }

            /// The canonical GID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The numeric tail of the GID.
            #[must_use]
            pub fn numeric_id(&self) -> &str {
                self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::GidError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::types::id::GidError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let raw = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self::parse(&raw)?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_gid!(ProductGid, "Product");
define_gid!(OrderGid, "Order");
define_gid!(MetaobjectGid, "Metaobject");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_id() {
        let id = ProductGid::parse("14895984542060").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/14895984542060");
        assert_eq!(id.numeric_id(), "14895984542060");
    }

    #[test]
    fn test_parse_full_gid() {
        let id = OrderGid::parse(" gid://shopify/Order/42 ").unwrap();
        assert_eq!(id, OrderGid::from_numeric(42));
    }

    #[test]
    fn test_parse_rejects_other_resource() {
        let err = ProductGid::parse("gid://shopify/Order/42").unwrap_err();
        assert!(matches!(err, GidError::WrongResource { expected: "Product", .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ProductGid::parse("   "), Err(GidError::Empty));
        assert!(matches!(
            ProductGid::parse("abc"),
            Err(GidError::InvalidNumericId(_))
        ));
        assert!(matches!(
            ProductGid::parse("gid://shopify/Product/"),
            Err(GidError::InvalidNumericId(_))
        ));
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id: MetaobjectGid = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"gid://shopify/Metaobject/7\""
        );
    }
}
