//! Declarative record and enum definitions.
//!
//! ```
//! use callstream_codec::{Custom, Record, record, wire_enum};
//!
//! wire_enum! {
//!     pub enum Tier {
//!         Free => "free",
//!         Paid => "paid",
//!     }
//! }
//!
//! record! {
//!     pub struct Account {
//!         id: required String,
//!         tier: required Tier as "plan",
//!         nickname: optional String,
//!         tags: default Vec<String> = Vec::new(),
//!         extra: rest Custom,
//!     }
//! }
//!
//! let account = Account::decode(&serde_json::json!({
//!     "id": "a1",
//!     "plan": "enterprise",
//!     "nickname": null,
//!     "region": "eu",
//! }))
//! .unwrap();
//! assert_eq!(account.tier, Tier::Unknown("enterprise".into()));
//! assert!(account.nickname.is_null());
//! assert!(account.tags.is_empty());
//! assert_eq!(account.extra["region"], "eu");
//! ```
//!
//! Field syntax is `name: kind Type [as "wire_key"] [= default]`. The wire
//! key defaults to the field name. Kinds:
//!
//! - `required`: must be present and non-null.
//! - `optional`: stored as [`Field<Type>`](crate::Field).
//! - `default`: absent or `null` decodes to the `= default` expression.
//! - `rest`: `Type` must be [`Custom`](crate::Custom); keeps undeclared keys.

/// Defines a struct together with its [`Shape`](crate::Shape),
/// [`Record`](crate::Record), [`WireValue`](crate::WireValue) and serde impls.
///
/// Equality is structural. `Hash` covers the encoded form through
/// [`hash_json`](crate::hash_json), so records that compare equal hash
/// equally even when their `rest` bags list keys in a different order.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $kind:ident $ty:ty $( as $wire:literal )? $( = $default:expr )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $crate::__record_field_ty!($kind $ty),
            )*
        }

        impl $crate::Record for $name {
            const SHAPE: &'static $crate::Shape = &$crate::Shape {
                name: stringify!($name),
                fields: &[
                    $(
                        $crate::FieldSpec {
                            name: stringify!($field),
                            wire_key: $crate::__record_key!($kind, $field $(, $wire)?),
                            presence: $crate::__record_presence!($kind),
                            expected: <$ty as $crate::WireValue>::EXPECTED,
                        },
                    )*
                ],
            };

            fn read(
                reader: &$crate::ObjectReader<'_>,
            ) -> ::core::result::Result<Self, $crate::CodecError> {
                ::core::result::Result::Ok(Self {
                    $(
                        $field: $crate::__record_read!(
                            reader,
                            $kind,
                            $crate::__record_key!($kind, $field $(, $wire)?),
                            $ty
                            $(, $default)?
                        ),
                    )*
                })
            }

            fn write(&self, writer: &mut $crate::ObjectWriter) {
                $(
                    $crate::__record_write!(
                        writer,
                        $kind,
                        $crate::__record_key!($kind, $field $(, $wire)?),
                        &self.$field
                    );
                )*
            }
        }

        impl ::core::hash::Hash for $name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                $crate::hash_json(&<Self as $crate::Record>::encode(self), state);
            }
        }

        impl $crate::WireValue for $name {
            const EXPECTED: &'static str = "object";

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
            ) -> ::core::result::Result<Self, $crate::CodecError> {
                <Self as $crate::Record>::decode(value)
            }

            fn to_wire(&self) -> $crate::__private::serde_json::Value {
                <Self as $crate::Record>::encode(self)
            }
        }

        $crate::__wire_serde!($name);
    };
}

/// Defines a string-valued enum whose unrecognized values decode to
/// `Unknown(String)` and re-encode unchanged.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            /// A value this build does not recognize, kept verbatim.
            Unknown(::std::string::String),
        }

        impl $name {
            /// Wire values of every known case, in declaration order.
            pub const KNOWN: &'static [&'static str] = &[$($wire),*];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)*
                    Self::Unknown(raw) => raw.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl ::core::convert::From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $($wire => Self::$variant,)*
                    other => Self::Unknown(other.to_owned()),
                }
            }
        }

        impl ::core::convert::From<::std::string::String> for $name {
            fn from(raw: ::std::string::String) -> Self {
                Self::from(raw.as_str())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::WireValue for $name {
            const EXPECTED: &'static str = "string";

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
            ) -> ::core::result::Result<Self, $crate::CodecError> {
                value
                    .as_str()
                    .map(Self::from)
                    .ok_or_else(|| $crate::CodecError::mismatch(Self::EXPECTED, value))
            }

            fn to_wire(&self) -> $crate::__private::serde_json::Value {
                $crate::__private::serde_json::Value::String(self.as_str().to_owned())
            }
        }

        $crate::__wire_serde!($name);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_serde {
    ($name:ident) => {
        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(
                    &<Self as $crate::WireValue>::to_wire(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <$crate::__private::serde_json::Value as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::WireValue>::from_wire(&value)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field_ty {
    (optional $ty:ty) => { $crate::Field<$ty> };
    ($kind:ident $ty:ty) => { $ty };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_key {
    (rest, $field:ident $(, $wire:literal)?) => { "" };
    ($kind:ident, $field:ident, $wire:literal) => { $wire };
    ($kind:ident, $field:ident) => { stringify!($field) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_presence {
    (required) => { $crate::Presence::Required };
    (optional) => { $crate::Presence::Optional };
    (default) => { $crate::Presence::Defaulted };
    (rest) => { $crate::Presence::Rest };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_read {
    ($reader:ident, required, $key:expr, $ty:ty) => {
        $reader.required::<$ty>($key)?
    };
    ($reader:ident, optional, $key:expr, $ty:ty) => {
        $reader.optional::<$ty>($key)?
    };
    ($reader:ident, default, $key:expr, $ty:ty, $default:expr) => {
        $reader.defaulted::<$ty>($key, || $default)?
    };
    ($reader:ident, rest, $key:expr, $ty:ty) => {
        $reader.rest()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_write {
    ($writer:ident, required, $key:expr, $value:expr) => {
        $writer.required($key, $value)
    };
    ($writer:ident, optional, $key:expr, $value:expr) => {
        $writer.optional($key, $value)
    };
    ($writer:ident, default, $key:expr, $value:expr) => {
        $writer.defaulted($key, $value)
    };
    ($writer:ident, rest, $key:expr, $value:expr) => {
        $writer.rest($value)
    };
}
