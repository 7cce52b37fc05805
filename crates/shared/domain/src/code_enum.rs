//! Closed enumerations stored and exchanged as string codes.
//!
//! Each enum gets a single mapping table `variant <-> (long code, short code)`
//! from which parsing, formatting and serde are all derived. Parsing is
//! case-insensitive and accepts either code; formatting always yields the long
//! code.

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident (error = $err:path) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($long:literal, $short:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Mapping table: variant, long code, short code.
            pub const CODES: &'static [($name, &'static str, &'static str)] =
                &[$(($name::$variant, $long, $short)),+];

            /// Parse a long or short code, ignoring ASCII case.
            pub fn parse(raw: &str) -> $crate::error::DomainResult<Self> {
                Self::CODES
                    .iter()
                    .find(|(_, long, short)| {
                        long.eq_ignore_ascii_case(raw) || short.eq_ignore_ascii_case(raw)
                    })
                    .map(|(variant, _, _)| *variant)
                    .ok_or_else(|| $err(raw.to_string()))
            }

            /// Long code, as stored and displayed.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $long,)+
                }
            }

            /// Short code.
            pub fn short_code(&self) -> &'static str {
                match self {
                    $($name::$variant => $short,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::error::DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use code_enum;
