//! Macro for implementing Display and FromStr for wire enums
//!
//! Several payload enums travel as short lowercase strings in URLs and JSON
//! bodies (vote direction, candle timeframe). This macro keeps the
//! string mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use bullboard_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Sentiment {
//!     Bullish,
//!     Bearish,
//! }
//!
//! impl_wire_enum_conversions!(Sentiment {
//!     Bullish => "bullish",
//!     Bearish => "bearish",
//! });
//!
//! assert_eq!(Sentiment::Bullish.to_string(), "bullish");
//! ```

/// Implements Display and FromStr for an enum with fixed wire strings
///
/// - Display writes the mapped string
/// - FromStr matches case-insensitively against the mapped strings
///
/// The mapped strings must be lowercase.
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
