//! Scalar value parsing contract.
//!
//! The binding engine never interprets value text itself; it hands the
//! text to the specification's parser and observes only success or
//! failure. Rich conversions (dates, enumerated choices) belong to the
//! caller, supplied per declaration through `parse_with`.

use std::str::FromStr;

/// How option and operand values parse from their token text.
///
/// Implemented for free by every `FromStr` type; `None` marks the token
/// as rejected, which errors the slot's accumulator.
pub trait ParseValue: Sized {
    fn parse_value(text: &str) -> Option<Self>;
}

impl<T: FromStr> ParseValue for T {
    fn parse_value(text: &str) -> Option<T> {
        text.parse().ok()
    }
}
