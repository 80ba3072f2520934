//! Built-in argument converters
//!
//! Each converter turns one token into an [`ArgValue`] or a user-facing message
//! explaining why it could not.

use crate::core::parameter::{ArgValue, Converter};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;
use std::sync::Arc;

fn failure(argument: &str, type_name: &str) -> String {
    format!("The provided value '{argument}' cannot be converted to {type_name}.")
}

fn parse_as<T: FromStr>(argument: &str, type_name: &str) -> Result<T, String> {
    argument.parse::<T>().map_err(|_| failure(argument, type_name))
}

/// Keeps the token as a string
pub fn string(argument: &str) -> Result<ArgValue, String> {
    Ok(ArgValue::Str(argument.to_string()))
}

/// 8-bit signed integer, stored widened
pub fn byte(argument: &str) -> Result<ArgValue, String> {
    parse_as::<i8>(argument, "a Byte").map(|v| ArgValue::Int(i64::from(v)))
}

/// 16-bit signed integer, stored widened
pub fn short(argument: &str) -> Result<ArgValue, String> {
    parse_as::<i16>(argument, "a Short").map(|v| ArgValue::Int(i64::from(v)))
}

/// 32-bit signed integer, stored widened
pub fn int(argument: &str) -> Result<ArgValue, String> {
    parse_as::<i32>(argument, "an Integer").map(|v| ArgValue::Int(i64::from(v)))
}

/// 64-bit signed integer
pub fn long(argument: &str) -> Result<ArgValue, String> {
    parse_as::<i64>(argument, "a Long").map(ArgValue::Int)
}

/// 32-bit float, stored widened
pub fn float(argument: &str) -> Result<ArgValue, String> {
    parse_as::<f32>(argument, "a Float").map(|v| ArgValue::Float(f64::from(v)))
}

/// 64-bit float
pub fn double(argument: &str) -> Result<ArgValue, String> {
    parse_as::<f64>(argument, "a Double").map(ArgValue::Float)
}

/// Integer of any size
pub fn big_integer(argument: &str) -> Result<ArgValue, String> {
    parse_as::<BigInt>(argument, "a BigInteger").map(ArgValue::BigInt)
}

/// Exact decimal of any size and scale
pub fn big_decimal(argument: &str) -> Result<ArgValue, String> {
    parse_as::<BigDecimal>(argument, "a BigDecimal").map(ArgValue::Decimal)
}

/// `true` or `false`, ignoring case
pub fn boolean(argument: &str) -> Result<ArgValue, String> {
    if argument.eq_ignore_ascii_case("true") {
        Ok(ArgValue::Bool(true))
    } else if argument.eq_ignore_ascii_case("false") {
        Ok(ArgValue::Bool(false))
    } else {
        Err(failure(argument, "a Boolean"))
    }
}

/// Splits the token on `delimiter` and converts every piece with `element`
///
/// An empty token yields an empty list. The first failing element's message is
/// returned as-is.
pub fn list<F>(element: F, delimiter: impl Into<String>) -> Converter
where
    F: Fn(&str) -> Result<ArgValue, String> + Send + Sync + 'static,
{
    let delimiter = delimiter.into();
    Arc::new(move |argument: &str| {
        if argument.is_empty() {
            return Ok(ArgValue::List(Vec::new()));
        }

        argument
            .split(delimiter.as_str())
            .map(&element)
            .collect::<Result<Vec<_>, _>>()
            .map(ArgValue::List)
    })
}

/// Look up a converter by the name used in textual slot specs
pub fn by_name(name: &str) -> Option<Converter> {
    let converter: Converter = match name {
        "string" => Arc::new(string),
        "byte" => Arc::new(byte),
        "short" => Arc::new(short),
        "int" => Arc::new(int),
        "long" => Arc::new(long),
        "float" => Arc::new(float),
        "double" => Arc::new(double),
        "bigint" => Arc::new(big_integer),
        "decimal" => Arc::new(big_decimal),
        "bool" => Arc::new(boolean),
        "list-int" => list(long, ","),
        "list" => list(string, ","),
        _ => return None,
    };
    Some(converter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_converters() {
        assert_eq!(int("42"), Ok(ArgValue::Int(42)));
        assert_eq!(long("-9000000000"), Ok(ArgValue::Int(-9_000_000_000)));
        assert_eq!(double("2.5"), Ok(ArgValue::Float(2.5)));
        assert_eq!(float("0.5"), Ok(ArgValue::Float(0.5)));
    }

    #[test]
    fn test_int_overflow_message() {
        assert_eq!(
            int("9000000000"),
            Err("The provided value '9000000000' cannot be converted to an Integer.".to_string())
        );
    }

    #[test]
    fn test_narrow_integer_overflow_messages() {
        assert_eq!(short("-32768"), Ok(ArgValue::Int(-32768)));
        assert_eq!(
            short("40000"),
            Err("The provided value '40000' cannot be converted to a Short.".to_string())
        );
        assert_eq!(byte("127"), Ok(ArgValue::Int(127)));
        assert_eq!(
            byte("200"),
            Err("The provided value '200' cannot be converted to a Byte.".to_string())
        );
    }

    #[test]
    fn test_big_integer() {
        let digits = "123456789012345678901234567890";
        assert_eq!(
            big_integer(digits),
            Ok(ArgValue::BigInt(BigInt::from_str(digits).unwrap()))
        );
        assert_eq!(big_integer(digits).unwrap().to_string(), digits);
        assert_eq!(
            big_integer("1.5"),
            Err("The provided value '1.5' cannot be converted to a BigInteger.".to_string())
        );
    }

    #[test]
    fn test_big_decimal_is_exact() {
        let value = big_decimal("0.1000000000000000000001").unwrap();
        assert_eq!(
            value,
            ArgValue::Decimal(BigDecimal::from_str("0.1000000000000000000001").unwrap())
        );
        assert_ne!(value, big_decimal("0.1").unwrap());
        assert_eq!(
            big_decimal("ten"),
            Err("The provided value 'ten' cannot be converted to a BigDecimal.".to_string())
        );
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean("TRUE"), Ok(ArgValue::Bool(true)));
        assert_eq!(boolean("false"), Ok(ArgValue::Bool(false)));
        assert!(boolean("yes").is_err());
    }

    #[test]
    fn test_list_converter() {
        let convert = list(long, ",");
        assert_eq!(
            convert("1,2,3"),
            Ok(ArgValue::List(vec![ArgValue::Int(1), ArgValue::Int(2), ArgValue::Int(3)]))
        );
        assert_eq!(convert(""), Ok(ArgValue::List(Vec::new())));
        assert_eq!(
            convert("1,x"),
            Err("The provided value 'x' cannot be converted to a Long.".to_string())
        );
    }

    #[test]
    fn test_by_name() {
        assert!(by_name("int").is_some());
        assert!(by_name("list-int").is_some());
        for name in ["byte", "short", "bigint", "decimal"] {
            assert!(by_name(name).is_some(), "missing {name}");
        }
        assert!(by_name("complex").is_none());
        let convert = by_name("bool").unwrap();
        assert_eq!(convert("True"), Ok(ArgValue::Bool(true)));
    }
}
