//! Value type definitions for deltacheck.
//!
//! This module defines the `Value` enum which represents a single column value
//! of a row, and the `Normalized` wrapper through which values are compared
//! and hashed.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A column value as observed in, or expected from, a data store.
#[derive(Clone, Debug)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit floating point
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// DateTime stored as Unix timestamp in milliseconds
    DateTime(i64),
    /// Binary data
    Bytes(Vec<u8>),
}

/// Comparable form of a [`Value`].
///
/// Integers of every width and integral floats collapse into `Int`, so an
/// `Int32(3)`, an `Int64(3)` and a `Float64(3.0)` are the same value. NaN
/// payloads are canonicalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Normalized<'a> {
    Null,
    Boolean(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
    DateTime(i64),
    Bytes(&'a [u8]),
}

/// Smallest f64 above `i64::MAX`.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn normalize_float(f: f64) -> Normalized<'static> {
    if f.is_nan() {
        return Normalized::Float(f64::NAN.to_bits());
    }
    // Integral check without std's `fract`: the cast is exact only for integers.
    if f >= -I64_UPPER && f < I64_UPPER {
        let i = f as i64;
        if i as f64 == f {
            return Normalized::Int(i);
        }
    }
    Normalized::Float(f.to_bits())
}

impl Value {
    /// Returns the normalized, comparable form of this value.
    pub fn normalized(&self) -> Normalized<'_> {
        match self {
            Value::Null => Normalized::Null,
            Value::Boolean(b) => Normalized::Boolean(*b),
            Value::Int32(i) => Normalized::Int(*i as i64),
            Value::Int64(i) => Normalized::Int(*i),
            Value::Float64(f) => normalize_float(*f),
            Value::String(s) => Normalized::Text(s.as_str()),
            Value::DateTime(d) => Normalized::DateTime(*d),
            Value::Bytes(b) => Normalized::Bytes(b.as_slice()),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as i64 if this is an integer of any width.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the f64 value if this is a Float64, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the datetime timestamp if this is a DateTime, None otherwise.
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the bytes if this is Bytes, None otherwise.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Float64(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::DateTime(d) => write!(f, "datetime({})", d),
            Value::Bytes(b) => {
                f.write_str("0x")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Builds an array of [`Value`]s from heterogeneous literals.
///
/// ```rust
/// use deltacheck_core::{values, Value};
///
/// let row = values![1, "a", Value::Null];
/// assert_eq!(row[1], Value::from("a"));
/// ```
#[macro_export]
macro_rules! values {
    ($($v:expr),* $(,)?) => {
        [$($crate::Value::from($v)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;
    use core::hash::BuildHasher;

    fn hash_of(v: &Value) -> u64 {
        // Fixed-key hasher; any deterministic hasher works here.
        struct Fnv(u64);
        impl Hasher for Fnv {
            fn finish(&self) -> u64 {
                self.0
            }
            fn write(&mut self, bytes: &[u8]) {
                for b in bytes {
                    self.0 ^= *b as u64;
                    self.0 = self.0.wrapping_mul(0x100000001b3);
                }
            }
        }
        struct FnvBuild;
        impl BuildHasher for FnvBuild {
            type Hasher = Fnv;
            fn build_hasher(&self) -> Fnv {
                Fnv(0xcbf29ce484222325)
            }
        }
        FnvBuild.hash_one(v)
    }

    #[test]
    fn test_value_null() {
        let v = Value::Null;
        assert!(v.is_null());
        assert_eq!(v, Value::Null);
        assert_ne!(v, Value::Int32(0));
        assert_ne!(Value::String(String::new()), Value::Null);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Int32(42).as_i64(), Some(42));
        assert_eq!(Value::Int64(100).as_i64(), Some(100));
        assert_eq!(Value::Float64(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::DateTime(1234567890).as_datetime(), Some(1234567890));
        assert_eq!(Value::Bytes(vec![1, 2, 3]).as_bytes(), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn test_width_tolerant_equality() {
        assert_eq!(Value::Int32(42), Value::Int64(42));
        assert_eq!(Value::Int64(7), Value::Float64(7.0));
        assert_ne!(Value::Int64(7), Value::Float64(7.5));
        assert_eq!(hash_of(&Value::Int32(42)), hash_of(&Value::Int64(42)));
        assert_eq!(hash_of(&Value::Int64(7)), hash_of(&Value::Float64(7.0)));
    }

    #[test]
    fn test_float_normalization() {
        assert_eq!(Value::Float64(f64::NAN), Value::Float64(-f64::NAN));
        assert_eq!(Value::Float64(0.0), Value::Float64(-0.0));
        assert_eq!(Value::Float64(1e300), Value::Float64(1e300));
        assert_eq!(Value::Float64(I64_UPPER).normalized(), Normalized::Float(I64_UPPER.to_bits()));
    }

    #[test]
    fn test_kinds_never_cross() {
        assert_ne!(Value::DateTime(5), Value::Int64(5));
        assert_ne!(Value::Boolean(true), Value::Int32(1));
        assert_ne!(Value::String("1".into()), Value::Int32(1));
        assert_ne!(Value::Bytes(vec![0x61]), Value::String("a".into()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Null), "NULL");
        assert_eq!(format!("{}", Value::from("a")), "\"a\"");
        assert_eq!(format!("{}", Value::Int32(3)), "3");
        assert_eq!(format!("{}", Value::Float64(2.0)), "2.0");
        assert_eq!(format!("{}", Value::Bytes(vec![0xca, 0xfe])), "0xcafe");
    }

    #[test]
    fn test_value_from_impls() {
        let v: Value = 42i32.into();
        assert_eq!(v.as_i64(), Some(42));

        let v: Value = "hello".into();
        assert_eq!(v.as_str(), Some("hello"));

        let v: Value = Some(100i64).into();
        assert_eq!(v.as_i64(), Some(100));

        let v: Value = None::<i32>.into();
        assert!(v.is_null());
    }

    #[test]
    fn test_values_macro() {
        let row = values![1, "a", None::<i64>, 2.5];
        assert_eq!(row.len(), 4);
        assert_eq!(row[0], Value::Int64(1));
        assert!(row[2].is_null());
    }
}
