//! Typed extraction of leaf strings.
//!
//! Every stored value is text. Callers pick the type: statically through
//! [`get_as`] with a [`FromLeaf`] type, or at runtime through [`cast_as`] with
//! a [`Request`]. Arrays are written `{a, b, c}` and must be homogeneous.
//!
//! Booleans are permissive: `"true"` is `true` and every other literal is
//! `false`, never an error.

use std::fmt;
use std::str::FromStr;

use crate::error::CastError;

/// Scalar kinds a leaf can be cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Long,
    ULong,
    Float,
    Double,
    Bool,
    Str,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::ULong => "ulong",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Bool => "bool",
            Kind::Str => "string",
        };
        f.write_str(s)
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "int" | "i32" => Kind::Int,
            "long" | "i64" => Kind::Long,
            "ulong" | "u64" => Kind::ULong,
            "float" | "f32" => Kind::Float,
            "double" | "f64" => Kind::Double,
            "bool" => Kind::Bool,
            "string" | "str" => Kind::Str,
            other => return Err(format!("unknown kind '{other}'")),
        })
    }
}

/// A scalar or array-of-scalar cast, e.g. `int` or `int[]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Scalar(Kind),
    Array(Kind),
}

impl FromStr for Request {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().strip_suffix("[]") {
            Some(elem) => elem.parse().map(Request::Array),
            None => s.parse().map(Request::Scalar),
        }
    }
}

/// Result of a runtime-dispatched cast.
#[derive(Debug, Clone, PartialEq)]
pub enum Typed {
    Int(i32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
    Array(Vec<Typed>),
}

impl From<&Typed> for serde_json::Value {
    fn from(v: &Typed) -> Self {
        use serde_json::Value as J;
        match v {
            Typed::Int(x) => J::from(*x),
            Typed::Long(x) => J::from(*x),
            Typed::ULong(x) => J::from(*x),
            // non-finite floats have no JSON form
            Typed::Float(x) => serde_json::Number::from_f64(f64::from(*x))
                .map(J::Number)
                .unwrap_or(J::Null),
            Typed::Double(x) => serde_json::Number::from_f64(*x)
                .map(J::Number)
                .unwrap_or(J::Null),
            Typed::Bool(b) => J::Bool(*b),
            Typed::Str(s) => J::String(s.clone()),
            Typed::Array(items) => J::Array(items.iter().map(J::from).collect()),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Types a leaf string can be cast to. Implemented for a closed set only.
pub trait FromLeaf: sealed::Sealed + Sized {
    const KIND: Kind;

    fn from_leaf(s: &str) -> Result<Self, CastError>;
}

/// Element types allowed inside an array cast.
pub trait ScalarLeaf: FromLeaf {}

fn strip_ws(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn invalid(s: &str, kind: Kind) -> CastError {
    CastError::InvalidLiteral {
        input: s.to_string(),
        kind,
    }
}

macro_rules! numeric_leaf {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}
        impl ScalarLeaf for $ty {}
        impl FromLeaf for $ty {
            const KIND: Kind = Kind::$kind;

            fn from_leaf(s: &str) -> Result<Self, CastError> {
                strip_ws(s).parse::<$ty>().map_err(|_| invalid(s, Self::KIND))
            }
        }
    )*};
}

numeric_leaf!(i32 => Int, i64 => Long, u64 => ULong, f32 => Float, f64 => Double);

impl sealed::Sealed for bool {}
impl ScalarLeaf for bool {}
impl FromLeaf for bool {
    const KIND: Kind = Kind::Bool;

    fn from_leaf(s: &str) -> Result<Self, CastError> {
        Ok(strip_ws(s) == "true")
    }
}

impl sealed::Sealed for String {}
impl ScalarLeaf for String {}
impl FromLeaf for String {
    const KIND: Kind = Kind::Str;

    fn from_leaf(s: &str) -> Result<Self, CastError> {
        Ok(s.to_string())
    }
}

impl<T: ScalarLeaf> sealed::Sealed for Vec<T> {}
impl<T: ScalarLeaf> FromLeaf for Vec<T> {
    const KIND: Kind = T::KIND;

    fn from_leaf(s: &str) -> Result<Self, CastError> {
        split_array(s)?.iter().map(|e| T::from_leaf(e)).collect()
    }
}

/// `{ 1, 2 ,3 }` -> `["1", "2", "3"]`. All whitespace is removed and empty
/// elements are skipped, so `{}` is an empty array and a trailing comma is allowed.
pub fn split_array(s: &str) -> Result<Vec<String>, CastError> {
    let t = s.trim();
    let Some(inner) = t.strip_prefix('{').and_then(|r| r.strip_suffix('}')) else {
        return Err(CastError::NotAnArray {
            input: s.to_string(),
        });
    };
    Ok(strip_ws(inner)
        .split(',')
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect())
}

/// Cast a leaf string to `T`.
pub fn get_as<T: FromLeaf>(s: &str) -> Result<T, CastError> {
    T::from_leaf(s)
}

fn cast_scalar(s: &str, kind: Kind) -> Result<Typed, CastError> {
    Ok(match kind {
        Kind::Int => Typed::Int(get_as(s)?),
        Kind::Long => Typed::Long(get_as(s)?),
        Kind::ULong => Typed::ULong(get_as(s)?),
        Kind::Float => Typed::Float(get_as(s)?),
        Kind::Double => Typed::Double(get_as(s)?),
        Kind::Bool => Typed::Bool(get_as(s)?),
        Kind::Str => Typed::Str(s.to_string()),
    })
}

/// Runtime-dispatched cast.
pub fn cast_as(s: &str, req: Request) -> Result<Typed, CastError> {
    match req {
        Request::Scalar(kind) => cast_scalar(s, kind),
        Request::Array(kind) => split_array(s)?
            .iter()
            .map(|e| cast_scalar(e, kind))
            .collect::<Result<Vec<_>, _>>()
            .map(Typed::Array),
    }
}
