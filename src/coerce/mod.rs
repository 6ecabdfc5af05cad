//! Conversion of raw strings into typed field values.
//!
//! Every supported destination type declares its [`Kind`], and the engine
//! dispatches on it. Scalars read the first raw value; optionals and
//! sequences hand the whole bag down to their inner type.

mod composite;
mod duration;
mod error;

use std::any::type_name;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

pub use composite::Json;
#[doc(hidden)]
pub use composite::decode_json;
pub use duration::{parse_nanos, DurationError};
pub use error::CoerceError;

/// Bit width of an integer or float destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
    /// Pointer width of the target platform.
    Platform,
}

/// The closed set of destination shapes the engine knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Optional,
    Sequence,
    Text,
    Int(Width),
    Uint(Width),
    Bool,
    Float(Width),
    Duration,
    Timestamp,
    Json,
    Unsupported,
}

/// A type that can be built from an ordered bag of raw strings.
pub trait Coerce: Sized {
    const KIND: Kind;

    /// Builds a fresh value from `raw`.
    fn coerce(raw: &[String]) -> Result<Self, CoerceError>;
}

/// Type-erased, assignable view of a destination field.
///
/// Implemented for every [`Coerce`] type. A failed assignment leaves the
/// previous value in place.
pub trait Slot {
    fn assign(&mut self, raw: &[String]) -> Result<(), CoerceError>;

    fn kind(&self) -> Kind;

    fn type_name(&self) -> &'static str;
}

impl<T: Coerce> Slot for T {
    fn assign(&mut self, raw: &[String]) -> Result<(), CoerceError> {
        *self = T::coerce(raw)?;
        Ok(())
    }

    fn kind(&self) -> Kind {
        T::KIND
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// The first raw value, which is all a scalar destination reads.
pub(crate) fn first(raw: &[String]) -> Result<&str, CoerceError> {
    raw.first().map(String::as_str).ok_or(CoerceError::MissingValue)
}

impl Coerce for String {
    const KIND: Kind = Kind::Text;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        first(raw).map(str::to_string)
    }
}

macro_rules! coerce_integer {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const KIND: Kind = $kind;

                fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
                    let input = first(raw)?;
                    if matches!(Self::KIND, Kind::Uint(_)) && input.starts_with('+') {
                        return Err(CoerceError::UnsignedSign {
                            input: input.to_string(),
                        });
                    }
                    input.parse::<$ty>().map_err(|source| CoerceError::Int {
                        input: input.to_string(),
                        source,
                    })
                }
            }
        )*
    };
}

coerce_integer! {
    i8 => Kind::Int(Width::W8),
    i16 => Kind::Int(Width::W16),
    i32 => Kind::Int(Width::W32),
    i64 => Kind::Int(Width::W64),
    isize => Kind::Int(Width::Platform),
    u8 => Kind::Uint(Width::W8),
    u16 => Kind::Uint(Width::W16),
    u32 => Kind::Uint(Width::W32),
    u64 => Kind::Uint(Width::W64),
    usize => Kind::Uint(Width::Platform),
}

macro_rules! coerce_float {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const KIND: Kind = $kind;

                fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
                    let input = first(raw)?;
                    let value = input.parse::<$ty>().map_err(|source| CoerceError::Float {
                        input: input.to_string(),
                        source,
                    })?;
                    if value.is_infinite() && !is_infinity_literal(input) {
                        return Err(CoerceError::FloatRange {
                            input: input.to_string(),
                        });
                    }
                    Ok(value)
                }
            }
        )*
    };
}

/// Whether `input` spells infinity outright rather than overflowing to it.
fn is_infinity_literal(input: &str) -> bool {
    let unsigned = input.strip_prefix(['+', '-']).unwrap_or(input);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

coerce_float! {
    f32 => Kind::Float(Width::W32),
    f64 => Kind::Float(Width::W64),
}

impl Coerce for bool {
    const KIND: Kind = Kind::Bool;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        let input = first(raw)?;
        match input {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(CoerceError::Bool {
                input: input.to_string(),
            }),
        }
    }
}

impl<T: Coerce> Coerce for Option<T> {
    const KIND: Kind = Kind::Optional;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        T::coerce(raw).map(Some)
    }
}

impl<T: Coerce> Coerce for Box<T> {
    const KIND: Kind = Kind::Optional;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        T::coerce(raw).map(Box::new)
    }
}

impl<T: Coerce> Coerce for Vec<T> {
    const KIND: Kind = Kind::Sequence;

    /// One element per raw value, except that a byte sequence fed a single
    /// raw value takes one element per character of that value: the first
    /// byte of the character's UTF-8 encoding.
    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        if matches!(T::KIND, Kind::Uint(Width::W8)) && raw.len() == 1 {
            let bytes: Vec<String> = raw[0]
                .chars()
                .map(|c| {
                    let mut buf = [0u8; 4];
                    c.encode_utf8(&mut buf).as_bytes()[0].to_string()
                })
                .collect();
            return coerce_each(&bytes);
        }
        coerce_each(raw)
    }
}

fn coerce_each<T: Coerce>(raw: &[String]) -> Result<Vec<T>, CoerceError> {
    let mut out = Vec::with_capacity(raw.len());
    for value in raw {
        out.push(T::coerce(std::slice::from_ref(value))?);
    }
    Ok(out)
}

macro_rules! coerce_unsupported {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T> Coerce for $ty<T> {
                const KIND: Kind = Kind::Unsupported;

                fn coerce(_raw: &[String]) -> Result<Self, CoerceError> {
                    Err(CoerceError::Unsupported(type_name::<Self>()))
                }
            }
        )*
    };
}

coerce_unsupported!(Sender, SyncSender, Receiver);

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(String::coerce(&raw(&["  spaced  "])).unwrap(), "  spaced  ");
    }

    #[test]
    fn test_scalars_read_first_value() {
        assert_eq!(i32::coerce(&raw(&["7", "8"])).unwrap(), 7);
        assert_eq!(String::coerce(&raw(&["a", "b"])).unwrap(), "a");
    }

    #[test]
    fn test_integer_round_trip_at_bounds() {
        assert_eq!(i8::coerce(&raw(&["-128"])).unwrap(), i8::MIN);
        assert_eq!(i64::coerce(&raw(&["9223372036854775807"])).unwrap(), i64::MAX);
        assert_eq!(u16::coerce(&raw(&["65535"])).unwrap(), u16::MAX);
        assert_eq!(usize::coerce(&raw(&["42"])).unwrap(), 42);
    }

    #[test]
    fn test_integer_overflow() {
        let err = i8::coerce(&raw(&["128"])).unwrap_err();
        assert!(matches!(err, CoerceError::Int { ref input, .. } if input == "128"));
        assert!(u8::coerce(&raw(&["256"])).is_err());
        assert!(u32::coerce(&raw(&["-1"])).is_err());
    }

    #[test]
    fn test_integer_rejects_text() {
        let err = isize::coerce(&raw(&["invalid"])).unwrap_err();
        assert_eq!(err.input(), Some("invalid"));
    }

    #[test]
    fn test_bool_literals() {
        for literal in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(bool::coerce(&raw(&[literal])).unwrap(), "{literal}");
        }
        for literal in ["0", "f", "F", "false", "FALSE", "False"] {
            assert!(!bool::coerce(&raw(&[literal])).unwrap(), "{literal}");
        }
        assert!(matches!(
            bool::coerce(&raw(&["yes"])),
            Err(CoerceError::Bool { .. })
        ));
    }

    #[test]
    fn test_floats() {
        assert_eq!(f32::coerce(&raw(&["1.5"])).unwrap(), 1.5);
        assert_eq!(f64::coerce(&raw(&["-2.25e2"])).unwrap(), -225.0);
        assert!(matches!(
            f64::coerce(&raw(&["invalid"])),
            Err(CoerceError::Float { .. })
        ));
    }

    #[test]
    fn test_float_overflow_is_out_of_range() {
        let err = f32::coerce(&raw(&["1e40"])).unwrap_err();
        assert!(matches!(err, CoerceError::FloatRange { ref input } if input == "1e40"));
        let err = f64::coerce(&raw(&["1e400"])).unwrap_err();
        assert_eq!(err.input(), Some("1e400"));
        assert!(matches!(err, CoerceError::FloatRange { .. }));
    }

    #[test]
    fn test_float_infinity_literals() {
        assert_eq!(f64::coerce(&raw(&["inf"])).unwrap(), f64::INFINITY);
        assert_eq!(f32::coerce(&raw(&["-Infinity"])).unwrap(), f32::NEG_INFINITY);
        assert!(f64::coerce(&raw(&["NaN"])).unwrap().is_nan());
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        let err = u32::coerce(&raw(&["+5"])).unwrap_err();
        assert!(matches!(err, CoerceError::UnsignedSign { ref input } if input == "+5"));
        assert_eq!(i32::coerce(&raw(&["+5"])).unwrap(), 5);
    }

    #[test]
    fn test_optional_wraps_value() {
        assert_eq!(
            Option::<String>::coerce(&raw(&["x"])).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(*Box::<u8>::coerce(&raw(&["9"])).unwrap(), 9);
    }

    #[test]
    fn test_byte_sequence_splits_single_value() {
        assert_eq!(Vec::<u8>::coerce(&raw(&["AB"])).unwrap(), vec![65, 66]);
        assert_eq!(Vec::<u8>::coerce(&raw(&[""])).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_byte_sequence_takes_one_element_per_character() {
        assert_eq!(Vec::<u8>::coerce(&raw(&["é"])).unwrap(), vec![195]);
        assert_eq!(Vec::<u8>::coerce(&raw(&["aé"])).unwrap(), vec![97, 195]);
    }

    #[test]
    fn test_byte_sequence_with_several_values() {
        assert_eq!(Vec::<u8>::coerce(&raw(&["1", "2"])).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_sequence_keeps_order() {
        assert_eq!(
            Vec::<String>::coerce(&raw(&["hello", "world"])).unwrap(),
            vec!["hello", "world"]
        );
    }

    #[test]
    fn test_sequence_reports_bad_element() {
        let err = Vec::<i32>::coerce(&raw(&["1", "invalid", "3"])).unwrap_err();
        assert_eq!(err.input(), Some("invalid"));
    }

    #[test]
    fn test_missing_value() {
        assert!(matches!(i32::coerce(&[]), Err(CoerceError::MissingValue)));
    }

    #[test]
    fn test_channel_is_unsupported() {
        let err = Sender::<String>::coerce(&raw(&["x"])).unwrap_err();
        assert!(matches!(err, CoerceError::Unsupported(name) if name.contains("Sender")));
    }

    #[test]
    fn test_slot_leaves_value_on_failure() {
        let mut value = 5u16;
        let slot: &mut dyn Slot = &mut value;
        assert!(slot.assign(&raw(&["70000"])).is_err());
        assert_eq!(slot.kind(), Kind::Uint(Width::W16));
        assert_eq!(value, 5);
    }
}
