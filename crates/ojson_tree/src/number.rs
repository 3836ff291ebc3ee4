use core::fmt;

// -----------------------------------------------------------------------------
// JsonNumber

/// A JSON number.
///
/// Numbers read from a document may be held as their original text and are
/// only parsed when a caller requests a concrete numeric type, so nothing is
/// lost by routing a value through the tree that the final consumer wanted at
/// a wider precision than `f64`.
///
/// # Examples
///
/// ```
/// use ojson_tree::JsonNumber;
///
/// let n = JsonNumber::from_text("18446744073709551615".to_string());
/// assert_eq!(n.as_u64(), Some(u64::MAX));
/// assert_eq!(n.as_i64(), None);
/// ```
#[derive(Clone, Debug)]
pub struct JsonNumber {
    repr: Repr,
}

#[derive(Clone, Debug)]
enum Repr {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
    /// Unparsed source text, kept verbatim until a concrete type is requested.
    Text(Box<str>),
}

impl JsonNumber {
    /// Wraps number source text without parsing it.
    ///
    /// The text is trusted to be a valid JSON number lexeme; readers hand the
    /// lexeme over exactly as scanned.
    #[inline]
    pub fn from_text(text: String) -> Self {
        Self {
            repr: Repr::Text(text.into_boxed_str()),
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        match &self.repr {
            Repr::PosInt(v) => Some(*v),
            Repr::NegInt(v) => u64::try_from(*v).ok(),
            Repr::Float(v) => {
                (v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64).then_some(*v as u64)
            }
            Repr::Text(text) => text.parse().ok(),
        }
    }

    /// Returns the value as `i64` if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match &self.repr {
            Repr::PosInt(v) => i64::try_from(*v).ok(),
            Repr::NegInt(v) => Some(*v),
            Repr::Float(v) => {
                (v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64)
                    .then_some(*v as i64)
            }
            Repr::Text(text) => text.parse().ok(),
        }
    }

    /// Returns the value as `f64`.
    ///
    /// This always succeeds for values produced by a conforming reader; the
    /// conversion may round integers above 2^53.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.repr {
            Repr::PosInt(v) => Some(*v as f64),
            Repr::NegInt(v) => Some(*v as f64),
            Repr::Float(v) => Some(*v),
            Repr::Text(text) => text.parse().ok(),
        }
    }

    /// Whether the value is mathematically an integer.
    pub fn is_integer(&self) -> bool {
        match &self.repr {
            Repr::PosInt(_) | Repr::NegInt(_) => true,
            Repr::Float(v) => v.fract() == 0.0,
            Repr::Text(text) => !text.contains(['.', 'e', 'E']),
        }
    }

    pub(crate) fn write_serde<S: serde_core::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match &self.repr {
            Repr::PosInt(v) => serializer.serialize_u64(*v),
            Repr::NegInt(v) => serializer.serialize_i64(*v),
            Repr::Float(v) => serializer.serialize_f64(*v),
            Repr::Text(text) => {
                // Widest lossless form first; floating point is the last resort.
                if let Ok(v) = text.parse::<u64>() {
                    serializer.serialize_u64(v)
                } else if let Ok(v) = text.parse::<i64>() {
                    serializer.serialize_i64(v)
                } else if let Ok(v) = text.parse::<f64>() {
                    serializer.serialize_f64(v)
                } else {
                    Err(serde_core::ser::Error::custom("unparseable number text"))
                }
            }
        }
    }
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_u64(), other.as_u64()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
            return a == b;
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::PosInt(v) => write!(f, "{v}"),
            Repr::NegInt(v) => write!(f, "{v}"),
            Repr::Float(v) => write!(f, "{v}"),
            Repr::Text(text) => f.write_str(text),
        }
    }
}

macro_rules! impl_number_from_int {
    ($($unsigned:ty),* ; $($signed:ty),*) => {
        $(impl From<$unsigned> for JsonNumber {
            #[inline]
            fn from(value: $unsigned) -> Self {
                Self { repr: Repr::PosInt(value as u64) }
            }
        })*
        $(impl From<$signed> for JsonNumber {
            #[inline]
            fn from(value: $signed) -> Self {
                let value = value as i64;
                if value >= 0 {
                    Self { repr: Repr::PosInt(value as u64) }
                } else {
                    Self { repr: Repr::NegInt(value) }
                }
            }
        })*
    };
}

impl_number_from_int!(u8, u16, u32, u64, usize ; i8, i16, i32, i64, isize);

impl From<f32> for JsonNumber {
    #[inline]
    fn from(value: f32) -> Self {
        Self {
            repr: Repr::Float(value as f64),
        }
    }
}

impl From<f64> for JsonNumber {
    #[inline]
    fn from(value: f64) -> Self {
        Self {
            repr: Repr::Float(value),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::JsonNumber;

    #[test]
    fn text_is_parsed_lazily_and_losslessly() {
        let n = JsonNumber::from_text("9007199254740993".to_string());
        // Above 2^53: a float round-trip would have lost the low bit.
        assert_eq!(n.as_i64(), Some(9_007_199_254_740_993));
        assert_eq!(n.as_u64(), Some(9_007_199_254_740_993));
    }

    #[test]
    fn integral_float_converts() {
        let n = JsonNumber::from(3.0_f64);
        assert_eq!(n.as_i64(), Some(3));
        assert!(n.is_integer());
        assert!(!JsonNumber::from(3.5_f64).is_integer());
    }

    #[test]
    fn mixed_representations_compare_equal() {
        assert_eq!(JsonNumber::from(42_u64), JsonNumber::from_text("42".into()));
        assert_eq!(JsonNumber::from(-1_i32), JsonNumber::from_text("-1".into()));
        assert_ne!(JsonNumber::from(1_u8), JsonNumber::from(2_u8));
    }
}
