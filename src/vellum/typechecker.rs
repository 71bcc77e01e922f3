//! # Typechecker Module
//!
//! Maps source-language builtin type identifiers onto their C spellings.
//!
//! The mapping is pure, total, and stateless: given any [`BuiltinType`] it returns the C type name a
//! conforming C compiler understands. Nothing here inspects a program or tracks scope; the real
//! typechecking (that a variable's declared type matches its use) is left to the parser/renderer
//! boundary, per the crate's expression-opacity design.

/// Source-language primitive type identifiers.
///
/// Closed enumeration: every variant has exactly one C spelling, assigned by [`builtin_to_c`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// Void type — no value.
    Void,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 64-bit floating point.
    F64,
    /// Boolean.
    Bool,
    /// 8-bit character.
    Char,
}

impl BuiltinType {
    /// Looks up the source-language spelling of a builtin type, if `name` names one.
    ///
    /// Used by the parser, which sees only identifier lexemes and needs to recognize which of them
    /// are builtin type keywords.
    pub fn from_source_name(name: &str) -> Option<BuiltinType> {
        Some(match name {
            "void" => BuiltinType::Void,
            "u8" => BuiltinType::U8,
            "u16" => BuiltinType::U16,
            "u32" => BuiltinType::U32,
            "u64" => BuiltinType::U64,
            "i8" => BuiltinType::I8,
            "i16" => BuiltinType::I16,
            "i32" => BuiltinType::I32,
            "i64" => BuiltinType::I64,
            "f64" => BuiltinType::F64,
            "bool" => BuiltinType::Bool,
            "char" => BuiltinType::Char,
            _ => return None,
        })
    }
}

/// Maps a [`BuiltinType`] to its C type spelling.
///
/// Total over the enumeration: every variant has a non-empty C spelling. Pure table lookup, no
/// side effects, no error conditions — an unrepresentable `BuiltinType` value cannot exist since the
/// enum is closed.
///
/// # Examples
///
/// ```
/// use emberc::{builtin_to_c, BuiltinType};
///
/// assert_eq!(builtin_to_c(BuiltinType::I32), "int32_t");
/// assert_eq!(builtin_to_c(BuiltinType::Void), "void");
/// ```
pub fn builtin_to_c(b: BuiltinType) -> &'static str {
    match b {
        BuiltinType::Void => "void",
        BuiltinType::U8 => "uint8_t",
        BuiltinType::U16 => "uint16_t",
        BuiltinType::U32 => "uint32_t",
        BuiltinType::U64 => "uint64_t",
        BuiltinType::I8 => "int8_t",
        BuiltinType::I16 => "int16_t",
        BuiltinType::I32 => "int32_t",
        BuiltinType::I64 => "int64_t",
        BuiltinType::F64 => "double",
        BuiltinType::Bool => "bool",
        BuiltinType::Char => "char",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[BuiltinType] = &[
        BuiltinType::Void,
        BuiltinType::U8,
        BuiltinType::U16,
        BuiltinType::U32,
        BuiltinType::U64,
        BuiltinType::I8,
        BuiltinType::I16,
        BuiltinType::I32,
        BuiltinType::I64,
        BuiltinType::F64,
        BuiltinType::Bool,
        BuiltinType::Char,
    ];

    #[test]
    fn mapping_is_total_and_nonempty() {
        for &b in ALL {
            assert!(!builtin_to_c(b).is_empty());
        }
    }

    #[test]
    fn i32_maps_to_int32_t() {
        assert_eq!(builtin_to_c(BuiltinType::I32), "int32_t");
    }

    #[test]
    fn from_source_name_round_trips_keywords() {
        assert_eq!(BuiltinType::from_source_name("i32"), Some(BuiltinType::I32));
        assert_eq!(BuiltinType::from_source_name("nonsense"), None);
    }
}
