//! Field presence predicate for requirement checking
//!
//! A value counts as provided when it was actively set, even to a falsy
//! primitive. `null` and missing never count. The strict flag additionally
//! excludes the empty string, for object types whose edit forms default
//! text fields to `""` (an unedited `""` must not satisfy a requirement).

use crate::record::FieldValue;

/// Decide whether a field value counts as "provided"
///
/// `strict_empty_strings` mirrors the per-definition
/// `treat_empty_string_as_absent` flag.
pub fn is_present(value: Option<&FieldValue>, strict_empty_strings: bool) -> bool {
    match value {
        None => false,
        Some(FieldValue::Null) => false,
        Some(FieldValue::Text(s)) if strict_empty_strings && s.is_empty() => false,
        Some(_) => true,
    }
}
