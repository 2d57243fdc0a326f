//! Small shared utilities.

mod timestamps;

pub use timestamps::{iso_timestamp, now_utc, Timestamp};

/// Trims a fully-qualified Rust type path down to its final segment.
///
/// Generic arguments are kept intact, so `a::b::Wrapper<c::d::Inner>`
/// becomes `Wrapper<Inner>`.
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (idx, ch) in full.char_indices() {
        match ch {
            ':' => segment_start = idx + 1,
            '<' | '>' | ',' | ' ' => {
                out.push_str(&full[segment_start..=idx]);
                segment_start = idx + 1;
            }
            _ => {}
        }
    }
    out.push_str(&full[segment_start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name_plain() {
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(short_type_name("u32"), "u32");
    }

    #[test]
    fn test_short_type_name_generic() {
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
    }

    #[test]
    fn test_short_type_name_nested_generics() {
        assert_eq!(
            short_type_name("std::collections::HashMap<u32, alloc::vec::Vec<core::option::Option<u8>>>"),
            "HashMap<u32, Vec<Option<u8>>>"
        );
    }
}
