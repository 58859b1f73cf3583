//! Opaque object identifiers: `base64("TypeName:raw_id")`, standard alphabet with padding.

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub fn to_global_id(type_name: &str, id: &str) -> String {
    STANDARD.encode(format!("{type_name}:{id}"))
}

/// Splits a global id into type name and raw id. `None` if the input is not a global id.
pub fn from_global_id(global_id: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(global_id).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (type_name, id) = decoded.split_once(':')?;

    Some((type_name.to_owned(), id.to_owned()))
}

/// The raw id behind `id` if it is a global id with a non-empty id part, `id` otherwise.
pub fn disambiguate_id(id: &str) -> String {
    match from_global_id(id) {
        Some((_, raw)) if !raw.is_empty() => raw,
        _ => id.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encoding() {
        assert_eq!(to_global_id("CatNode", "1"), "Q2F0Tm9kZTox");
        assert_eq!(
            from_global_id("Q2F0Tm9kZTox"),
            Some(("CatNode".to_owned(), "1".to_owned()))
        );
    }

    #[test]
    fn raw_ids_pass_through() {
        assert_eq!(disambiguate_id("Q2F0Tm9kZTox"), "1");
        assert_eq!(disambiguate_id("1"), "1");
        assert_eq!(disambiguate_id("42"), "42");
        assert_eq!(disambiguate_id("not base64!"), "not base64!");
    }

    #[test]
    fn global_ids_without_id_part_are_kept() {
        let empty = to_global_id("CatNode", "");

        assert_eq!(disambiguate_id(&empty), empty);
    }

    #[test]
    fn ids_containing_colons_keep_them() {
        let id = to_global_id("Event", "2021-01-01T10:00");

        assert_eq!(disambiguate_id(&id), "2021-01-01T10:00");
    }
}
