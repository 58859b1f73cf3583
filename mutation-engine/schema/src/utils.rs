use heck::{ToSnakeCase, ToUpperCamelCase};

/// Uppercases the first character, lowercasing the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Converts a snake case name into the lower camel case GraphQL field name. Empty
/// components (from double underscores) are kept as a single `_`, so
/// `name__contains` becomes `name_Contains`.
pub fn to_camel_case(snake: &str) -> String {
    let mut components = snake.split('_');
    let mut result = components.next().unwrap_or_default().to_owned();

    for component in components {
        if component.is_empty() {
            result.push('_');
        } else {
            result.push_str(&capitalize(component));
        }
    }

    result
}

pub fn to_pascal_case(s: &str) -> String {
    s.to_upper_camel_case()
}

pub fn to_snake_case(s: &str) -> String {
    s.to_snake_case()
}

/// Converts a choice value into an enum value name: non alphanumerics become `_`,
/// letters are uppercased, names that would start with a digit get an `A_` prefix.
pub fn to_const(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_separator = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c.to_ascii_uppercase());
            in_separator = false;
        } else if !in_separator {
            result.push('_');
            in_separator = true;
        }
    }

    if is_valid_name(&result) {
        result
    } else {
        format!("A_{result}")
    }
}

/// GraphQL names match `[_A-Za-z][_0-9A-Za-z]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => chars.all(|c| c == '_' || c.is_ascii_alphanumeric()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn camel_casing_keeps_lookup_separators() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("name__contains"), "name_Contains");
        assert_eq!(to_camel_case("owner__name__icontains"), "owner_Name_Icontains");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case("_private"), "Private");
    }

    #[test]
    fn enum_value_names() {
        assert_eq!(to_const("black"), "BLACK");
        assert_eq!(to_const("light blue"), "LIGHT_BLUE");
        assert_eq!(to_const("a - b"), "A_B");
        assert_eq!(to_const("1st"), "A_1ST");
    }

    #[test]
    fn model_names_in_snake_case() {
        assert_eq!(to_snake_case("User"), "user");
        assert_eq!(to_snake_case("CatOwner"), "cat_owner");
        assert_eq!(to_pascal_case("best_friend"), "BestFriend");
    }
}
