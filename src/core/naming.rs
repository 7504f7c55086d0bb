//! String transformation utilities for derived identifiers

/// Converts a hyphenated-lowercase record name to CamelCase for generated
/// class names.
///
/// Splits on hyphen/underscore/space boundaries, uppercases each segment's
/// leading character, and drops the separators. Deterministic and pure.
///
/// # Examples
/// ```
/// use apiforge::core::naming::camel_case;
///
/// assert_eq!(camel_case("user-fetch-single"), "UserFetchSingle");
/// assert_eq!(camel_case("user"), "User");
/// assert_eq!(camel_case(""), "");
/// ```
pub fn camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut upper_next = true;

    for ch in s.chars() {
        if ch == '-' || ch == '_' || ch == ' ' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

/// Lower-first variant of [`camel_case`], used for generated function names.
///
/// # Examples
/// ```
/// use apiforge::core::naming::lower_camel_case;
///
/// assert_eq!(lower_camel_case("user-fetch-single"), "userFetchSingle");
/// ```
pub fn lower_camel_case(s: &str) -> String {
    let pascal = camel_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
