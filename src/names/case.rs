//! Identifier case conversion

/// Split an identifier into lowercase words at `_`, `-`, spaces, and
/// lower-to-upper or acronym boundaries (`HTTPServer` gives `http`, `server`).
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert to lower_snake_case
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Convert to UpperCamelCase
pub fn to_upper_camel_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("GetWidget"), "get_widget");
        assert_eq!(to_snake_case("get_widget"), "get_widget");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("Spin2Fast"), "spin2_fast");
    }

    #[test]
    fn test_upper_camel_case() {
        assert_eq!(to_upper_camel_case("response"), "Response");
        assert_eq!(to_upper_camel_case("err_code"), "ErrCode");
        assert_eq!(to_upper_camel_case("GetWidget"), "GetWidget");
    }
}
