//! Identifier casing helpers.
//!
//! Schema names arrive in whatever casing the program author used
//! (camelCase in Anchor JSON, occasionally snake_case or PascalCase).
//! Generated identifiers use the conversions below; the original casing
//! is kept wherever bytes or user-facing messages are derived from it.

/// Split an identifier into lowercase words at `_`, `-`, spaces, and
/// lower-to-upper case boundaries.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        } else if c.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
            current.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.extend(c.to_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `myAccountName` / `my_account_name` -> `MyAccountName`
pub fn to_pascal_case(input: &str) -> String {
    split_words(input).iter().map(|w| capitalize(w)).collect()
}

/// `myAccountName` / `MyAccountName` -> `my_account_name`
pub fn to_snake_case(input: &str) -> String {
    split_words(input).join("_")
}

/// `my_account_name` / `MyAccountName` -> `myAccountName`
pub fn to_camel_case(input: &str) -> String {
    let words = split_words(input);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("createVault"), "CreateVault");
        assert_eq!(to_pascal_case("create_vault"), "CreateVault");
        assert_eq!(to_pascal_case("CreateVault"), "CreateVault");
        assert_eq!(to_pascal_case("vault2State"), "Vault2State");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("createVault"), "create_vault");
        assert_eq!(to_snake_case("CreateVault"), "create_vault");
        assert_eq!(to_snake_case("create_vault"), "create_vault");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("create_vault"), "createVault");
        assert_eq!(to_camel_case("CreateVault"), "createVault");
        assert_eq!(to_camel_case("createVault"), "createVault");
    }
}
