// ABOUTME: Identifier quoting for generated DDL
// ABOUTME: Leaves plain lowercase names bare and double-quotes everything else

use std::borrow::Cow;

// Reserved words that cannot appear bare as a table or column name
const RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
    "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
    "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
    "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
    "null", "offset", "on", "only", "or", "order", "placing", "primary", "references",
    "returning", "select", "session_user", "some", "symmetric", "table", "then", "to",
    "trailing", "true", "union", "unique", "user", "using", "variadic", "when", "where",
    "window", "with",
];

/// Quote `name` when PostgreSQL would otherwise fold or reject it
///
/// Names made only of lowercase letters, digits, `_` and `$` (not starting with a digit
/// or `$`) and not reserved are returned unchanged, so `users` stays `users` while
/// `Qty` becomes `"Qty"`.
pub fn quote_ident(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        }
        None => false,
    };

    if plain && !RESERVED.contains(&name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_stay_bare() {
        assert_eq!(quote_ident("users"), "users");
        assert_eq!(quote_ident("legacy_flag"), "legacy_flag");
        assert_eq!(quote_ident("_tmp2"), "_tmp2");
        assert_eq!(quote_ident("price$usd"), "price$usd");
    }

    #[test]
    fn test_mixed_case_is_quoted() {
        assert_eq!(quote_ident("Qty"), "\"Qty\"");
        assert_ne!(quote_ident("Qty"), quote_ident("qty"));
    }

    #[test]
    fn test_reserved_and_unusual_names_are_quoted() {
        assert_eq!(quote_ident("order"), "\"order\"");
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("2fa_code"), "\"2fa_code\"");
        assert_eq!(quote_ident("first name"), "\"first name\"");
        assert_eq!(quote_ident(""), "\"\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        assert_eq!(quote_ident("say\"hi"), "\"say\"\"hi\"");
    }
}
