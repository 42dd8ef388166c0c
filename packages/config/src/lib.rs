// ABOUTME: Configuration package for GiveLink
// ABOUTME: Environment variable names and value parsing shared by the server and tests

pub mod constants;

/// Parse a boolean flag value, accepting `true/false/1/0/yes/no` in any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Return the first set, non-empty value among `names`, trimmed.
pub fn first_set(lookup: impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
