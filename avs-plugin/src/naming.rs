//! Plugin names: canonical keys and member aliases

/// Names owned by `Script` itself, compared against canonical keys.
pub const RESERVED_NAMES: [&str; 6] = [
    "code",
    "references",
    "load",
    "autoload",
    "allreferences",
    "fullcode",
];

/// Canonical registry key: the name lowercased.
pub fn canonicalize(name: &str) -> String {
    name.to_lowercase()
}

pub fn is_reserved(key: &str) -> bool {
    RESERVED_NAMES.contains(&key)
}

/// Alternate spellings a caller may use for `name`, besides the key.
///
/// - all lowercase: no aliases
/// - capitalized lowercase word (`Plugintwo`): the name itself
/// - anything else: camelCase form first, then the name, deduplicated
pub fn derive_aliases(name: &str) -> Vec<String> {
    let key = canonicalize(name);
    if name == key {
        return Vec::new();
    }
    if name == capitalize_first(&key) {
        return vec![name.to_string()];
    }

    let camel = lower_first(name);
    if camel == name {
        vec![camel]
    } else {
        vec![camel, name.to_string()]
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
