use std::sync::Arc;

// -----------------------------------------------------------------------------
// KeyNaming

/// The pure function mapping a field's source name to its document key.
///
/// Applied once per field when a type's catalog entry is built. The built-in
/// transforms assume `snake_case` source names, which is what Rust field
/// names are.
#[derive(Clone, Default)]
pub enum KeyNaming {
    /// Keys are the source names.
    #[default]
    Identity,
    /// `user_name` becomes `userName`.
    CamelCase,
    /// `user_name` becomes `UserName`.
    PascalCase,
    /// `user_name` becomes `USER_NAME`.
    ScreamingSnakeCase,
    /// An arbitrary caller-supplied transform.
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl KeyNaming {
    /// Produces the document key for a source field name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_owned(),
            Self::CamelCase => camelize(name, false),
            Self::PascalCase => camelize(name, true),
            Self::ScreamingSnakeCase => name.to_uppercase(),
            Self::Custom(transform) => transform(name),
        }
    }
}

impl core::fmt::Debug for KeyNaming {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Identity => "Identity",
            Self::CamelCase => "CamelCase",
            Self::PascalCase => "PascalCase",
            Self::ScreamingSnakeCase => "ScreamingSnakeCase",
            Self::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

fn camelize(name: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = capitalize_first;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::KeyNaming;

    #[test]
    fn built_in_transforms() {
        assert_eq!(KeyNaming::Identity.apply("user_name"), "user_name");
        assert_eq!(KeyNaming::CamelCase.apply("user_name"), "userName");
        assert_eq!(KeyNaming::PascalCase.apply("user_name"), "UserName");
        assert_eq!(KeyNaming::ScreamingSnakeCase.apply("user_name"), "USER_NAME");
    }
}
