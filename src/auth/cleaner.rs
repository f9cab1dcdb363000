/// Hook applied to the raw username attribute before account resolution.
///
/// The default is a passthrough. Deployments override this to normalize what
/// their IdP emits: case-folding, trimming a `DOMAIN\` prefix, stripping an
/// email domain, and so on.
pub trait UsernameCleaner: Send + Sync {
    fn clean(&self, raw: &str) -> String;
}

/// Identity transform; uses the attribute value as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCleaner;

impl UsernameCleaner for PassthroughCleaner {
    fn clean(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Trims surrounding whitespace and lowercases the username.
///
/// The common override for IdPs that report usernames with inconsistent
/// casing (Active Directory, most notably).
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseCleaner;

impl UsernameCleaner for LowercaseCleaner {
    fn clean(&self, raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn passthrough_keeps_value() {
        assert_eq!(PassthroughCleaner.clean("Alice@Example.COM"), "Alice@Example.COM");
    }

    #[rstest]
    #[case("Alice", "alice")]
    #[case("  bob  ", "bob")]
    #[case("CAROL@EXAMPLE.COM", "carol@example.com")]
    fn lowercase_normalizes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(LowercaseCleaner.clean(raw), expected);
    }
}
