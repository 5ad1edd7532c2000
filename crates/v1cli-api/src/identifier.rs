//! Identifier normalization.
//!
//! Users hand commands three spellings: display numbers (`S-1234`), bare
//! digits (`1234`) and OID tokens (`Story:1234`). Number lookups go through
//! `where Number=...`; OID tokens through an `ID='...'` filter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Epic,
    Story,
    Task,
}

impl AssetKind {
    pub fn asset_type(&self) -> &'static str {
        match self {
            AssetKind::Epic => "Epic",
            AssetKind::Story => "Story",
            AssetKind::Task => "Task",
        }
    }

    pub fn number_prefix(&self) -> &'static str {
        match self {
            AssetKind::Epic => "E-",
            AssetKind::Story => "S-",
            AssetKind::Task => "TK-",
        }
    }
}

/// `Type:digits` with an alphabetic type part.
pub fn is_oid_token(identifier: &str) -> bool {
    match identifier.split_once(':') {
        Some((kind, digits)) => {
            !kind.is_empty()
                && kind.chars().all(|c| c.is_ascii_alphabetic())
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// True when `identifier` is an OID token of the given kind (`Epic:123`).
pub fn is_oid_token_of(identifier: &str, kind: AssetKind) -> bool {
    match identifier.split_once(':') {
        Some((prefix, _)) => {
            is_oid_token(identifier) && prefix.eq_ignore_ascii_case(kind.asset_type())
        }
        None => false,
    }
}

/// Adds the display prefix (`S-` / `E-` / `TK-`) when missing.
pub fn normalize_number(identifier: &str, kind: AssetKind) -> String {
    let prefix = kind.number_prefix();
    if identifier
        .to_uppercase()
        .starts_with(&prefix.to_uppercase())
    {
        identifier.to_uppercase()
    } else {
        format!("{prefix}{identifier}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_number_adds_prefix() {
        assert_eq!(normalize_number("1234", AssetKind::Story), "S-1234");
        assert_eq!(normalize_number("100", AssetKind::Epic), "E-100");
        assert_eq!(normalize_number("90", AssetKind::Task), "TK-90");
    }

    #[test]
    fn test_normalize_number_keeps_existing_prefix() {
        assert_eq!(normalize_number("S-1234", AssetKind::Story), "S-1234");
        assert_eq!(normalize_number("s-1234", AssetKind::Story), "S-1234");
        assert_eq!(normalize_number("tk-90", AssetKind::Task), "TK-90");
    }

    #[test]
    fn test_is_oid_token_of() {
        assert!(is_oid_token_of("Epic:123", AssetKind::Epic));
        assert!(is_oid_token_of("epic:123", AssetKind::Epic));
        assert!(!is_oid_token_of("Story:123", AssetKind::Epic));
        assert!(!is_oid_token_of("E-123", AssetKind::Epic));
    }
}
