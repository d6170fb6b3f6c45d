use crate::ParseError;

/// Offset between a `[U:1:N]` account number and the canonical 64-bit id.
pub const ACCOUNT_OFFSET: u64 = 76_561_197_960_265_728;

/// Convert a compact `[U:<universe>:<account>]` identifier to its canonical
/// numeric form.
pub fn to_canonical(compact: &str) -> Result<String, ParseError> {
    let invalid = || ParseError::Format(compact.to_string());

    let inner = compact
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(invalid)?;

    let mut parts = inner.split(':');
    let (universe, account) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("U"), Some(universe), Some(account), None) => (universe, account),
        _ => return Err(invalid()),
    };

    if !is_digits(universe) || !is_digits(account) {
        return Err(invalid());
    }

    let account: u64 = account.parse().map_err(|_| invalid())?;
    let canonical = account.checked_add(ACCOUNT_OFFSET).ok_or_else(invalid)?;

    Ok(canonical.to_string())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_account_converts() {
        assert_eq!(to_canonical("[U:1:22202]").unwrap(), "76561197960287930");
        assert_eq!(to_canonical("[U:1:0]").unwrap(), ACCOUNT_OFFSET.to_string());
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let first = to_canonical("[U:1:123456789]").unwrap();
        let second = to_canonical("[U:1:123456789]").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, (ACCOUNT_OFFSET + 123_456_789).to_string());
    }

    #[test]
    fn test_large_account_does_not_truncate() {
        let canonical = to_canonical("[U:1:4294967295]").unwrap();
        assert_eq!(canonical, "76561202255233023");
    }

    #[test]
    fn test_rejects_malformed_identifiers() {
        for bad in [
            "BOT",
            "Console",
            "STEAM_0:1:11101",
            "[U:1:]",
            "[U:1:12a]",
            "[U:1:5:7]",
            "[G:1:5]",
            "U:1:5",
            "[U:1:18446744073709551615]",
        ] {
            let err = to_canonical(bad).unwrap_err();
            assert!(err.is_format(), "expected format error for {}", bad);
        }
    }
}
