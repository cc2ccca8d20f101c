//! Argument validation shared by every operation handler
//!
//! The dispatcher is replaceable, so each handler re-checks what it receives.

use crate::error::{LedgerError, LedgerResult};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use snapbank_core::{AccountRef, Amount};
use std::str::FromStr;

/// Fail unless exactly `expected` parameters were supplied
pub fn expect_arity(operation: &str, params: &[String], expected: usize) -> LedgerResult<()> {
    if params.len() != expected {
        return Err(LedgerError::invalid(format!(
            "wrong number of parameters for {}: expected {}, but got {}",
            operation,
            expected,
            params.len()
        )));
    }
    Ok(())
}

/// Record keys must be non-empty and free of surrounding whitespace
pub fn validate_record_id(entity: &str, id: &str) -> LedgerResult<()> {
    if id.trim().is_empty() {
        return Err(LedgerError::invalid(format!("{} id cannot be empty", entity)));
    }
    if id.trim() != id {
        return Err(LedgerError::invalid(format!(
            "{} id {:?} has surrounding whitespace",
            entity, id
        )));
    }
    if id.chars().any(char::is_control) {
        return Err(LedgerError::invalid(format!(
            "{} id {:?} contains control characters",
            entity, id
        )));
    }
    Ok(())
}

/// Parse a transfer amount (non-negative decimal)
pub fn parse_amount(raw: &str) -> LedgerResult<Amount> {
    raw.parse::<Amount>()
        .map_err(|e| LedgerError::invalid(format!("amount {:?}: {}", raw, e)))
}

/// Parse a signed decimal (e.g. an initial balance)
pub fn parse_decimal(field: &str, raw: &str) -> LedgerResult<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::invalid(format!("{} {:?} is not a valid decimal", field, raw)))
}

/// Parse a transfer endpoint; `"0"` is the issuance account
pub fn parse_account_ref(field: &str, raw: &str) -> LedgerResult<AccountRef> {
    raw.parse::<AccountRef>()
        .map_err(|e| LedgerError::invalid(format!("{} {:?}: {}", field, raw, e)))
}

/// Decode a JSON document supplied by the caller
pub fn decode_json<T: DeserializeOwned>(entity: &str, raw: &str) -> LedgerResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| LedgerError::invalid(format!("failed to deserialize {} {}: {}", entity, raw, e)))
}

/// Deserialize an identifier that callers send either as a JSON string or a
/// JSON integer (`"person_id": 7` and `"person_id": "7"` are the same owner).
pub fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Unsigned(n) => n.to_string(),
        RawId::Signed(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rust_decimal_macros::dec;

    #[derive(Debug, Deserialize)]
    struct Owner {
        #[serde(deserialize_with = "id_from_string_or_number")]
        person_id: String,
    }

    #[test]
    fn test_expect_arity() {
        let params = vec!["a".to_string(), "b".to_string()];
        assert!(expect_arity("transfer", &params, 2).is_ok());
        let err = expect_arity("transfer", &params, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("expected 3, but got 2"));
    }

    #[test]
    fn test_validate_record_id() {
        assert!(validate_record_id("Account", "A1").is_ok());
        assert!(validate_record_id("Account", "").is_err());
        assert!(validate_record_id("Account", " A1").is_err());
        assert!(validate_record_id("Account", "A\n1").is_err());
    }

    #[test]
    fn test_parse_decimal_allows_negative() {
        assert_eq!(parse_decimal("balance", "-12.5").unwrap(), dec!(-12.5));
        assert!(parse_decimal("balance", "abc").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        let err = parse_amount("-3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_parse_account_ref() {
        assert!(parse_account_ref("from", "0").unwrap().is_issuance());
        assert!(parse_account_ref("from", "").is_err());
    }

    #[test]
    fn test_id_from_number_or_string() {
        let a: Owner = serde_json::from_str(r#"{"person_id": 7}"#).unwrap();
        let b: Owner = serde_json::from_str(r#"{"person_id": "7"}"#).unwrap();
        assert_eq!(a.person_id, "7");
        assert_eq!(a.person_id, b.person_id);
    }

    #[test]
    fn test_decode_json_reports_invalid_argument() {
        let err = decode_json::<Owner>("person", "{").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
