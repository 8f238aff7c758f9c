use crate::error::DomainError;
use crate::impl_validated_str;

// ================================================================================================
// Regulatory Identifiers (Validated NewTypes)
// ================================================================================================

/// Legal Entity Identifier — exactly 20 alphanumeric characters.
///
/// The only construction path is [`Lei::parse`]; an in-memory `Lei` is
/// therefore always well-formed, including after a wire round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lei(String);
impl_validated_str!(Lei);

impl Lei {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != 20 {
            return Err(DomainError::LeiLength(raw.len()));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::LeiCharset(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }
}

/// Unique Transaction Identifier — 1 to 52 characters, the first 20 of
/// which must be alphanumeric (the LEI prefix convention).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uti(String);
impl_validated_str!(Uti);

impl Uti {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::UtiEmpty);
        }
        if raw.len() > 52 {
            return Err(DomainError::UtiLength(raw.len()));
        }
        let prefix: String = raw.chars().take(20).collect();
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::UtiPrefix(prefix));
        }
        Ok(Self(raw.to_string()))
    }
}

/// International Securities Identification Number — 12 characters with a
/// Luhn check digit.
///
/// Layout: 2 uppercase country letters, 9 uppercase alphanumeric body
/// characters, 1 numeric check digit. The check runs standard Luhn over
/// the letter-expanded digit string (A=10 ... Z=35).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isin(String);
impl_validated_str!(Isin);

impl Isin {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != 12 {
            return Err(DomainError::IsinLength(raw.len()));
        }
        if !raw.is_ascii() {
            return Err(DomainError::IsinBody(raw.to_string()));
        }
        let country = &raw[..2];
        if !country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::IsinCountry(country.to_string()));
        }
        let body = &raw[2..11];
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        {
            return Err(DomainError::IsinBody(body.to_string()));
        }
        let check = raw.as_bytes()[11] as char;
        if !check.is_ascii_digit() {
            return Err(DomainError::IsinCheckChar(check));
        }
        if !luhn_over_expansion(raw) {
            return Err(DomainError::IsinLuhn(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }
}

/// Standard Luhn modulus-10 check after expanding letters to two digits.
fn luhn_over_expansion(isin: &str) -> bool {
    let mut digits: Vec<u32> = Vec::with_capacity(isin.len() * 2);
    for c in isin.chars() {
        if let Some(d) = c.to_digit(10) {
            digits.push(d);
        } else {
            let expanded = c as u32 - 'A' as u32 + 10;
            digits.push(expanded / 10);
            digits.push(expanded % 10);
        }
    }

    let mut total = 0;
    for (i, &d) in digits.iter().rev().enumerate() {
        let mut d = d;
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        total += d;
    }
    total % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lei_valid_20_alphanumeric() {
        let lei = Lei::parse("529900T8BM49AURSDO55").unwrap();
        assert_eq!(lei.as_str(), "529900T8BM49AURSDO55");
    }

    #[test]
    fn lei_wrong_length() {
        assert!(Lei::parse("529900T8BM49AURSDO5").is_err());
        assert!(Lei::parse("529900T8BM49AURSDO555").is_err());
    }

    #[test]
    fn lei_rejects_punctuation_and_spaces() {
        assert!(Lei::parse("529900T8BM49-URSDO55").is_err());
        assert!(Lei::parse("529900T8BM49 URSDO55").is_err());
    }

    #[test]
    fn uti_accepts_lei_prefix_plus_suffix() {
        let raw = format!("529900T8BM49AURSDO55{}", "A".repeat(32));
        assert_eq!(raw.len(), 52);
        assert!(Uti::parse(&raw).is_ok());
        assert!(Uti::parse("529900T8BM49AURSDO55X").is_ok());
    }

    #[test]
    fn uti_rejects_empty_oversized_and_bad_prefix() {
        assert!(Uti::parse("").is_err());
        let raw = format!("529900T8BM49AURSDO55{}", "A".repeat(33));
        assert!(Uti::parse(&raw).is_err());
        assert!(Uti::parse("52990-T8BM49AURSDO55X").is_err());
    }

    #[test]
    fn isin_valid_apple_and_microsoft() {
        assert!(Isin::parse("US0378331005").is_ok());
        assert!(Isin::parse("US5949181045").is_ok());
    }

    #[test]
    fn isin_rejects_wrong_check_digit() {
        assert!(Isin::parse("US0378331006").is_err());
    }

    #[test]
    fn isin_rejects_lowercase_country() {
        assert!(Isin::parse("us0378331005").is_err());
    }

    #[test]
    fn isin_rejects_numeric_country() {
        assert!(Isin::parse("120378331005").is_err());
    }

    #[test]
    fn isin_rejects_wrong_length() {
        assert!(Isin::parse("US037833100").is_err());
        assert!(Isin::parse("US03783310050").is_err());
    }

    #[test]
    fn diagnostics_name_the_identifier() {
        let err = Isin::parse("us0378331005").unwrap_err();
        assert!(err.to_string().contains("ISIN"));
        let err = Lei::parse("short").unwrap_err();
        assert!(err.to_string().contains("LEI"));
        let err = Uti::parse("").unwrap_err();
        assert!(err.to_string().contains("UTI"));
    }
}
