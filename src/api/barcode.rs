use crate::errors::{AppError, AppResult};
use std::fmt;

/// A product code accepted by the product lookup: 8 to 14 digits, with a
/// valid GS1 check digit for the EAN-8, UPC-A, EAN-13 and GTIN-14 lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode(String);

/// GS1 check digit for the digits preceding it.
fn check_digit(body: &[u32]) -> u32 {
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10
}

impl Barcode {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let code: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        let invalid = |why: &str| AppError::InvalidBarcode(format!("'{}' {why}", raw.trim()));

        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must contain only digits"));
        }
        if !(8..=14).contains(&code.len()) {
            return Err(invalid("must be 8 to 14 digits long"));
        }
        if matches!(code.len(), 8 | 12 | 13 | 14) {
            let digits: Vec<u32> = code.chars().filter_map(|c| c.to_digit(10)).collect();
            let (body, last) = digits.split_at(digits.len() - 1);
            if check_digit(body) != last[0] {
                return Err(invalid("has a wrong check digit"));
            }
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_validate() {
        assert_eq!(Barcode::parse("3017620422003").unwrap().as_str(), "3017620422003");
        assert!(Barcode::parse("036000291452").is_ok());
        assert!(Barcode::parse("96385074").is_ok());
        assert!(Barcode::parse("0 36000-29145 2").is_ok());
    }

    #[test]
    fn bad_codes_are_rejected() {
        assert!(Barcode::parse("3017620422004").is_err());
        assert!(Barcode::parse("12345").is_err());
        assert!(Barcode::parse("30176204220a3").is_err());
        assert!(Barcode::parse("").is_err());
        // 10 digits: no check digit rule
        assert!(Barcode::parse("1234567890").is_ok());
    }
}
