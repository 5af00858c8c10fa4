//! IBAN structure and checksum validation (ISO 13616).
//!
//! Every IBAN is checked for shape and the mod-97 check digits. For countries
//! with a known layout the length is enforced and the bank code embedded in
//! the BBAN is extracted, so callers can match it against a registered bank.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    #[error("IBAN must be between 15 and 34 characters")]
    InvalidLength,

    #[error("IBAN may only contain letters and digits")]
    InvalidCharacters,

    #[error("IBAN must start with a country code and two check digits")]
    InvalidFormat,

    #[error("IBAN for {country} must be {expected} characters long")]
    InvalidCountryLength { country: String, expected: usize },

    #[error("IBAN checksum is invalid")]
    InvalidChecksum,

    #[error("IBAN bank code `{found}` does not match bank code `{expected}`")]
    BankCodeMismatch { expected: String, found: String },
}

/// Country layout: total length and position of the bank code in the BBAN.
struct Layout {
    country: &'static str,
    length: usize,
    bank_code_start: usize,
    bank_code_len: usize,
}

const fn layout(country: &'static str, length: usize, start: usize, len: usize) -> Layout {
    Layout {
        country,
        length,
        bank_code_start: start,
        bank_code_len: len,
    }
}

const LAYOUTS: &[Layout] = &[
    layout("AT", 20, 0, 5),
    layout("AZ", 28, 0, 4),
    layout("BE", 16, 0, 3),
    layout("CH", 21, 0, 5),
    layout("DE", 22, 0, 8),
    layout("ES", 24, 0, 4),
    layout("FR", 27, 0, 5),
    layout("GB", 22, 0, 4),
    layout("GE", 22, 0, 2),
    layout("IT", 27, 1, 5),
    layout("NL", 18, 0, 4),
    layout("TR", 26, 0, 5),
    layout("UA", 29, 0, 6),
];

/// A structurally valid IBAN in compact upper-case form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iban {
    compact: String,
    bank_code: Option<String>,
}

impl Iban {
    /// Normalize (strip spaces, upper-case) and validate an account number.
    pub fn parse(input: &str) -> Result<Self, IbanError> {
        let compact = normalize(input);

        if !(15..=34).contains(&compact.len()) {
            return Err(IbanError::InvalidLength);
        }
        if !compact.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(IbanError::InvalidCharacters);
        }
        let bytes = compact.as_bytes();
        if !bytes[..2].iter().all(u8::is_ascii_alphabetic)
            || !bytes[2..4].iter().all(u8::is_ascii_digit)
        {
            return Err(IbanError::InvalidFormat);
        }

        let country = &compact[..2];
        let layout = LAYOUTS.iter().find(|l| l.country == country);
        if let Some(layout) = layout.filter(|l| compact.len() != l.length) {
            return Err(IbanError::InvalidCountryLength {
                country: country.to_string(),
                expected: layout.length,
            });
        }

        if checksum(&compact) != 1 {
            return Err(IbanError::InvalidChecksum);
        }

        let bank_code = layout.map(|l| {
            let start = 4 + l.bank_code_start;
            compact[start..start + l.bank_code_len].to_string()
        });
        Ok(Self { compact, bank_code })
    }

    pub fn as_str(&self) -> &str {
        &self.compact
    }

    pub fn country_code(&self) -> &str {
        &self.compact[..2]
    }

    /// Bank code embedded in the BBAN, when the country layout is known.
    pub fn bank_code(&self) -> Option<&str> {
        self.bank_code.as_deref()
    }

    /// Check the embedded bank code against a registered bank's code.
    ///
    /// IBANs from countries without a known layout are accepted.
    pub fn ensure_bank_code(&self, expected: &str) -> Result<(), IbanError> {
        match self.bank_code() {
            Some(found) if !found.eq_ignore_ascii_case(expected.trim()) => {
                Err(IbanError::BankCodeMismatch {
                    expected: expected.trim().to_string(),
                    found: found.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Compact form used for storage and lookups: no whitespace, upper-case.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Remainder of the rearranged IBAN modulo 97, letters expanded to 10..=35.
fn checksum(compact: &str) -> u32 {
    let (head, tail) = compact.split_at(4);
    tail.chars().chain(head.chars()).fold(0u32, |acc, c| {
        // Only ASCII alphanumerics reach here
        let value = c.to_digit(36).unwrap_or(0);
        if value < 10 {
            (acc * 10 + value) % 97
        } else {
            (acc * 100 + value) % 97
        }
    })
}
