//! Company, bank and IBAN data models and API request/response types.
//!
//! This module defines:
//! - `Bank`, `Company`, `Iban`: database entities
//! - `CompanyRequest`, `IbanRequest`: request bodies with validation
//! - Query types for company and IBAN lookups
//! - `CompanyResponse`, `IbanResponse`, `BankResponse`: response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        choices::{Currency, PartyType},
        validation,
    },
};

/// Represents a bank from the `banks` registry table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Bank {
    pub id: Uuid,
    pub bank_name: String,

    /// Code embedded in the bank's IBANs (e.g. `BG` in `GE29BG...`).
    pub bank_code: String,

    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Represents a company record from the database.
///
/// # Database Table
///
/// Maps to the `companies` table. `name` is unique; `vat_number` is the
/// identifier other companies use to reference this one in orders and
/// payments.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,

    /// One of `SHIPPER`, `FORWARDER`, `CARRIER`
    pub party_type: Option<String>,

    pub address: Option<String>,
    pub vat_number: Option<String>,
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
    pub contact_email: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Represents an IBAN owned by a company.
///
/// `(company_id, account_number)` is unique.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Iban {
    pub id: Uuid,
    pub bank_id: Uuid,
    pub company_id: Uuid,
    pub currency: Option<String>,
    pub account_number: Option<String>,

    /// Juridical name of the account holder
    pub recipient: Option<String>,

    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// IBAN details inside a company create/update request.
///
/// # JSON Example
///
/// ```json
/// {
///   "bank_name": "BOG",
///   "currency": "GEL",
///   "account_number": "GE54BG0000000101465330",
///   "recipient": "Caucasus Freight LLC"
/// }
/// ```
///
/// `recipient` defaults to the company name.
#[derive(Debug, Clone, Deserialize)]
pub struct IbanRequest {
    pub bank_name: String,
    pub currency: Currency,
    pub account_number: String,
    #[serde(default)]
    pub recipient: Option<String>,
}

impl IbanRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::required_text("bank_name", &self.bank_name, 30)?;
        validation::required_text("account_number", &self.account_number, 50)?;
        validation::optional_text("recipient", self.recipient.as_deref(), 50)
    }
}

/// Request body for creating or updating a company.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Caucasus Freight LLC",
///   "party_type": "FORWARDER",
///   "address": "12 Rustaveli Ave, Tbilisi",
///   "vat_number": "405123456",
///   "contact_name": "Nino Beridze",
///   "contact_number": "+995555123456",
///   "contact_email": "ops@caucasus-freight.ge",
///   "ibans": [
///     { "bank_name": "BOG", "currency": "GEL", "account_number": "GE54BG0000000101465330" }
///   ]
/// }
/// ```
///
/// # Validation
///
/// - `name`, `address`, `vat_number`: required, non-blank
/// - `FORWARDER` and `CARRIER` companies must list at least one IBAN
/// - at least one contact field is enforced later by the service, after the
///   duplicate check
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub party_type: PartyType,
    pub address: String,
    pub vat_number: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub ibans: Option<Vec<IbanRequest>>,
}

impl CompanyRequest {
    /// Trim identifiers and drop blank contact fields.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.vat_number = self.vat_number.trim().to_string();
        self.contact_name = validation::non_blank(self.contact_name);
        self.contact_number = validation::non_blank(self.contact_number);
        self.contact_email = validation::non_blank(self.contact_email);
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validation::required_text("name", &self.name, 155)?;
        validation::required_text("address", &self.address, 155)?;
        validation::required_text("vat_number", &self.vat_number, 15)?;
        validation::optional_text("contact_name", self.contact_name.as_deref(), 155)?;
        validation::optional_text("contact_number", self.contact_number.as_deref(), 15)?;
        validation::optional_text("contact_email", self.contact_email.as_deref(), 155)?;

        let ibans = self.ibans.as_deref().unwrap_or_default();
        if self.party_type.requires_iban() && ibans.is_empty() {
            return Err(AppError::InvalidRequest(
                "At least one IBAN should be provided for company.".to_string(),
            ));
        }
        ibans.iter().try_for_each(IbanRequest::validate)
    }

    pub fn has_contact(&self) -> bool {
        self.contact_name.is_some() || self.contact_number.is_some() || self.contact_email.is_some()
    }
}

/// Query for `GET /api/v1/companies/lookup`. VAT takes precedence over name.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyLookupQuery {
    pub vat_number: Option<String>,
    pub name: Option<String>,
}

/// Query for `GET /api/v1/companies`.
#[derive(Debug, Deserialize)]
pub struct CompanyFilterQuery {
    pub search_keyword: String,
    pub company_type: PartyType,
}

impl CompanyFilterQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::required_text("search_keyword", &self.search_keyword, 155)?;
        if self.company_type == PartyType::Forwarder {
            return Err(validation::invalid(
                "company_type",
                "only CARRIER and SHIPPER companies can be searched",
            ));
        }
        Ok(())
    }
}

/// Query for `GET /api/v1/ibans`.
#[derive(Debug, Deserialize)]
pub struct IbanLookupQuery {
    pub bank_name: String,
    pub account_number: String,
}

/// Bank registry entry.
#[derive(Debug, Serialize)]
pub struct BankResponse {
    pub bank_name: String,
    pub bank_code: String,
}

impl From<Bank> for BankResponse {
    fn from(bank: Bank) -> Self {
        Self {
            bank_name: bank.bank_name,
            bank_code: bank.bank_code,
        }
    }
}

/// IBAN as returned to clients, joined with its bank and company names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct IbanResponse {
    #[serde(skip)]
    pub company_id: Uuid,
    pub bank_name: String,
    pub company_name: String,
    pub currency: Option<String>,
    pub account_number: Option<String>,
    pub recipient: Option<String>,
}

/// Response body for company endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Caucasus Freight LLC",
///   "party_type": "FORWARDER",
///   "address": "12 Rustaveli Ave, Tbilisi",
///   "vat_number": "405123456",
///   "contact_name": "Nino Beridze",
///   "contact_number": "+995555123456",
///   "contact_email": "ops@caucasus-freight.ge",
///   "ibans": [
///     {
///       "bank_name": "BOG",
///       "company_name": "Caucasus Freight LLC",
///       "currency": "GEL",
///       "account_number": "GE54BG0000000101465330",
///       "recipient": "Caucasus Freight LLC"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub name: String,
    pub party_type: Option<String>,
    pub address: Option<String>,
    pub vat_number: Option<String>,
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
    pub contact_email: Option<String>,
    pub ibans: Vec<IbanResponse>,
}

impl CompanyResponse {
    pub fn new(company: Company, ibans: Vec<IbanResponse>) -> Self {
        Self {
            name: company.name,
            party_type: company.party_type,
            address: company.address,
            vat_number: company.vat_number,
            contact_name: company.contact_name,
            contact_number: company.contact_number,
            contact_email: company.contact_email,
            ibans,
        }
    }
}

/// Response body for company search.
#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<CompanyResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(party_type: PartyType, ibans: Option<Vec<IbanRequest>>) -> CompanyRequest {
        CompanyRequest {
            name: " Caucasus Freight ".into(),
            party_type,
            address: "Tbilisi".into(),
            vat_number: "405123456".into(),
            contact_name: Some("  ".into()),
            contact_number: None,
            contact_email: Some("ops@cf.ge".into()),
            ibans,
        }
        .normalized()
    }

    fn iban() -> IbanRequest {
        IbanRequest {
            bank_name: "BOG".into(),
            currency: Currency::Gel,
            account_number: "GE54BG0000000101465330".into(),
            recipient: None,
        }
    }

    #[test]
    fn normalization_trims_and_drops_blank_contacts() {
        let req = request(PartyType::Shipper, None);
        assert_eq!(req.name, "Caucasus Freight");
        assert_eq!(req.contact_name, None);
        assert!(req.has_contact());
    }

    #[test]
    fn shippers_do_not_need_ibans() {
        assert!(request(PartyType::Shipper, None).validate().is_ok());
    }

    #[test]
    fn forwarders_and_carriers_need_an_iban() {
        for party in [PartyType::Forwarder, PartyType::Carrier] {
            let err = request(party, None).validate().unwrap_err();
            assert_eq!(err.code(), "invalid_request");
            assert!(request(party, Some(vec![])).validate().is_err());
            assert!(request(party, Some(vec![iban()])).validate().is_ok());
        }
    }

    #[test]
    fn vat_number_length_is_bounded() {
        let mut req = request(PartyType::Shipper, None);
        req.vat_number = "1".repeat(16);
        assert!(req.validate().is_err());
    }

    #[test]
    fn nested_iban_is_validated() {
        let mut bad = iban();
        bad.bank_name = String::new();
        assert!(request(PartyType::Carrier, Some(vec![bad])).validate().is_err());
    }

    #[test]
    fn forwarders_cannot_be_searched() {
        let query = CompanyFilterQuery {
            search_keyword: "freight".into(),
            company_type: PartyType::Forwarder,
        };
        assert!(query.validate().is_err());

        let query = CompanyFilterQuery {
            search_keyword: "freight".into(),
            company_type: PartyType::Carrier,
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn request_deserializes_legacy_party_spelling() {
        let req: CompanyRequest = serde_json::from_value(serde_json::json!({
            "name": "Road Kings",
            "party_type": "CAREER",
            "address": "Batumi",
            "vat_number": "123",
            "contact_email": "dispatch@rk.ge",
            "ibans": [{"bank_name": "TBC", "currency": "USD", "account_number": "GE54TB1100000000000000"}]
        }))
        .unwrap();
        assert_eq!(req.party_type, PartyType::Carrier);
        assert_eq!(req.ibans.unwrap().len(), 1);
    }
}
