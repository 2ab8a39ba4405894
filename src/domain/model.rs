use crate::domain::normalize::{
    lookup, or_null, read_bounded_u8, read_f64, read_i64, read_string, read_timestamp,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id carried by a company that has not been persisted yet.
pub const UNSAVED_ID: i64 = 0;

/// The current company record, in its canonical (flat address) shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub vat_number: Option<String>,
    pub siret: Option<String>,
    pub registration_number: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub currency_code: Option<String>,
    pub default_vat_rate_percentage: Option<f64>,
    pub fiscal_year_start_month: Option<u8>,
    pub fiscal_year_start_day: Option<u8>,
    pub timezone: Option<String>,
    pub contract_terms: Option<String>,
    pub bank_details: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial company used to build a [`Company`]; anything left out gets
/// its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInit {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub vat_number: Option<String>,
    pub siret: Option<String>,
    pub registration_number: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub currency_code: Option<String>,
    pub default_vat_rate_percentage: Option<f64>,
    pub fiscal_year_start_month: Option<u8>,
    pub fiscal_year_start_day: Option<u8>,
    pub timezone: Option<String>,
    pub contract_terms: Option<String>,
    pub bank_details: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outbound body for a company write. `id` is only present for records
/// the server already knows; audit timestamps are never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub vat_number: Option<String>,
    pub siret: Option<String>,
    pub registration_number: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub currency_code: Option<String>,
    pub default_vat_rate_percentage: Option<f64>,
    pub fiscal_year_start_month: Option<u8>,
    pub fiscal_year_start_day: Option<u8>,
    pub timezone: Option<String>,
    pub contract_terms: Option<String>,
    pub bank_details: Option<String>,
}

impl Company {
    pub fn new(init: CompanyInit) -> Self {
        let now = Utc::now();
        Self {
            id: init.id.unwrap_or(UNSAVED_ID),
            name: init.name.unwrap_or_default(),
            legal_name: init.legal_name,
            email: init.email,
            phone: init.phone,
            website: init.website,
            vat_number: init.vat_number,
            siret: init.siret,
            registration_number: init.registration_number,
            address_line1: init.address_line1,
            address_line2: init.address_line2,
            city: init.city,
            postal_code: init.postal_code,
            country: init.country,
            logo_url: init.logo_url,
            currency_code: init.currency_code,
            default_vat_rate_percentage: init.default_vat_rate_percentage,
            fiscal_year_start_month: init.fiscal_year_start_month,
            fiscal_year_start_day: init.fiscal_year_start_day,
            timezone: init.timezone,
            contract_terms: init.contract_terms,
            bank_details: init.bank_details,
            created_at: Some(init.created_at.unwrap_or(now)),
            updated_at: Some(init.updated_at.unwrap_or(now)),
        }
    }

    /// Normalizes a server record into a company.
    ///
    /// Reads both the flat shape and the relational one (embedded `address`
    /// and `currency` objects, `tradingName`, `phoneNumber`, `siretNumber`),
    /// in camelCase or snake_case. Never fails: anything missing or
    /// unreadable falls back to the field default, and a non-object input
    /// yields an unsaved blank company.
    pub fn from_api(raw: &Value) -> Self {
        let empty = Map::new();
        let map = raw.as_object().unwrap_or(&empty);
        if !raw.is_object() {
            tracing::debug!("Company payload is not an object, using defaults");
        }

        let address = map.get("address").and_then(Value::as_object);
        let currency = map.get("currency").and_then(Value::as_object);

        let text = |field: &str, keys: &[&str]| or_null(field, read_string(lookup(map, keys)));
        // Flat keys win; the embedded relation only fills what they leave empty.
        let address_text = |field: &str, flat: &[&str], nested: &[&str]| {
            text(field, flat).or_else(|| {
                address.and_then(|a| or_null(field, read_string(lookup(a, nested))))
            })
        };

        let address_line1 = address_text(
            "addressLine1",
            &["addressLine1", "address_line1"],
            &["line1", "addressLine1", "address_line1", "street"],
        )
        .or_else(|| map.get("address").and_then(Value::as_str).map(str::to_string));

        let init = CompanyInit {
            id: or_null("id", read_i64(lookup(map, &["id"]))),
            name: text("name", &["name"]),
            legal_name: text(
                "legalName",
                &["legalName", "legal_name", "tradingName", "trading_name"],
            ),
            email: text("email", &["email"]),
            phone: text("phone", &["phone", "phoneNumber", "phone_number"]),
            website: text("website", &["website"]),
            vat_number: text("vatNumber", &["vatNumber", "vat_number"]),
            siret: text("siret", &["siret", "siretNumber", "siret_number"]),
            registration_number: text(
                "registrationNumber",
                &["registrationNumber", "registration_number"],
            ),
            address_line1,
            address_line2: address_text(
                "addressLine2",
                &["addressLine2", "address_line2"],
                &["line2", "addressLine2", "address_line2"],
            ),
            city: address_text("city", &["city"], &["city"]),
            postal_code: address_text(
                "postalCode",
                &["postalCode", "postal_code", "zipCode", "zip_code"],
                &["postalCode", "postal_code", "zipCode", "zip_code"],
            ),
            country: address_text("country", &["country"], &["country"]),
            logo_url: text("logoUrl", &["logoUrl", "logo_url"]),
            currency_code: text("currencyCode", &["currencyCode", "currency_code"]).or_else(
                || currency.and_then(|c| or_null("currencyCode", read_string(lookup(c, &["code"])))),
            ),
            default_vat_rate_percentage: or_null(
                "defaultVatRatePercentage",
                read_f64(lookup(
                    map,
                    &["defaultVatRatePercentage", "default_vat_rate_percentage"],
                )),
            ),
            fiscal_year_start_month: or_null(
                "fiscalYearStartMonth",
                read_bounded_u8(
                    lookup(map, &["fiscalYearStartMonth", "fiscal_year_start_month"]),
                    1,
                    12,
                ),
            ),
            fiscal_year_start_day: or_null(
                "fiscalYearStartDay",
                read_bounded_u8(
                    lookup(map, &["fiscalYearStartDay", "fiscal_year_start_day"]),
                    1,
                    31,
                ),
            ),
            timezone: text("timezone", &["timezone", "timeZone", "time_zone"]),
            contract_terms: text("contractTerms", &["contractTerms", "contract_terms"]),
            bank_details: text("bankDetails", &["bankDetails", "bank_details"]),
            created_at: or_null(
                "createdAt",
                read_timestamp(lookup(map, &["createdAt", "created_at"])),
            ),
            updated_at: or_null(
                "updatedAt",
                read_timestamp(lookup(map, &["updatedAt", "updated_at"])),
            ),
        };

        Self::new(init)
    }

    pub fn to_api(&self) -> CompanyPayload {
        CompanyPayload {
            id: (!self.is_unsaved()).then_some(self.id),
            name: self.name.clone(),
            legal_name: self.legal_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            vat_number: self.vat_number.clone(),
            siret: self.siret.clone(),
            registration_number: self.registration_number.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            logo_url: self.logo_url.clone(),
            currency_code: self.currency_code.clone(),
            default_vat_rate_percentage: self.default_vat_rate_percentage,
            fiscal_year_start_month: self.fiscal_year_start_month,
            fiscal_year_start_day: self.fiscal_year_start_day,
            timezone: self.timezone.clone(),
            contract_terms: self.contract_terms.clone(),
            bank_details: self.bank_details.clone(),
        }
    }

    pub fn is_unsaved(&self) -> bool {
        self.id == UNSAVED_ID
    }

    /// Legal name when set, otherwise the name.
    pub fn display_name(&self) -> &str {
        match self.legal_name.as_deref() {
            Some(legal) if !legal.is_empty() => legal,
            _ => &self.name,
        }
    }

    /// Postal address on one line, e.g. `"1 rue de la Paix, 75002 Paris, France"`.
    ///
    /// Blank parts are skipped. A postal code is only shown next to a city.
    pub fn full_address(&self) -> String {
        let present = |part: &Option<String>| {
            part.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let locality = match (present(&self.postal_code), present(&self.city)) {
            (Some(postal), Some(city)) => Some(format!("{} {}", postal, city)),
            (_, city) => city,
        };

        [
            present(&self.address_line1),
            present(&self.address_line2),
            locality,
            present(&self.country),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Only the name is checked for now.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Clears every field except `id`. Timestamps become `None`.
    pub fn reset(&mut self) {
        *self = Self {
            id: self.id,
            created_at: None,
            updated_at: None,
            ..Self::new(CompanyInit::default())
        };
    }
}

impl Default for Company {
    fn default() -> Self {
        Self::new(CompanyInit::default())
    }
}
