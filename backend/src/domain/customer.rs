//! Customer onboarding records: the customer itself, its uploaded
//! attachments, trade license, partners and memorandum representatives.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::documents::StoredDocument;

/// Customer fields captured by the intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub customer_code: String,
    pub customer_name: String,
    pub contact_person: String,
    pub contact_no: String,
    pub mobile_no: String,
    pub email: String,
    pub business_name: String,
    pub location_details: String,
    pub status: String,
    pub nature_of_business: String,
    pub marketed_by: String,
    pub marketer_name: String,
    pub marketer_email: String,
}

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub customer_id: i32,
    pub details: CustomerDraft,
}

/// Attachment metadata row to insert after the file has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub customer_id: i32,
    pub customer_code: String,
    pub document: StoredDocument,
}

/// A stored customer attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_id: i32,
    pub customer_id: i32,
    pub customer_code: String,
    pub document: StoredDocument,
}

/// Trade license fields captured by the license form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeLicenseDraft {
    pub customer_id: i32,
    pub trade_license_no: String,
    pub emirate: String,
    pub mohre_no: String,
    pub trade_name: String,
    pub legal_status: String,
    pub establishment_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,
    pub license_expiry: Option<NaiveDate>,
    pub document: Option<StoredDocument>,
}

/// A stored trade license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLicense {
    pub trade_license_id: i32,
    pub details: TradeLicenseDraft,
}

/// Partner (shareholder) fields captured by the partner form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerDraft {
    pub customer_id: i32,
    pub customer_code: String,
    pub trade_license_id: Option<i32>,
    pub name: String,
    pub role: String,
    pub nationality: String,
    pub no_of_shares: Option<i32>,
    pub emirates_id: String,
    pub emirates_id_expiry: Option<NaiveDate>,
    pub passport: String,
    pub passport_expiry: Option<NaiveDate>,
    pub id_document: Option<StoredDocument>,
    pub passport_document: Option<StoredDocument>,
}

/// A stored partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub partner_id: i32,
    pub details: PartnerDraft,
}

/// Memorandum representative fields captured by the memorandum form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorandumDraft {
    pub customer_id: i32,
    pub customer_code: String,
    pub trade_license_id: Option<i32>,
    pub representative_name: String,
    pub no_of_shares: String,
    pub emirates_id: String,
    pub emirates_id_expiry: Option<NaiveDate>,
    pub passport: String,
    pub passport_expiry: Option<NaiveDate>,
    pub id_document: Option<StoredDocument>,
    pub passport_document: Option<StoredDocument>,
}

/// A stored memorandum representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memorandum {
    pub memorandum_id: i32,
    pub details: MemorandumDraft,
}

impl PartnerDraft {
    /// Documents attached to this partner, identity card first.
    pub fn documents(&self) -> impl Iterator<Item = &StoredDocument> {
        self.id_document.iter().chain(self.passport_document.iter())
    }
}

impl MemorandumDraft {
    /// Documents attached to this representative, identity card first.
    pub fn documents(&self) -> impl Iterator<Item = &StoredDocument> {
        self.id_document.iter().chain(self.passport_document.iter())
    }
}
