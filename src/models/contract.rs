use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContractStatus;

/// Length of the token embedded in a contract's public signing link
pub const SIGNING_TOKEN_LEN: usize = 32;

/// A rental agreement rendered for a booking and signed by the customer
///
/// The signing token is the only credential the customer needs, so it is
/// never serialized into API responses; staff share the signing link instead.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::contracts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Contract {
    id: String,
    tenant_id: String,
    booking_id: String,
    body_html: String,
    status: ContractStatus,
    #[serde(skip_serializing, default)]
    signing_token: String,
    signer_name: Option<String>,
    /// Typed name or drawn signature as a data URL
    signature: Option<String>,
    signed_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl Contract {
    pub fn new(tenant_id: String, booking_id: String, body_html: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            booking_id,
            body_html,
            status: ContractStatus::Draft,
            signing_token: generate_signing_token(),
            signer_name: None,
            signature: None,
            signed_at: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_tenant_id(&self) -> String {
        self.tenant_id.clone()
    }

    pub fn get_booking_id(&self) -> String {
        self.booking_id.clone()
    }

    pub fn get_body_html(&self) -> String {
        self.body_html.clone()
    }

    pub fn get_status(&self) -> ContractStatus {
        self.status
    }

    pub fn get_signing_token(&self) -> String {
        self.signing_token.clone()
    }

    pub fn get_signer_name(&self) -> Option<String> {
        self.signer_name.clone()
    }

    pub fn get_signature(&self) -> Option<String> {
        self.signature.clone()
    }

    pub fn get_signed_at(&self) -> Option<DateTime<Utc>> {
        self.signed_at.map(|t| DateTime::from_naive_utc_and_offset(t, Utc))
    }

    pub fn is_signed(&self) -> bool {
        self.status == ContractStatus::Signed
    }

    /// Replaces the rendered document
    pub fn set_body_html(&mut self, body_html: String) {
        self.body_html = body_html;
    }

    /// Marks the signing link as sent to the customer
    pub fn mark_sent(&mut self) {
        self.status = ContractStatus::Sent;
    }

    /// Records the customer's signature
    pub fn sign(&mut self, signer_name: String, signature: String) {
        self.signer_name = Some(signer_name);
        self.signature = Some(signature);
        self.signed_at = Some(Utc::now().naive_utc());
        self.status = ContractStatus::Signed;
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// Generates a random alphanumeric signing token
pub fn generate_signing_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SIGNING_TOKEN_LEN)
        .map(char::from)
        .collect()
}
