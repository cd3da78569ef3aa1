use chrono::NaiveDate;
use rentdesk::dto::{
    AvailabilityDto, BookingQueryDto, CreateBookingDto, CreateCustomerDto, CreateItemDto,
    CreateTenantDto, UpdateBookingStatusDto,
};
use rentdesk::models::{Booking, BookingStatus, Customer, Item, ItemKind, ItemStatus, Tenant};
use rentdesk::reports::{CommissionLine, RevenueSummary};
use rentdesk::tenancy::TENANT_HEADER;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for CLI client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", .status.as_u16())]
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the rentdesk server
pub struct RentdeskClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// Tenant sent with every tenant-scoped request
    tenant: Option<String>,
    /// The underlying HTTP client
    client: Client,
}

/// Builds query parameters for listing bookings; `status` repeats
fn booking_query_params(query: &BookingQueryDto) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = Vec::new();

    for status in &query.status {
        params.push(("status", status.to_string()));
    }
    if let Some(ref id) = query.item_id {
        params.push(("item_id", id.clone()));
    }
    if let Some(ref id) = query.customer_id {
        params.push(("customer_id", id.clone()));
    }
    if let Some(from) = query.from {
        params.push(("from", from.to_string()));
    }
    if let Some(to) = query.to {
        params.push(("to", to.to_string()));
    }

    params
}

impl RentdeskClient {
    /// Creates a new client
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the rentdesk server
    /// * `tenant` - Tenant id sent as `X-Tenant-Id`, if any
    pub fn new(base_url: String, tenant: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.tenant {
            Some(tenant) => builder.header(TENANT_HEADER, tenant),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?.check().await?;
        Ok(response.json().await?)
    }

    // ── Tenant endpoints ─────────────────────────────────────────────

    /// Lists all tenants
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, ClientError> {
        Self::send(self.request(Method::GET, "/tenants")).await
    }

    /// Creates a new tenant
    pub async fn create_tenant(&self, name: String, slug: String) -> Result<Tenant, ClientError> {
        let dto = CreateTenantDto { name, slug };
        Self::send(self.request(Method::POST, "/tenants").json(&dto)).await
    }

    // ── Item endpoints ───────────────────────────────────────────────

    /// Lists items with optional filters
    pub async fn list_items(&self, kind: Option<ItemKind>, status: Option<ItemStatus>) -> Result<Vec<Item>, ClientError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(kind) = kind {
            params.push(("kind", kind.to_string()));
        }
        if let Some(status) = status {
            params.push(("status", status.to_string()));
        }
        Self::send(self.request(Method::GET, "/items").query(&params)).await
    }

    /// Creates a new item
    pub async fn create_item(&self, dto: &CreateItemDto) -> Result<Item, ClientError> {
        Self::send(self.request(Method::POST, "/items").json(dto)).await
    }

    /// Gets a specific item by ID
    pub async fn get_item(&self, id: &str) -> Result<Item, ClientError> {
        Self::send(self.request(Method::GET, &format!("/items/{}", id))).await
    }

    /// Checks whether an item is free for `[start, end)`
    pub async fn item_availability(&self, id: &str, start: NaiveDate, end: NaiveDate) -> Result<AvailabilityDto, ClientError> {
        let params = [("start_date", start.to_string()), ("end_date", end.to_string())];
        Self::send(self.request(Method::GET, &format!("/items/{}/availability", id)).query(&params)).await
    }

    // ── Customer endpoints ───────────────────────────────────────────

    /// Lists customers, optionally matching a search string
    pub async fn list_customers(&self, q: Option<&str>) -> Result<Vec<Customer>, ClientError> {
        let params: Vec<(&str, &str)> = q.map(|q| ("q", q)).into_iter().collect();
        Self::send(self.request(Method::GET, "/customers").query(&params)).await
    }

    /// Creates a new customer
    pub async fn create_customer(&self, dto: &CreateCustomerDto) -> Result<Customer, ClientError> {
        Self::send(self.request(Method::POST, "/customers").json(dto)).await
    }

    /// Gets a specific customer by ID
    pub async fn get_customer(&self, id: &str) -> Result<Customer, ClientError> {
        Self::send(self.request(Method::GET, &format!("/customers/{}", id))).await
    }

    // ── Booking endpoints ────────────────────────────────────────────

    /// Lists bookings matching the query
    pub async fn list_bookings(&self, query: &BookingQueryDto) -> Result<Vec<Booking>, ClientError> {
        let params = booking_query_params(query);
        Self::send(self.request(Method::GET, "/bookings").query(&params)).await
    }

    /// Creates a new booking
    pub async fn create_booking(&self, dto: &CreateBookingDto) -> Result<Booking, ClientError> {
        Self::send(self.request(Method::POST, "/bookings").json(dto)).await
    }

    /// Gets a specific booking by ID
    pub async fn get_booking(&self, id: &str) -> Result<Booking, ClientError> {
        Self::send(self.request(Method::GET, &format!("/bookings/{}", id))).await
    }

    /// Moves a booking to a new status
    pub async fn set_booking_status(&self, id: &str, status: BookingStatus) -> Result<Booking, ClientError> {
        let dto = UpdateBookingStatusDto { status };
        Self::send(self.request(Method::POST, &format!("/bookings/{}/status", id)).json(&dto)).await
    }

    // ── Report endpoints ─────────────────────────────────────────────

    /// Fetches the commission report for `[from, to)`
    pub async fn commission_report(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<CommissionLine>, ClientError> {
        let params = [("from", from.to_string()), ("to", to.to_string())];
        Self::send(self.request(Method::GET, "/reports/commissions").query(&params)).await
    }

    /// Fetches the tenant-wide summary for `[from, to)`
    pub async fn summary_report(&self, from: NaiveDate, to: NaiveDate) -> Result<RevenueSummary, ClientError> {
        let params = [("from", from.to_string()), ("to", to.to_string())];
        Self::send(self.request(Method::GET, "/reports/summary").query(&params)).await
    }
}
