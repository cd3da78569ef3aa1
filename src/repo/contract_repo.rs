use crate::db::DbPool;
use crate::documents::{apply_signature, render_contract};
use crate::errors::DomainError;
use crate::models::Contract;
use crate::schema::contracts;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::booking_repo::{BookingDetails, find_booking_details};

fn render(details: &BookingDetails, currency: &str) -> Result<String> {
    render_contract(&details.tenant, &details.booking, &details.customer, &details.item, currency)
}

fn find_contract_for_booking(conn: &mut SqliteConnection, booking_id: &str) -> Result<Option<Contract>> {
    let result = contracts::table
        .filter(contracts::booking_id.eq(booking_id))
        .first::<Contract>(conn)
        .optional()?;
    Ok(result)
}

/// Generates the rental contract of a booking
///
/// A booking has at most one contract. The first call creates it as a draft
/// with a fresh signing token; later calls re-render the body of the
/// existing contract from the current booking, customer and item data,
/// keeping its token and status.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the booking does not exist in the
/// tenant, or `DomainError::Conflict` if the contract is already signed
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub async fn generate_contract(pool: &DbPool, tenant_id: &str, booking_id: &str, currency: &str) -> Result<Contract> {
    debug!("Generating contract");

    let mut conn = pool.get()?;

    let contract = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let details = find_booking_details(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;
        let body_html = render(&details, currency)?;

        match find_contract_for_booking(conn, booking_id)? {
            Some(contract) if contract.is_signed() => {
                Err(DomainError::Conflict("Contract is already signed".to_string()).into())
            }
            Some(mut contract) => {
                contract.set_body_html(body_html);
                diesel::update(contracts::table.find(contract.get_id()))
                    .set(&contract)
                    .execute(conn)?;
                Ok(contract)
            }
            None => {
                let contract = Contract::new(tenant_id.to_string(), booking_id.to_string(), body_html);
                diesel::insert_into(contracts::table)
                    .values(contract.clone())
                    .execute(conn)?;
                Ok(contract)
            }
        }
    })?;

    info!("Contract {} ready for booking {}", contract.get_id(), booking_id);
    Ok(contract)
}

/// Retrieves a contract of the tenant by ID
#[instrument(skip(pool), fields(tenant_id = %tenant_id, contract_id = %contract_id))]
pub fn get_contract(pool: &DbPool, tenant_id: &str, contract_id: &str) -> Result<Option<Contract>> {
    let conn = &mut pool.get()?;
    let result = contracts::table
        .filter(contracts::tenant_id.eq(tenant_id))
        .filter(contracts::id.eq(contract_id))
        .first::<Contract>(conn)
        .optional()?;
    Ok(result)
}

/// Retrieves a contract by its signing token, regardless of tenant
///
/// The token is the only credential a customer holds, so this is the lookup
/// behind the public signing page.
#[instrument(skip(pool, token))]
pub fn get_contract_by_token(pool: &DbPool, token: &str) -> Result<Option<Contract>> {
    let conn = &mut pool.get()?;
    find_contract_by_token(conn, token)
}

fn find_contract_by_token(conn: &mut SqliteConnection, token: &str) -> Result<Option<Contract>> {
    let result = contracts::table
        .filter(contracts::signing_token.eq(token))
        .first::<Contract>(conn)
        .optional()?;
    Ok(result)
}

/// Marks a contract as sent and returns it with its booking details
///
/// The details are returned so the caller can address the signing email.
///
/// ### Errors
///
/// Returns `DomainError::Conflict` if the contract is already signed
#[instrument(skip(pool), fields(tenant_id = %tenant_id, contract_id = %contract_id))]
pub async fn mark_contract_sent(pool: &DbPool, tenant_id: &str, contract_id: &str) -> Result<(Contract, BookingDetails)> {
    let mut conn = pool.get()?;

    let result = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut contract = contracts::table
            .filter(contracts::tenant_id.eq(tenant_id))
            .filter(contracts::id.eq(contract_id))
            .first::<Contract>(conn)
            .optional()?
            .ok_or(DomainError::NotFound("Contract"))?;
        if contract.is_signed() {
            return Err(DomainError::Conflict("Contract is already signed".to_string()).into());
        }

        let details = find_booking_details(conn, tenant_id, &contract.get_booking_id())?
            .ok_or(DomainError::NotFound("Booking"))?;

        contract.mark_sent();
        diesel::update(contracts::table.find(contract.get_id()))
            .set(&contract)
            .execute(conn)?;
        Ok((contract, details))
    })?;

    info!("Contract {} sent", contract_id);
    Ok(result)
}

/// Signs the contract identified by `token`
///
/// The signature is filled into the stored document, so what gets signed is
/// exactly what the customer was shown, even if the booking changed since.
/// The contract becomes immutable.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` for an unknown token, or
/// `DomainError::Conflict` if the contract is already signed
#[instrument(skip(pool, token, signature), fields(signer = %signer_name))]
pub async fn sign_contract(pool: &DbPool, token: &str, signer_name: String, signature: String) -> Result<Contract> {
    let mut conn = pool.get()?;

    let contract = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut contract = find_contract_by_token(conn, token)?.ok_or(DomainError::NotFound("Contract"))?;
        if contract.is_signed() {
            return Err(DomainError::Conflict("Contract is already signed".to_string()).into());
        }

        contract.sign(signer_name, signature);
        let body_html = apply_signature(&contract.get_body_html(), &contract)?;
        contract.set_body_html(body_html);

        diesel::update(contracts::table.find(contract.get_id()))
            .set(&contract)
            .execute(conn)?;
        Ok(contract)
    })?;

    info!("Contract {} signed", contract.get_id());
    Ok(contract)
}
