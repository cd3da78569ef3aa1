use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::db::DbPool;
use crate::dto::SignContractDto;
use crate::errors::ApiError;
use crate::models::Contract;
use crate::notify;
use crate::repo;
use crate::tenancy::TenantContext;
use crate::AppState;

/// Public page where a customer reviews and signs a contract
pub fn signing_url(public_url: &str, token: &str) -> String {
    format!("{}/public/contracts/{}", public_url.trim_end_matches('/'), token)
}

/// Handler for generating the contract of a booking
///
/// This function handles POST requests to `/bookings/{id}/contract`.
/// Posting again re-renders an unsigned contract from the current booking
/// data.
///
/// ### Returns
///
/// The contract as JSON, or 409 if it is already signed
#[instrument(skip(pool, config), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn generate_contract_handler(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Json<Contract>, ApiError> {
    let contract = repo::generate_contract(&pool, &tenant.tenant_id, &booking_id, &config.currency).await?;
    info!("Contract {} ready", contract.get_id());
    Ok(Json(contract))
}

/// Handler for retrieving a contract
///
/// This function handles GET requests to `/contracts/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, contract_id = %contract_id))]
pub async fn get_contract_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(contract_id): Path<String>,
) -> Result<Json<Contract>, ApiError> {
    let contract = repo::get_contract(&pool, &tenant.tenant_id, &contract_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(contract))
}

/// Handler for the rendered contract
///
/// This function handles GET requests to `/contracts/{id}/document`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, contract_id = %contract_id))]
pub async fn contract_document_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(contract_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let contract = repo::get_contract(&pool, &tenant.tenant_id, &contract_id)?.ok_or(ApiError::NotFound)?;
    Ok(Html(contract.get_body_html()))
}

/// Handler for sending a contract out for signature
///
/// This function handles POST requests to `/contracts/{id}/send`. The
/// contract is marked as sent and the customer is emailed the signing link.
#[instrument(skip(state), fields(tenant_id = %tenant.tenant_id, contract_id = %contract_id))]
pub async fn send_contract_handler(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(contract_id): Path<String>,
) -> Result<Json<Contract>, ApiError> {
    let (contract, details) = repo::mark_contract_sent(&state.pool, &tenant.tenant_id, &contract_id).await?;

    let url = signing_url(&state.config.public_url, &contract.get_signing_token());
    match notify::signing_request_email(&state.config.mail_from, &details.customer, &url) {
        Some(email) => {
            notify::dispatch(state.mailer.clone(), email);
        }
        None => debug!("Customer has no email address, signing link not sent"),
    }

    info!("Contract {} sent for signature", contract.get_id());
    Ok(Json(contract))
}

/// Handler for the public signing page
///
/// This function handles GET requests to `/public/contracts/{token}`. It is
/// addressed by the signing token and needs no tenant header.
#[instrument(skip_all)]
pub async fn public_contract_handler(
    State(pool): State<Arc<DbPool>>,
    Path(token): Path<String>,
) -> Result<Html<String>, ApiError> {
    let contract = repo::get_contract_by_token(&pool, &token)?.ok_or(ApiError::NotFound)?;
    debug!("Serving contract {} for signature", contract.get_id());
    Ok(Html(contract.get_body_html()))
}

/// Handler for signing a contract
///
/// This function handles POST requests to `/public/contracts/{token}/sign`.
///
/// ### Returns
///
/// The signed contract, or 409 if it was signed before
#[instrument(skip_all)]
pub async fn sign_contract_handler(
    State(pool): State<Arc<DbPool>>,
    Path(token): Path<String>,
    Json(payload): Json<SignContractDto>,
) -> Result<Json<Contract>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let contract = repo::sign_contract(
        &pool,
        &token,
        payload.signer_name.trim().to_string(),
        payload.signature,
    )
    .await?;

    info!("Contract {} signed", contract.get_id());
    Ok(Json(contract))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::{test_state, RecordingMailer};
    use crate::models::ContractStatus;
    use crate::repo::tests::{seed_booking, seed_customer, seed_item, seed_tenant, setup_test_db};

    #[test]
    fn test_signing_url() {
        assert_eq!(signing_url("https://desk.example.com/", "abc"), "https://desk.example.com/public/contracts/abc");
        assert_eq!(signing_url("http://localhost:3000", "abc"), "http://localhost:3000/public/contracts/abc");
    }

    #[tokio::test]
    async fn test_contract_signing_flow() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;
        let item = seed_item(&pool, &tenant.get_id(), "Golf").await;
        let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;
        let booking = seed_booking(&pool, &tenant.get_id(), &item, &customer, "2026-07-01", "2026-07-04").await;
        let mailer = Arc::new(RecordingMailer::default());
        let state = test_state(pool.clone(), mailer.clone());
        let ctx = TenantContext::new(tenant.get_id());

        let contract = generate_contract_handler(State(pool.clone()), State(state.config.clone()), ctx.clone(), Path(booking.get_id()))
            .await
            .unwrap()
            .0;
        assert_eq!(contract.get_status(), ContractStatus::Draft);

        let sent = send_contract_handler(State(state.clone()), ctx.clone(), Path(contract.get_id()))
            .await
            .unwrap()
            .0;
        assert_eq!(sent.get_status(), ContractStatus::Sent);
        let emails = mailer.wait_for(1).await;
        assert!(emails[0].body.contains(&format!("/public/contracts/{}", contract.get_signing_token())));

        let page = public_contract_handler(State(pool.clone()), Path(contract.get_signing_token())).await.unwrap();
        assert!(page.0.contains("Golf"));

        let payload = SignContractDto { signer_name: "Ada".to_string(), signature: "Ada L.".to_string() };
        let signed = sign_contract_handler(State(pool.clone()), Path(contract.get_signing_token()), Json(payload))
            .await
            .unwrap()
            .0;
        assert_eq!(signed.get_status(), ContractStatus::Signed);
        assert_eq!(signed.get_signer_name().as_deref(), Some("Ada"));

        let payload = SignContractDto { signer_name: "Eve".to_string(), signature: "Eve".to_string() };
        let result = sign_contract_handler(State(pool.clone()), Path(contract.get_signing_token()), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        let document = contract_document_handler(State(pool), ctx, Path(contract.get_id())).await.unwrap();
        assert!(document.0.contains("Ada L."));
    }

    #[tokio::test]
    async fn test_sign_contract_handler_validation() {
        let pool = setup_test_db();

        let payload = SignContractDto { signer_name: " ".to_string(), signature: "x".to_string() };
        let result = sign_contract_handler(State(pool.clone()), Path("token".to_string()), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let payload = SignContractDto { signer_name: "Ada".to_string(), signature: "x".to_string() };
        let result = sign_contract_handler(State(pool), Path("unknown".to_string()), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }
}
