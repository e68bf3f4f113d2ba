//! Credit package catalog and purchase.

use std::sync::Arc;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use validator::Validate;

use coursebook_core::validation::as_non_negative_integer;
use coursebook_core::{CreditPackage, CreditPackageId};
use coursebook_store::StoreError;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{IdPath, ValidJson};
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;
use crate::validate::{not_blank, whole_number, whole_u32};

/// A credit package as listed.
#[derive(Debug, Serialize)]
pub struct PackageView {
    /// Package ID.
    pub id: CreditPackageId,
    /// Unique name.
    pub name: String,
    /// Credits granted per purchase.
    pub credit_amount: u32,
    /// Price per purchase.
    pub price: u64,
}

impl From<CreditPackage> for PackageView {
    fn from(p: CreditPackage) -> Self {
        Self {
            id: p.id,
            name: p.name,
            credit_amount: p.credit_amount,
            price: p.price,
        }
    }
}

/// List credit packages.
pub async fn list_packages(State(state): State<Arc<AppState>>) -> ApiResult<Vec<PackageView>> {
    let packages = state.store.list_credit_packages()?;
    Ok(ok(packages.into_iter().map(PackageView::from).collect()))
}

/// Package create request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePackageRequest {
    /// Unique name.
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    /// Credits granted per purchase.
    #[validate(required, custom = "whole_u32")]
    pub credit_amount: Option<Number>,
    /// Price per purchase.
    #[validate(required, custom = "whole_number")]
    pub price: Option<Number>,
}

/// Add a credit package.
pub async fn create_package(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreatePackageRequest>,
) -> ApiResult<PackageView> {
    let name = body.name.ok_or_else(ApiError::invalid_fields)?;
    let credit_amount = body
        .credit_amount
        .as_ref()
        .and_then(as_non_negative_integer)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(ApiError::invalid_fields)?;
    let price = body
        .price
        .as_ref()
        .and_then(as_non_negative_integer)
        .ok_or_else(ApiError::invalid_fields)?;

    let package = CreditPackage::new(name, credit_amount, price);
    state
        .store
        .create_credit_package(&package)
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::Conflict("duplicate data".into()),
            other => other.into(),
        })?;

    tracing::info!(package_id = %package.id, name = %package.name, "Credit package created");

    Ok(created(package.into()))
}

/// Buy a credit package at its current terms.
pub async fn purchase_package(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    IdPath(package_id): IdPath<CreditPackageId>,
) -> ApiResult<()> {
    let purchase = state
        .store
        .purchase_credit_package(&auth.user.id, &package_id)?;

    tracing::info!(
        user_id = %auth.user.id,
        %package_id,
        purchase_id = %purchase.id,
        purchased_credits = purchase.purchased_credits,
        price_paid = purchase.price_paid,
        "Credit package purchased"
    );

    Ok(ok(()))
}

/// Remove a credit package. Past purchases keep their snapshot.
pub async fn delete_package(
    State(state): State<Arc<AppState>>,
    IdPath(package_id): IdPath<CreditPackageId>,
) -> ApiResult<()> {
    state.store.delete_credit_package(&package_id)?;
    tracing::info!(%package_id, "Credit package deleted");
    Ok(ok(()))
}
