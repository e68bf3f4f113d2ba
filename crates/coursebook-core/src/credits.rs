//! Credit packages and purchases.
//!
//! A purchase copies the package terms at the time of purchase, so editing or
//! deleting a package never changes credits that were already bought.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CreditPackageId, PurchaseId, UserId};

/// A purchasable bundle of course credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPackage {
    /// Unique package ID.
    pub id: CreditPackageId,

    /// Unique package name.
    pub name: String,

    /// Number of course credits granted.
    pub credit_amount: u32,

    /// Price of the package.
    pub price: u64,

    /// When the package was created.
    pub created_at: DateTime<Utc>,
}

impl CreditPackage {
    /// Create a new credit package.
    #[must_use]
    pub fn new(name: String, credit_amount: u32, price: u64) -> Self {
        Self {
            id: CreditPackageId::generate(),
            name,
            credit_amount,
            price,
            created_at: Utc::now(),
        }
    }
}

/// An immutable record of a completed credit purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPurchase {
    /// Unique purchase ID (ULID for time-ordering).
    pub id: PurchaseId,

    /// The buyer.
    pub user_id: UserId,

    /// The package that was bought.
    pub credit_package_id: CreditPackageId,

    /// Credits granted, copied from the package.
    pub purchased_credits: u32,

    /// Amount paid, copied from the package.
    pub price_paid: u64,

    /// When the purchase happened.
    pub purchase_at: DateTime<Utc>,
}

impl CreditPurchase {
    /// Record a purchase of `package` by `user_id` at the package's current terms.
    #[must_use]
    pub fn from_package(user_id: UserId, package: &CreditPackage) -> Self {
        Self {
            id: PurchaseId::generate(),
            user_id,
            credit_package_id: package.id,
            purchased_credits: package.credit_amount,
            price_paid: package.price,
            purchase_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_snapshots_package_terms() {
        let user_id = UserId::generate();
        let mut package = CreditPackage::new("Pack A".into(), 10, 1000);

        let purchase = CreditPurchase::from_package(user_id, &package);
        package.credit_amount = 20;
        package.price = 5000;

        assert_eq!(purchase.purchased_credits, 10);
        assert_eq!(purchase.price_paid, 1000);
        assert_eq!(purchase.credit_package_id, package.id);
        assert_eq!(purchase.user_id, user_id);
    }
}
