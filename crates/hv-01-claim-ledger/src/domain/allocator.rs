//! # Quantity Allocator
//!
//! Pure function of listing state: the claimable range for one receiver.
//!
//! ```text
//! min = current < minQuantity ? current : minQuantity
//! max = min(current, maxQuantity)
//! current == 0  =>  OutOfStock (never clamped to an empty range)
//! ```
//!
//! Clients run this for UX. The ledger runs it again, atomically with the
//! stock decrement.

use super::errors::LedgerError;
use shared_types::FoodItem;

/// Inclusive claimable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationBounds {
    pub min: u32,
    pub max: u32,
}

impl AllocationBounds {
    pub fn contains(&self, quantity: u32) -> bool {
        self.min <= quantity && quantity <= self.max
    }

    /// Rejects quantities outside the range.
    pub fn check(&self, quantity: u32) -> Result<(), LedgerError> {
        if self.contains(quantity) {
            Ok(())
        } else {
            Err(LedgerError::QuantityOutOfRange {
                requested: quantity,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Computes the claimable range for `item`.
pub fn allocation_bounds(item: &FoodItem) -> Result<AllocationBounds, LedgerError> {
    let current = item.current_quantity;
    if current == 0 {
        return Err(LedgerError::OutOfStock(item.id.clone()));
    }

    let min = if current < item.min_quantity {
        current
    } else {
        item.min_quantity
    };
    let max = current.min(item.max_quantity);

    Ok(AllocationBounds { min, max })
}
