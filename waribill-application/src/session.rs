//! One participant's view of a shared bill.
//!
//! Decodes the reference into an independent bill copy, holds this
//! participant's selection, and recomputes the allocation on every
//! mutation. Synchronous and self-contained: participants share nothing
//! at runtime, only the reference string.

use waribill_codec::DecodeError;
use waribill_domain::{AllocationResult, Bill, ItemId, Selection, allocate};

pub struct CalculatorSession {
    bill: Bill,
    selection: Selection,
    allocation: AllocationResult,
}

impl CalculatorSession {
    /// Opens a shared reference. A malformed or mismatched reference is a
    /// decode failure, never a zeroed or partial bill.
    pub fn open(reference: &str) -> Result<Self, DecodeError> {
        Ok(Self::from_bill(waribill_codec::decode(reference)?))
    }

    pub fn from_bill(bill: Bill) -> Self {
        let selection = Selection::for_bill(&bill);
        let allocation = allocate(&bill, &selection);
        Self {
            bill,
            selection,
            allocation,
        }
    }

    /// Claims or releases units of an item and returns the recomputed
    /// allocation. Out-of-range deltas saturate; unknown ids change
    /// nothing.
    pub fn adjust(&mut self, item_id: &ItemId, delta: i64) -> &AllocationResult {
        self.selection.adjust(&self.bill, item_id, delta);
        self.allocation = allocate(&self.bill, &self.selection);
        &self.allocation
    }

    /// Releases every claim.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.allocation = allocate(&self.bill, &self.selection);
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn allocation(&self) -> &AllocationResult {
        &self.allocation
    }
}
