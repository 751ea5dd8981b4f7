//! Fair-share allocation: what one participant owes for their claims.
//!
//! A pure recomputation over `(Bill, Selection)`. Per-order fees are spread
//! across the units the viewing participant claims; per-person fees
//! contribute one headcount share each, whether or not anything is
//! selected. Deterministic, no hidden state: the same inputs always yield
//! the same result.

use crate::model::{Apportionment, Bill, FeeId, ItemId, Money};
use crate::services::Selection;

/// One bill line's contribution to the participant's total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemShare {
    pub item_id: ItemId,
    pub selected_units: u32,
    pub unit_price: Money,
    pub amount: Money,
}

/// One per-person fee's share charged to the participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeShare {
    pub fee_id: FeeId,
    pub share: Money,
}

/// The participant's due amount with the breakdown used for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationResult {
    pub item_shares: Vec<ItemShare>,
    pub fee_shares: Vec<FeeShare>,
    pub per_unit_order_fee_rate: Money,
    pub per_person_fee_share: Money,
    pub total: Money,
}

/// Computes the viewing participant's due amount.
///
/// With nothing selected the total equals the per-person fee share alone:
/// a participant expected at the table owes their headcount shares even
/// before claiming a single unit.
pub fn allocate(bill: &Bill, selection: &Selection) -> AllocationResult {
    let per_order_fee_total: Money = bill
        .extra_fees()
        .iter()
        .filter(|fee| matches!(fee.apportionment(), Apportionment::PerOrder))
        .map(|fee| fee.amount())
        .sum();

    let fee_shares: Vec<FeeShare> = bill
        .extra_fees()
        .iter()
        .filter_map(|fee| match fee.apportionment() {
            Apportionment::PerPerson { expected_headcount } => Some(FeeShare {
                fee_id: fee.id().clone(),
                share: fee.amount().split(expected_headcount),
            }),
            Apportionment::PerOrder => None,
        })
        .collect();
    let per_person_fee_share: Money = fee_shares.iter().map(|fee| fee.share).sum();

    let total_selected_units = selection.total_selected_units();

    // The whole per-order pool divides by this participant's own unit
    // count, not a group-wide total: anyone claiming at least one unit
    // absorbs the full pool.
    let per_unit_order_fee_rate = if total_selected_units > 0 {
        per_order_fee_total.split(total_selected_units)
    } else {
        Money::zero()
    };

    let item_shares: Vec<ItemShare> = bill
        .items()
        .iter()
        .map(|item| {
            let selected_units = selection.selected(item.id());
            let unit_price = item.unit_price();
            ItemShare {
                item_id: item.id().clone(),
                selected_units,
                unit_price,
                amount: (unit_price + per_unit_order_fee_rate) * selected_units,
            }
        })
        .collect();

    let total = item_shares.iter().map(|share| share.amount).sum::<Money>() + per_person_fee_share;

    AllocationResult {
        item_shares,
        fee_shares,
        per_unit_order_fee_rate,
        per_person_fee_share,
        total,
    }
}
