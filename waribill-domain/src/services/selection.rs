use indexmap::IndexMap;

use crate::model::{Bill, ItemId};

/// One participant's claimed unit counts, keyed by item id in bill order.
///
/// Ephemeral state: created all-zero when a shared reference is decoded,
/// mutated only by the viewing participant, never transmitted back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    counts: IndexMap<ItemId, u32>,
}

impl Selection {
    pub fn for_bill(bill: &Bill) -> Self {
        let counts = bill
            .items()
            .iter()
            .map(|item| (item.id().clone(), 0))
            .collect();
        Self { counts }
    }

    /// Adds `delta` units to the claim on `item_id`, saturating into
    /// `[0, item.quantity]`. An id the bill does not carry leaves the
    /// selection untouched.
    ///
    /// Returns the resulting count for the item (0 for an unknown id).
    pub fn adjust(&mut self, bill: &Bill, item_id: &ItemId, delta: i64) -> u32 {
        let Some(item) = bill.item(item_id) else {
            return 0;
        };
        let Some(count) = self.counts.get_mut(item_id) else {
            return 0;
        };
        let next = (i64::from(*count) + delta).clamp(0, i64::from(item.quantity()));
        *count = next as u32;
        *count
    }

    pub fn selected(&self, item_id: &ItemId) -> u32 {
        self.counts.get(item_id).copied().unwrap_or(0)
    }

    pub fn total_selected_units(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn clear(&mut self) {
        for count in self.counts.values_mut() {
            *count = 0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> + '_ {
        self.counts.iter().map(|(id, &count)| (id, count))
    }
}
