//! Assembles a bill from manual entry and extraction output.
//!
//! The builder is the only place ids are minted and the last gate before
//! a bill reaches the codec or the allocation engine: every entry passes
//! the domain constructors here, so downstream code can assume a valid
//! bill. Sharing is one-shot: to change an already-shared bill, edit,
//! `build()` again and hand out the new reference.

use uuid::Uuid;
use waribill_domain::{Apportionment, Bill, ExtraFee, FeeId, Item, ItemId, Money};

use crate::{
    error::BuildError,
    extraction::{ExtractedFeeKind, ExtractedReceipt},
};

#[derive(Debug, Default)]
pub struct BillBuilder {
    items: Vec<Item>,
    fees: Vec<ExtraFee>,
}

impl BillBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a manually entered line item and returns its minted id.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        total_price: Money,
        quantity: u32,
    ) -> Result<ItemId, BuildError> {
        let item = Item::new(ItemId::new(mint_id()), name, total_price, quantity)?;
        let id = item.id().clone();
        self.items.push(item);
        Ok(id)
    }

    /// Adds a manually entered extra fee and returns its minted id.
    pub fn add_fee(
        &mut self,
        name: impl Into<String>,
        amount: Money,
        apportionment: Apportionment,
    ) -> Result<FeeId, BuildError> {
        let fee = ExtraFee::new(FeeId::new(mint_id()), name, amount, apportionment)?;
        let id = fee.id().clone();
        self.fees.push(fee);
        Ok(id)
    }

    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    pub fn remove_fee(&mut self, id: &FeeId) -> bool {
        let before = self.fees.len();
        self.fees.retain(|fee| fee.id() != id);
        self.fees.len() != before
    }

    /// Merges a validated extraction payload into the draft.
    ///
    /// All-or-nothing: if any proposed entry violates a bill invariant the
    /// draft is left untouched and the error names the entry.
    pub fn merge_extraction(&mut self, receipt: ExtractedReceipt) -> Result<(), BuildError> {
        let mut items = Vec::with_capacity(receipt.items.len());
        for (index, entry) in receipt.items.into_iter().enumerate() {
            let item = Item::new(
                ItemId::new(mint_id()),
                entry.name.clone(),
                Money::from_decimal(entry.price),
                entry.quantity,
            )
            .map_err(|source| BuildError::ExtractedItem {
                index,
                name: entry.name,
                source,
            })?;
            items.push(item);
        }

        let mut fees = Vec::with_capacity(receipt.extra_fees.len());
        for (index, entry) in receipt.extra_fees.into_iter().enumerate() {
            let apportionment = match entry.kind {
                ExtractedFeeKind::PerOrder => Apportionment::PerOrder,
                ExtractedFeeKind::PerPerson => Apportionment::PerPerson {
                    expected_headcount: entry.expected_count.unwrap_or(1),
                },
            };
            let fee = ExtraFee::new(
                FeeId::new(mint_id()),
                entry.name.clone(),
                Money::from_decimal(entry.amount),
                apportionment,
            )
            .map_err(|source| BuildError::ExtractedFee {
                index,
                name: entry.name,
                source,
            })?;
            fees.push(fee);
        }

        self.items.append(&mut items);
        self.fees.append(&mut fees);
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn fees(&self) -> &[ExtraFee] {
        &self.fees
    }

    /// Produces the immutable bill. The draft stays editable for building
    /// a revised bill later.
    pub fn build(&self) -> Result<Bill, BuildError> {
        Bill::new(self.items.clone(), self.fees.clone()).map_err(BuildError::from)
    }
}

fn mint_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use waribill_domain::BillError;

    use super::*;

    fn money(value: &str) -> Money {
        value.parse().expect("literal amount")
    }

    #[test]
    fn builds_a_bill_with_minted_unique_ids() {
        let mut builder = BillBuilder::new();
        builder.add_item("Fries", money("10"), 2).unwrap();
        builder.add_item("Cola", money("3"), 1).unwrap();
        builder
            .add_fee("Delivery", money("6"), Apportionment::PerOrder)
            .unwrap();

        let bill = builder.build().unwrap();
        assert_eq!(bill.items().len(), 2);
        assert_eq!(bill.extra_fees().len(), 1);
        assert_ne!(bill.items()[0].id(), bill.items()[1].id());
    }

    #[rstest]
    #[case("0", 0)]
    #[case("-1", 1)]
    fn invalid_manual_items_are_rejected(#[case] price: &str, #[case] quantity: u32) {
        let mut builder = BillBuilder::new();
        assert!(builder.add_item("Bad", money(price), quantity).is_err());
        assert!(builder.items().is_empty());
    }

    #[test]
    fn removal_by_id_edits_the_draft() {
        let mut builder = BillBuilder::new();
        let id = builder.add_item("Fries", money("10"), 2).unwrap();
        assert!(builder.remove_item(&id));
        assert!(!builder.remove_item(&id));
        assert!(builder.build().unwrap().is_empty());
    }

    #[test]
    fn merge_maps_extraction_entries_through_the_domain() {
        let payload = r#"{
            "items": [{"name": "Fried Chicken", "quantity": 4, "price": 29.9}],
            "extraFees": [{"name": "Service", "amount": 20, "type": "perPerson", "expectedCount": 4}]
        }"#;
        let receipt = ExtractedReceipt::from_json(payload).unwrap();

        let mut builder = BillBuilder::new();
        builder.merge_extraction(receipt).unwrap();

        let bill = builder.build().unwrap();
        assert_eq!(bill.items()[0].quantity(), 4);
        assert_eq!(
            bill.extra_fees()[0].apportionment(),
            Apportionment::PerPerson {
                expected_headcount: 4
            }
        );
    }

    #[test]
    fn merge_is_all_or_nothing() {
        let payload = r#"{
            "items": [
                {"name": "Good", "quantity": 1, "price": 5},
                {"name": "Bad", "quantity": 0, "price": 5}
            ],
            "extraFees": []
        }"#;
        let receipt = ExtractedReceipt::from_json(payload).unwrap();

        let mut builder = BillBuilder::new();
        let err = builder.merge_extraction(receipt).unwrap_err();
        assert_eq!(
            err,
            BuildError::ExtractedItem {
                index: 1,
                name: "Bad".into(),
                source: BillError::ZeroQuantityItem { name: "Bad".into() }
            }
        );
        assert!(builder.items().is_empty());
    }

    #[test]
    fn rebuilding_after_an_edit_yields_a_new_bill() {
        let mut builder = BillBuilder::new();
        builder.add_item("Fries", money("10"), 2).unwrap();
        let first = builder.build().unwrap();

        builder.add_item("Cola", money("3"), 1).unwrap();
        let second = builder.build().unwrap();

        assert_eq!(first.items().len(), 1);
        assert_eq!(second.items().len(), 2);
    }
}
