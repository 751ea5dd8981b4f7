//! JSON wire form of a bill.
//!
//! Field names match the reference's documented shape: `items[].price` is
//! the line's total paid price, `extraFees[].type` selects the
//! apportionment, and `expectedCount` accompanies `perPerson` fees
//! (absent means 1, the one documented wire default).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use waribill_domain::{Apportionment, Bill, ExtraFee, FeeId, Item, ItemId, Money};

use crate::DecodeError;

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct BillWire {
    items: Vec<ItemWire>,
    #[serde(rename = "extraFees")]
    extra_fees: Vec<FeeWire>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ItemWire {
    id: String,
    name: String,
    price: Decimal,
    quantity: u32,
}

#[derive(Debug, Deserialize, Serialize)]
struct FeeWire {
    id: String,
    name: String,
    amount: Decimal,
    #[serde(rename = "type")]
    kind: FeeKindWire,
    #[serde(
        rename = "expectedCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    expected_count: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
enum FeeKindWire {
    #[serde(rename = "perOrder")]
    PerOrder,
    #[serde(rename = "perPerson")]
    PerPerson,
}

impl From<&Bill> for BillWire {
    fn from(bill: &Bill) -> Self {
        let items = bill
            .items()
            .iter()
            .map(|item| ItemWire {
                id: item.id().as_str().to_owned(),
                name: item.name().to_owned(),
                price: item.total_price().as_decimal(),
                quantity: item.quantity(),
            })
            .collect();
        let extra_fees = bill
            .extra_fees()
            .iter()
            .map(|fee| {
                let (kind, expected_count) = match fee.apportionment() {
                    Apportionment::PerOrder => (FeeKindWire::PerOrder, None),
                    Apportionment::PerPerson { expected_headcount } => {
                        (FeeKindWire::PerPerson, Some(expected_headcount))
                    }
                };
                FeeWire {
                    id: fee.id().as_str().to_owned(),
                    name: fee.name().to_owned(),
                    amount: fee.amount().as_decimal(),
                    kind,
                    expected_count,
                }
            })
            .collect();
        Self { items, extra_fees }
    }
}

impl BillWire {
    /// Maps the wire form into a validated bill. Every domain invariant
    /// violation surfaces as a schema mismatch.
    pub(crate) fn into_bill(self) -> Result<Bill, DecodeError> {
        let mut items = Vec::with_capacity(self.items.len());
        for wire in self.items {
            let item = Item::new(
                ItemId::new(wire.id),
                wire.name,
                Money::from_decimal(wire.price),
                wire.quantity,
            )
            .map_err(|err| DecodeError::schema(err.to_string()))?;
            items.push(item);
        }

        let mut fees = Vec::with_capacity(self.extra_fees.len());
        for wire in self.extra_fees {
            let apportionment = match wire.kind {
                FeeKindWire::PerOrder => Apportionment::PerOrder,
                FeeKindWire::PerPerson => Apportionment::PerPerson {
                    expected_headcount: wire.expected_count.unwrap_or(1),
                },
            };
            let fee = ExtraFee::new(
                FeeId::new(wire.id),
                wire.name,
                Money::from_decimal(wire.amount),
                apportionment,
            )
            .map_err(|err| DecodeError::schema(err.to_string()))?;
            fees.push(fee);
        }

        Bill::new(items, fees).map_err(|err| DecodeError::schema(err.to_string()))
    }
}
