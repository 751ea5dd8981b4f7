use std::{
    collections::HashSet,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Sub},
    str::FromStr,
};

use rust_decimal::Decimal;
use thiserror::Error;

/// A monetary amount in the bill's (single, unspecified) currency.
///
/// Decimal-backed so that unit prices and fee shares survive division
/// without binary-float drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// One of `ways` equal shares of this amount. `ways` must be nonzero;
    /// all callers divide by a validated headcount or a checked unit count.
    pub(crate) fn split(self, ways: u32) -> Self {
        Self(self.0 / Decimal::from(ways))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

/// Opaque identifier of a bill line item, stable across encode/decode.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of an extra fee, stable across encode/decode.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeeId(String);

impl FeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BillError {
    #[error("item {name:?} must represent at least one unit")]
    ZeroQuantityItem { name: String },
    #[error("item {name:?} has a negative total price")]
    NegativeItemPrice { name: String },
    #[error("item {name:?} has an empty id")]
    EmptyItemId { name: String },
    #[error("fee {name:?} has a negative amount")]
    NegativeFeeAmount { name: String },
    #[error("per-person fee {name:?} must expect at least one person")]
    ZeroHeadcountFee { name: String },
    #[error("fee {name:?} has an empty id")]
    EmptyFeeId { name: String },
    #[error("duplicate item id {id}")]
    DuplicateItemId { id: ItemId },
    #[error("duplicate fee id {id}")]
    DuplicateFeeId { id: FeeId },
}

/// One line of the bill: `quantity` interchangeable units bought for
/// `total_price` (already net of any per-item discount).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    total_price: Money,
    quantity: u32,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        total_price: Money,
        quantity: u32,
    ) -> Result<Self, BillError> {
        let name = name.into();
        if id.as_str().is_empty() {
            return Err(BillError::EmptyItemId { name });
        }
        if quantity == 0 {
            return Err(BillError::ZeroQuantityItem { name });
        }
        if total_price.is_negative() {
            return Err(BillError::NegativeItemPrice { name });
        }
        Ok(Self {
            id,
            name,
            total_price,
            quantity,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit. Derived, never stored; `quantity >= 1` makes the
    /// division total.
    pub fn unit_price(&self) -> Money {
        self.total_price.split(self.quantity)
    }
}

/// How an extra fee is spread over the people sharing the bill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Apportionment {
    /// Spread across the units the viewing participant claims.
    PerOrder,
    /// One equal share per expected participant, claimed units or not.
    PerPerson { expected_headcount: u32 },
}

/// A charge on the order that is not a line item: delivery, packaging,
/// table service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtraFee {
    id: FeeId,
    name: String,
    amount: Money,
    apportionment: Apportionment,
}

impl ExtraFee {
    pub fn new(
        id: FeeId,
        name: impl Into<String>,
        amount: Money,
        apportionment: Apportionment,
    ) -> Result<Self, BillError> {
        let name = name.into();
        if id.as_str().is_empty() {
            return Err(BillError::EmptyFeeId { name });
        }
        if amount.is_negative() {
            return Err(BillError::NegativeFeeAmount { name });
        }
        if let Apportionment::PerPerson {
            expected_headcount: 0,
        } = apportionment
        {
            return Err(BillError::ZeroHeadcountFee { name });
        }
        Ok(Self {
            id,
            name,
            amount,
            apportionment,
        })
    }

    pub fn id(&self) -> &FeeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn apportionment(&self) -> Apportionment {
        self.apportionment
    }
}

/// An immutable order: items and fees in display order.
///
/// A bill never changes once constructed; edits happen by building a new
/// bill and sharing a new reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bill {
    items: Vec<Item>,
    extra_fees: Vec<ExtraFee>,
}

impl Bill {
    /// Item and fee ids must be unique: selections are addressed by item
    /// id, so a collision would make a claim ambiguous.
    pub fn new(items: Vec<Item>, extra_fees: Vec<ExtraFee>) -> Result<Self, BillError> {
        let mut seen_items = HashSet::new();
        for item in &items {
            if !seen_items.insert(item.id()) {
                return Err(BillError::DuplicateItemId {
                    id: item.id().clone(),
                });
            }
        }
        let mut seen_fees = HashSet::new();
        for fee in &extra_fees {
            if !seen_fees.insert(fee.id()) {
                return Err(BillError::DuplicateFeeId {
                    id: fee.id().clone(),
                });
            }
        }
        Ok(Self { items, extra_fees })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn extra_fees(&self) -> &[ExtraFee] {
        &self.extra_fees
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.extra_fees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn money(value: &str) -> Money {
        value.parse().expect("literal amount")
    }

    #[test]
    fn unit_price_divides_total_by_quantity() {
        let item = Item::new(ItemId::new("a"), "Fries", money("10"), 2).unwrap();
        assert_eq!(item.unit_price(), money("5"));
    }

    #[test]
    fn zero_quantity_item_is_rejected() {
        let err = Item::new(ItemId::new("a"), "Fries", money("10"), 0).unwrap_err();
        assert_eq!(
            err,
            BillError::ZeroQuantityItem {
                name: "Fries".into()
            }
        );
    }

    #[rstest]
    #[case("-0.01")]
    #[case("-10")]
    fn negative_item_price_is_rejected(#[case] price: &str) {
        let err = Item::new(ItemId::new("a"), "Fries", money(price), 1).unwrap_err();
        assert_eq!(
            err,
            BillError::NegativeItemPrice {
                name: "Fries".into()
            }
        );
    }

    #[test]
    fn zero_priced_item_is_allowed() {
        assert!(Item::new(ItemId::new("a"), "Freebie", money("0"), 3).is_ok());
    }

    #[test]
    fn per_person_fee_requires_headcount() {
        let err = ExtraFee::new(
            FeeId::new("f"),
            "Service",
            money("20"),
            Apportionment::PerPerson {
                expected_headcount: 0,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            BillError::ZeroHeadcountFee {
                name: "Service".into()
            }
        );
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let first = Item::new(ItemId::new("dup"), "A", money("1"), 1).unwrap();
        let second = Item::new(ItemId::new("dup"), "B", money("2"), 1).unwrap();
        let err = Bill::new(vec![first, second], Vec::new()).unwrap_err();
        assert_eq!(
            err,
            BillError::DuplicateItemId {
                id: ItemId::new("dup")
            }
        );
    }

    #[test]
    fn money_display_round_trips_through_from_str() {
        let value = money("29.90");
        assert_eq!(value.to_string().parse::<Money>().unwrap(), value);
    }
}
