//! Heuristic receipt-text scanning.
//!
//! Turns recognized receipt text into the same candidate shape the
//! external extraction collaborator produces, so a bill can be drafted
//! offline from OCR output alone. Line conventions: an item line carries
//! a name and a unit price, optionally an `xN` order count; fee and total
//! lines are recognized by keyword. The scan is only a proposal; every
//! entry still passes the bill builder's validation before it can be
//! shared.

use rust_decimal::Decimal;

use crate::{
    error::ReceiptParseError,
    extraction::{ExtractedFee, ExtractedFeeKind, ExtractedItem, ExtractedReceipt},
};

/// Scanned candidates plus the receipt's own stated total, used to
/// cross-check the proposal against what was actually paid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptScan {
    pub receipt: ExtractedReceipt,
    pub stated_total: Option<Decimal>,
}

impl ReceiptScan {
    /// Whether the scanned entries add up to the receipt's stated total.
    /// A receipt without a recognizable total line has nothing to
    /// contradict and reconciles trivially.
    pub fn reconciles(&self) -> bool {
        let Some(stated) = self.stated_total else {
            return true;
        };
        let scanned: Decimal = self
            .receipt
            .items
            .iter()
            .map(|item| item.price)
            .chain(self.receipt.extra_fees.iter().map(|fee| fee.amount))
            .sum();
        scanned == stated
    }
}

pub fn scan_receipt_text(text: &str) -> Result<ReceiptScan, ReceiptParseError> {
    let mut items = Vec::new();
    let mut extra_fees = Vec::new();
    let mut stated_total = None;

    for raw_line in text.lines() {
        let line = normalize_line(raw_line);
        if line.is_empty() {
            continue;
        }

        let Some(parsed) = parse_line(&line) else {
            tracing::debug!("no amount recognized, skipping line {line:?}");
            continue;
        };

        match classify_line(&line) {
            LineKind::Total => stated_total = Some(parsed.amount),
            LineKind::Noise => {}
            LineKind::Fee => extra_fees.push(ExtractedFee {
                name: parsed.name,
                amount: parsed.amount,
                kind: ExtractedFeeKind::PerOrder,
                expected_count: None,
            }),
            LineKind::Item => {
                if parsed.name.is_empty() {
                    tracing::debug!("amount without a name, skipping line {line:?}");
                    continue;
                }
                // The line's amount is the unit price when an order count
                // is present, the line total otherwise.
                let quantity = parsed.quantity.unwrap_or(1);
                let price = match parsed.quantity {
                    Some(count) => parsed.amount * Decimal::from(count),
                    None => parsed.amount,
                };
                items.push(ExtractedItem {
                    name: parsed.name,
                    quantity,
                    price,
                });
            }
        }
    }

    if items.is_empty() {
        return Err(ReceiptParseError::NoItems);
    }

    let scan = ReceiptScan {
        receipt: ExtractedReceipt { items, extra_fees },
        stated_total,
    };
    if !scan.reconciles() {
        tracing::warn!(
            "scanned entries do not add up to the stated total {:?}",
            scan.stated_total
        );
    }
    Ok(scan)
}

enum LineKind {
    Total,
    Noise,
    Fee,
    Item,
}

const TOTAL_KEYWORDS: &[&str] = &["総合計", "合計", "合计", "总计", "实付", "TOTAL"];
const NOISE_KEYWORDS: &[&str] = &["小計", "小计", "SUBTOTAL", "原価", "原价", "折扣", "DISCOUNT"];
const FEE_KEYWORDS: &[&str] = &[
    "配送", "外送", "运费", "送料", "DELIVERY", "SHIPPING", "服务费", "SERVICE", "包装",
    "PACKAGING",
];

fn classify_line(line: &str) -> LineKind {
    let upper = line.to_uppercase();
    if TOTAL_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        LineKind::Total
    } else if NOISE_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        LineKind::Noise
    } else if FEE_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        LineKind::Fee
    } else {
        LineKind::Item
    }
}

struct ParsedLine {
    name: String,
    amount: Decimal,
    quantity: Option<u32>,
}

/// Splits a line into name text, the last money amount on it, and an
/// optional `xN` order count. Lines without an amount yield nothing.
fn parse_line(line: &str) -> Option<ParsedLine> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut amount = None;
    let mut quantity = None;

    for token in line.split_whitespace() {
        if let Some(count) = parse_order_count(token) {
            quantity = Some(count);
            continue;
        }
        // A currency marker may glue the name to the price: "Fries¥10.5".
        for part in token.split('¥') {
            if part.is_empty() {
                continue;
            }
            if let Some(value) = parse_amount(part) {
                amount = Some(value);
            } else {
                name_parts.push(part);
            }
        }
    }

    amount.map(|amount| ParsedLine {
        name: name_parts.join(" "),
        amount,
        quantity,
    })
}

fn parse_order_count(token: &str) -> Option<u32> {
    let digits = token.strip_prefix('x')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_amount(part: &str) -> Option<Decimal> {
    let cleaned = part.trim_end_matches('円').replace(',', "");
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// Undoes the OCR damage amounts commonly suffer: full-width digits and
/// punctuation, letter-for-digit confusions next to digits, stray
/// whitespace.
fn normalize_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut output = String::with_capacity(line.len());

    for (idx, c) in chars.iter().copied().enumerate() {
        let mapped = match c {
            '０'..='９' => char::from_u32((c as u32) - ('０' as u32) + ('0' as u32))
                .unwrap_or(c),
            '，' => ',',
            '．' => '.',
            '￥' => '¥',
            '×' | 'ｘ' | 'Ｘ' => 'x',
            'X' if chars.get(idx + 1).copied().is_some_and(|c| c.is_ascii_digit()) => 'x',
            '\t' | '\r' | '\u{000b}' | '\u{000c}' => ' ',
            'O' | 'o' if next_to_digit(&chars, idx) => '0',
            'I' | 'l' if next_to_digit(&chars, idx) => '1',
            _ => c,
        };
        output.push(mapped);
    }

    output.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn next_to_digit(chars: &[char], idx: usize) -> bool {
    let prev = idx.checked_sub(1).and_then(|i| chars.get(i)).copied();
    let next = chars.get(idx + 1).copied();
    prev.is_some_and(|c| c.is_ascii_digit()) || next.is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: &str) -> Decimal {
        value.parse().expect("literal amount")
    }

    #[test]
    fn scans_items_fees_and_the_stated_total() {
        let text = "醇香土豆泥 ¥9 x2\n\
                    吮指原味鸡 ¥29.9\n\
                    配送费 ¥6\n\
                    合计 ¥53.9";
        let scan = scan_receipt_text(text).unwrap();

        assert_eq!(scan.receipt.items.len(), 2);
        assert_eq!(scan.receipt.items[0].name, "醇香土豆泥");
        assert_eq!(scan.receipt.items[0].quantity, 2);
        assert_eq!(scan.receipt.items[0].price, amount("18"));
        assert_eq!(scan.receipt.items[1].quantity, 1);
        assert_eq!(scan.receipt.extra_fees[0].amount, amount("6"));
        assert_eq!(scan.stated_total, Some(amount("53.9")));
        assert!(scan.reconciles());
    }

    #[test]
    fn full_width_digits_and_order_counts_are_normalized() {
        let scan = scan_receipt_text("土豆泥 ￥９ ×２").unwrap();
        assert_eq!(scan.receipt.items[0].quantity, 2);
        assert_eq!(scan.receipt.items[0].price, amount("18"));
    }

    #[test]
    fn digit_confusions_next_to_digits_are_repaired() {
        let scan = scan_receipt_text("Cola 1O").unwrap();
        assert_eq!(scan.receipt.items[0].price, amount("10"));
    }

    #[test]
    fn glued_currency_markers_split_name_from_price() {
        let scan = scan_receipt_text("Fries¥10.5").unwrap();
        assert_eq!(scan.receipt.items[0].name, "Fries");
        assert_eq!(scan.receipt.items[0].price, amount("10.5"));
    }

    #[test]
    fn subtotal_lines_are_ignored() {
        let text = "Fries ¥10\n小計 ¥10\n合計 ¥10";
        let scan = scan_receipt_text(text).unwrap();
        assert_eq!(scan.receipt.items.len(), 1);
        assert!(scan.reconciles());
    }

    #[test]
    fn mismatched_totals_do_not_reconcile() {
        let text = "Fries ¥10\n合計 ¥99";
        let scan = scan_receipt_text(text).unwrap();
        assert!(!scan.reconciles());
    }

    #[test]
    fn text_without_items_is_an_error() {
        assert_eq!(
            scan_receipt_text("thanks for your visit\ncome again"),
            Err(ReceiptParseError::NoItems)
        );
    }

    #[test]
    fn thousands_separators_parse_as_one_amount() {
        let scan = scan_receipt_text("盛り合わせ 1,280円").unwrap();
        assert_eq!(scan.receipt.items[0].price, amount("1280"));
    }
}
