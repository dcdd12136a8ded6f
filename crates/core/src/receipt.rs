use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One purchased line. Every field is optional: a trailing partial line is
/// reported with whatever was recognized for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// The structured purchase record assembled from a receipt.
///
/// Amounts stay as the normalized strings produced from the recognized text;
/// use [`StructuredReceipt::total_amount`] for a numeric total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReceipt {
    pub store: StoreInfo,
    pub items: Vec<ReceiptItem>,
    pub total: Option<String>,
}

impl StructuredReceipt {
    /// The total as a 2-place decimal, or `None` when absent or not numeric.
    pub fn total_amount(&self) -> Option<Decimal> {
        let total = self.total.as_deref()?;
        Decimal::from_str(total).ok().map(|d| d.round_dp(2))
    }
}
