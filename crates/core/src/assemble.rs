use crate::entity::{EntityLabel, LabeledSpan, LabeledSpans};
use crate::normalize::{clean_price, split_quantity};
use crate::receipt::{ReceiptItem, StoreInfo, StructuredReceipt};

/// Stored as the unit price when a quantity fragment has no second number.
pub const UNPARSED_UNIT_PRICE: &str = "Could not parse unit price";

/// Where the item under construction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// No name, quantity or price seen yet.
    Empty,
    /// Some, but not all, of name, quantity and price.
    Partial,
    /// Name, quantity and price all present: ready to emit.
    Complete,
}

/// Accumulates the fields of the item currently being read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub price: Option<String>,
}

impl ItemDraft {
    pub fn state(&self) -> DraftState {
        let present = [&self.name, &self.quantity, &self.price]
            .iter()
            .filter(|f| f.is_some())
            .count();
        match present {
            0 => DraftState::Empty,
            3 => DraftState::Complete,
            _ => DraftState::Partial,
        }
    }

    fn into_item(self) -> ReceiptItem {
        ReceiptItem {
            name: self.name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            price: self.price,
        }
    }
}

/// Single-pass grouping of labeled spans into a [`StructuredReceipt`].
///
/// Item boundaries come only from field completeness: once the current draft
/// holds a name, a quantity and a price it is emitted and a new one starts.
/// Fields of two items interleaved before either completes end up merged
/// into one item.
#[derive(Debug, Default)]
pub struct ReceiptAssembler {
    store_name: Option<String>,
    items: Vec<ReceiptItem>,
    totals: Vec<String>,
    current: ItemDraft,
}

impl ReceiptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next span in reading order.
    pub fn push(&mut self, span: &LabeledSpan) {
        match span.label {
            EntityLabel::ShopName if self.store_name.is_none() => {
                self.store_name = Some(span.text.clone());
            }
            EntityLabel::Quantity => {
                let (quantity, unit_price) = split_quantity(&span.text);
                self.current.quantity = Some(quantity);
                self.current.unit_price =
                    Some(unit_price.unwrap_or_else(|| UNPARSED_UNIT_PRICE.to_string()));
            }
            EntityLabel::Price => self.current.price = Some(clean_price(&span.text)),
            EntityLabel::Product => self.current.name = Some(span.text.clone()),
            _ => {}
        }

        if self.current.state() == DraftState::Complete {
            let done = std::mem::take(&mut self.current);
            self.items.push(done.into_item());
        } else if span.label == EntityLabel::Total {
            self.totals.push(clean_price(&span.text));
        }
    }

    pub fn current_state(&self) -> DraftState {
        self.current.state()
    }

    /// Close the pass. A trailing partial draft is kept as an item.
    pub fn finish(mut self) -> StructuredReceipt {
        if self.current.state() != DraftState::Empty {
            self.items.push(self.current.into_item());
        }
        StructuredReceipt {
            store: StoreInfo { name: self.store_name.filter(|n| !n.is_empty()) },
            items: self.items,
            total: self.totals.pop(),
        }
    }
}

/// Assemble a receipt from spans in reading order.
pub fn assemble(spans: &LabeledSpans) -> StructuredReceipt {
    let mut assembler = ReceiptAssembler::new();
    for span in spans {
        assembler.push(span);
    }
    assembler.finish()
}
