pub mod assemble;
pub mod entity;
pub mod normalize;
pub mod receipt;

pub use assemble::{assemble, DraftState, ItemDraft, ReceiptAssembler, UNPARSED_UNIT_PRICE};
pub use entity::{EntityLabel, LabeledSpan, LabeledSpans};
pub use normalize::{clean_price, split_quantity};
pub use receipt::{ReceiptItem, StoreInfo, StructuredReceipt};
