use serde::{Deserialize, Serialize};

use crate::keys::SequenceNo;

/// A commercial obligation issued by a Company to a named Supplier.
///
/// The order reserves the receivable key that signing will create. It is
/// written once and never updated; after signing, the receivable carries its
/// own lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecOrder {
    pub order_no: String,
    pub goods_no: String,
    pub receivable_no: String,
    /// The issuing Company.
    pub owner_id: String,
    /// The Supplier expected to sign.
    pub acceptor_id: String,
    /// Face value.
    pub total_amount: u64,
}

impl RecOrder {
    /// Build the order for sequence number `seq`.
    pub fn new(
        seq: SequenceNo,
        owner_id: impl Into<String>,
        acceptor_id: impl Into<String>,
        total_amount: u64,
    ) -> Self {
        Self {
            order_no: seq.order_no(),
            goods_no: seq.goods_no(),
            receivable_no: seq.receivable_no(),
            owner_id: owner_id.into(),
            acceptor_id: acceptor_id.into(),
            total_amount,
        }
    }
}
