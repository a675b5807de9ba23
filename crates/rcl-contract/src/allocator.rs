//! Order sequence allocation.
//!
//! The allocated number names the order, its goods, and the receivable that
//! signing will create. A number is only handed out if neither `order{n}` nor
//! `rec{n}` is taken; uniqueness across concurrent creations still rests on
//! the store rejecting one of two commits that read the same keys.

use tracing::debug;

use rcl_store::{LedgerStore, Transaction};
use rcl_types::{KeyPrefix, SequenceNo};

use crate::config::{AllocationStrategy, ContractConfig};
use crate::error::{ContractError, ContractResult};
use crate::query;

/// Counter record for [`AllocationStrategy::Counter`]. Sits outside every
/// listed namespace.
pub const ORDER_COUNTER_KEY: &str = "~seq/order";

/// Pick the sequence number for the next order within `tx`.
///
/// Under the counter strategy the counter is advanced in the same
/// transaction, so it commits or aborts together with the order.
pub fn next_sequence<S>(tx: &mut Transaction<'_, S>, config: &ContractConfig) -> ContractResult<SequenceNo>
where
    S: LedgerStore + ?Sized,
{
    let base = match config.allocation {
        AllocationStrategy::Counter => read_counter(tx)?,
        AllocationStrategy::Scan => query::count_keys(tx, KeyPrefix::Order, config.scan)?,
    };

    let attempts = config.max_allocation_probes.saturating_add(1);
    let mut candidate = base;
    for probe in 0..attempts {
        candidate = candidate
            .checked_add(1)
            .ok_or(ContractError::AllocationExhausted { attempts: probe })?;
        let seq = SequenceNo::new(candidate)?;
        if tx.contains(&seq.order_no())? || tx.contains(&seq.receivable_no())? {
            debug!(candidate, "sequence number taken, probing next");
            continue;
        }
        if config.allocation == AllocationStrategy::Counter {
            tx.put_json(ORDER_COUNTER_KEY, &candidate)?;
        }
        return Ok(seq);
    }
    Err(ContractError::AllocationExhausted { attempts })
}

fn read_counter<S>(tx: &mut Transaction<'_, S>) -> ContractResult<u64>
where
    S: LedgerStore + ?Sized,
{
    match tx.get(ORDER_COUNTER_KEY)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| ContractError::Codec(format!("{ORDER_COUNTER_KEY}: {e}"))),
        None => query::highest_suffix(tx, KeyPrefix::Order),
    }
}
