use crate::models::coin::CoinRecord;
use crate::models::sort::{SortKey, SortState};

/// Return a copy of `records` ordered by `key`.
///
/// Stable: records that compare equal keep their upstream order. Records
/// without a value for `key` go last in both directions.
pub fn sort_by(records: &[CoinRecord], key: SortKey, ascending: bool) -> Vec<CoinRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b, ascending));
    sorted
}

/// [`sort_by`] driven by a table sort state.
pub fn sort_by_state(records: &[CoinRecord], state: SortState) -> Vec<CoinRecord> {
    sort_by(records, state.key, state.ascending)
}
