// ========================================================================================
//
//                           THE LAZY GREEDY SELECTION LOOP
//
// ========================================================================================
//
// This module drives the iterate-and-confirm loop over the coverage network.
// After the one-time initial sort, each pick is obtained by refreshing only the
// tail entry of the priority list until a refresh leaves it in place. Because
// every recorded total is an upper bound on its node's live total (totals only
// ever decrease as tracts are credited), a tail that survives its own refresh
// cannot be beaten by any stale entry below it: it is the true current maximum,
// with no full rescan needed. The picks are identical to those of an eager greedy
// that re-sorts the entire list after every take; the eager variant exists in
// the tests below as the oracle.

use crate::network::Network;
use crate::types::Pick;

/// Extracts up to `k` picks in selection order.
///
/// The selection ends early once no entry with positive total remains: a pick
/// that credits nothing is noise, so a short list is the correct result rather
/// than an error. The very first pick may take directly; no entry is stale
/// until the first take has happened.
pub fn select_top_k(network: &mut Network, k: usize) -> Vec<Pick> {
    network.initial_sort();
    let mut picks = Vec::with_capacity(k.min(network.node_count()));

    for round in 0..k {
        if round > 0 {
            while !network.sort_single() {}
        }
        match network.peek_total() {
            Some(total) if total > 0.0 => {}
            _ => break,
        }
        match network.take() {
            Some((geo_id, value)) => {
                log::debug!("pick {}: {} ({})", round + 1, geo_id, value);
                picks.push(Pick { geo_id, value });
            }
            None => break,
        }
    }
    picks
}
