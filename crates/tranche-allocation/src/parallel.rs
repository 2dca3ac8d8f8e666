//! Conditional parallel iteration.
//!
//! Uses rayon when the `parallel` feature is enabled and the
//! [`SweepOptions`] allow it; otherwise falls back to a sequential map.
//! Results are always collected in input order.

use crate::scenario::SweepOptions;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `options.parallel` is true
/// - The collection size reaches `options.parallel_threshold`
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], options: &SweepOptions, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if options.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
