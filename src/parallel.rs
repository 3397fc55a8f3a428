//! Parallel map over an indexed collection.

use rayon::prelude::*;

/// Run `f` on every element of `items` across the worker pool, blocking
/// until all complete.
///
/// The output is position-aligned with the input: slot `i` holds
/// `f(&items[i])` no matter which worker computed it or when it finished.
/// `f` must not touch shared mutable state; each output slot is written
/// exactly once.
pub fn parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    items.par_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_matches_serial_map(items: Vec<u64>) {
            let parallel = parallel_map(&items, |x| x.wrapping_mul(3) ^ 1);
            let serial: Vec<u64> = items.iter().map(|x| x.wrapping_mul(3) ^ 1).collect();
            prop_assert_eq!(parallel, serial);
        }

        #[test]
        fn test_preserves_order(len in 0usize..500) {
            let items: Vec<usize> = (0..len).collect();
            let doubled = parallel_map(&items, |i| i * 2);
            for (i, value) in doubled.iter().enumerate() {
                prop_assert_eq!(*value, i * 2);
            }
        }
    }
}
