//! Origin partitioning for parallel skim computation.

use std::ops::Range;

/// Split `0..n` into `k` contiguous ranges whose lengths differ by at most
/// one, earlier ranges taking the remainder.
///
/// `k` is clamped to `1..=n`; `n == 0` yields no ranges.
///
/// ```
/// use lu_travel::partition;
/// assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
/// ```
pub fn partition(n: usize, k: usize) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);
    let base = n / k;
    let rem = n % k;
    let mut out = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let len = base + usize::from(i < rem);
        out.push(start..start + len);
        start += len;
    }
    debug_assert_eq!(start, n);
    out
}
