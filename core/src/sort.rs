//! Quicksort kernels built on the Hoare partition scheme, plus the Lomuto
//! variant used by the cross-language comparison suite.

use crate::alloc::{AllocError, try_filled};
use crate::rng::Lcg;

/// Ranges shorter than this are handed to insertion sort by [`quicksort_hybrid`].
pub const INSERTION_THRESHOLD: usize = 16;

/// Default element count of the quicksort program.
pub const DEFAULT_N: usize = 1_000_000;

/// Hoare partition of `arr[low..=high]` around its middle element.
///
/// Returns `j` such that every element of `low..=j` is `<=` the pivot and
/// every element of `j + 1..=high` is `>=` it. `low <= j < high` whenever
/// `low < high`.
pub fn partition_hoare<T: Ord + Copy>(arr: &mut [T], low: usize, high: usize) -> usize {
    let pivot = arr[low + (high - low) / 2];
    let mut i = low;
    let mut j = high;
    loop {
        while arr[i] < pivot {
            i += 1;
        }
        while arr[j] > pivot {
            j -= 1;
        }
        if i >= j {
            return j;
        }
        arr.swap(i, j);
        i += 1;
        j -= 1;
    }
}

/// Plain recursive quicksort; recursion depth is unbounded.
pub fn quicksort<T: Ord + Copy>(arr: &mut [T]) {
    if arr.len() > 1 {
        quicksort_range(arr, 0, arr.len() - 1);
    }
}

fn quicksort_range<T: Ord + Copy>(arr: &mut [T], low: usize, high: usize) {
    if low < high {
        let p = partition_hoare(arr, low, high);
        quicksort_range(arr, low, p);
        quicksort_range(arr, p + 1, high);
    }
}

/// Quicksort that finishes small ranges with insertion sort and only
/// recurses into the smaller partition, keeping depth at O(log n).
pub fn quicksort_hybrid<T: Ord + Copy>(arr: &mut [T]) {
    if arr.len() > 1 {
        hybrid_range(arr, 0, arr.len() - 1);
    }
}

fn hybrid_range<T: Ord + Copy>(arr: &mut [T], mut low: usize, mut high: usize) {
    while low < high {
        if high - low < INSERTION_THRESHOLD {
            insertion_sort(&mut arr[low..=high]);
            return;
        }

        let p = partition_hoare(arr, low, high);
        if p - low < high - p {
            hybrid_range(arr, low, p);
            low = p + 1;
        } else {
            hybrid_range(arr, p + 1, high);
            high = p;
        }
    }
}

pub fn insertion_sort<T: Ord + Copy>(arr: &mut [T]) {
    for i in 1..arr.len() {
        let key = arr[i];
        let mut j = i;
        while j > 0 && arr[j - 1] > key {
            arr[j] = arr[j - 1];
            j -= 1;
        }
        arr[j] = key;
    }
}

/// Lomuto partition quicksort with the last element as pivot.
pub fn quicksort_lomuto<T: Ord + Copy>(arr: &mut [T]) {
    if arr.len() <= 1 {
        return;
    }
    let last = arr.len() - 1;
    let pivot = arr[last];
    let mut store = 0;
    for j in 0..last {
        if arr[j] <= pivot {
            arr.swap(store, j);
            store += 1;
        }
    }
    arr.swap(store, last);

    let (left, right) = arr.split_at_mut(store);
    quicksort_lomuto(left);
    quicksort_lomuto(&mut right[1..]);
}

pub fn is_sorted<T: Ord>(arr: &[T]) -> bool {
    arr.windows(2).all(|w| w[0] <= w[1])
}

/// Fisher-Yates, walking from the last index down.
pub fn shuffle<T>(arr: &mut [T], rng: &mut Lcg) {
    for i in (1..arr.len()).rev() {
        let j = rng.below(i as u64 + 1) as usize;
        arr.swap(i, j);
    }
}

/// `0..n` shuffled with a generator seeded by `seed`.
pub fn shuffled_sequence(n: usize, seed: u64) -> Result<Vec<i64>, AllocError> {
    let mut arr = try_filled("sort input", n, 0i64)?;
    for (i, slot) in arr.iter_mut().enumerate() {
        *slot = i as i64;
    }
    shuffle(&mut arr, &mut Lcg::new(seed));
    Ok(arr)
}

/// Overwrite `arr` with LCG values in `0..1_000_000`, as the comparison suite does.
pub fn fill_lcg(arr: &mut [i64], seed: u64) {
    let mut rng = Lcg::new(seed);
    for slot in arr.iter_mut() {
        *slot = ((rng.next_raw() >> 16) % 1_000_000) as i64;
    }
}
