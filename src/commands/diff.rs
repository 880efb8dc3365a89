use std::collections::HashSet;
use std::hash::Hash;

/// Every name in `after` that is not in `before`, in the order `after` lists them.
pub fn compute_new_files<T: Eq + Hash + Clone>(before: &[T], after: &[T]) -> Vec<T> {
    let old: HashSet<&T> = before.iter().collect();

    after
        .iter()
        .filter(|name| !old.contains(name))
        .cloned()
        .collect()
}
