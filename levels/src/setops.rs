//! Set algebra over posting sets, independent of where the sets came from.

use std::collections::BTreeSet;

/// Elements present in every set. No sets means no elements.
pub fn intersection<T: Ord + Clone>(sets: &[BTreeSet<T>]) -> BTreeSet<T> {
    let Some(smallest) = sets.iter().min_by_key(|s| s.len()) else {
        return BTreeSet::new();
    };
    smallest
        .iter()
        .filter(|item| sets.iter().all(|s| s.contains(item)))
        .cloned()
        .collect()
}

/// Elements present in at least one set.
pub fn union<T: Ord + Clone>(sets: &[BTreeSet<T>]) -> BTreeSet<T> {
    sets.iter().flat_map(|s| s.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[u64]) -> BTreeSet<u64> {
        items.iter().copied().collect()
    }

    #[test]
    fn intersects() {
        let sets = [set(&[0, 3, 5]), set(&[3, 5, 9]), set(&[5, 3])];
        assert_eq!(intersection(&sets), set(&[3, 5]));
        assert!(intersection(&[set(&[1]), set(&[2])]).is_empty());
        assert_eq!(intersection(&[set(&[4, 2])]), set(&[2, 4]));
    }

    #[test]
    fn unions() {
        let sets = [set(&[2]), set(&[4, 2]), set(&[])];
        assert_eq!(union(&sets), set(&[2, 4]));
    }

    #[test]
    fn no_sets() {
        assert!(intersection::<u64>(&[]).is_empty());
        assert!(union::<u64>(&[]).is_empty());
    }

    #[test]
    fn numeric_not_lexicographic_order() {
        let out: Vec<u64> = union(&[set(&[10, 9]), set(&[100])]).into_iter().collect();
        assert_eq!(out, vec![9, 10, 100]);
    }
}
