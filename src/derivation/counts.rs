use serde::Serialize;
use std::collections::BTreeMap;

use crate::derivation::Classified;

/// Count of elements per class. Every class is present, possibly with zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCounts<C: Ord> {
    counts: BTreeMap<C, usize>,
}

impl<C: Ord + Copy> GroupCounts<C> {
    pub fn get(&self, class: C) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (C, usize)> + '_ {
        self.counts.iter().map(|(class, count)| (*class, *count))
    }
}

pub fn group_counts<T: Classified>(items: Option<&[T]>) -> GroupCounts<T::Class> {
    let mut counts: BTreeMap<T::Class, usize> = T::CLASSES.iter().map(|c| (*c, 0)).collect();
    for class in items.unwrap_or(&[]).iter().filter_map(|item| item.class()) {
        *counts.entry(class).or_insert(0) += 1;
    }
    GroupCounts { counts }
}
