//! Salted lowest-total selection.
//!
//! Every entry gets a random salt in `[0, M]`, `M` being the highest base
//! score on the roster. The collection is shuffled, sorted by salted
//! total, and the winner is drawn uniformly from the entries tied for the
//! lowest salted total. Salt never leaves this module.

use crate::core::RandomSource;
use crate::domain::model::{AccumulatorEntry, Place};

#[derive(Debug, Clone)]
pub struct Selection {
    /// The chosen entry, carrying its salted total.
    pub winner: AccumulatorEntry,
    /// All entries after salting, ascending by salted total.
    pub salted: Vec<AccumulatorEntry>,
    /// How many entries shared the lowest salted total.
    pub tied: usize,
}

impl Selection {
    pub fn place(&self) -> &Place {
        &self.winner.place
    }
}

pub fn apply_salt<R: RandomSource>(entries: &mut [AccumulatorEntry], rng: &mut R) {
    let Some(max_score) = entries.iter().map(|entry| entry.place.score).max() else {
        return;
    };

    for entry in entries.iter_mut() {
        entry.total = entry.total.saturating_add(rng.salt(max_score));
    }
}

pub fn select_next<R: RandomSource>(
    mut entries: Vec<AccumulatorEntry>,
    rng: &mut R,
) -> Option<Selection> {
    if entries.is_empty() {
        return None;
    }

    apply_salt(&mut entries, rng);

    // 先打亂再穩定排序，同分者不會保留名單順序
    rng.shuffle(&mut entries);
    entries.sort_by_key(|entry| entry.total);

    let lowest = entries[0].total;
    let tied = entries
        .iter()
        .take_while(|entry| entry.total == lowest)
        .count();
    rng.shuffle(&mut entries[..tied]);

    tracing::debug!(
        "Lowest salted total {} shared by {} of {} places",
        lowest,
        tied,
        entries.len()
    );

    Some(Selection {
        winner: entries[0].clone(),
        salted: entries,
        tied,
    })
}
