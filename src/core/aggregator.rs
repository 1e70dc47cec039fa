use crate::domain::model::{find_by_id_mut, AccumulatorEntry, ExtraScore, PlacementRecord, Roster};
use crate::utils::error::{PlacerError, Result};

/// 累計分數超出 i64 範圍時回報是哪個地點、哪份紀錄
fn add_to_total(entry: &mut AccumulatorEntry, amount: i64, file: String) -> Result<()> {
    entry.total = entry.total.checked_add(amount).ok_or_else(|| {
        PlacerError::parse(
            file,
            0,
            format!(
                "running total of place {} ({}) overflows",
                entry.place.id, entry.place.description
            ),
        )
    })?;
    Ok(())
}

/// Folds extras and history into one running total per roster place.
///
/// Each entry starts at the base score, gains every matching extra delta,
/// and gains the place's *base score* again for every placement record
/// that selected it. Entries come back in roster order.
///
/// High-scoring places therefore grow faster each time they are picked,
/// which works against lowest-total selection. Existing record directories
/// depend on this accounting.
pub fn aggregate(
    roster: &Roster,
    extras: &[ExtraScore],
    history: &[PlacementRecord],
) -> Result<Vec<AccumulatorEntry>> {
    let mut entries: Vec<AccumulatorEntry> = roster
        .places()
        .iter()
        .cloned()
        .map(AccumulatorEntry::new)
        .collect();

    for extra in extras {
        let entry = find_by_id_mut(&mut entries, extra.place.id).ok_or_else(|| {
            PlacerError::ReferenceError {
                id: extra.place.id,
                file: "extra scores".to_string(),
            }
        })?;
        add_to_total(entry, extra.delta, "extra scores".to_string())?;
    }

    for record in history {
        let entry = find_by_id_mut(&mut entries, record.place.id).ok_or_else(|| {
            PlacerError::ReferenceError {
                id: record.place.id,
                file: format!("placement {}", record.sequence),
            }
        })?;
        // 以名單上的基本分數累加，而不是紀錄中攜帶的分數
        let score = entry.place.score;
        add_to_total(entry, score, format!("placement {}", record.sequence))?;
    }

    Ok(entries)
}
