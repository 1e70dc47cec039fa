use crate::config::toml_config::LayoutConfig;
use crate::core::placement;
use crate::core::RecordStore;
use crate::domain::model::{ExtraScore, Place, PlaceId, PlacementRecord, Roster};
use crate::utils::error::{PlacerError, Result};
use std::str::{FromStr, SplitWhitespace};

/// Everything a run needs, loaded fresh from the directory.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub roster: Roster,
    pub extras: Vec<ExtraScore>,
    pub history: Vec<PlacementRecord>,
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn next_field<T: FromStr>(
    tokens: &mut SplitWhitespace<'_>,
    file: &str,
    line: usize,
    field: &str,
) -> Result<T> {
    let token = tokens
        .next()
        .ok_or_else(|| PlacerError::parse(file, line, format!("missing {}", field)))?;
    token.parse::<T>().map_err(|_| {
        PlacerError::parse(file, line, format!("{} `{}` is not an integer", field, token))
    })
}

/// 解析名單的一行：`id score description`
pub fn parse_place_line(text: &str, file: &str, line: usize) -> Result<Place> {
    let mut tokens = text.split_whitespace();
    let id = next_field::<PlaceId>(&mut tokens, file, line, "id")?;
    let score = next_field::<i64>(&mut tokens, file, line, "score")?;

    let description = tokens.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err(PlacerError::parse(file, line, "missing description"));
    }

    Ok(Place::new(id, score, description))
}

pub fn read_roster<S: RecordStore + ?Sized>(store: &S, layout: &LayoutConfig) -> Result<Roster> {
    let lines = store.read_lines(&layout.roster).map_err(|e| {
        PlacerError::not_found(format!(
            "roster {} in {} ({})",
            layout.roster,
            store.location().display(),
            e
        ))
    })?;

    let mut roster = Roster::default();

    // 第一行是標題
    for (index, text) in lines.iter().enumerate().skip(1) {
        if is_blank(text) {
            continue;
        }
        let place = parse_place_line(text, &layout.roster, index + 1)?;
        roster.push(place).map_err(|duplicate| {
            PlacerError::parse(
                &layout.roster,
                index + 1,
                format!("duplicate place id {}", duplicate.id),
            )
        })?;
    }

    tracing::debug!("Loaded {} places from {}", roster.len(), layout.roster);
    Ok(roster)
}

/// Parses one extra file. A first line that does not start with an
/// integer is a header and is skipped.
pub fn parse_extra_lines(name: &str, lines: &[String], roster: &Roster) -> Result<Vec<ExtraScore>> {
    let mut extras = Vec::new();

    for (index, text) in lines.iter().enumerate() {
        if is_blank(text) {
            continue;
        }

        let mut tokens = text.split_whitespace();
        let first = tokens.clone().next().unwrap_or_default();
        if index == 0 && first.parse::<PlaceId>().is_err() {
            continue;
        }

        let id = next_field::<PlaceId>(&mut tokens, name, index + 1, "id")?;
        let delta = next_field::<i64>(&mut tokens, name, index + 1, "delta")?;
        if tokens.next().is_some() {
            return Err(PlacerError::parse(
                name,
                index + 1,
                "unexpected text after the delta",
            ));
        }

        let place = roster
            .find(id)
            .cloned()
            .ok_or_else(|| PlacerError::ReferenceError {
                id,
                file: name.to_string(),
            })?;
        extras.push(ExtraScore { place, delta });
    }

    Ok(extras)
}

pub fn read_extra_scores<S: RecordStore + ?Sized>(
    store: &S,
    roster: &Roster,
    layout: &LayoutConfig,
) -> Result<Vec<ExtraScore>> {
    let mut extras = Vec::new();

    for name in store.list(&layout.extra_extension)? {
        let lines = store.read_lines(&name)?;
        let scores = parse_extra_lines(&name, &lines, roster)?;
        tracing::debug!("{}: {} adjustments", name, scores.len());
        extras.extend(scores);
    }

    Ok(extras)
}

/// 讀取所有歷史紀錄，依序號排序
pub fn read_placement_records<S: RecordStore + ?Sized>(
    store: &S,
    roster: &Roster,
    layout: &LayoutConfig,
) -> Result<Vec<PlacementRecord>> {
    let mut history = Vec::new();

    for (sequence, name) in placement::list_placements(store, layout)? {
        let id = placement::parse_placement(&name, &store.read_lines(&name)?)?;
        let place = roster
            .find(id)
            .cloned()
            .ok_or_else(|| PlacerError::ReferenceError {
                id,
                file: name.clone(),
            })?;
        history.push(PlacementRecord { sequence, place });
    }

    history.sort_by_key(|record| record.sequence);
    Ok(history)
}

pub fn read_records<S: RecordStore + ?Sized>(store: &S, layout: &LayoutConfig) -> Result<RecordSet> {
    let roster = read_roster(store, layout)?;
    let extras = read_extra_scores(store, &roster, layout)?;
    let history = read_placement_records(store, &roster, layout)?;

    tracing::debug!(
        "Read {} places, {} extra scores, {} placements from {}",
        roster.len(),
        extras.len(),
        history.len(),
        store.location().display()
    );

    Ok(RecordSet {
        roster,
        extras,
        history,
    })
}
