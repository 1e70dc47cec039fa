//! Placement records: one file per selection, named by a zero-padded
//! sequence number (`000001.placement`, `000002.placement`, ...).

use crate::config::toml_config::LayoutConfig;
use crate::core::RecordStore;
use crate::domain::model::{Place, PlaceId, PlacementRecord, Roster};
use crate::utils::error::{PlacerError, Result};
use regex::Regex;
use std::path::Path;

const HEADER: &str = "where";

pub fn placement_file_name(sequence: u64, layout: &LayoutConfig) -> String {
    format!(
        "{:0width$}.{}",
        sequence,
        layout.placement_extension,
        width = layout.sequence_width
    )
}

/// 檔名規則：`<digits>.<extension>`，每個 layout 編譯一次
#[derive(Debug, Clone)]
pub struct SequencePattern {
    extension: String,
    re: Regex,
}

impl SequencePattern {
    pub fn new(layout: &LayoutConfig) -> Result<Self> {
        let pattern = format!(r"^(\d+)\.{}$", regex::escape(&layout.placement_extension));
        let re = Regex::new(&pattern).map_err(|e| PlacerError::ConfigError {
            field: "layout.placement_extension".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            extension: layout.placement_extension.clone(),
            re,
        })
    }

    /// 從檔名取出序號
    pub fn parse(&self, name: &str) -> Result<u64> {
        let extension = Path::new(name).extension().and_then(|ext| ext.to_str());
        if extension != Some(self.extension.as_str()) {
            return Err(PlacerError::invalid_argument(format!(
                "{} does not carry the `.{}` extension",
                name, self.extension
            )));
        }

        self.re
            .captures(name)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .ok_or_else(|| {
                PlacerError::invalid_argument(format!(
                    "{} is not named by a sequence number",
                    name
                ))
            })
    }
}

pub fn parse_sequence(name: &str, layout: &LayoutConfig) -> Result<u64> {
    SequencePattern::new(layout)?.parse(name)
}

pub fn render_placement(place: &Place) -> String {
    format!("{}\n{:<7}\n", HEADER, place.id)
}

/// Extracts the place id from the lines of a placement file.
pub fn parse_placement(name: &str, lines: &[String]) -> Result<PlaceId> {
    let mut content = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip_while(|(_, line)| line.trim() == HEADER);

    let (index, line) = content
        .next()
        .ok_or_else(|| PlacerError::parse(name, lines.len(), "no place id"))?;

    let mut tokens = line.split_whitespace();
    let token = tokens.next().unwrap_or_default();
    let id = token.parse::<PlaceId>().map_err(|_| {
        PlacerError::parse(name, index + 1, format!("id `{}` is not an integer", token))
    })?;

    if tokens.next().is_some() {
        return Err(PlacerError::parse(
            name,
            index + 1,
            "unexpected text after the place id",
        ));
    }

    Ok(id)
}

/// Reads a placement file into its sequence number and the id it names,
/// without resolving the id against a roster.
pub fn load_placement_id<S: RecordStore + ?Sized>(
    store: &S,
    name: &str,
    layout: &LayoutConfig,
) -> Result<(u64, PlaceId)> {
    let sequence = parse_sequence(name, layout)?;
    let lines = store.read_lines(name)?;
    let id = parse_placement(name, &lines)?;
    Ok((sequence, id))
}

/// 讀取單一紀錄並對照名單
pub fn read_placement<S: RecordStore + ?Sized>(
    store: &S,
    name: &str,
    roster: &Roster,
    layout: &LayoutConfig,
) -> Result<PlacementRecord> {
    let (sequence, id) = load_placement_id(store, name, layout)?;
    let place = roster.find(id).cloned().ok_or_else(|| {
        PlacerError::not_found(format!("place {} named by {} is not in the roster", id, name))
    })?;

    Ok(PlacementRecord { sequence, place })
}

/// Every placement file in the store with its sequence number, in listing
/// order. Names are kept as listed, whatever their padding.
pub fn list_placements<S: RecordStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
) -> Result<Vec<(u64, String)>> {
    let pattern = SequencePattern::new(layout)?;
    store
        .list(&layout.placement_extension)?
        .into_iter()
        .map(|name| Ok((pattern.parse(&name)?, name)))
        .collect()
}

/// 序號最大的紀錄檔
pub fn latest_placement<S: RecordStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
) -> Result<Option<(u64, String)>> {
    Ok(list_placements(store, layout)?
        .into_iter()
        .max_by_key(|(sequence, _)| *sequence))
}

pub fn last_sequence<S: RecordStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
) -> Result<Option<u64>> {
    Ok(latest_placement(store, layout)?.map(|(sequence, _)| sequence))
}

/// 將選中的地點寫成下一個序號的紀錄檔
pub fn write_placement<S: RecordStore + ?Sized>(
    store: &S,
    place: &Place,
    layout: &LayoutConfig,
) -> Result<(String, PlacementRecord)> {
    let last = last_sequence(store, layout)?.unwrap_or(0);
    let sequence = last.checked_add(1).ok_or_else(|| {
        PlacerError::invalid_argument(format!(
            "sequence number {} leaves no room for another placement",
            last
        ))
    })?;
    let name = placement_file_name(sequence, layout);

    store.create(&name, &render_placement(place))?;
    tracing::debug!("Wrote place {} as {}", place.id, name);

    Ok((
        name,
        PlacementRecord {
            sequence,
            place: place.clone(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn roster() -> Roster {
        Roster::try_from(vec![
            Place::new(1, 10, "Park"),
            Place::new(2, 5, "Cafe"),
            Place::new(7, 3, "Lake"),
        ])
        .unwrap()
    }

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_file_name_is_zero_padded() {
        let layout = LayoutConfig::default();
        assert_eq!(placement_file_name(1, &layout), "000001.placement");
        assert_eq!(placement_file_name(1234567, &layout), "1234567.placement");
    }

    #[test]
    fn test_parse_sequence() {
        let layout = LayoutConfig::default();
        assert_eq!(parse_sequence("000042.placement", &layout).unwrap(), 42);

        let err = parse_sequence("000042.txt", &layout).unwrap_err();
        assert!(matches!(err, PlacerError::InvalidArgument { .. }));

        let err = parse_sequence("latest.placement", &layout).unwrap_err();
        assert!(matches!(err, PlacerError::InvalidArgument { .. }));
    }

    #[test]
    fn test_render_left_justifies_id() {
        assert_eq!(render_placement(&Place::new(7, 3, "Lake")), "where\n7      \n");
    }

    #[test]
    fn test_parse_placement_accepts_header_and_padding() {
        assert_eq!(parse_placement("a", &lines("where\n7      \n")).unwrap(), 7);
        assert_eq!(parse_placement("a", &lines("12\n")).unwrap(), 12);

        let err = parse_placement("a", &lines("where\nseven\n")).unwrap_err();
        assert!(matches!(err, PlacerError::ParseError { line: 2, .. }));

        let err = parse_placement("a", &lines("where\n")).unwrap_err();
        assert!(matches!(err, PlacerError::ParseError { .. }));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let layout = LayoutConfig::default();
        let store = MemoryStore::new();
        let roster = roster();
        let lake = roster.find(7).unwrap().clone();

        let (name, written) = write_placement(&store, &lake, &layout).unwrap();
        assert_eq!(name, "000001.placement");
        assert_eq!(written.sequence, 1);

        let read = read_placement(&store, &name, &roster, &layout).unwrap();
        assert_eq!(read.place, lake);
        assert_eq!(read.place.description, "Lake");
    }

    #[test]
    fn test_next_sequence_follows_the_maximum() {
        let layout = LayoutConfig::default();
        let store = MemoryStore::new()
            .with_file("000001.placement", "where\n1\n")
            .with_file("000009.placement", "where\n2\n");

        let (name, record) = write_placement(&store, &Place::new(1, 10, "Park"), &layout).unwrap();
        assert_eq!(name, "000010.placement");
        assert_eq!(record.sequence, 10);
    }

    #[test]
    fn test_latest_placement_keeps_listed_name() {
        let layout = LayoutConfig::default();
        let store = MemoryStore::new()
            .with_file("000001.placement", "where\n1\n")
            .with_file("2.placement", "where\n2\n")
            .with_file("00010.placement", "where\n7\n");

        let latest = latest_placement(&store, &layout).unwrap().unwrap();
        assert_eq!(latest, (10, "00010.placement".to_string()));
        assert_eq!(last_sequence(&store, &layout).unwrap(), Some(10));
    }

    #[test]
    fn test_sequence_overflow_is_invalid_argument() {
        let layout = LayoutConfig::default();
        let store = MemoryStore::new().with_file("18446744073709551615.placement", "where\n1\n");

        let err = write_placement(&store, &Place::new(1, 10, "Park"), &layout).unwrap_err();
        assert!(matches!(err, PlacerError::InvalidArgument { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_read_placement_unknown_id_is_not_found() {
        let layout = LayoutConfig::default();
        let store = MemoryStore::new().with_file("000001.placement", "where\n99\n");

        let err = read_placement(&store, "000001.placement", &roster(), &layout).unwrap_err();
        assert!(matches!(err, PlacerError::NotFound { .. }));
    }

    #[test]
    fn test_read_placement_requires_extension() {
        let layout = LayoutConfig::default();
        let store = MemoryStore::new().with_file("000001.txt", "where\n1\n");

        let err = read_placement(&store, "000001.txt", &roster(), &layout).unwrap_err();
        assert!(matches!(err, PlacerError::InvalidArgument { .. }));
    }
}
