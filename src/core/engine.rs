use crate::adapters::LocalStore;
use crate::config::toml_config::LayoutConfig;
use crate::core::aggregator::aggregate;
use crate::core::placement;
use crate::core::reader::{self, RecordSet};
use crate::core::selector::{select_next, Selection};
use crate::core::{RandomSource, RecordStore};
use crate::domain::model::{AccumulatorEntry, PlacementRecord};
use crate::utils::error::{PlacerError, Result};
use std::path::Path;

/// Runs the read → aggregate → select → write pipeline against one store.
pub struct Placer<S: RecordStore> {
    store: S,
    layout: LayoutConfig,
}

impl<S: RecordStore> Placer<S> {
    pub fn new(store: S, layout: LayoutConfig) -> Self {
        Self { store, layout }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn load(&self) -> Result<RecordSet> {
        reader::read_records(&self.store, &self.layout)
    }

    /// 每個地點目前的累計分數，依名單順序
    pub fn summary(&self) -> Result<Vec<AccumulatorEntry>> {
        let records = self.load()?;
        aggregate(&records.roster, &records.extras, &records.history)
    }

    /// Picks the next place without writing anything.
    pub fn choose<R: RandomSource>(&self, rng: &mut R) -> Result<Option<Selection>> {
        let entries = self.summary()?;
        Ok(select_next(entries, rng))
    }

    /// Picks the next place and appends it as a new placement record.
    ///
    /// Returns `None`, and writes nothing, when the roster is empty.
    pub fn next<R: RandomSource>(&self, rng: &mut R) -> Result<Option<PlacementRecord>> {
        let Some(selection) = self.choose(rng)? else {
            tracing::warn!("Roster is empty, nothing to place");
            return Ok(None);
        };

        tracing::info!(
            "Selected place {} (salted total {}, {} tied)",
            selection.place().id,
            selection.winner.total,
            selection.tied
        );

        let (name, _) = placement::write_placement(&self.store, selection.place(), &self.layout)?;

        // 寫入後重新讀回，確認紀錄可被解析
        let records = self.load()?;
        let record = placement::read_placement(&self.store, &name, &records.roster, &self.layout)?;
        Ok(Some(record))
    }

    /// The placement record with the highest sequence number.
    pub fn peek(&self) -> Result<PlacementRecord> {
        let (_, name) =
            placement::latest_placement(&self.store, &self.layout)?.ok_or_else(|| {
                PlacerError::not_found(format!(
                    "no placement records in {}",
                    self.store.location().display()
                ))
            })?;

        self.read(&name)
    }

    pub fn read(&self, name: &str) -> Result<PlacementRecord> {
        let roster = reader::read_roster(&self.store, &self.layout)?;
        placement::read_placement(&self.store, name, &roster, &self.layout)
    }
}

/// Resolves a placement file given by path, using the roster that sits
/// next to it.
pub fn read_placement_at(path: &Path, layout: &LayoutConfig) -> Result<PlacementRecord> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            PlacerError::invalid_argument(format!("{} is not a file path", path.display()))
        })?;

    placement::parse_sequence(name, layout)?;

    if !path.is_file() {
        return Err(PlacerError::not_found(format!(
            "placement file {}",
            path.display()
        )));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let placer = Placer::new(LocalStore::open(dir)?, layout.clone());
    placer.read(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::ports::RngSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct NoSalt;

    impl RandomSource for NoSalt {
        fn salt(&mut self, _upper: i64) -> i64 {
            0
        }

        fn shuffle<T>(&mut self, _items: &mut [T]) {}
    }

    fn placer(files: &[(&str, &str)]) -> Placer<MemoryStore> {
        let store = files
            .iter()
            .fold(MemoryStore::new(), |store, (name, contents)| {
                store.with_file(name, contents)
            });
        Placer::new(store, LayoutConfig::default())
    }

    #[test]
    fn test_next_writes_the_lowest_place() {
        let placer = placer(&[("places", "header\n1 10 Park\n2 5 Cafe\n")]);

        let record = placer.next(&mut NoSalt).unwrap().unwrap();

        assert_eq!(record.place.id, 2);
        assert_eq!(record.sequence, 1);
        assert_eq!(
            placer.store().get("000001.placement").unwrap(),
            "where\n2      \n"
        );
    }

    #[test]
    fn test_history_feeds_back_into_next_selection() {
        let placer = placer(&[
            ("places", "header\n1 10 Park\n2 5 Cafe\n"),
            ("000001.placement", "where\n2\n"),
            ("000002.placement", "where\n2\n"),
        ]);

        // Cafe 5 + 5 + 5 = 15 > Park 10
        let record = placer.next(&mut NoSalt).unwrap().unwrap();
        assert_eq!(record.place.id, 1);
        assert_eq!(record.sequence, 3);
    }

    #[test]
    fn test_empty_roster_writes_nothing() {
        let placer = placer(&[("places", "header\n")]);
        let mut rng = RngSource(StdRng::seed_from_u64(3));

        assert!(placer.next(&mut rng).unwrap().is_none());
        assert_eq!(placer.store().len(), 1);
    }

    #[test]
    fn test_malformed_roster_writes_nothing() {
        let placer = placer(&[("places", "header\nx 10 Park\n")]);

        let err = placer.next(&mut NoSalt).unwrap_err();
        assert!(matches!(err, PlacerError::ParseError { .. }));
        assert!(placer.store().list("placement").unwrap().is_empty());
    }

    #[test]
    fn test_choose_does_not_write() {
        let placer = placer(&[("places", "header\n1 10 Park\n2 5 Cafe\n")]);
        let selection = placer.choose(&mut NoSalt).unwrap().unwrap();

        assert_eq!(selection.place().id, 2);
        assert_eq!(placer.store().len(), 1);
    }

    #[test]
    fn test_peek_reads_highest_sequence() {
        let placer = placer(&[
            ("places", "header\n1 10 Park\n2 5 Cafe\n"),
            ("000001.placement", "where\n1\n"),
            ("000002.placement", "where\n2\n"),
        ]);

        let record = placer.peek().unwrap();
        assert_eq!(record.sequence, 2);
        assert_eq!(record.place.description, "Cafe");
    }

    #[test]
    fn test_peek_reads_the_listed_file_whatever_its_padding() {
        let placer = placer(&[
            ("places", "header\n1 10 Park\n2 5 Cafe\n"),
            ("000001.placement", "where\n1\n"),
            ("2.placement", "where\n2\n"),
        ]);

        let record = placer.peek().unwrap();
        assert_eq!(record.sequence, 2);
        assert_eq!(record.place.to_string(), "2 5 Cafe");
    }

    #[test]
    fn test_peek_without_records_is_not_found() {
        let placer = placer(&[("places", "header\n1 10 Park\n")]);
        let err = placer.peek().unwrap_err();
        assert!(matches!(err, PlacerError::NotFound { .. }));
    }

    #[test]
    fn test_overflowing_history_fails_instead_of_panicking() {
        const ROSTER: &str = "header\n1 9223372036854775807 Big\n2 9223372036854775806 Bigger\n";

        let fresh = placer(&[("places", ROSTER)]);
        let selection = fresh.choose(&mut RngSource(StdRng::seed_from_u64(8))).unwrap();
        assert!(selection.is_some());

        let placed = placer(&[("places", ROSTER), ("000001.placement", "where\n1\n")]);
        let err = placed.summary().unwrap_err();
        assert!(matches!(err, PlacerError::ParseError { .. }));
        assert!(placed.next(&mut NoSalt).is_err());
        assert_eq!(placed.store().list("placement").unwrap().len(), 1);
    }

    #[test]
    fn test_summary_folds_everything() {
        let placer = placer(&[
            ("places", "header\n1 10 Park\n2 5 Cafe\n"),
            ("bonus.extra", "1 -3\n"),
            ("000001.placement", "where\n2\n"),
        ]);

        let totals: Vec<(i64, i64)> = placer
            .summary()
            .unwrap()
            .iter()
            .map(|e| (e.place.id, e.total))
            .collect();
        assert_eq!(totals, vec![(1, 7), (2, 10)]);
    }
}
