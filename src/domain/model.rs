use std::fmt;
use std::hash::{Hash, Hasher};

pub type PlaceId = i64;

/// 名單中的一個地點。
///
/// Equality and hashing look at `id` only; score and description are
/// carried along but never compared. A roster with duplicate ids is
/// rejected when it is loaded.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: PlaceId,
    pub score: i64,
    pub description: String,
}

impl Place {
    pub fn new(id: PlaceId, score: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            score,
            description: description.into(),
        }
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Place {}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.score, self.description)
    }
}

/// 一次性的加減分
#[derive(Debug, Clone)]
pub struct ExtraScore {
    pub place: Place,
    pub delta: i64,
}

/// 已寫入的選擇紀錄，依檔名中的序號排序
#[derive(Debug, Clone)]
pub struct PlacementRecord {
    pub sequence: u64,
    pub place: Place,
}

#[derive(Debug, Clone)]
pub struct AccumulatorEntry {
    pub place: Place,
    pub total: i64,
}

impl AccumulatorEntry {
    pub fn new(place: Place) -> Self {
        let total = place.score;
        Self { place, total }
    }
}

/// Anything that can be looked up by place id.
pub trait Identified {
    fn place_id(&self) -> PlaceId;
}

impl Identified for Place {
    fn place_id(&self) -> PlaceId {
        self.id
    }
}

impl Identified for AccumulatorEntry {
    fn place_id(&self) -> PlaceId {
        self.place.id
    }
}

pub fn find_by_id<T: Identified>(items: &[T], id: PlaceId) -> Option<&T> {
    items.iter().find(|item| item.place_id() == id)
}

pub fn find_by_id_mut<T: Identified>(items: &mut [T], id: PlaceId) -> Option<&mut T> {
    items.iter_mut().find(|item| item.place_id() == id)
}

/// 已載入的名單，保留檔案中的順序
#[derive(Debug, Clone, Default)]
pub struct Roster {
    places: Vec<Place>,
}

impl Roster {
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn find(&self, id: PlaceId) -> Option<&Place> {
        find_by_id(&self.places, id)
    }

    /// Appends a place, refusing ids that are already present.
    pub fn push(&mut self, place: Place) -> Result<(), Place> {
        if self.find(place.id).is_some() {
            return Err(place);
        }
        self.places.push(place);
        Ok(())
    }
}

impl TryFrom<Vec<Place>> for Roster {
    type Error = Place;

    fn try_from(places: Vec<Place>) -> Result<Self, Self::Error> {
        let mut roster = Roster::default();
        for place in places {
            roster.push(place)?;
        }
        Ok(roster)
    }
}
