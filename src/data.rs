use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Profile;

pub const DAYS: usize = 5;
pub const SLOTS_PER_DAY: usize = 9;
/// Fixed number of scheduling periods in a week.
pub const SLOT_COUNT: usize = DAYS * SLOTS_PER_DAY;

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_type!(
    /// Index of an event (a class or exam to be placed).
    EventId
);
index_type!(
    /// Index of a room.
    RoomId
);
index_type!(
    /// Index of a student.
    StudentId
);
index_type!(
    /// Index of a room/event feature.
    FeatureId
);
index_type!(
    /// One of the 45 weekly periods, `day * 9 + period`.
    SlotId
);

impl SlotId {
    pub fn period(self) -> usize {
        self.0 % SLOTS_PER_DAY
    }

    pub fn is_end_of_day(self) -> bool {
        self.period() == SLOTS_PER_DAY - 1
    }

    pub fn all() -> impl Iterator<Item = SlotId> + Clone {
        (0..SLOT_COUNT).map(SlotId)
    }

    /// The slots of `day`, in chronological order.
    pub fn of_day(day: usize) -> impl Iterator<Item = SlotId> {
        (day * SLOTS_PER_DAY..(day + 1) * SLOTS_PER_DAY).map(SlotId)
    }
}

/// Dense row-major matrix with bounds-checked access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Returns `None` when `rows * cols` overflows.
    pub fn try_filled(rows: usize, cols: usize, value: T) -> Option<Self> {
        let len = rows.checked_mul(cols)?;
        Some(Grid {
            rows,
            cols,
            cells: vec![value; len],
        })
    }

    /// # Panics
    /// If `rows * cols` overflows.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        match Self::try_filled(rows, cols, value) {
            Some(grid) => grid,
            None => panic!("grid of {rows}x{cols} cells overflows"),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[self.offset(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let offset = self.offset(row, col);
        self.cells[offset] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) out of bounds ({}x{})",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

/// Ordering requirement of event A relative to event B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Precedence {
    #[default]
    None,
    /// A must take place strictly after B.
    Follows,
    /// A must take place strictly before B.
    Precedes,
}

impl Precedence {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Precedence::None),
            1 => Some(Precedence::Follows),
            -1 => Some(Precedence::Precedes),
            _ => None,
        }
    }
}

/// A timetabling problem instance. Built by the loader, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Instance {
    pub(crate) profile: Profile,
    pub(crate) room_capacity: Vec<u32>,
    /// attends[event][student]
    pub(crate) attends: Grid<bool>,
    /// room_features[room][feature]
    pub(crate) room_features: Grid<bool>,
    /// event_features[event][feature]
    pub(crate) event_features: Grid<bool>,
    /// available[slot][event], extended profile only
    pub(crate) available: Option<Grid<bool>>,
    /// precedence[a][b], extended profile only
    pub(crate) precedence: Option<Grid<Precedence>>,
    pub(crate) event_sizes: Vec<u32>,
}

impl Instance {
    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn event_count(&self) -> usize {
        self.attends.rows()
    }

    pub fn room_count(&self) -> usize {
        self.room_capacity.len()
    }

    pub fn student_count(&self) -> usize {
        self.attends.cols()
    }

    pub fn feature_count(&self) -> usize {
        self.event_features.cols()
    }

    pub fn events(&self) -> impl Iterator<Item = EventId> + use<> {
        (0..self.event_count()).map(EventId::new)
    }

    pub fn rooms(&self) -> impl Iterator<Item = RoomId> + use<> {
        (0..self.room_count()).map(RoomId::new)
    }

    pub fn students(&self) -> impl Iterator<Item = StudentId> + use<> {
        (0..self.student_count()).map(StudentId::new)
    }

    pub fn features(&self) -> impl Iterator<Item = FeatureId> + use<> {
        (0..self.feature_count()).map(FeatureId::new)
    }

    pub fn capacity(&self, room: RoomId) -> u32 {
        self.room_capacity[room.index()]
    }

    pub fn attends(&self, event: EventId, student: StudentId) -> bool {
        self.attends.get(event.index(), student.index())
    }

    /// Number of students attending `event`.
    pub fn event_size(&self, event: EventId) -> u32 {
        self.event_sizes[event.index()]
    }

    pub fn room_has_feature(&self, room: RoomId, feature: FeatureId) -> bool {
        self.room_features.get(room.index(), feature.index())
    }

    pub fn event_requires_feature(&self, event: EventId, feature: FeatureId) -> bool {
        self.event_features.get(event.index(), feature.index())
    }

    /// Features `event` requires but `room` lacks, ascending.
    pub fn missing_features(&self, event: EventId, room: RoomId) -> impl Iterator<Item = FeatureId> + '_ {
        self.features().filter(move |&feature| {
            self.event_requires_feature(event, feature) && !self.room_has_feature(room, feature)
        })
    }

    /// Whether `room` is large enough and has every feature `event` needs.
    pub fn is_suitable_room(&self, event: EventId, room: RoomId) -> bool {
        self.capacity(room) >= self.event_size(event) && self.missing_features(event, room).next().is_none()
    }

    /// Always true when no availability matrix was loaded.
    pub fn is_available(&self, event: EventId, slot: SlotId) -> bool {
        self.available
            .as_ref()
            .is_none_or(|available| available.get(slot.index(), event.index()))
    }

    pub fn precedence(&self, a: EventId, b: EventId) -> Precedence {
        self.precedence
            .as_ref()
            .map_or(Precedence::None, |precedence| precedence.get(a.index(), b.index()))
    }

    /// Pairs `(a, b)` where `a` must take place after `b`, `a` ascending then `b` ascending.
    pub fn follows_pairs(&self) -> impl Iterator<Item = (EventId, EventId)> + '_ {
        self.events().flat_map(move |a| {
            self.events()
                .filter(move |&b| self.precedence(a, b) == Precedence::Follows)
                .map(move |b| (a, b))
        })
    }
}

/// Where one event was put; `None` marks an unassigned dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub slot: Option<SlotId>,
    pub room: Option<RoomId>,
}

/// The solution under test, one placement per event in event order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    placements: Vec<Placement>,
}

impl Assignment {
    pub fn new(placements: Vec<Placement>) -> Self {
        Assignment { placements }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn slot(&self, event: EventId) -> Option<SlotId> {
        self.placements[event.index()].slot
    }

    pub fn room(&self, event: EventId) -> Option<RoomId> {
        self.placements[event.index()].room
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventId, Placement)> + '_ {
        self.placements
            .iter()
            .enumerate()
            .map(|(index, placement)| (EventId::new(index), *placement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_days_and_periods() {
        let slot = SlotId::new(17);
        assert_eq!(slot.period(), 8);
        assert!(slot.is_end_of_day());
        assert!(!SlotId::new(18).is_end_of_day());

        let ends: Vec<usize> = SlotId::all().filter(|s| s.is_end_of_day()).map(SlotId::index).collect();
        assert_eq!(ends, vec![8, 17, 26, 35, 44]);

        let day2: Vec<usize> = SlotId::of_day(2).map(SlotId::index).collect();
        assert_eq!(day2, (18..27).collect::<Vec<_>>());
        assert_eq!(SlotId::all().count(), SLOT_COUNT);
    }

    #[test]
    fn grid_access() {
        let mut grid = Grid::filled(2, 3, false);
        grid.set(1, 2, true);
        assert!(grid.get(1, 2));
        assert!(!grid.get(0, 2));
        assert_eq!(grid.row(1), &[false, false, true]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn grid_rejects_column_overflow() {
        let grid = Grid::filled(2, 3, 0u8);
        // (0, 3) would alias (1, 0) in a plain flat array
        grid.get(0, 3);
    }

    #[test]
    fn grid_size_overflow() {
        assert!(Grid::try_filled(usize::MAX, 2, false).is_none());
    }

    #[test]
    fn precedence_codes() {
        assert_eq!(Precedence::from_code(1), Some(Precedence::Follows));
        assert_eq!(Precedence::from_code(-1), Some(Precedence::Precedes));
        assert_eq!(Precedence::from_code(0), Some(Precedence::None));
        assert_eq!(Precedence::from_code(2), None);
    }
}
