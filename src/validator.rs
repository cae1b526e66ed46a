use itertools::iproduct;
use log::{debug, info, trace};
use std::time::Instant;

use crate::data::{Assignment, DAYS, EventId, Grid, Instance, SLOT_COUNT, SlotId, StudentId};
use crate::report::{HardCounts, SoftCounts, ValidationReport, Violation, ViolationKind};

/// Runs every check of the instance's profile against `assignment`.
///
/// Violations are narrated in discovery order: per check, events ascending,
/// then the paired event ascending, then students, then slots.
pub fn validate(instance: &Instance, assignment: &Assignment) -> ValidationReport {
    let start_time = Instant::now();
    let profile = instance.profile();
    info!(
        "Validating {} events against {} rooms and {} students ({profile} profile)...",
        instance.event_count(),
        instance.room_count(),
        instance.student_count()
    );

    let mut narration = Vec::new();
    let mut hard = HardCounts::default();

    check_unplaced(instance, assignment, &mut hard, &mut narration);
    check_rooms_and_slots(instance, assignment, &mut hard, &mut narration);
    if profile.is_extended() {
        hard.order_clashes = check_ordering(instance, assignment, &mut narration);
    }
    hard.student_clashes = check_student_clashes(instance, assignment, &mut narration);
    hard.room_clashes = check_room_clashes(instance, assignment, &mut narration);
    debug!("Hard constraint counters: {hard:?}");

    let free = StudentFreeSlots::new(instance, assignment);
    let soft = SoftCounts {
        long_intensive: penalise_long_runs(instance, &free, &mut narration),
        single_event_day: penalise_single_event_days(instance, &free, &mut narration),
        end_of_day: penalise_end_of_day(instance, &free, &mut narration),
    };
    debug!("Soft constraint counters: {soft:?}");

    let report = ValidationReport::new(profile, hard, soft, narration);
    info!(
        "Validation finished in {:.2?}: {} violations narrated, feasible = {}, penalty = {}",
        start_time.elapsed(),
        report.violations.len(),
        report.feasible,
        report.total_penalty
    );
    report
}

fn note(narration: &mut Vec<Violation>, kind: ViolationKind, message: String) {
    trace!("{kind:?}: {message}");
    narration.push(Violation { kind, message });
}

fn check_unplaced(instance: &Instance, assignment: &Assignment, hard: &mut HardCounts, narration: &mut Vec<Violation>) {
    let extended = instance.profile().is_extended();
    for (event, placement) in assignment.iter() {
        if placement.slot.is_none() {
            note(narration, ViolationKind::MissingSlot, format!("Event {event} does not have a timeslot assigned"));
        }
        if placement.room.is_none() {
            note(narration, ViolationKind::MissingRoom, format!("Event {event} does not have a room assigned"));
            hard.events_without_room += 1;
        }

        // basic counts either missing dimension, extended only a missing slot
        let unplaced = if extended {
            placement.slot.is_none()
        } else {
            placement.slot.is_none() || placement.room.is_none()
        };
        if unplaced {
            hard.unplaced += 1;
            if extended {
                hard.distance_to_feasibility += u64::from(instance.event_size(event));
            }
        }
    }
}

fn check_rooms_and_slots(
    instance: &Instance,
    assignment: &Assignment,
    hard: &mut HardCounts,
    narration: &mut Vec<Violation>,
) {
    let extended = instance.profile().is_extended();
    for (event, placement) in assignment.iter() {
        if let Some(room) = placement.room {
            // one unsuitable room per event, however many problems it has
            let mut bad_room = false;
            let size = instance.event_size(event);
            let capacity = instance.capacity(room);
            if capacity < size {
                note(
                    narration,
                    ViolationKind::RoomTooSmall,
                    format!(
                        "Event {event} requires a room of size {size}, but has been assigned room {room} of size {capacity}"
                    ),
                );
                hard.unsuitable_room_problems += 1;
                bad_room = true;
            }
            for feature in instance.missing_features(event, room) {
                note(
                    narration,
                    ViolationKind::MissingFeature,
                    format!(
                        "Event {event} requires feature {feature}, but has been assigned room {room} without feature {feature}"
                    ),
                );
                hard.unsuitable_room_problems += 1;
                bad_room = true;
            }
            if bad_room {
                hard.unsuitable_rooms += 1;
            }
        }

        if extended {
            if let Some(slot) = placement.slot {
                if !instance.is_available(event, slot) {
                    note(
                        narration,
                        ViolationKind::UnavailableSlot,
                        format!("Event {event} has been assigned slot {slot} and is not available at that time"),
                    );
                    hard.unsuitable_slots += 1;
                }
            }
        }
    }
}

fn check_ordering(instance: &Instance, assignment: &Assignment, narration: &mut Vec<Violation>) -> u64 {
    let mut clashes = 0;
    for (after, before) in instance.follows_pairs() {
        let (Some(after_slot), Some(before_slot)) = (assignment.slot(after), assignment.slot(before)) else {
            continue;
        };
        if after_slot <= before_slot {
            note(
                narration,
                ViolationKind::OrderClash,
                format!(
                    "Event {after} (slot {after_slot}) must take place after event {before} (slot {before_slot}) but does not"
                ),
            );
            clashes += 1;
        }
    }
    clashes
}

/// Pairs `(e, f)` with `f < e` placed in the same slot, `e` then `f` ascending.
fn same_slot_pairs<'a>(
    instance: &'a Instance,
    assignment: &'a Assignment,
) -> impl Iterator<Item = (EventId, EventId, SlotId)> + 'a {
    instance.events().flat_map(move |e| {
        (0..e.index()).map(EventId::new).filter_map(move |f| match (assignment.slot(e), assignment.slot(f)) {
            (Some(slot_e), Some(slot_f)) if slot_e == slot_f => Some((e, f, slot_e)),
            _ => None,
        })
    })
}

fn check_student_clashes(instance: &Instance, assignment: &Assignment, narration: &mut Vec<Violation>) -> u64 {
    let mut clashes = 0;
    for (e, f, slot) in same_slot_pairs(instance, assignment) {
        for student in instance.students() {
            if instance.attends(e, student) && instance.attends(f, student) {
                note(
                    narration,
                    ViolationKind::StudentClash,
                    format!("Student {student} has to attend both event {e} and event {f} in slot {slot}"),
                );
                clashes += 1;
            }
        }
    }
    clashes
}

fn check_room_clashes(instance: &Instance, assignment: &Assignment, narration: &mut Vec<Violation>) -> u64 {
    let mut clashes = 0;
    for (e, f, slot) in same_slot_pairs(instance, assignment) {
        if let (Some(room_e), Some(room_f)) = (assignment.room(e), assignment.room(f)) {
            if room_e == room_f {
                note(
                    narration,
                    ViolationKind::RoomClash,
                    format!("Events {e} and {f} both occur in slot {slot} and room {room_e}"),
                );
                clashes += 1;
            }
        }
    }
    clashes
}

/// Per (slot, student): true unless the student attends an event placed in that slot.
#[derive(Debug, Clone)]
pub struct StudentFreeSlots {
    free: Grid<bool>,
}

impl StudentFreeSlots {
    pub fn new(instance: &Instance, assignment: &Assignment) -> Self {
        let mut free = Grid::filled(SLOT_COUNT, instance.student_count(), true);
        for (event, placement) in assignment.iter() {
            let Some(slot) = placement.slot else { continue };
            for student in instance.students() {
                if instance.attends(event, student) {
                    free.set(slot.index(), student.index(), false);
                }
            }
        }
        StudentFreeSlots { free }
    }

    pub fn is_free(&self, slot: SlotId, student: StudentId) -> bool {
        self.free.get(slot.index(), student.index())
    }

    pub fn is_busy(&self, slot: SlotId, student: StudentId) -> bool {
        !self.is_free(slot, student)
    }
}

/// A run of L >= 3 busy slots within a day costs L - 2.
fn penalise_long_runs(instance: &Instance, free: &StudentFreeSlots, narration: &mut Vec<Violation>) -> u64 {
    let mut penalty = 0;
    for (student, day) in iproduct!(instance.students(), 0..DAYS) {
        let mut run = 0;
        for slot in SlotId::of_day(day) {
            if free.is_busy(slot, student) {
                run += 1;
            } else {
                run = 0;
            }
            if run >= 3 {
                note(
                    narration,
                    ViolationKind::LongIntensive,
                    format!("Student {student} has a set of three events up to slot {slot}"),
                );
                penalty += 1;
            }
        }
    }
    penalty
}

fn penalise_single_event_days(instance: &Instance, free: &StudentFreeSlots, narration: &mut Vec<Violation>) -> u64 {
    let mut penalty = 0;
    for (student, day) in iproduct!(instance.students(), 0..DAYS) {
        let mut busy = SlotId::of_day(day).filter(|&slot| free.is_busy(slot, student));
        if let (Some(slot), None) = (busy.next(), busy.next()) {
            note(
                narration,
                ViolationKind::SingleEventDay,
                format!("Student {student} has an event in slot {slot} which is the only one on that day"),
            );
            penalty += 1;
        }
    }
    penalty
}

fn penalise_end_of_day(instance: &Instance, free: &StudentFreeSlots, narration: &mut Vec<Violation>) -> u64 {
    let mut penalty = 0;
    let day_ends = SlotId::all().filter(|slot| slot.is_end_of_day());
    for (student, slot) in iproduct!(instance.students(), day_ends) {
        if free.is_busy(slot, student) {
            note(
                narration,
                ViolationKind::EndOfDay,
                format!("Student {student} has an event in slot {slot} which is at the end of a day"),
            );
            penalty += 1;
        }
    }
    penalty
}
