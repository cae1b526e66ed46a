//! Descriptive statistics of an instance: how constrained it is.

use serde::Serialize;
use std::fmt;

use crate::data::{Instance, SLOT_COUNT, SlotId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStats {
    pub events: usize,
    pub rooms: usize,
    pub features: usize,
    pub students: usize,
    /// Ordered pairs where one event must follow another.
    pub precedences: usize,
    pub avg_available_slots: f64,
    /// Rooms with enough seats and every required feature, per event.
    pub avg_suitable_rooms: f64,
    pub single_room_events: usize,
    pub no_room_events: usize,
    pub avg_events_per_student: f64,
    /// Events as a percentage of all room-slot pairs.
    pub fill_percent: f64,
}

impl InstanceStats {
    pub fn of(instance: &Instance) -> Self {
        let events = instance.event_count();

        let available: usize = instance
            .events()
            .map(|event| SlotId::all().filter(|&slot| instance.is_available(event, slot)).count())
            .sum();

        let suitable: Vec<usize> = instance
            .events()
            .map(|event| instance.rooms().filter(|&room| instance.is_suitable_room(event, room)).count())
            .collect();

        let enrolments: u64 = instance.events().map(|event| u64::from(instance.event_size(event))).sum();

        InstanceStats {
            events,
            rooms: instance.room_count(),
            features: instance.feature_count(),
            students: instance.student_count(),
            precedences: instance.follows_pairs().count(),
            avg_available_slots: ratio(available as f64, events),
            avg_suitable_rooms: ratio(suitable.iter().sum::<usize>() as f64, events),
            single_room_events: suitable.iter().filter(|&&n| n == 1).count(),
            no_room_events: suitable.iter().filter(|&&n| n == 0).count(),
            avg_events_per_student: ratio(enrolments as f64, instance.student_count()),
            fill_percent: ratio(100.0 * events as f64, instance.room_count() * SLOT_COUNT),
        }
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

impl fmt::Display for InstanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Instance: {} events, {} rooms, {} features, {} students, {} precedences",
            self.events, self.rooms, self.features, self.students, self.precedences
        )?;
        writeln!(f, "Average available slots per event = {:.2}", self.avg_available_slots)?;
        writeln!(f, "Average suitable rooms per event = {:.2}", self.avg_suitable_rooms)?;
        writeln!(
            f,
            "Events with a single suitable room = {} (no suitable room: {})",
            self.single_room_events, self.no_room_events
        )?;
        writeln!(f, "Average events per student = {:.2}", self.avg_events_per_student)?;
        write!(f, "Fill = {:.2}%", self.fill_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use crate::loader::parse_instance;

    #[test]
    fn stats_of_small_instance() {
        // 2 events, 2 rooms (10 and 1 seats), 1 feature only room 0 has,
        // event 1 needs it; 2 students both attending event 1
        let mut text = String::from("2 2 1 2  10 1  0 1 0 1  1 0  0 1");
        for event in 0..2 {
            for slot in 0..SLOT_COUNT {
                text.push_str(if event == 1 && slot < 5 { " 0" } else { " 1" });
            }
        }
        text.push_str(" 0 0 1 0");
        let instance = parse_instance(&text, Profile::Extended).unwrap();
        let stats = InstanceStats::of(&instance);

        assert_eq!(stats.events, 2);
        assert_eq!(stats.precedences, 1);
        assert_eq!(stats.avg_available_slots, 42.5);
        // event 0 fits both rooms, event 1 only room 0
        assert_eq!(stats.avg_suitable_rooms, 1.5);
        assert_eq!(stats.single_room_events, 1);
        assert_eq!(stats.no_room_events, 0);
        assert_eq!(stats.avg_events_per_student, 1.0);
        assert_eq!(stats.fill_percent, 100.0 * 2.0 / 90.0);
        assert!(stats.to_string().contains("1 precedences"));
    }
}
