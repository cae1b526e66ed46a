//! Readers for the two flat input files.
//!
//! Both files are whitespace separated decimal integers with no tags or
//! terminator. The instance file (`.tim`) is read in a fixed order driven by
//! the header counts; the solution file (`.sln`) holds one `slot room` pair per
//! event, `-1` marking an unassigned dimension.

use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::SplitAsciiWhitespace;

use crate::config::Profile;
use crate::data::{Assignment, Grid, Instance, Placement, Precedence, RoomId, SLOT_COUNT, SlotId};
use crate::error::{ValidatorError, ValidatorResult};

pub const INSTANCE_SUFFIX: &str = ".tim";
pub const SOLUTION_SUFFIX: &str = ".sln";

/// `<basename>.tim`
pub fn instance_path(basename: &Path) -> PathBuf {
    with_suffix(basename, INSTANCE_SUFFIX)
}

/// `<basename>.sln`
pub fn solution_path(basename: &Path) -> PathBuf {
    with_suffix(basename, SOLUTION_SUFFIX)
}

// appended rather than set_extension, so "comp.01" gives "comp.01.tim"
fn with_suffix(basename: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(basename.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Only failing to read counts as a missing file; undecodable bytes are malformed content.
fn read_file(path: &Path, malformed: fn(String) -> ValidatorError) -> ValidatorResult<String> {
    let bytes = fs::read(path).map_err(|source| ValidatorError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| malformed(format!("{} is not valid UTF-8 text: {e}", path.display())))
}

pub fn load_instance(path: &Path, profile: Profile) -> ValidatorResult<Instance> {
    info!("Reading instance from {}", path.display());
    parse_instance(&read_file(path, malformed_instance)?, profile)
}

pub fn load_assignment(path: &Path, instance: &Instance) -> ValidatorResult<Assignment> {
    info!("Reading solution from {}", path.display());
    parse_assignment(&read_file(path, malformed_solution)?, instance)
}

/// Sequential reader of integer tokens that reports failures as one error kind.
struct TokenStream<'a> {
    tokens: SplitAsciiWhitespace<'a>,
    consumed: usize,
    malformed: fn(String) -> ValidatorError,
}

impl<'a> TokenStream<'a> {
    fn new(text: &'a str, malformed: fn(String) -> ValidatorError) -> Self {
        TokenStream {
            tokens: text.split_ascii_whitespace(),
            consumed: 0,
            malformed,
        }
    }

    fn remaining(&self) -> usize {
        self.tokens.clone().count()
    }

    fn fail(&self, reason: String) -> ValidatorError {
        (self.malformed)(reason)
    }

    fn next_int(&mut self, what: &str) -> ValidatorResult<i64> {
        let Some(token) = self.tokens.next() else {
            let consumed = self.consumed;
            return Err(self.fail(format!("unexpected end of input after {consumed} tokens, expected {what}")));
        };
        self.consumed += 1;
        let position = self.consumed;
        token
            .parse::<i64>()
            .map_err(|_| self.fail(format!("token {position} ({token:?}) is not an integer, expected {what}")))
    }

    fn next_count(&mut self, what: &str, positive: bool) -> ValidatorResult<usize> {
        let value = self.next_int(what)?;
        if value < 0 || (positive && value == 0) {
            let expected = if positive { "positive" } else { "non-negative" };
            return Err(self.fail(format!("{what} must be {expected}, got {value}")));
        }
        usize::try_from(value).map_err(|_| self.fail(format!("{what} {value} is too large")))
    }

    fn next_bool(&mut self, what: &str) -> ValidatorResult<bool> {
        match self.next_int(what)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.fail(format!("{what} must be 0 or 1, got {other} (token {})", self.consumed))),
        }
    }
}

fn malformed_instance(reason: String) -> ValidatorError {
    ValidatorError::MalformedInstance(reason)
}

fn malformed_solution(reason: String) -> ValidatorError {
    ValidatorError::MalformedSolution(reason)
}

/// Tokens the body needs after the header, `None` on overflow.
fn body_token_count(events: usize, rooms: usize, features: usize, students: usize, profile: Profile) -> Option<usize> {
    let mut total = rooms
        .checked_add(students.checked_mul(events)?)?
        .checked_add(rooms.checked_mul(features)?)?
        .checked_add(events.checked_mul(features)?)?;
    if profile.is_extended() {
        total = total
            .checked_add(events.checked_mul(SLOT_COUNT)?)?
            .checked_add(events.checked_mul(events)?)?;
    }
    Some(total)
}

pub fn parse_instance(text: &str, profile: Profile) -> ValidatorResult<Instance> {
    let mut tokens = TokenStream::new(text, malformed_instance);

    let events = tokens.next_count("event count", true)?;
    let rooms = tokens.next_count("room count", true)?;
    let features = tokens.next_count("feature count", false)?;
    let students = tokens.next_count("student count", false)?;
    info!("Instance declares {events} events, {rooms} rooms, {features} features and {students} students");

    // fail before allocating anything the input cannot fill
    let needed = body_token_count(events, rooms, features, students, profile)
        .filter(|_| students.checked_mul(SLOT_COUNT).is_some())
        .ok_or_else(|| tokens.fail("declared counts overflow the addressable size".to_string()))?;
    let available = tokens.remaining();
    if available < needed {
        return Err(tokens.fail(format!(
            "declared counts need {needed} more tokens for the {profile} profile, but only {available} remain"
        )));
    }
    let overflow = || malformed_instance("declared counts overflow the addressable size".to_string());

    let mut room_capacity = Vec::with_capacity(rooms);
    for room in 0..rooms {
        let capacity = tokens.next_int("room capacity")?;
        let capacity = u32::try_from(capacity)
            .map_err(|_| tokens.fail(format!("room {room} has invalid capacity {capacity}")))?;
        room_capacity.push(capacity);
    }

    let mut attends = Grid::try_filled(events, students, false).ok_or_else(overflow)?;
    for student in 0..students {
        for event in 0..events {
            attends.set(event, student, tokens.next_bool("attendance flag")?);
        }
    }

    let mut room_features = Grid::try_filled(rooms, features, false).ok_or_else(overflow)?;
    for room in 0..rooms {
        for feature in 0..features {
            room_features.set(room, feature, tokens.next_bool("room feature flag")?);
        }
    }

    let mut event_features = Grid::try_filled(events, features, false).ok_or_else(overflow)?;
    for event in 0..events {
        for feature in 0..features {
            event_features.set(event, feature, tokens.next_bool("event feature flag")?);
        }
    }

    let (available, precedence) = if profile.is_extended() {
        let mut available = Grid::try_filled(SLOT_COUNT, events, true).ok_or_else(overflow)?;
        for event in 0..events {
            for slot in 0..SLOT_COUNT {
                available.set(slot, event, tokens.next_bool("slot availability flag")?);
            }
        }

        let mut precedence = Grid::try_filled(events, events, Precedence::None).ok_or_else(overflow)?;
        for event_b in 0..events {
            for event_a in 0..events {
                let code = tokens.next_int("precedence value")?;
                let value = Precedence::from_code(code).ok_or_else(|| {
                    tokens.fail(format!(
                        "precedence between events {event_a} and {event_b} must be -1, 0 or 1, got {code}"
                    ))
                })?;
                precedence.set(event_a, event_b, value);
            }
        }
        (Some(available), Some(precedence))
    } else {
        (None, None)
    };

    let trailing = tokens.remaining();
    if trailing > 0 {
        debug!("Ignoring {trailing} trailing tokens after the instance body");
    }

    let event_sizes = (0..events)
        .map(|event| attends.row(event).iter().filter(|&&attending| attending).count() as u32)
        .collect();

    Ok(Instance {
        profile,
        room_capacity,
        attends,
        room_features,
        event_features,
        available,
        precedence,
        event_sizes,
    })
}

pub fn parse_assignment(text: &str, instance: &Instance) -> ValidatorResult<Assignment> {
    let mut tokens = TokenStream::new(text, malformed_solution);
    let rooms = instance.room_count();

    let mut placements = Vec::with_capacity(instance.event_count());
    for event in instance.events() {
        let slot = tokens.next_int("timeslot")?;
        let room = tokens.next_int("room")?;

        let slot = match slot {
            -1 => None,
            s if (0..SLOT_COUNT as i64).contains(&s) => Some(SlotId::new(s as usize)),
            s => return Err(tokens.fail(format!("event {event} has slot {s}, expected -1 or 0..{SLOT_COUNT}"))),
        };
        let room = match room {
            -1 => None,
            r if r >= 0 && (r as u64) < rooms as u64 => Some(RoomId::new(r as usize)),
            r => return Err(tokens.fail(format!("event {event} has room {r}, expected -1 or 0..{rooms}"))),
        };
        placements.push(Placement { slot, room });
    }

    let trailing = tokens.remaining();
    if trailing > 0 {
        debug!("Ignoring {trailing} trailing tokens after the solution body");
    }
    Ok(Assignment::new(placements))
}
