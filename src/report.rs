use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;

use crate::config::{OutputFormat, Profile};
use crate::error::ValidatorResult;
use crate::stats::InstanceStats;

/// What a narrated line is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    MissingSlot,
    MissingRoom,
    RoomTooSmall,
    MissingFeature,
    UnavailableSlot,
    OrderClash,
    StudentClash,
    RoomClash,
    LongIntensive,
    SingleEventDay,
    EndOfDay,
}

impl ViolationKind {
    /// Soft kinds only add to the penalty.
    pub fn is_hard(self) -> bool {
        !matches!(
            self,
            ViolationKind::LongIntensive | ViolationKind::SingleEventDay | ViolationKind::EndOfDay
        )
    }
}

/// One narrated violation or penalty, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardCounts {
    pub unplaced: u64,
    /// Students attending unplaced events; extended profile only.
    pub distance_to_feasibility: u64,
    pub events_without_room: u64,
    /// Events with at least one room problem.
    pub unsuitable_rooms: u64,
    /// Every individual capacity or feature problem.
    pub unsuitable_room_problems: u64,
    pub unsuitable_slots: u64,
    pub order_clashes: u64,
    pub student_clashes: u64,
    pub room_clashes: u64,
}

impl HardCounts {
    /// Sum that decides feasibility under `profile`.
    pub fn infeasibility(&self, profile: Profile) -> u64 {
        match profile {
            Profile::Basic => self.unplaced + self.unsuitable_rooms + self.student_clashes + self.room_clashes,
            Profile::Extended => {
                self.unsuitable_rooms
                    + self.unsuitable_slots
                    + self.order_clashes
                    + self.student_clashes
                    + self.room_clashes
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftCounts {
    pub long_intensive: u64,
    pub single_event_day: u64,
    pub end_of_day: u64,
}

impl SoftCounts {
    pub fn total(&self) -> u64 {
        self.long_intensive + self.single_event_day + self.end_of_day
    }
}

/// Outcome of validating one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub profile: Profile,
    pub hard: HardCounts,
    pub soft: SoftCounts,
    pub total_penalty: u64,
    pub feasible: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(profile: Profile, hard: HardCounts, soft: SoftCounts, violations: Vec<Violation>) -> Self {
        ValidationReport {
            profile,
            hard,
            soft,
            total_penalty: soft.total(),
            feasible: hard.infeasibility(profile) == 0,
            violations,
        }
    }

    pub fn hard_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.kind.is_hard())
    }

    pub fn soft_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.kind.is_hard())
    }

    pub fn verdict(&self) -> &'static str {
        match (self.profile, self.feasible) {
            (Profile::Basic, true) => "This solution file gives a complete and feasible timetable",
            (Profile::Basic, false) => "This solution file does not give a complete and feasible timetable",
            (Profile::Extended, true) => "This solution file gives a valid timetable",
            (Profile::Extended, false) => "***This solution file does not give a valid timetable***",
        }
    }

    pub const CSV_HEADER: &'static str =
        "df,pv,nr,unplaced,rooms,slots,students,roomClashes,1d,lt,3+,total,feasible";

    /// One line matching [`Self::CSV_HEADER`].
    pub fn csv_line(&self) -> String {
        let h = &self.hard;
        let s = &self.soft;
        [
            h.distance_to_feasibility,
            h.order_clashes,
            h.events_without_room,
            h.unplaced,
            h.unsuitable_rooms,
            h.unsuitable_slots,
            h.student_clashes,
            h.room_clashes,
            s.single_event_day,
            s.end_of_day,
            s.long_intensive,
            self.total_penalty,
        ]
        .iter()
        .map(u64::to_string)
        .chain(std::iter::once(self.feasible.to_string()))
        .join(",")
    }

    fn write_summary(&self, out: &mut String) -> fmt::Result {
        let h = &self.hard;
        let s = &self.soft;
        match self.profile {
            Profile::Basic => {
                writeln!(out, "Number of unplaced events = {}", h.unplaced)?;
                writeln!(out, "Number of unsuitable rooms = {}", h.unsuitable_rooms)?;
                writeln!(out, "Number of student clashes = {}", h.student_clashes)?;
                writeln!(out, "Number of room clashes = {}", h.room_clashes)?;
                writeln!(out)?;
                write_penalties(out, s)?;
                writeln!(out)?;
                writeln!(out, "TOTAL PENALTY = {}", self.total_penalty)?;
                writeln!(out, "{}", self.verdict())
            }
            Profile::Extended => {
                writeln!(out, "Number of unsuitable rooms = {}", h.unsuitable_rooms)?;
                writeln!(out, "Number of unsuitable slots = {}", h.unsuitable_slots)?;
                writeln!(out, "Number of ordering problems = {}", h.order_clashes)?;
                writeln!(out, "Number of student clashes = {}", h.student_clashes)?;
                writeln!(out, "Number of room clashes = {}", h.room_clashes)?;
                writeln!(out)?;
                writeln!(out, "{}", self.verdict())?;
                writeln!(out)?;
                writeln!(out, "Number of unplaced events = {}", h.unplaced)?;
                writeln!(out, "Distance to feasibility = {}", h.distance_to_feasibility)?;
                writeln!(out)?;
                write_penalties(out, s)?;
                writeln!(out)?;
                writeln!(out, "Total soft constraint penalty = {}", self.total_penalty)
            }
        }
    }
}

fn write_penalties(out: &mut String, soft: &SoftCounts) -> fmt::Result {
    writeln!(
        out,
        "Penalty for students having three or more events in a row = {}",
        soft.long_intensive
    )?;
    writeln!(out, "Penalty for students having single events on a day = {}", soft.single_event_day)?;
    writeln!(out, "Penalty for students having end of day events = {}", soft.end_of_day)
}

/// Narration, then the counters and the verdict.
impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for violation in &self.violations {
            writeln!(out, "{violation}")?;
        }
        if !self.violations.is_empty() {
            writeln!(out)?;
        }
        self.write_summary(&mut out)?;
        f.write_str(out.trim_end())
    }
}

/// What a run prints: the report, optionally preceded by instance statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<InstanceStats>,
    pub report: ValidationReport,
}

impl ValidationOutput {
    pub fn render(&self, format: OutputFormat) -> ValidatorResult<String> {
        match format {
            OutputFormat::Text => Ok(match &self.stats {
                Some(stats) => format!("{stats}\n\n{}", self.report),
                None => self.report.to_string(),
            }),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => Ok(format!("{}\n{}", ValidationReport::CSV_HEADER, self.report.csv_line())),
        }
    }
}
