//! # Status reports.
//!
//! [`Report`] is a point-in-time copy of every group's slots, produced by
//! [`Supervisor::snapshot`](crate::Supervisor::snapshot). It is plain data:
//! holding it keeps no locks. Its [`Display`](fmt::Display) impl is the text
//! served by the monitor endpoint.
//!
//! ## Text layout
//! ```text
//! ------------------ group: consumers ------ instances: 2 ------------------>>
//! total      : 2
//! running    : 1
//! exited     : 0
//! panicked   : 1
//! failures   : 3
//! ------->
//! instance   : 0
//! name       : consumers
//! status     : running
//! started at : 2026-10-16 09:12:44
//! exited at  :
//! failed at  :
//! failures   : 0
//! last error :
//! ------->
//! ...
//! ```
//!
//! Timestamps are local time `YYYY-MM-DD HH:MM:SS`, empty when never set.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::core::SlotStatus;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats an optional timestamp the way reports show it.
pub fn format_time(t: Option<DateTime<Local>>) -> String {
    t.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Copy of one slot's state.
#[derive(Debug, Clone)]
pub struct SlotReport {
    /// Index within the group.
    pub index: usize,
    /// Group name (display name of the instance).
    pub group: Arc<str>,
    /// Status at the time of the read.
    pub status: SlotStatus,
    /// Last (re)start.
    pub started_at: Option<DateTime<Local>>,
    /// Last normal return; cleared on restart.
    pub exited_at: Option<DateTime<Local>>,
    /// Last failure.
    pub failed_at: Option<DateTime<Local>>,
    /// Cumulative failures.
    pub failures: u64,
    /// Diagnostic of the last failure.
    pub last_failure: Option<String>,
}

/// Per-group counters.
///
/// `running + exited + panicked == total` for every report taken through
/// the supervisor, because slots are marked running before their group
/// becomes visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of slots in the group.
    pub total: usize,
    /// Slots currently running.
    pub running: usize,
    /// Slots whose last attempt returned normally.
    pub exited: usize,
    /// Slots whose last attempt panicked or returned `Err`.
    pub panicked: usize,
    /// Sum of cumulative failures over all slots.
    pub failures: u64,
}

impl Summary {
    fn add(&mut self, slot: &SlotReport) {
        self.total += 1;
        match slot.status {
            SlotStatus::Running => self.running += 1,
            SlotStatus::Exited => self.exited += 1,
            SlotStatus::Panicked => self.panicked += 1,
            SlotStatus::Init => {}
        }
        self.failures = self.failures.saturating_add(slot.failures);
    }
}

/// Aggregated status of one group.
#[derive(Debug, Clone)]
pub struct GroupReport {
    /// Group name.
    pub name: Arc<str>,
    /// Counters summed over `slots`.
    pub summary: Summary,
    /// One entry per slot, in index order.
    pub slots: Vec<SlotReport>,
}

impl GroupReport {
    pub(crate) fn from_slots(name: Arc<str>, slots: Vec<SlotReport>) -> Self {
        let mut summary = Summary::default();
        for s in &slots {
            summary.add(s);
        }
        Self {
            name,
            summary,
            slots,
        }
    }
}

/// Status of every group, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Groups in registration order.
    pub groups: Vec<GroupReport>,
}

impl Report {
    /// Looks a group up by name.
    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| &*g.name == name)
    }
}

impl fmt::Display for SlotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------->")?;
        writeln!(f, "instance   : {}", self.index)?;
        writeln!(f, "name       : {}", self.group)?;
        writeln!(f, "status     : {}", self.status)?;
        writeln!(f, "started at : {}", format_time(self.started_at))?;
        writeln!(f, "exited at  : {}", format_time(self.exited_at))?;
        writeln!(f, "failed at  : {}", format_time(self.failed_at))?;
        writeln!(f, "failures   : {}", self.failures)?;
        writeln!(
            f,
            "last error : {}",
            self.last_failure.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(
            f,
            "------------------ group: {} ------ instances: {} ------------------>>",
            self.name, s.total
        )?;
        writeln!(f, "total      : {}", s.total)?;
        writeln!(f, "running    : {}", s.running)?;
        writeln!(f, "exited     : {}", s.exited)?;
        writeln!(f, "panicked   : {}", s.panicked)?;
        writeln!(f, "failures   : {}", s.failures)?;
        for slot in &self.slots {
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for g in &self.groups {
            write!(f, "{g}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(index: usize, status: SlotStatus, failures: u64) -> SlotReport {
        SlotReport {
            index,
            group: Arc::from("workers"),
            status,
            started_at: None,
            exited_at: None,
            failed_at: None,
            failures,
            last_failure: None,
        }
    }

    #[test]
    fn summary_counts_each_status() {
        let g = GroupReport::from_slots(
            Arc::from("workers"),
            vec![
                slot(0, SlotStatus::Running, 2),
                slot(1, SlotStatus::Exited, 0),
                slot(2, SlotStatus::Panicked, 5),
            ],
        );
        assert_eq!(
            g.summary,
            Summary {
                total: 3,
                running: 1,
                exited: 1,
                panicked: 1,
                failures: 7
            }
        );
    }

    #[test]
    fn unset_times_render_empty() {
        assert_eq!(format_time(None), "");
        let t = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).single();
        assert_eq!(format_time(t), "2024-03-09 07:05:01");
    }

    #[test]
    fn text_lists_header_summary_and_slots() {
        let mut s = slot(1, SlotStatus::Panicked, 1);
        s.last_failure = Some("boom".into());
        let report = Report {
            groups: vec![GroupReport::from_slots(
                Arc::from("workers"),
                vec![slot(0, SlotStatus::Running, 0), s],
            )],
        };
        let text = report.to_string();
        assert!(text.starts_with("------------------ group: workers ------ instances: 2 "));
        assert!(text.contains("running    : 1\n"));
        assert!(text.contains("panicked   : 1\n"));
        assert!(text.contains("instance   : 1\n"));
        assert!(text.contains("status     : panicked\n"));
        assert!(text.contains("exited at  : \n"));
        assert!(text.contains("last error : boom\n"));
        assert!(report.group("workers").is_some());
        assert!(report.group("Workers").is_none());
    }
}
