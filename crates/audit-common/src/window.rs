//! Temporal window resolution.
//!
//! A window policy turns a reference timestamp into the ordered set of daily
//! source-file date identifiers contributing to one aggregate, plus the
//! index of that window in the reference archive's time axis. Policies are
//! plain data so they can be loaded from configuration; resolution is pure.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One resolved window: ordered compact `YYYYMMDD` identifiers, the
/// position in the reference time series, and the center/anchor timestamp
/// used for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub dates: Vec<String>,
    pub reference_index: usize,
    pub label: String,
}

/// Names of a paired value/observation-count variable in an archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariablePair {
    pub value: String,
    pub count: String,
}

/// How to resolve windows from timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// `2*radius+1` days centered on a timestamp; the reference index is
    /// known in advance for the archive this window is checked against.
    Symmetric {
        center: DateTime<Utc>,
        radius: u32,
        reference_index: usize,
    },
    /// `duration` consecutive days starting at a timestamp, inclusive.
    Forward {
        start: DateTime<Utc>,
        duration: u32,
        reference_index: usize,
    },
    /// A fixed ordered lattice of weekly anchor timestamps; anchor `k`
    /// yields a 7-day forward window with reference index `k`. Archive-level
    /// reference statistics are computed on these same weekly boundaries,
    /// so validation must align to identical boundaries.
    Lattice {
        #[serde(default = "reference_lattice")]
        anchors: Vec<DateTime<Utc>>,
    },
}

/// The built-in weekly lattice: 52 anchors at 7-day spacing across the 1993
/// reference year (1993-01-03 through 1993-12-26). The anchor list being in
/// sync with the reference archive's own time axis is an external
/// assumption the engine cannot verify.
pub fn reference_lattice() -> Vec<DateTime<Utc>> {
    let start = DateTime::parse_from_rfc3339("1993-01-03T00:00:00Z")
        .expect("valid lattice epoch")
        .with_timezone(&Utc);
    (0..52).map(|week| start + Duration::days(7 * week)).collect()
}

impl WindowPolicy {
    /// Number of distinct windows this policy can resolve.
    pub fn window_count(&self) -> usize {
        match self {
            WindowPolicy::Symmetric { .. } | WindowPolicy::Forward { .. } => 1,
            WindowPolicy::Lattice { anchors } => anchors.len(),
        }
    }

    /// Resolve window `idx`, or `None` when out of range.
    pub fn window_at(&self, idx: usize) -> Option<TimeWindow> {
        match self {
            WindowPolicy::Symmetric {
                center,
                radius,
                reference_index,
            } => {
                if idx != 0 {
                    return None;
                }
                Some(TimeWindow {
                    dates: symmetric_dates(*center, *radius),
                    reference_index: *reference_index,
                    label: center.to_rfc3339(),
                })
            }
            WindowPolicy::Forward {
                start,
                duration,
                reference_index,
            } => {
                if idx != 0 {
                    return None;
                }
                Some(TimeWindow {
                    dates: forward_dates(*start, *duration),
                    reference_index: *reference_index,
                    label: start.to_rfc3339(),
                })
            }
            WindowPolicy::Lattice { anchors } => {
                let anchor = anchors.get(idx)?;
                Some(TimeWindow {
                    dates: forward_dates(*anchor, 7),
                    reference_index: idx,
                    label: anchor.to_rfc3339(),
                })
            }
        }
    }
}

/// Compact `YYYYMMDD` identifiers for the days `center - radius ..=
/// center + radius`.
fn symmetric_dates(center: DateTime<Utc>, radius: u32) -> Vec<String> {
    let radius = radius as i64;
    (-radius..=radius)
        .map(|i| compact_date(center + Duration::days(i)))
        .collect()
}

/// Compact `YYYYMMDD` identifiers for `duration` days starting at `start`.
fn forward_dates(start: DateTime<Utc>, duration: u32) -> Vec<String> {
    (0..duration as i64)
        .map(|i| compact_date(start + Duration::days(i)))
        .collect()
}

fn compact_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_symmetric_window_spans_radius() {
        let policy = WindowPolicy::Symmetric {
            center: ts("1993-01-17T00:00:00Z"),
            radius: 3,
            reference_index: 1,
        };
        let window = policy.window_at(0).unwrap();
        assert_eq!(
            window.dates,
            vec![
                "19930114", "19930115", "19930116", "19930117", "19930118", "19930119", "19930120"
            ]
        );
        assert_eq!(window.reference_index, 1);
        assert!(policy.window_at(1).is_none());
    }

    #[test]
    fn test_symmetric_window_crosses_year_boundary() {
        let policy = WindowPolicy::Symmetric {
            center: ts("1993-01-01T00:00:00Z"),
            radius: 3,
            reference_index: 0,
        };
        let window = policy.window_at(0).unwrap();
        assert_eq!(
            window.dates,
            vec![
                "19921229", "19921230", "19921231", "19930101", "19930102", "19930103", "19930104"
            ]
        );
    }

    #[test]
    fn test_forward_window_inclusive() {
        let policy = WindowPolicy::Forward {
            start: ts("1993-02-28T00:00:00Z"),
            duration: 3,
            reference_index: 0,
        };
        let window = policy.window_at(0).unwrap();
        assert_eq!(window.dates, vec!["19930228", "19930301", "19930302"]);
    }

    #[test]
    fn test_reference_lattice_shape() {
        let anchors = reference_lattice();
        assert_eq!(anchors.len(), 52);
        assert_eq!(anchors[0], ts("1993-01-03T00:00:00Z"));
        assert_eq!(anchors[51], ts("1993-12-26T00:00:00Z"));
        for pair in anchors.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
    }

    #[test]
    fn test_lattice_windows_align_to_anchors() {
        let policy = WindowPolicy::Lattice {
            anchors: reference_lattice(),
        };
        assert_eq!(policy.window_count(), 52);
        let window = policy.window_at(5).unwrap();
        assert_eq!(window.dates.len(), 7);
        assert_eq!(window.dates[0], "19930207");
        assert_eq!(window.reference_index, 5);
        assert!(policy.window_at(52).is_none());
    }

    #[test]
    fn test_policy_yaml_round_trip() {
        let yaml = "type: symmetric\ncenter: 1993-01-17T00:00:00Z\nradius: 3\nreference_index: 1\n";
        let policy: WindowPolicy = serde_yaml::from_str(yaml).unwrap();
        match policy {
            WindowPolicy::Symmetric { radius, .. } => assert_eq!(radius, 3),
            _ => panic!("wrong variant"),
        }
    }
}
