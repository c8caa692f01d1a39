use serde::{Deserialize, Serialize};

/// Outcome of one origin/destination pair in a routing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStatus {
    Reached,
    Unreached,
}

/// Sentinel duration carried by unreached entries.
pub const UNREACHED_DURATION: i64 = -1;

/// Travel time for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixEntry {
    /// Seconds; `-1` when the pair is unreached.
    pub duration: i64,
    pub status: RoutingStatus,
}

impl MatrixEntry {
    pub const fn reached(duration: i64) -> Self {
        Self {
            duration,
            status: RoutingStatus::Reached,
        }
    }

    pub const fn unreached() -> Self {
        Self {
            duration: UNREACHED_DURATION,
            status: RoutingStatus::Unreached,
        }
    }

    pub fn is_reached(self) -> bool {
        self.status == RoutingStatus::Reached
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub entries: Vec<MatrixEntry>,
}

/// Street-network routing matrix.
///
/// Entries are positional: callers index them in the order the places were
/// requested, never by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingMatrix {
    pub rows: Vec<MatrixRow>,
}

impl RoutingMatrix {
    pub fn single_row(entries: Vec<MatrixEntry>) -> Self {
        Self {
            rows: vec![MatrixRow { entries }],
        }
    }

    /// Iterates every entry in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = &MatrixEntry> {
        self.rows.iter().flat_map(|row| row.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreached_entry_never_looks_like_a_zero_duration_hit() {
        let entry = MatrixEntry::unreached();
        assert_eq!(entry.duration, -1);
        assert!(!entry.is_reached());
        assert_ne!(entry, MatrixEntry::reached(0));
    }

    #[test]
    fn entries_iterates_in_row_order() {
        let matrix = RoutingMatrix::single_row(vec![
            MatrixEntry::reached(10),
            MatrixEntry::unreached(),
            MatrixEntry::reached(30),
        ]);
        let durations: Vec<i64> = matrix.entries().map(|entry| entry.duration).collect();
        assert_eq!(durations, vec![10, -1, 30]);
    }
}
