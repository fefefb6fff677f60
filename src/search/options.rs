//! Search request/response types and the skill strength table
//!
//! Search strength is controlled either by a skill-level index into a fixed
//! table of depth/node/time triples, or by user-supplied advanced overrides.
//! Depth increases with the limits thanks to iterative deepening in the
//! engine; the table rows are tuned so each step is a noticeable jump in
//! playing strength.

use crate::types::{PromotionPiece, Square};

/// Options passed to the engine's search primitive
///
/// Opaque to the session layer beyond construction; the engine interprets
/// the limits. A limit of 0 means "engine default / unlimited".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Skill-level index this request was built from (informational)
    pub skill_index: usize,
    /// Maximum search depth in plies
    pub depth_limit: u32,
    /// Maximum nodes to search
    pub node_limit: u64,
    /// Maximum thinking time in milliseconds
    pub time_limit_ms: u64,
    /// Worker threads the engine may use
    pub threads: u32,
    /// Let the engine vary its opening play
    pub randomise_opening: bool,
    /// Bias the engine away from its first-choice move; set when the
    /// current position has repeated recently
    pub alternate_move_bias: bool,
}

impl SearchOptions {
    /// Options for a skill-table row with both bias flags off
    pub fn from_row(skill_index: usize, row: &StrengthRow) -> Self {
        Self {
            skill_index,
            depth_limit: row.depth,
            node_limit: row.nodes,
            time_limit_ms: row.time_ms,
            threads: 1,
            randomise_opening: false,
            alternate_move_bias: false,
        }
    }
}

/// Result returned by the engine's search primitive
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub from: Option<Square>,
    pub to: Option<Square>,
    pub promotion: Option<PromotionPiece>,
    /// The search observed its cancel token; `from`/`to` are meaningless
    pub cancelled: bool,
    pub error: bool,
    pub error_message: String,
}

impl SearchResult {
    /// A cancelled result with no move
    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }

    /// The proposed move, if the search completed with one
    pub fn best_move(&self) -> Option<(Square, Square)> {
        match (self.from, self.to) {
            (Some(f), Some(t)) if !self.cancelled && !self.error => Some((f, t)),
            _ => None,
        }
    }
}

/// One row of the strength table: a depth/node/time-limit triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthRow {
    pub depth: u32,
    pub nodes: u64,
    pub time_ms: u64,
}

/// Skill-index lookup table for non-advanced search configuration
///
/// Row 0 is the weakest setting; the last row is the maximum strength used
/// for hint searches regardless of the configured skill level.
#[derive(Debug, Clone)]
pub struct StrengthTable {
    rows: Vec<StrengthRow>,
}

impl Default for StrengthTable {
    fn default() -> Self {
        Self {
            rows: vec![
                StrengthRow { depth: 1, nodes: 100, time_ms: 500 },
                StrengthRow { depth: 2, nodes: 500, time_ms: 750 },
                StrengthRow { depth: 3, nodes: 2_000, time_ms: 1_000 },
                StrengthRow { depth: 4, nodes: 8_000, time_ms: 1_500 },
                StrengthRow { depth: 6, nodes: 30_000, time_ms: 2_000 },
                StrengthRow { depth: 8, nodes: 100_000, time_ms: 3_000 },
                StrengthRow { depth: 10, nodes: 400_000, time_ms: 4_000 },
                StrengthRow { depth: 12, nodes: 1_500_000, time_ms: 6_000 },
                StrengthRow { depth: 16, nodes: 6_000_000, time_ms: 8_000 },
                StrengthRow { depth: 22, nodes: 0, time_ms: 12_000 },
            ],
        }
    }
}

impl StrengthTable {
    /// Row for a skill index, clamped to the strongest row
    pub fn row(&self, skill_index: usize) -> &StrengthRow {
        let idx = skill_index.min(self.rows.len() - 1);
        &self.rows[idx]
    }

    /// Index of the strongest row
    pub fn max_index(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_row_zero_matches_table() {
        //! Skill index 0 in non-advanced mode produces exactly row 0's triple
        let table = StrengthTable::default();
        let row0 = *table.row(0);
        let options = SearchOptions::from_row(0, table.row(0));

        assert_eq!(options.depth_limit, row0.depth);
        assert_eq!(options.node_limit, row0.nodes);
        assert_eq!(options.time_limit_ms, row0.time_ms);
        assert!(!options.randomise_opening);
        assert!(!options.alternate_move_bias);
    }

    #[test]
    fn test_row_index_clamps_to_strongest() {
        let table = StrengthTable::default();
        assert_eq!(table.row(usize::MAX), table.row(table.max_index()));
    }

    #[test]
    fn test_rows_grow_in_strength() {
        //! Each row allows at least as much time as the previous one
        let table = StrengthTable::default();
        for i in 1..table.len() {
            assert!(table.row(i).time_ms >= table.row(i - 1).time_ms);
            assert!(table.row(i).depth >= table.row(i - 1).depth);
        }
    }

    #[test]
    fn test_cancelled_result_has_no_best_move() {
        let result = SearchResult {
            from: Some(12),
            to: Some(28),
            cancelled: true,
            ..SearchResult::default()
        };
        assert!(result.best_move().is_none());
    }
}
