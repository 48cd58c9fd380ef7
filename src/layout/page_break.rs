//! # Page Break Decisions
//!
//! Logic for deciding when a block of display rows goes on the current
//! page, moves to the next one, or (only when taller than a whole page)
//! flows across pages row by row.

/// Decide what to do with a block before its first row is placed.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire block on the current page (it fits).
    Place,
    /// Move the entire block to the next page.
    MoveToNextPage,
    /// The block is taller than a fresh page: place this many rows here
    /// and continue on the next page.
    Split { rows_on_current_page: usize },
}

/// Given the remaining space on a page and the heights of a block's rows,
/// decide how to break.
///
/// A block that does not fit is moved to a fresh page whole. Only a block
/// that starts at the top of a page and still does not fit is split, and
/// then at least one row is placed so layout always makes progress.
pub fn decide_break(remaining_height: f64, row_heights: &[f64], at_page_top: bool) -> BreakDecision {
    let total: f64 = row_heights.iter().sum();

    // Easy case: everything fits (exact fits included)
    if total <= remaining_height + FIT_TOLERANCE {
        return BreakDecision::Place;
    }

    if !at_page_top {
        return BreakDecision::MoveToNextPage;
    }

    // Oversized block on a fresh page: find how many rows fit
    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in row_heights {
        if running + h > remaining_height + FIT_TOLERANCE {
            break;
        }
        running += h;
        fit_count += 1;
    }

    BreakDecision::Split {
        rows_on_current_page: fit_count.max(1),
    }
}

/// Slack for accumulated floating point error when a block fits exactly.
pub const FIT_TOLERANCE: f64 = 1e-6;
