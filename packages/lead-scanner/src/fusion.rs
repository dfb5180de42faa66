//! Directory-data adjustments layered on top of the page score.

use tracing::trace;

use crate::types::lead::DirectoryData;

pub const CLOSED_REASON: &str = "Business is marked CLOSED on Google";

pub const MAX_SCORE: i32 = 10;

/// Inclusive review-count range that earns a bonus.
pub const REVIEW_SWEET_SPOT: (u32, u32) = (20, 200);
/// Inclusive rating range that earns a bonus.
pub const RATING_SWEET_SPOT: (f64, f64) = (3.8, 4.6);

struct Adjustment {
    name: &'static str,
    delta: i32,
    applies: fn(&DirectoryData) -> bool,
}

const ADJUSTMENTS: [Adjustment; 5] = [
    Adjustment {
        name: "verified",
        delta: 1,
        applies: |d| d.google_verified,
    },
    Adjustment {
        name: "claimed",
        delta: 1,
        applies: |d| d.google_is_claimed,
    },
    Adjustment {
        name: "hours_present",
        delta: 1,
        applies: |d| d.google_hours_present,
    },
    Adjustment {
        name: "review_count",
        delta: 1,
        applies: |d| {
            d.review_count
                .is_some_and(|n| (REVIEW_SWEET_SPOT.0..=REVIEW_SWEET_SPOT.1).contains(&n))
        },
    },
    Adjustment {
        name: "rating",
        delta: 1,
        applies: |d| {
            d.rating
                .is_some_and(|r| (RATING_SWEET_SPOT.0..=RATING_SWEET_SPOT.1).contains(&r))
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fused {
    pub score: u8,
    pub closed: bool,
}

/// Apply directory adjustments, then the closure override, then clamp.
///
/// Closure is checked after every bonus so a closed business always lands
/// on zero.
pub fn fuse(base: i32, directory: &DirectoryData) -> Fused {
    let adjusted = ADJUSTMENTS
        .iter()
        .filter(|adj| (adj.applies)(directory))
        .inspect(|adj| trace!(adjustment = adj.name, delta = adj.delta, "directory adjustment"))
        .fold(base, |score, adj| score.saturating_add(adj.delta));

    let closed = directory.is_closed();
    let score = if closed { 0 } else { adjusted.clamp(0, MAX_SCORE) };

    Fused {
        score: score as u8,
        closed,
    }
}
