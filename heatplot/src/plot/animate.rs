//! Time-stepped animation assembly and quality heuristics
use super::{plot_for_time, GridRect, Plot};
use crate::expr::Formula;
use crate::Error;

/// Samples `formula` across the time range `[t_lower, t_upper)`
///
/// The first frame is always produced, at `t_lower`.  Whether T was read
/// while sampling that frame is a single gate, decided once: when the
/// equation never reads T every later frame would be identical, so the
/// animation is exactly one frame regardless of the requested range.
pub fn animate(
    formula: &Formula,
    t_lower: i32,
    t_upper: i32,
    rect: GridRect,
    cell_size: f64,
) -> Result<(bool, Vec<Plot>), Error> {
    let (first, time_used) = plot_for_time(formula, rect, t_lower, cell_size)?;
    let mut plots = vec![first];
    if time_used {
        for t in (t_lower + 1)..t_upper {
            let (plot, _) = plot_for_time(formula, rect, t, cell_size)?;
            plots.push(plot);
        }
    }
    Ok((time_used, plots))
}

/// Coverage and change statistics over an assembled frame sequence
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Total samples in the near-zero band, across all frames
    pub near_zero_total: usize,
    /// Frames with at least one near-zero sample
    pub covered_frames: usize,
    /// Adjacent frame pairs whose residual buffers differ
    pub frame_changes: usize,
}

impl FrameStats {
    /// Measures a frame sequence
    pub fn measure(plots: &[Plot]) -> Self {
        let mut stats = FrameStats::default();
        for (i, plot) in plots.iter().enumerate() {
            stats.near_zero_total += plot.near_zero_count();
            if plot.near_zero_count() > 0 {
                stats.covered_frames += 1;
            }
            if i > 0 && plots[i - 1] != *plot {
                stats.frame_changes += 1;
            }
        }
        stats
    }

    /// Applies the quality bar for randomly generated equations
    ///
    /// `None` means the sequence is worth keeping.  The thresholds encode a
    /// taste judgment, not correctness: a barely-moving animation, one whose
    /// curve never shows up, or one that floods the grid all read as noise.
    pub fn reject_reason(&self, frame_count: usize, rect: GridRect) -> Option<Reject> {
        let budget = (frame_count * rect.cell_count()) as f64;
        if self.frame_changes <= 1 && frame_count > 3 {
            return Some(Reject::Static);
        }
        if self.covered_frames < frame_count / 2 {
            return Some(Reject::Sparse);
        }
        if (self.near_zero_total as f64) < budget * 0.01 {
            return Some(Reject::Empty);
        }
        if (self.near_zero_total as f64) > budget * 0.90 {
            return Some(Reject::Saturated);
        }
        None
    }
}

/// Why a generated frame sequence was rejected
#[derive(Copy, Clone, Debug, Eq, PartialEq, strum::Display)]
pub enum Reject {
    /// At most one adjacent frame pair differs
    #[strum(to_string = "too few frames differ from their predecessor")]
    Static,
    /// Fewer than half the frames show any of the curve
    #[strum(to_string = "fewer than half the frames have any coverage")]
    Sparse,
    /// Under 1% of all samples are near the curve
    #[strum(to_string = "under 1% of the sample budget is near the curve")]
    Empty,
    /// Over 90% of all samples are near the curve
    #[strum(to_string = "over 90% of the sample budget is near the curve")]
    Saturated,
}
