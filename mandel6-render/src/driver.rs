use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use mandel6_core::mapper::{self, GraphExtent};
use mandel6_core::{
    advance, evaluate_to_completion, Center, CenterTable, Complex, EvalParams, PointState,
    PointStatus, Viewport,
};

use crate::store::{GridView, Parity, ProgressiveStore};

// ---------------------------------------------------------------------------
// Mode and inputs
// ---------------------------------------------------------------------------

/// How each tick evaluates the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvalMode {
    /// Resume every point from the previous buffer with a bounded budget.
    #[default]
    Progressive,
    /// Evaluate every point to termination, ignoring previous state.
    FullRecompute,
}

/// Everything a tick needs besides the buffers.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub graph_center: Complex,
    pub graph_extent: GraphExtent,
    pub centers: &'a CenterTable,
    pub params: &'a EvalParams,
    pub mode: EvalMode,
}

/// Grid placement inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
}

/// Per-tick point tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointCounts {
    pub escaped: usize,
    pub saturated: usize,
    pub live: usize,
}

impl PointCounts {
    fn record(&mut self, status: PointStatus) {
        match status {
            PointStatus::Escaped { .. } => self.escaped += 1,
            PointStatus::Saturated => self.saturated += 1,
            PointStatus::Fresh | PointStatus::Iterating => self.live += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            escaped: self.escaped + other.escaped,
            saturated: self.saturated + other.saturated,
            live: self.live + other.live,
        }
    }

    pub fn total(&self) -> usize {
        self.escaped + self.saturated + self.live
    }
}

/// Summary of one driver tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub width: u32,
    pub height: u32,
    /// Parity of the buffer written by this tick.
    pub parity: Parity,
    /// Whether progressive state was discarded before this tick.
    pub reset: bool,
    pub counts: PointCounts,
    pub elapsed: Duration,
}

impl FrameStats {
    /// No point can change on further ticks.
    pub fn is_converged(&self) -> bool {
        self.counts.live == 0
    }
}

// ---------------------------------------------------------------------------
// One tick over a pair of buffers
// ---------------------------------------------------------------------------

/// Read `previous`, write `active`, for every point of the grid.
///
/// Rows are processed in parallel; every point depends only on its own
/// previous state, so there is no synchronization until the call returns.
pub fn advance_grid(
    previous: &[PointState],
    active: &mut [PointState],
    layout: GridLayout,
    frame: &FrameInputs<'_>,
) -> PointCounts {
    let used = layout.height as usize * layout.stride;
    let max = frame.params.max_iterations;
    let burst = frame.params.first_tick_burst;

    active[..used]
        .par_chunks_mut(layout.stride)
        .zip(previous[..used].par_chunks(layout.stride))
        .enumerate()
        .map(|(y, (out_row, in_row))| {
            let mut counts = PointCounts::default();
            let width = layout.width as usize;
            for (x, (out, prev)) in out_row[..width].iter_mut().zip(&in_row[..width]).enumerate() {
                let uv = mapper::pixel_to_uv(x as u32, y as u32, layout.width, layout.height);
                let c = mapper::to_complex(uv, frame.graph_center, frame.graph_extent);
                *out = match frame.mode {
                    EvalMode::Progressive => {
                        let budget = if prev.is_fresh() { burst } else { 1 };
                        advance(*prev, c, frame.centers, frame.params, budget)
                    }
                    EvalMode::FullRecompute => evaluate_to_completion(c, frame.centers, frame.params),
                };
                counts.record(out.status(max));
            }
            counts
        })
        .reduce(PointCounts::default, PointCounts::merge)
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// The state that, when it changes, invalidates progressive buffers.
#[derive(Debug, Clone, PartialEq)]
struct FrameKey {
    graph_center: Complex,
    graph_extent: GraphExtent,
    grid: (u32, u32),
    centers: Vec<Center>,
    params: EvalParams,
    mode: EvalMode,
}

/// Owns the progressive store and runs one tick per frame.
#[derive(Debug)]
pub struct FrameDriver {
    store: ProgressiveStore,
    last_key: Option<FrameKey>,
    ticks_since_reset: u64,
}

impl FrameDriver {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        Ok(Self {
            store: ProgressiveStore::new(width, height)?,
            last_key: None,
            ticks_since_reset: 0,
        })
    }

    /// Force a reset on the next tick.
    pub fn invalidate(&mut self) {
        self.last_key = None;
    }

    pub fn store(&self) -> &ProgressiveStore {
        &self.store
    }

    /// Point states written by the most recent tick.
    pub fn latest(&self) -> GridView<'_> {
        self.store.latest()
    }

    pub fn ticks_since_reset(&self) -> u64 {
        self.ticks_since_reset
    }

    /// Evaluate one frame of `viewport` on a `grid` of sample points.
    ///
    /// Any change in view, grid size, center table, parameters or mode since
    /// the last tick resets both buffers first.
    pub fn tick(
        &mut self,
        viewport: &Viewport,
        grid: (u32, u32),
        centers: &CenterTable,
        params: &EvalParams,
        mode: EvalMode,
    ) -> crate::Result<FrameStats> {
        let start = Instant::now();

        let grew = self.store.resize_if_needed(grid.0, grid.1)?;
        let (width, height) = self.store.grid_size();

        let key = FrameKey {
            graph_center: viewport.center,
            graph_extent: viewport.graph_extent(),
            grid: (width, height),
            centers: centers.as_slice().to_vec(),
            params: *params,
            mode,
        };
        let reset = grew || self.last_key.as_ref() != Some(&key);
        if reset {
            self.store.reset();
            self.ticks_since_reset = 0;
            debug!(
                width,
                height,
                zoom = viewport.zoom,
                centers = centers.len(),
                ?mode,
                "Resetting progressive state"
            );
        }

        let frame = FrameInputs {
            graph_center: key.graph_center,
            graph_extent: key.graph_extent,
            centers,
            params,
            mode,
        };
        let layout = GridLayout {
            width,
            height,
            stride: self.store.stride(),
        };
        let parity = self.store.parity();
        let (previous, active) = self.store.split(parity);
        let counts = advance_grid(previous, active, layout, &frame);
        self.store.tick();
        self.ticks_since_reset += 1;
        if reset {
            self.last_key = Some(key);
        }

        let elapsed = start.elapsed();
        trace!(
            escaped = counts.escaped,
            saturated = counts.saturated,
            live = counts.live,
            elapsed_us = elapsed.as_micros() as u64,
            "Tick complete"
        );

        Ok(FrameStats {
            width,
            height,
            parity,
            reset,
            counts,
            elapsed,
        })
    }
}
