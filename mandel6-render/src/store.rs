//! Double-buffered per-point state storage.
//!
//! Both buffers share one allocation size, `capacity.0 * capacity.1`, and a
//! row stride of `capacity.0`. The visible grid occupies the top-left
//! `grid.0 × grid.1` corner. Capacity grows in power-of-two steps per axis
//! and never shrinks.

use mandel6_core::PointState;
use tracing::{info, warn};

use crate::error::RenderError;

/// Largest supported grid extent along either axis.
pub const CAPACITY_CEILING: u32 = 4096;

/// Which of the two buffers is written this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    Even,
    Odd,
}

impl Parity {
    pub fn flip(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }

    #[inline]
    fn active_index(self) -> usize {
        match self {
            Self::Even => 0,
            Self::Odd => 1,
        }
    }
}

/// Read-only view of one buffer's visible grid.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    states: &'a [PointState],
    pub width: u32,
    pub height: u32,
    stride: usize,
}

impl<'a> GridView<'a> {
    /// The visible part of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [PointState] {
        let start = y as usize * self.stride;
        &self.states[start..start + self.width as usize]
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> PointState {
        self.states[y as usize * self.stride + x as usize]
    }

    pub fn iter(self) -> impl Iterator<Item = &'a PointState> {
        (0..self.height).flat_map(move |y| self.row(y).iter())
    }
}

/// Two point-state grids that alternate between "previous" (read) and
/// "active" (written) every tick.
#[derive(Debug)]
pub struct ProgressiveStore {
    buffers: [Vec<PointState>; 2],
    capacity: (u32, u32),
    grid: (u32, u32),
    parity: Parity,
}

fn axis_capacity(required: u32) -> u32 {
    required.max(1).next_power_of_two().min(CAPACITY_CEILING)
}

impl ProgressiveStore {
    /// Allocate both buffers for a `width × height` grid, all points fresh.
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let capacity = (axis_capacity(width), axis_capacity(height));
        let len = capacity.0 as usize * capacity.1 as usize;
        Ok(Self {
            buffers: [vec![PointState::FRESH; len], vec![PointState::FRESH; len]],
            capacity,
            grid: (width.min(capacity.0), height.min(capacity.1)),
            parity: Parity::Even,
        })
    }

    /// Allocated extent per axis (always a power of two).
    pub fn capacity(&self) -> (u32, u32) {
        self.capacity
    }

    /// Visible grid extent.
    pub fn grid_size(&self) -> (u32, u32) {
        self.grid
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Fill both buffers with fresh state.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(PointState::FRESH);
        }
    }

    /// Set the visible grid to `width × height`, growing capacity when it
    /// does not fit. Requests beyond [`CAPACITY_CEILING`] are clamped.
    ///
    /// Growth discards all state. Returns `true` if capacity grew.
    pub fn resize_if_needed(&mut self, width: u32, height: u32) -> crate::Result<bool> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if width > CAPACITY_CEILING || height > CAPACITY_CEILING {
            warn!(
                width,
                height,
                ceiling = CAPACITY_CEILING,
                "Requested grid exceeds capacity ceiling, clamping"
            );
        }
        let width = width.min(CAPACITY_CEILING);
        let height = height.min(CAPACITY_CEILING);

        let grew = width > self.capacity.0 || height > self.capacity.1;
        if grew {
            let capacity = (
                self.capacity.0.max(axis_capacity(width)),
                self.capacity.1.max(axis_capacity(height)),
            );
            info!(
                old_width = self.capacity.0,
                old_height = self.capacity.1,
                new_width = capacity.0,
                new_height = capacity.1,
                "Growing progressive buffers"
            );
            let len = capacity.0 as usize * capacity.1 as usize;
            self.buffers = [vec![PointState::FRESH; len], vec![PointState::FRESH; len]];
            self.capacity = capacity;
        }
        self.grid = (width, height);
        Ok(grew)
    }

    /// Flip parity: the buffer just written becomes "previous".
    pub fn tick(&mut self) {
        self.parity = self.parity.flip();
    }

    /// Borrow `(previous, active)` for the given parity.
    ///
    /// The two slices are distinct buffers, so a tick can never read what it
    /// writes.
    pub fn split(&mut self, parity: Parity) -> (&[PointState], &mut [PointState]) {
        let [even, odd] = &mut self.buffers;
        match parity {
            Parity::Even => (odd.as_slice(), even.as_mut_slice()),
            Parity::Odd => (even.as_slice(), odd.as_mut_slice()),
        }
    }

    /// Row stride shared by both buffers.
    pub fn stride(&self) -> usize {
        self.capacity.0 as usize
    }

    /// The buffer written by the most recent tick.
    pub fn latest(&self) -> GridView<'_> {
        self.view(self.parity.flip())
    }

    /// The buffer the next tick writes to.
    pub fn active(&self) -> GridView<'_> {
        self.view(self.parity)
    }

    fn view(&self, parity: Parity) -> GridView<'_> {
        GridView {
            states: &self.buffers[parity.active_index()],
            width: self.grid.0,
            height: self.grid.1,
            stride: self.stride(),
        }
    }
}
