//! Render-time interpolation between simulation snapshots.
//!
//! The simulation moves in whole cells once per tick; the renderer wants a
//! position for every frame. [`Interpolation`] keeps the unit positions of
//! the last two ticks it observed and blends them by the fraction of the
//! current tick interval that has elapsed.
//!
//! When several ticks run back to back, [`Interpolation::observe`] must see
//! each of them, so that `previous` is always the state one tick before
//! `current`.

use std::fmt;

use rampart_core::{Coord, TickId};

use crate::error::InterpolationError;
use crate::simulation::Simulation;

/// Previous, current and rendered positions, parallel to the simulation's
/// unit array.
///
/// All three position sets live in one region borrowed from the caller.
pub struct Interpolation<'m> {
    previous: &'m mut [Coord],
    current: &'m mut [Coord],
    rendered: &'m mut [Coord],
    unit_count: usize,
    observed_tick: TickId,
}

impl<'m> Interpolation<'m> {
    /// Create an interpolation over `storage`, split into three equal
    /// position sets. Capacity is `storage.len() / 3` units.
    pub fn new(storage: &'m mut [Coord]) -> Self {
        let capacity = storage.len() / 3;
        let (previous, rest) = storage.split_at_mut(capacity);
        let (current, rest) = rest.split_at_mut(capacity);
        let (rendered, _) = rest.split_at_mut(capacity);
        Self {
            previous,
            current,
            rendered,
            unit_count: 0,
            observed_tick: TickId(0),
        }
    }

    /// Seed all three position sets from the simulation's current units.
    ///
    /// Must be called again whenever the unit set changes shape.
    pub fn init(&mut self, sim: &Simulation<'_>) -> Result<(), InterpolationError> {
        let n = sim.unit_count();
        if n > self.capacity() {
            return Err(InterpolationError::CapacityExceeded {
                capacity: self.capacity(),
                units: n,
            });
        }
        for (i, unit) in sim.units().iter().enumerate() {
            self.previous[i] = unit.position;
            self.current[i] = unit.position;
            self.rendered[i] = unit.position;
        }
        self.unit_count = n;
        self.observed_tick = sim.tick_id();
        Ok(())
    }

    /// Record the simulation's positions if it ticked since the last
    /// observation: the old current positions become the previous ones.
    ///
    /// Call after every tick; [`update`](Self::update) only catches up one
    /// tick.
    pub fn observe(&mut self, sim: &Simulation<'_>) -> Result<(), InterpolationError> {
        if sim.unit_count() != self.unit_count {
            return Err(InterpolationError::UnitCountMismatch {
                seeded: self.unit_count,
                actual: sim.unit_count(),
            });
        }
        if sim.tick_id() == self.observed_tick {
            return Ok(());
        }
        let n = self.unit_count;
        self.previous[..n].copy_from_slice(&self.current[..n]);
        for (slot, unit) in self.current[..n].iter_mut().zip(sim.units()) {
            *slot = unit.position;
        }
        self.observed_tick = sim.tick_id();
        Ok(())
    }

    /// Recompute rendered positions for `fraction` of the current tick
    /// interval.
    ///
    /// Observes the simulation first. `fraction` is clamped to `[0, 1]`;
    /// NaN counts as 0. The simulation is never modified.
    pub fn update(
        &mut self,
        sim: &Simulation<'_>,
        fraction: f32,
    ) -> Result<(), InterpolationError> {
        self.observe(sim)?;

        let t = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        for i in 0..self.unit_count {
            self.rendered[i] = Coord::new(
                lerp(self.previous[i].x, self.current[i].x, t),
                lerp(self.previous[i].y, self.current[i].y, t),
            );
        }
        Ok(())
    }

    /// Rendered positions from the last [`update`](Self::update).
    pub fn positions(&self) -> &[Coord] {
        &self.rendered[..self.unit_count]
    }

    /// Positions at the tick before the last observed one.
    pub fn previous(&self) -> &[Coord] {
        &self.previous[..self.unit_count]
    }

    /// Positions at the last observed tick.
    pub fn current(&self) -> &[Coord] {
        &self.current[..self.unit_count]
    }

    /// Number of units interpolated.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// Most units this interpolation can hold.
    pub fn capacity(&self) -> usize {
        self.rendered.len()
    }

    /// The simulation tick the current positions were captured at.
    pub fn observed_tick(&self) -> TickId {
        self.observed_tick
    }
}

impl fmt::Debug for Interpolation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolation")
            .field("unit_count", &self.unit_count)
            .field("capacity", &self.capacity())
            .field("observed_tick", &self.observed_tick)
            .finish()
    }
}

/// Blend two cell coordinates, rounding to the nearest cell.
///
/// Exact at `t == 0` and `t == 1`: coordinates fit in f32's mantissa, so
/// `a + (b - a) * 1.0` is `b` with no rounding.
fn lerp(a: u16, b: u16, t: f32) -> u16 {
    let (a, b) = (a as f32, b as f32);
    (a + (b - a) * t).round().clamp(0.0, u16::MAX as f32) as u16
}
