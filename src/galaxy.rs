// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng};
use tracing::debug;

use crate::canvas::{Canvas, DrawCtx, Size};
use crate::clock::{Clock, Pulse};
use crate::element::{CreationInput, Element};
use crate::population::Population;

/// The render/update loop for one canvas.
///
/// Each [`Galaxy::pulse`] draws every element as it stood at the end of the
/// previous pulse, then advances every element, then commits the clock. The
/// population does not exist until [`Galaxy::appear`] reports a size.
pub struct Galaxy<E, F, R = StdRng> {
    count: usize,
    factory: F,
    rng: R,
    population: Option<Population<E>>,
    clock: Clock,
    paused_at: Option<Instant>,
    pulses: u64,
}

impl<E, F, R> Galaxy<E, F, R>
where
    E: Element,
    F: FnMut(CreationInput, &mut R) -> E,
    R: Rng,
{
    pub fn new(count: usize, factory: F, rng: R, now: Instant) -> Self {
        Self {
            count,
            factory,
            rng,
            population: None,
            clock: Clock::new(now),
            paused_at: None,
            pulses: 0,
        }
    }

    pub fn with_max_delta(mut self, cap: Option<Duration>) -> Self {
        self.clock.set_max_delta(cap);
        self
    }

    /// Builds the population the first time a concrete size shows up. Later
    /// calls are no-ops; returns whether this call created it.
    pub fn appear(&mut self, space: Size) -> bool {
        if self.population.is_some() {
            return false;
        }
        let pop = Population::create(space, self.count, &mut self.rng, &mut self.factory);
        debug!(
            count = pop.len(),
            width = space.width,
            height = space.height,
            "population created"
        );
        self.population = Some(pop);
        true
    }

    #[cfg(test)]
    pub fn population(&self) -> Option<&Population<E>> {
        self.population.as_ref()
    }

    #[cfg(test)]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        match self.paused_at.take() {
            Some(at) => self.clock.shift(now.saturating_duration_since(at)),
            None => self.paused_at = Some(now),
        }
    }

    /// One tick. Returns `None` while paused, leaving everything untouched.
    pub fn pulse<C: Canvas>(
        &mut self,
        now: Instant,
        space: Size,
        ctx: &mut DrawCtx<'_, C>,
    ) -> Option<Pulse> {
        if self.paused_at.is_some() {
            return None;
        }

        let pulse = self.clock.pulse(now);
        if let Some(pop) = self.population.as_mut() {
            for element in pop.iter() {
                element.render(space, pulse, ctx);
            }
            for element in pop.iter_mut() {
                element.advance(space, pulse, &mut self.rng);
            }
        }
        self.clock.commit(now);
        self.pulses = self.pulses.saturating_add(1);
        Some(pulse)
    }
}
