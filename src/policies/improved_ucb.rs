use std::f64::consts::E;

use rand::{Rng, RngCore};

use crate::error::{BanditError, Result, ensure_arms, ensure_positive};
use crate::index::RoundState;
use crate::policy::{Direction, Policy, select_extreme};

/// Improved UCB (Auer and Ortner 2010): phased elimination for a known horizon.
///
/// Each phase samples every active arm up to a common count `n`, then drops
/// the arms whose upper bound falls below the best lower bound and halves the
/// gap estimate `delta`. Once `horizon * delta^2 < e` the confidence width is
/// undefined and the empirical best active arm is played from then on.
#[derive(Clone, Debug)]
pub struct ImprovedUcb {
    horizon: usize,
    c: f64,
    state: RoundState,
    delta: f64,
    phase_draws: usize,
    active: Vec<usize>,
}

impl ImprovedUcb {
    pub fn new(nb_arms: usize, horizon: usize, c: f64) -> Result<Self> {
        ensure_arms(nb_arms)?;
        if horizon == 0 {
            return Err(BanditError::invalid("horizon must be positive"));
        }
        ensure_positive("c", c)?;
        Ok(Self {
            horizon,
            c,
            state: RoundState::new(nb_arms),
            delta: 1.0,
            phase_draws: 1,
            active: (0..nb_arms).collect(),
        })
    }

    /// Arms not yet eliminated.
    pub fn active_arms(&self) -> &[usize] {
        &self.active
    }

    /// Current gap estimate, halved after every elimination.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    fn level(&self) -> f64 {
        self.horizon as f64 * self.delta * self.delta
    }

    fn eliminate(&mut self) {
        let width = self.c * (2.0 * self.level().ln() / self.phase_draws as f64).sqrt();
        let state = &self.state;
        let max_lcb = self
            .active
            .iter()
            .map(|&arm| state.mean(arm) - width)
            .fold(f64::NEG_INFINITY, f64::max);
        self.active.retain(|&arm| state.mean(arm) + width >= max_lcb);

        self.delta /= 2.0;
        let next = 2.0 * self.level().ln() / (self.delta * self.delta);
        self.phase_draws = next.max(0.0) as usize + 1;
        log::trace!(
            "improved UCB phase over: {} active arms, delta = {}",
            self.active.len(),
            self.delta
        );
    }
}

impl Policy for ImprovedUcb {
    fn name(&self) -> &'static str {
        "ImprovedUCB"
    }

    fn nb_arms(&self) -> usize {
        self.state.nb_arms()
    }

    fn start_game(&mut self) {
        self.state.reset();
        self.delta = 1.0;
        self.phase_draws = 1;
        self.active = (0..self.state.nb_arms()).collect();
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        loop {
            if let [arm] = self.active[..] {
                return arm;
            }
            if self.level() < E {
                let means: Vec<f64> = self.active.iter().map(|&a| self.state.mean(a)).collect();
                return self.active[select_extreme(&means, Direction::Maximize, rng)];
            }
            let pending: Vec<usize> = self
                .active
                .iter()
                .copied()
                .filter(|&arm| self.state.nb_draws(arm) < self.phase_draws)
                .collect();
            if !pending.is_empty() {
                return pending[rng.random_range(0..pending.len())];
            }
            self.eliminate();
        }
    }

    fn get_reward(&mut self, arm: usize, reward: f64, _rng: &mut dyn RngCore) {
        self.state.record(arm, reward);
    }
}
