//! Generic index policy driver.
//!
//! Every index policy shares the same skeleton: pull each arm once in order,
//! then score every arm each round and play a maximiser (or minimiser) chosen
//! uniformly among ties. The only thing that differs between UCB, MOSS,
//! KL-UCB and friends is the scoring formula, captured by [`IndexRule`].

use rand::RngCore;

use crate::error::{Result, ensure_arms};
use crate::policy::{Direction, Policy, select_extreme};

/// Per-arm counters of one game.
///
/// At the start of round `t` the draw counts sum to `t - 1`. Only
/// [`RoundState::record`] mutates the counters and only
/// [`RoundState::reset`] rewinds them.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    t: usize,
    nb_draws: Vec<usize>,
    cum_reward: Vec<f64>,
    cum_reward2: Vec<f64>,
}

impl RoundState {
    pub fn new(nb_arms: usize) -> Self {
        Self {
            t: 1,
            nb_draws: vec![0; nb_arms],
            cum_reward: vec![0.0; nb_arms],
            cum_reward2: vec![0.0; nb_arms],
        }
    }

    pub fn reset(&mut self) {
        self.t = 1;
        self.nb_draws.fill(0);
        self.cum_reward.fill(0.0);
        self.cum_reward2.fill(0.0);
    }

    /// Records `reward` for `arm` and moves to the next round.
    pub fn record(&mut self, arm: usize, reward: f64) {
        self.nb_draws[arm] += 1;
        self.cum_reward[arm] += reward;
        self.cum_reward2[arm] += reward * reward;
        self.t += 1;
    }

    /// Current round, starting at 1.
    pub fn t(&self) -> usize {
        self.t
    }

    pub fn nb_arms(&self) -> usize {
        self.nb_draws.len()
    }

    pub fn nb_draws(&self, arm: usize) -> usize {
        self.nb_draws[arm]
    }

    pub fn draws(&self) -> &[usize] {
        &self.nb_draws
    }

    pub fn cum_reward(&self, arm: usize) -> f64 {
        self.cum_reward[arm]
    }

    /// Sum of squared rewards observed on `arm`.
    pub fn cum_reward2(&self, arm: usize) -> f64 {
        self.cum_reward2[arm]
    }

    /// Empirical mean of `arm`, 0 if never pulled.
    pub fn mean(&self, arm: usize) -> f64 {
        match self.nb_draws[arm] {
            0 => 0.0,
            n => self.cum_reward[arm] / n as f64,
        }
    }

    /// Biased empirical variance of `arm`, floored at 0 against rounding.
    pub fn variance(&self, arm: usize) -> f64 {
        match self.nb_draws[arm] {
            0 => 0.0,
            n => {
                let m = self.mean(arm);
                (self.cum_reward2[arm] / n as f64 - m * m).max(0.0)
            }
        }
    }

    /// Largest empirical mean over arms pulled at least once.
    pub fn best_mean(&self) -> f64 {
        (0..self.nb_arms())
            .filter(|&arm| self.nb_draws[arm] > 0)
            .map(|arm| self.mean(arm))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Arm forced during warm-up (`t <= K`), `None` afterwards.
    pub fn warm_up_arm(&self) -> Option<usize> {
        (self.t <= self.nb_arms()).then(|| self.t - 1)
    }
}

/// Scoring formula of an index policy.
pub trait IndexRule: Clone + Send + Sync {
    /// Identifier reported by [`Policy::name`].
    const NAME: &'static str;

    /// Whether the largest or the smallest index is played.
    const DIRECTION: Direction = Direction::Maximize;

    /// Index of `arm` at the current round.
    ///
    /// Only called for arms pulled at least once: never-pulled arms receive
    /// [`Direction::unexplored`] from the driver.
    fn index(&self, state: &RoundState, arm: usize) -> f64;
}

/// Policy that plays the extreme index of an [`IndexRule`].
#[derive(Clone, Debug)]
pub struct IndexPolicy<R> {
    rule: R,
    state: RoundState,
}

impl<R: IndexRule> IndexPolicy<R> {
    pub fn new(nb_arms: usize, rule: R) -> Result<Self> {
        ensure_arms(nb_arms)?;
        Ok(Self {
            rule,
            state: RoundState::new(nb_arms),
        })
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Index of `arm` at the current round.
    pub fn index(&self, arm: usize) -> f64 {
        if self.state.nb_draws(arm) == 0 {
            R::DIRECTION.unexplored()
        } else {
            self.rule.index(&self.state, arm)
        }
    }

    /// Indices of every arm at the current round.
    pub fn indices(&self) -> Vec<f64> {
        (0..self.state.nb_arms()).map(|arm| self.index(arm)).collect()
    }
}

impl<R: IndexRule> Policy for IndexPolicy<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn nb_arms(&self) -> usize {
        self.state.nb_arms()
    }

    fn start_game(&mut self) {
        self.state.reset();
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        if let Some(arm) = self.state.warm_up_arm() {
            return arm;
        }
        select_extreme(&self.indices(), R::DIRECTION, rng)
    }

    fn get_reward(&mut self, arm: usize, reward: f64, _rng: &mut dyn RngCore) {
        self.state.record(arm, reward);
    }
}
