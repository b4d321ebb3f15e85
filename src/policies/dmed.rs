use std::collections::VecDeque;

use rand::RngCore;

use crate::error::{Result, ensure_arms};
use crate::index::RoundState;
use crate::kullback::Divergence;
use crate::policy::{Direction, Policy, select_extreme};

/// Threshold that admits an arm into the next batch of actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DmedVariant {
    /// `n kl(mean, best) < ln t`.
    #[default]
    Standard,
    /// `n kl(mean, best) < ln(t / n)`.
    Plus,
}

/// Deterministic Minimum Empirical Divergence (Honda and Takemura 2010).
///
/// Plays arms from a queue of pending actions. When the queue runs dry it is
/// refilled, in arm order, with every arm whose empirical divergence from the
/// leader is still too small to rule it out.
#[derive(Clone, Debug)]
pub struct Dmed {
    divergence: Divergence,
    variant: DmedVariant,
    state: RoundState,
    queue: VecDeque<usize>,
}

impl Dmed {
    pub fn new(nb_arms: usize, divergence: Divergence, variant: DmedVariant) -> Result<Self> {
        ensure_arms(nb_arms)?;
        divergence.validate()?;
        Ok(Self {
            divergence,
            variant,
            state: RoundState::new(nb_arms),
            queue: (0..nb_arms).collect(),
        })
    }

    pub fn variant(&self) -> DmedVariant {
        self.variant
    }

    /// Actions still queued for the current batch.
    pub fn pending(&self) -> &VecDeque<usize> {
        &self.queue
    }

    /// Rebuilds the queue and returns the arm to play now.
    fn refill(&mut self, rng: &mut dyn RngCore) -> usize {
        let state = &self.state;
        let best = state.best_mean();
        let t = state.t() as f64;
        let mut candidates: VecDeque<usize> = (0..state.nb_arms())
            .filter(|&arm| {
                let n = state.nb_draws(arm) as f64;
                let threshold = match self.variant {
                    DmedVariant::Standard => t.ln(),
                    DmedVariant::Plus => (t / n).ln(),
                };
                n * self.divergence.kl(state.mean(arm), best) < threshold
            })
            .collect();
        let arm = match candidates.pop_front() {
            Some(arm) => arm,
            None => {
                let means: Vec<f64> = (0..state.nb_arms()).map(|a| state.mean(a)).collect();
                select_extreme(&means, Direction::Maximize, rng)
            }
        };
        self.queue = candidates;
        arm
    }
}

impl Policy for Dmed {
    fn name(&self) -> &'static str {
        match self.variant {
            DmedVariant::Standard => "DMED",
            DmedVariant::Plus => "DMED+",
        }
    }

    fn nb_arms(&self) -> usize {
        self.state.nb_arms()
    }

    fn start_game(&mut self) {
        self.state.reset();
        self.queue = (0..self.state.nb_arms()).collect();
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        match self.queue.pop_front() {
            Some(arm) => arm,
            None => self.refill(rng),
        }
    }

    fn get_reward(&mut self, arm: usize, reward: f64, _rng: &mut dyn RngCore) {
        self.state.record(arm, reward);
    }
}
