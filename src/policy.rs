//! Policy trait definition for multi-armed bandit algorithms

use ordered_float::OrderedFloat;
use rand::{Rng, RngCore};

/// Sequential decision rule over a fixed set of `nb_arms` arms.
///
/// A game is one call to [`Policy::start_game`] followed by alternating calls
/// to [`Policy::choice`] and [`Policy::get_reward`]. Randomness (tie-breaks,
/// exploration, posterior sampling) is drawn from the generator passed in, so
/// a policy never touches process-wide random state.
///
/// The trait is object-safe: `Box<dyn Policy>` is itself a `Policy`.
pub trait Policy {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Number of arms this policy chooses among.
    fn nb_arms(&self) -> usize;

    /// Forgets everything learnt and rewinds to round 1.
    fn start_game(&mut self);

    /// Picks the arm to play this round, in `0..nb_arms()`.
    fn choice(&mut self, rng: &mut dyn RngCore) -> usize;

    /// Feeds back the reward observed for `arm` and advances the round.
    ///
    /// # Panics
    ///
    /// Panics if `arm >= nb_arms()`.
    fn get_reward(&mut self, arm: usize, reward: f64, rng: &mut dyn RngCore);
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn nb_arms(&self) -> usize {
        (**self).nb_arms()
    }

    fn start_game(&mut self) {
        (**self).start_game()
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        (**self).choice(rng)
    }

    fn get_reward(&mut self, arm: usize, reward: f64, rng: &mut dyn RngCore) {
        (**self).get_reward(arm, reward, rng)
    }
}

/// Whether a policy plays the arm with the largest or the smallest index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Optimistic indices (UCB family, Bayesian policies).
    #[default]
    Maximize,
    /// Cost indices (IMED).
    Minimize,
}

impl Direction {
    /// Index value that makes an arm preferred over every finite index.
    pub fn unexplored(self) -> f64 {
        match self {
            Direction::Maximize => f64::INFINITY,
            Direction::Minimize => f64::NEG_INFINITY,
        }
    }
}

/// Picks uniformly at random among the positions holding the extreme value.
///
/// Exact ties are broken uniformly so that no arm is favoured by its position.
/// NaN entries are never selected unless every entry is NaN.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn select_extreme(values: &[f64], direction: Direction, rng: &mut dyn RngCore) -> usize {
    let candidates = extreme_positions(values, direction);
    candidates[rng.random_range(0..candidates.len())]
}

/// Positions holding the extreme value of `values`.
pub fn extreme_positions(values: &[f64], direction: Direction) -> Vec<usize> {
    assert!(!values.is_empty(), "cannot select among zero arms");
    let comparable = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|&v| OrderedFloat(v));
    let best = match direction {
        Direction::Maximize => comparable.max(),
        Direction::Minimize => comparable.min(),
    };
    let Some(best) = best else {
        return (0..values.len()).collect();
    };
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| OrderedFloat(v) == best)
        .map(|(i, _)| i)
        .collect()
}
