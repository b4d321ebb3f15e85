//! Declarative policy descriptions.
//!
//! A [`PolicyConfig`] names a policy and its parameters without fixing the
//! number of arms, so the same description can be instantiated once per
//! repetition of an experiment or deserialised from a file with the `serde`
//! feature.

use crate::error::Result;
use crate::index::IndexPolicy;
use crate::kullback::Divergence;
use crate::policies::{
    AdaUcb, AdaptiveGreedy, BayesUcb, Dmed, DmedVariant, EpsilonGreedy, Greedy, Imed, ImprovedUcb,
    KlUcb, KlUcbPlus, Moss, OcUcb, OcUcbN, Ossb, Random, ThompsonSampling, Ucb, UcbNormal,
    UcbTuned, UcbV,
};
use crate::policy::Policy;
use crate::posterior::{BetaPosterior, ImproperGaussian};

/// Every policy of the catalogue together with its parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "policy", rename_all = "snake_case")
)]
pub enum PolicyConfig {
    Ucb { c: f64 },
    Moss { horizon: usize, c: f64 },
    OcUcb { horizon: usize, alpha: f64, psi: f64 },
    OcUcbN { eta: f64, rho: f64 },
    AdaUcb { horizon: usize },
    UcbV,
    UcbTuned,
    UcbNormal,
    KlUcb { divergence: Divergence },
    KlUcbPlus { divergence: Divergence },
    Greedy,
    Imed { divergence: Divergence },
    EpsilonGreedy { epsilon: f64 },
    AdaptiveGreedy { c: f64 },
    Random,
    Dmed { divergence: Divergence, variant: DmedVariant },
    Ossb { divergence: Divergence, epsilon: f64, gamma: f64 },
    ImprovedUcb { horizon: usize, c: f64 },
    /// Thompson Sampling with `Beta(a, b)` priors.
    ThompsonBeta { a: f64, b: f64 },
    /// Thompson Sampling with flat Gaussian priors.
    ThompsonGaussian,
    BayesUcbBeta { a: f64, b: f64, power: f64 },
    BayesUcbGaussian { power: f64 },
}

impl PolicyConfig {
    /// UCB1 with `c = 1`.
    pub fn ucb() -> Self {
        PolicyConfig::Ucb { c: 1.0 }
    }

    /// MOSS with `c = 4`.
    pub fn moss(horizon: usize) -> Self {
        PolicyConfig::Moss { horizon, c: 4.0 }
    }

    pub fn ocucb(horizon: usize) -> Self {
        PolicyConfig::OcUcb {
            horizon,
            alpha: 3.0,
            psi: 2.0,
        }
    }

    pub fn klucb() -> Self {
        PolicyConfig::KlUcb {
            divergence: Divergence::Bernoulli,
        }
    }

    /// Epsilon-greedy with `epsilon = 0.1`.
    pub fn epsilon_greedy() -> Self {
        PolicyConfig::EpsilonGreedy { epsilon: 0.1 }
    }

    pub fn thompson() -> Self {
        PolicyConfig::ThompsonBeta { a: 1.0, b: 1.0 }
    }

    pub fn bayes_ucb() -> Self {
        PolicyConfig::BayesUcbBeta {
            a: 1.0,
            b: 1.0,
            power: 1.0,
        }
    }

    /// Validates the parameters and instantiates the policy over `nb_arms` arms.
    pub fn build(&self, nb_arms: usize) -> Result<Box<dyn Policy>> {
        let policy: Box<dyn Policy> = match *self {
            PolicyConfig::Ucb { c } => Box::new(IndexPolicy::new(nb_arms, Ucb::new(c)?)?),
            PolicyConfig::Moss { horizon, c } => {
                Box::new(IndexPolicy::new(nb_arms, Moss::new(horizon, c)?)?)
            }
            PolicyConfig::OcUcb {
                horizon,
                alpha,
                psi,
            } => Box::new(IndexPolicy::new(nb_arms, OcUcb::new(horizon, alpha, psi)?)?),
            PolicyConfig::OcUcbN { eta, rho } => {
                Box::new(IndexPolicy::new(nb_arms, OcUcbN::new(eta, rho)?)?)
            }
            PolicyConfig::AdaUcb { horizon } => {
                Box::new(IndexPolicy::new(nb_arms, AdaUcb::new(horizon)?)?)
            }
            PolicyConfig::UcbV => Box::new(IndexPolicy::new(nb_arms, UcbV)?),
            PolicyConfig::UcbTuned => Box::new(IndexPolicy::new(nb_arms, UcbTuned)?),
            PolicyConfig::UcbNormal => Box::new(IndexPolicy::new(nb_arms, UcbNormal)?),
            PolicyConfig::KlUcb { divergence } => {
                Box::new(IndexPolicy::new(nb_arms, KlUcb::new(divergence)?)?)
            }
            PolicyConfig::KlUcbPlus { divergence } => {
                Box::new(IndexPolicy::new(nb_arms, KlUcbPlus::new(divergence)?)?)
            }
            PolicyConfig::Greedy => Box::new(IndexPolicy::new(nb_arms, Greedy)?),
            PolicyConfig::Imed { divergence } => {
                Box::new(IndexPolicy::new(nb_arms, Imed::new(divergence)?)?)
            }
            PolicyConfig::EpsilonGreedy { epsilon } => {
                Box::new(EpsilonGreedy::new(nb_arms, epsilon)?)
            }
            PolicyConfig::AdaptiveGreedy { c } => Box::new(AdaptiveGreedy::new(nb_arms, c)?),
            PolicyConfig::Random => Box::new(Random::new(nb_arms)?),
            PolicyConfig::Dmed {
                divergence,
                variant,
            } => Box::new(Dmed::new(nb_arms, divergence, variant)?),
            PolicyConfig::Ossb {
                divergence,
                epsilon,
                gamma,
            } => Box::new(Ossb::new(nb_arms, divergence, epsilon, gamma)?),
            PolicyConfig::ImprovedUcb { horizon, c } => {
                Box::new(ImprovedUcb::new(nb_arms, horizon, c)?)
            }
            PolicyConfig::ThompsonBeta { a, b } => {
                Box::new(ThompsonSampling::new(nb_arms, BetaPosterior::new(a, b)?)?)
            }
            PolicyConfig::ThompsonGaussian => Box::new(ThompsonSampling::gaussian(nb_arms)?),
            PolicyConfig::BayesUcbBeta { a, b, power } => Box::new(BayesUcb::new(
                nb_arms,
                BetaPosterior::new(a, b)?,
                power,
            )?),
            PolicyConfig::BayesUcbGaussian { power } => {
                Box::new(BayesUcb::new(nb_arms, ImproperGaussian::new(), power)?)
            }
        };
        Ok(policy)
    }
}
