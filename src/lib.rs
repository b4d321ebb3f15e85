//! Banditry: stochastic multi-armed bandits in Rust.
//!
//! This library provides index policies (UCB, MOSS, KL-UCB, IMED and more),
//! Bayesian policies (Thompson Sampling, Bayes-UCB), the Kullback-Leibler
//! confidence bounds several of them depend on, and a parallel Monte-Carlo
//! harness that measures regret over many independent repetitions.
//!
//! # Quick Start
//!
//! ```
//! use banditry::prelude::*;
//!
//! // Two Bernoulli arms, the first one clearly better
//! let env = Environment::bernoulli(&[0.9, 0.1]).unwrap();
//!
//! // 20 repetitions of 200 rounds
//! let config = EvaluationConfig::builder()
//!     .nb_repetitions(20)
//!     .horizon(200)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let ucb = IndexPolicy::ucb(env.nb_arms(), 1.0).unwrap();
//! let evaluation = Evaluation::of(&env, &ucb, &config).unwrap();
//!
//! // A uniform policy would lose 0.4 per round, 80 in total
//! let regret = evaluation.mean_regret();
//! assert!(regret[199] < 40.0);
//! ```
//!
//! Policies can also be played by hand, one game at a time:
//!
//! ```
//! use banditry::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let env = Environment::bernoulli(&[0.2, 0.5, 0.8]).unwrap();
//! let mut policy = IndexPolicy::klucb(3, Divergence::Bernoulli).unwrap();
//!
//! let trajectory = env.play(&mut policy, 100, &mut rng).unwrap();
//! assert_eq!(&trajectory.choices()[..3], &[0, 1, 2]);
//! ```

pub mod arm;
pub mod config;
pub mod environment;
mod error;
pub mod evaluation;
pub mod index;
pub mod kullback;
pub mod policies;
pub mod policy;
pub mod posterior;

// Re-export main types
pub use config::PolicyConfig;
pub use environment::{Environment, Trajectory};
pub use error::{BanditError, Result};
pub use evaluation::{Evaluation, EvaluationConfig, compare};
pub use index::{IndexPolicy, IndexRule, RoundState};
pub use kullback::Divergence;
pub use policy::{Direction, Policy};

// Re-export IndexMap for callers of `compare`
pub use indexmap::IndexMap;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use banditry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::arm::RewardSource;
    pub use crate::policies::{
        AdaptiveGreedy, BayesUcb, Dmed, EpsilonGreedy, ImprovedUcb, Ossb, Random,
        ThompsonSampling,
    };
    pub use crate::posterior::{BetaPosterior, Posterior};
    pub use crate::{
        BanditError, Divergence, Environment, Evaluation, EvaluationConfig, IndexPolicy, Policy,
        PolicyConfig, Result, compare,
    };
    pub use indexmap::IndexMap;
}
