//! Catalogue of bandit policies.
//!
//! Index policies are [`IndexRule`](crate::index::IndexRule)s driven by
//! [`IndexPolicy`](crate::index::IndexPolicy); the others implement
//! [`Policy`](crate::policy::Policy) directly.

mod ada_ucb;
mod bayes_ucb;
mod dmed;
mod greedy;
mod imed;
mod improved_ucb;
mod klucb;
mod moss;
mod ocucb;
mod ossb;
mod random;
mod thompson;
mod ucb;
mod ucb_variance;

pub use ada_ucb::AdaUcb;
pub use bayes_ucb::BayesUcb;
pub use dmed::{Dmed, DmedVariant};
pub use greedy::{AdaptiveGreedy, EpsilonGreedy, Greedy};
pub use imed::Imed;
pub use improved_ucb::ImprovedUcb;
pub use klucb::{KLUCB_PRECISION, KlUcb, KlUcbPlus};
pub use moss::Moss;
pub use ocucb::{OcUcb, OcUcbN};
pub use ossb::Ossb;
pub use random::Random;
pub use thompson::ThompsonSampling;
pub use ucb::Ucb;
pub use ucb_variance::{UcbNormal, UcbTuned, UcbV};
