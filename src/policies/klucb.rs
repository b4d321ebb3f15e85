//! KL-UCB indices (Garivier and Cappé 2011) and the KL-UCB+ variant.

use crate::error::{Result, ensure_positive};
use crate::index::{IndexPolicy, IndexRule, RoundState};
use crate::kullback::Divergence;

/// Bisection tolerance used by the KL-UCB policies.
pub const KLUCB_PRECISION: f64 = 1e-4;

/// KL-UCB: the largest mean `q` with `n kl(mean, q) <= ln t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KlUcb {
    divergence: Divergence,
    precision: f64,
}

impl KlUcb {
    /// Fails for divergences without a KL-UCB bracket (Gamma, negative binomial).
    pub fn new(divergence: Divergence) -> Result<Self> {
        Self::with_precision(divergence, KLUCB_PRECISION)
    }

    pub fn with_precision(divergence: Divergence, precision: f64) -> Result<Self> {
        divergence.validate_klucb()?;
        ensure_positive("precision", precision)?;
        Ok(Self {
            divergence,
            precision,
        })
    }

    pub fn divergence(&self) -> Divergence {
        self.divergence
    }

    fn bound(&self, mean: f64, level: f64) -> f64 {
        self.divergence
            .klucb(mean, level, self.precision)
            .unwrap_or(f64::INFINITY)
    }
}

impl IndexRule for KlUcb {
    const NAME: &'static str = "KL-UCB";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let level = (state.t() as f64).ln() / n;
        self.bound(state.mean(arm), level)
    }
}

/// KL-UCB+ (Garivier, Kaufmann and Lattimore): exploration level `ln(t / n) / n`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KlUcbPlus {
    inner: KlUcb,
}

impl KlUcbPlus {
    pub fn new(divergence: Divergence) -> Result<Self> {
        Ok(Self {
            inner: KlUcb::new(divergence)?,
        })
    }

    pub fn divergence(&self) -> Divergence {
        self.inner.divergence
    }
}

impl IndexRule for KlUcbPlus {
    const NAME: &'static str = "KL-UCB+";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let level = (state.t() as f64 / n).ln().max(0.0) / n;
        self.inner.bound(state.mean(arm), level)
    }
}

impl IndexPolicy<KlUcb> {
    pub fn klucb(nb_arms: usize, divergence: Divergence) -> Result<Self> {
        Self::new(nb_arms, KlUcb::new(divergence)?)
    }
}

impl IndexPolicy<KlUcbPlus> {
    pub fn klucb_plus(nb_arms: usize, divergence: Divergence) -> Result<Self> {
        Self::new(nb_arms, KlUcbPlus::new(divergence)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kullback::kl_bern;
    use crate::policy::Policy;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn play<R: IndexRule>(policy: &mut IndexPolicy<R>, rewards: &[(usize, f64)]) {
        let mut rng = StdRng::seed_from_u64(42);
        for &(arm, reward) in rewards {
            policy.get_reward(arm, reward, &mut rng);
        }
    }

    #[test]
    fn test_klucb_bernoulli_index_solves_divergence_equation() {
        let mut policy = IndexPolicy::klucb(2, Divergence::Bernoulli).unwrap();
        play(&mut policy, &[(0, 1.0), (0, 0.0), (1, 0.0)]);
        let level = 4.0f64.ln() / 2.0;
        let q = policy.index(0);
        assert!(q > 0.5 && q <= 1.0);
        assert_abs_diff_eq!(kl_bern(0.5, q), level, epsilon = 1e-3);
    }

    #[test]
    fn test_klucb_gaussian_closed_form() {
        let mut policy = IndexPolicy::klucb(2, Divergence::Gaussian { sig2: 0.25 }).unwrap();
        play(&mut policy, &[(0, 1.0), (0, 0.0), (1, 0.0)]);
        let level = 4.0f64.ln() / 2.0;
        assert_abs_diff_eq!(
            policy.index(0),
            0.5 + (2.0 * 0.25 * level).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_klucb_plus_is_less_optimistic() {
        let mut plain = IndexPolicy::klucb(2, Divergence::Bernoulli).unwrap();
        let mut plus = IndexPolicy::klucb_plus(2, Divergence::Bernoulli).unwrap();
        let rewards = [(0, 1.0), (1, 0.0), (0, 0.0), (0, 1.0)];
        play(&mut plain, &rewards);
        play(&mut plus, &rewards);
        assert!(plus.index(0) < plain.index(0));
        assert!(plus.index(0) >= 2.0 / 3.0);
    }

    #[test]
    fn test_klucb_rejects_families_without_bracket() {
        assert!(KlUcb::new(Divergence::Gamma { a: 2.0 }).is_err());
        assert!(KlUcbPlus::new(Divergence::NegativeBinomial { r: 3.0 }).is_err());
        assert!(KlUcb::new(Divergence::Gaussian { sig2: -1.0 }).is_err());
        assert!(KlUcb::with_precision(Divergence::Poisson, 0.0).is_err());
        assert_eq!(
            KlUcb::new(Divergence::Poisson).unwrap().divergence(),
            Divergence::Poisson
        );
    }
}
