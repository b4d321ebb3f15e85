//! Monte-Carlo regret evaluation.
//!
//! An evaluation plays `nb_repetitions` independent games and keeps, for each
//! repetition, the cumulative expected reward at a set of checkpoint rounds.
//! Regret is measured against the oracle that always plays the best arm.
//!
//! Repetitions run on the rayon thread pool by default. Each one owns a fresh
//! policy and a `Xoshiro256PlusPlus` stream seeded with `seed + repetition`,
//! so results do not depend on scheduling: a parallel run and a sequential run
//! with the same seed produce the same matrix.

use indexmap::IndexMap;
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::config::PolicyConfig;
use crate::environment::{Environment, Trajectory};
use crate::error::{BanditError, Result};
use crate::policy::Policy;

/// Parameters shared by every repetition of an evaluation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationConfig {
    nb_repetitions: usize,
    horizon: usize,
    checkpoints: Vec<usize>,
    seed: u64,
    parallel: bool,
}

impl EvaluationConfig {
    /// Records every round, seed 0, parallel repetitions.
    pub fn new(nb_repetitions: usize, horizon: usize) -> Result<Self> {
        let config = Self {
            nb_repetitions,
            horizon,
            checkpoints: Vec::new(),
            seed: 0,
            parallel: true,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn builder() -> EvaluationConfigBuilder {
        EvaluationConfigBuilder::default()
    }

    pub fn nb_repetitions(&self) -> usize {
        self.nb_repetitions
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Checkpoint rounds, 1-based. Every round when none were given.
    pub fn checkpoints(&self) -> Vec<usize> {
        if self.checkpoints.is_empty() {
            (1..=self.horizon).collect()
        } else {
            self.checkpoints.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nb_repetitions == 0 {
            return Err(BanditError::invalid("nb_repetitions must be positive"));
        }
        if self.horizon == 0 {
            return Err(BanditError::invalid("horizon must be positive"));
        }
        if let Some(&round) = self
            .checkpoints
            .iter()
            .find(|&&round| round == 0 || round > self.horizon)
        {
            return Err(BanditError::InvalidCheckpoint {
                round,
                horizon: self.horizon,
            });
        }
        Ok(())
    }
}

/// Builder for [`EvaluationConfig`] with a fluent API.
#[derive(Clone, Debug)]
pub struct EvaluationConfigBuilder {
    nb_repetitions: Option<usize>,
    horizon: Option<usize>,
    checkpoints: Vec<usize>,
    stride: Option<usize>,
    seed: u64,
    parallel: bool,
}

impl Default for EvaluationConfigBuilder {
    fn default() -> Self {
        Self {
            nb_repetitions: None,
            horizon: None,
            checkpoints: Vec::new(),
            stride: None,
            seed: 0,
            parallel: true,
        }
    }
}

impl EvaluationConfigBuilder {
    pub fn nb_repetitions(mut self, nb_repetitions: usize) -> Self {
        self.nb_repetitions = Some(nb_repetitions);
        self
    }

    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Explicit checkpoint rounds, 1-based.
    pub fn checkpoints<I>(mut self, rounds: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.checkpoints = rounds.into_iter().collect();
        self
    }

    /// Checkpoints every `stride` rounds, plus the final round.
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> Result<EvaluationConfig> {
        let nb_repetitions = self.nb_repetitions.ok_or(BanditError::BuilderError {
            message: "nb_repetitions not specified".into(),
        })?;
        let horizon = self.horizon.ok_or(BanditError::BuilderError {
            message: "horizon not specified".into(),
        })?;

        let checkpoints = match self.stride {
            Some(0) => return Err(BanditError::invalid("stride must be positive")),
            Some(stride) => {
                let mut rounds: Vec<usize> = (stride..=horizon).step_by(stride).collect();
                if rounds.last() != Some(&horizon) {
                    rounds.push(horizon);
                }
                rounds
            }
            None => {
                let mut rounds = self.checkpoints;
                rounds.sort_unstable();
                rounds.dedup();
                rounds
            }
        };

        let config = EvaluationConfig {
            nb_repetitions,
            horizon,
            checkpoints,
            seed: self.seed,
            parallel: self.parallel,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Oracle {
    /// Best expectation of the single environment.
    Fixed(f64),
    /// Best expectation of each repetition's environment.
    PerRepetition(Array1<f64>),
}

/// Cumulative expected reward of every repetition at every checkpoint, with
/// the regret statistics derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    policy_name: &'static str,
    checkpoints: Array1<f64>,
    cum_reward: Array2<f64>,
    oracle: Oracle,
}

impl Evaluation {
    /// Evaluates the policies produced by `factory` on `env`.
    ///
    /// The factory is called exactly once per repetition; any error it or a
    /// game returns aborts the whole evaluation.
    pub fn run<P, F>(env: &Environment, factory: F, config: &EvaluationConfig) -> Result<Self>
    where
        P: Policy,
        F: Fn() -> Result<P> + Sync,
    {
        config.validate()?;
        let rounds = config.checkpoints();
        let (policy_name, cum_reward) = simulate(config, |rng| {
            let mut policy = factory()?;
            let trajectory = env.play(&mut policy, config.horizon(), rng)?;
            Ok((policy.name(), sample_checkpoints(&trajectory, &rounds)))
        })?;
        Ok(Self::finish(
            policy_name,
            &rounds,
            cum_reward,
            Oracle::Fixed(env.best_expectation()),
        ))
    }

    /// Evaluates clones of `policy` on `env`.
    pub fn of<P>(env: &Environment, policy: &P, config: &EvaluationConfig) -> Result<Self>
    where
        P: Policy + Clone + Sync,
    {
        Self::run(env, || Ok(policy.clone()), config)
    }

    /// Bayesian evaluation: repetition `k` plays on `envs[k]` and is compared
    /// with the best arm of that environment.
    pub fn run_bayes<P, F>(envs: &[Environment], factory: F, config: &EvaluationConfig) -> Result<Self>
    where
        P: Policy,
        F: Fn() -> Result<P> + Sync,
    {
        config.validate()?;
        if envs.len() != config.nb_repetitions() {
            return Err(BanditError::DimensionMismatch {
                message: format!(
                    "{} environments for {} repetitions",
                    envs.len(),
                    config.nb_repetitions()
                ),
            });
        }
        let rounds = config.checkpoints();
        let (policy_name, cum_reward) = simulate_indexed(config, |k, rng| {
            let mut policy = factory()?;
            let trajectory = envs[k].play(&mut policy, config.horizon(), rng)?;
            Ok((policy.name(), sample_checkpoints(&trajectory, &rounds)))
        })?;
        let best = envs.iter().map(Environment::best_expectation).collect();
        Ok(Self::finish(
            policy_name,
            &rounds,
            cum_reward,
            Oracle::PerRepetition(best),
        ))
    }

    fn finish(
        policy_name: &'static str,
        rounds: &[usize],
        cum_reward: Array2<f64>,
        oracle: Oracle,
    ) -> Self {
        let evaluation = Self {
            policy_name,
            checkpoints: rounds.iter().map(|&r| r as f64).collect(),
            cum_reward,
            oracle,
        };
        if let (Some(round), Some(regret)) = (rounds.last(), evaluation.mean_regret().last()) {
            log::debug!("{policy_name}: mean regret {regret:.3} after {round} rounds");
        }
        evaluation
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy_name
    }

    pub fn nb_repetitions(&self) -> usize {
        self.cum_reward.nrows()
    }

    /// Checkpoint rounds, 1-based.
    pub fn checkpoints(&self) -> Vec<usize> {
        self.checkpoints.iter().map(|&r| r as usize).collect()
    }

    /// `(nb_repetitions × checkpoints)` matrix of cumulative expected reward.
    pub fn cum_reward(&self) -> &Array2<f64> {
        &self.cum_reward
    }

    /// Oracle cumulative reward at each checkpoint, averaged over repetitions
    /// in the Bayesian setting.
    pub fn oracle(&self) -> Array1<f64> {
        match &self.oracle {
            Oracle::Fixed(best) => self.checkpoints.mapv(|t| t * best),
            Oracle::PerRepetition(best) => {
                let mean_best = best.sum() / best.len() as f64;
                self.checkpoints.mapv(|t| t * mean_best)
            }
        }
    }

    /// Oracle minus realised expected reward, per repetition and checkpoint.
    pub fn regret(&self) -> Array2<f64> {
        let oracle = match &self.oracle {
            Oracle::Fixed(best) => {
                Array2::from_shape_fn(self.cum_reward.raw_dim(), |(_, j)| {
                    self.checkpoints[j] * best
                })
            }
            Oracle::PerRepetition(best) => {
                Array2::from_shape_fn(self.cum_reward.raw_dim(), |(i, j)| {
                    self.checkpoints[j] * best[i]
                })
            }
        };
        oracle - &self.cum_reward
    }

    pub fn mean_regret(&self) -> Array1<f64> {
        let n = self.nb_repetitions() as f64;
        self.oracle() - self.cum_reward.sum_axis(Axis(0)) / n
    }

    /// Population standard deviation (`ddof = 0`) of the regret across repetitions.
    pub fn std_regret(&self) -> Array1<f64> {
        self.regret().std_axis(Axis(0), 0.0)
    }

    /// Mean cumulative expected reward at the last checkpoint.
    pub fn mean_reward(&self) -> f64 {
        let last = self.cum_reward.column(self.cum_reward.ncols() - 1);
        last.sum() / last.len() as f64
    }
}

/// Evaluates every configured policy on `env`, keeping the input order.
pub fn compare(
    env: &Environment,
    policies: &IndexMap<String, PolicyConfig>,
    config: &EvaluationConfig,
) -> Result<IndexMap<String, Evaluation>> {
    policies
        .iter()
        .map(|(label, policy)| {
            log::info!("evaluating {label}");
            let evaluation = Evaluation::run(env, || policy.build(env.nb_arms()), config)?;
            Ok((label.clone(), evaluation))
        })
        .collect()
}

fn sample_checkpoints(trajectory: &Trajectory, rounds: &[usize]) -> Vec<f64> {
    let cumulative = trajectory.cumulative_expected();
    rounds.iter().map(|&round| cumulative[round - 1]).collect()
}

/// Policy name and checkpoint row of one repetition.
type Row = (&'static str, Vec<f64>);

fn simulate<F>(config: &EvaluationConfig, repetition: F) -> Result<(&'static str, Array2<f64>)>
where
    F: Fn(&mut Xoshiro256PlusPlus) -> Result<Row> + Sync,
{
    simulate_indexed(config, |_, rng| repetition(rng))
}

/// Runs every repetition and stacks the rows. Rows are only assembled once
/// all repetitions have succeeded.
fn simulate_indexed<F>(
    config: &EvaluationConfig,
    repetition: F,
) -> Result<(&'static str, Array2<f64>)>
where
    F: Fn(usize, &mut Xoshiro256PlusPlus) -> Result<Row> + Sync,
{
    let nb_repetitions = config.nb_repetitions();
    let progress_step = (nb_repetitions / 10).max(1);
    let run_one = |k: usize| -> Result<Row> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed().wrapping_add(k as u64));
        let (policy_name, row) = repetition(k, &mut rng)?;
        if (k + 1) % progress_step == 0 {
            log::info!("{policy_name}: repetition {}/{nb_repetitions} done", k + 1);
        }
        Ok((policy_name, row))
    };

    let rows: Vec<Row> = if config.parallel() {
        (0..nb_repetitions)
            .into_par_iter()
            .map(run_one)
            .collect::<Result<_>>()?
    } else {
        (0..nb_repetitions).map(run_one).collect::<Result<_>>()?
    };

    let (policy_name, width) = rows.first().map_or(("", 0), |(name, row)| (*name, row.len()));
    let values: Vec<f64> = rows.into_iter().flat_map(|(_, row)| row).collect();
    let cum_reward = Array2::from_shape_vec((nb_repetitions, width), values).map_err(|e| {
        BanditError::DimensionMismatch {
            message: e.to_string(),
        }
    })?;
    Ok((policy_name, cum_reward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexPolicy;
    use crate::policies::Random;
    use approx::assert_abs_diff_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_config_defaults_and_validation() {
        let config = EvaluationConfig::new(10, 5).unwrap();
        assert_eq!(config.checkpoints(), vec![1, 2, 3, 4, 5]);
        assert!(config.parallel());

        assert!(EvaluationConfig::new(0, 5).is_err());
        assert!(EvaluationConfig::new(5, 0).is_err());
    }

    #[test]
    fn test_builder() {
        let config = EvaluationConfig::builder()
            .nb_repetitions(4)
            .horizon(10)
            .stride(3)
            .seed(7)
            .parallel(false)
            .build()
            .unwrap();
        assert_eq!(config.checkpoints(), vec![3, 6, 9, 10]);
        assert_eq!(config.seed(), 7);
        assert!(!config.parallel());

        let err = EvaluationConfig::builder().horizon(10).build().unwrap_err();
        assert!(matches!(err, BanditError::BuilderError { .. }));

        let config = EvaluationConfig::builder()
            .nb_repetitions(1)
            .horizon(10)
            .checkpoints([8, 2, 8, 5])
            .build()
            .unwrap();
        assert_eq!(config.checkpoints(), vec![2, 5, 8]);

        let err = EvaluationConfig::builder()
            .nb_repetitions(1)
            .horizon(10)
            .checkpoints([5, 11])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BanditError::InvalidCheckpoint {
                round: 11,
                horizon: 10
            }
        );
    }

    #[test]
    fn test_oracle_is_exact() {
        let env = Environment::bernoulli(&[0.2, 0.5, 0.8]).unwrap();
        let config = EvaluationConfig::new(3, 250).unwrap();
        let evaluation = Evaluation::of(&env, &Random::new(3).unwrap(), &config).unwrap();
        let oracle = evaluation.oracle();
        assert_eq!(oracle.len(), 250);
        assert_eq!(oracle[249], 250.0 * 0.8);
        assert_eq!(oracle[0], 0.8);
    }

    #[test]
    fn test_regret_statistics() {
        // A single arm: every policy is optimal and regret vanishes.
        let env = Environment::bernoulli(&[0.4]).unwrap();
        let config = EvaluationConfig::new(5, 20).unwrap();
        let evaluation = Evaluation::of(&env, &Random::new(1).unwrap(), &config).unwrap();
        for (&mean, &std) in evaluation.mean_regret().iter().zip(&evaluation.std_regret()) {
            assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(std, 0.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(evaluation.mean_reward(), 20.0 * 0.4, epsilon = 1e-9);
        assert_eq!(evaluation.cum_reward().dim(), (5, 20));
    }

    #[test]
    fn test_mean_and_std_match_regret_matrix() {
        let env = Environment::bernoulli(&[0.1, 0.9]).unwrap();
        let config = EvaluationConfig::builder()
            .nb_repetitions(8)
            .horizon(50)
            .checkpoints([10, 50])
            .build()
            .unwrap();
        let evaluation = Evaluation::of(&env, &Random::new(2).unwrap(), &config).unwrap();
        let regret = evaluation.regret();
        for j in 0..2 {
            let column = regret.column(j);
            let mean = column.sum() / 8.0;
            let var = column.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 8.0;
            assert_abs_diff_eq!(evaluation.mean_regret()[j], mean, epsilon = 1e-9);
            assert_abs_diff_eq!(evaluation.std_regret()[j], var.sqrt(), epsilon = 1e-9);
        }
        assert_eq!(evaluation.checkpoints(), vec![10, 50]);
    }

    #[test]
    fn test_failing_factory_aborts() {
        let env = Environment::bernoulli(&[0.1, 0.9]).unwrap();
        let config = EvaluationConfig::new(4, 10).unwrap();
        let result = Evaluation::run(&env, || IndexPolicy::ucb(3, 1.0), &config);
        assert!(matches!(result, Err(BanditError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_factory_called_once_per_repetition() {
        let env = Environment::bernoulli(&[0.1, 0.9]).unwrap();
        for parallel in [false, true] {
            let config = EvaluationConfig::builder()
                .nb_repetitions(7)
                .horizon(20)
                .parallel(parallel)
                .build()
                .unwrap();
            let calls = AtomicUsize::new(0);
            let evaluation = Evaluation::run(
                &env,
                || {
                    calls.fetch_add(1, Ordering::Relaxed);
                    IndexPolicy::ucb(2, 1.0)
                },
                &config,
            )
            .unwrap();
            assert_eq!(calls.load(Ordering::Relaxed), 7);
            assert_eq!(evaluation.policy_name(), "UCB");
        }
    }

    #[test]
    fn test_bayes_requires_one_environment_per_repetition() {
        let envs = vec![Environment::bernoulli(&[0.5, 0.6]).unwrap()];
        let config = EvaluationConfig::new(2, 10).unwrap();
        let result = Evaluation::run_bayes(&envs, || Random::new(2), &config);
        assert!(matches!(result, Err(BanditError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_bayes_oracle_is_per_repetition() {
        let envs = vec![
            Environment::bernoulli(&[0.2, 0.4]).unwrap(),
            Environment::bernoulli(&[0.9, 0.1]).unwrap(),
        ];
        let config = EvaluationConfig::new(2, 10).unwrap();
        let evaluation = Evaluation::run_bayes(&envs, || Random::new(2), &config).unwrap();
        assert_abs_diff_eq!(evaluation.oracle()[9], 10.0 * 0.65, epsilon = 1e-12);

        let regret = evaluation.regret();
        let cum = evaluation.cum_reward();
        assert_abs_diff_eq!(regret[[0, 9]], 4.0 - cum[[0, 9]], epsilon = 1e-12);
        assert_abs_diff_eq!(regret[[1, 9]], 9.0 - cum[[1, 9]], epsilon = 1e-12);
    }
}
