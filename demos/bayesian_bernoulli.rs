//! Bayesian regret: each repetition plays a fresh problem drawn from the
//! uniform prior over Bernoulli means.

use banditry::policies::{KlUcb, Ucb};
use banditry::prelude::*;
use rand::SeedableRng;

fn main() -> Result<()> {
    env_logger::init();

    let nb_arms = 5;
    let nb_repetitions = 500;
    let horizon = 2000;

    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    let envs = (0..nb_repetitions)
        .map(|_| Environment::random_bernoulli(nb_arms, &mut rng))
        .collect::<Result<Vec<_>>>()?;
    let config = EvaluationConfig::builder()
        .nb_repetitions(nb_repetitions)
        .horizon(horizon)
        .stride(200)
        .seed(7)
        .build()?;

    let results = [
        Evaluation::run_bayes(&envs, || Random::new(nb_arms), &config)?,
        Evaluation::run_bayes(&envs, || IndexPolicy::new(nb_arms, Ucb::default()), &config)?,
        Evaluation::run_bayes(
            &envs,
            || IndexPolicy::new(nb_arms, KlUcb::new(Divergence::Bernoulli)?),
            &config,
        )?,
        Evaluation::run_bayes(&envs, || ThompsonSampling::beta(nb_arms), &config)?,
        Evaluation::run_bayes(&envs, || BayesUcb::beta(nb_arms), &config)?,
    ];

    println!("Bayesian regret over {nb_repetitions} problems with {nb_arms} arms\n");
    println!("{:<12} {:>10} {:>10}", "policy", "regret", "reward");
    for evaluation in &results {
        let regret = evaluation.mean_regret();
        println!(
            "{:<12} {:>10.2} {:>10.2}",
            evaluation.policy_name(),
            regret[regret.len() - 1],
            evaluation.mean_reward()
        );
    }

    Ok(())
}
