//! Compares the regret of a handful of policies on a Bernoulli bandit.
//!
//! Run with `RUST_LOG=info cargo run --release --example regret_comparison`
//! to follow the progress of each evaluation.

use banditry::policies::DmedVariant;
use banditry::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let probabilities = [0.3, 0.5, 0.8, 0.4];
    let env = Environment::bernoulli(&probabilities)?;
    let horizon = 5000;
    let config = EvaluationConfig::builder()
        .nb_repetitions(200)
        .horizon(horizon)
        .stride(500)
        .seed(42)
        .build()?;

    println!("Banditry: regret comparison\n");
    println!("{}", "=".repeat(60));
    println!("Arm expectations: {probabilities:?}");
    println!(
        "{} repetitions of {} rounds\n",
        config.nb_repetitions(),
        horizon
    );

    let mut policies = IndexMap::new();
    policies.insert("Random".to_string(), PolicyConfig::Random);
    policies.insert("EpsilonGreedy(0.1)".to_string(), PolicyConfig::epsilon_greedy());
    policies.insert("UCB".to_string(), PolicyConfig::ucb());
    policies.insert("MOSS".to_string(), PolicyConfig::moss(horizon));
    policies.insert("KL-UCB".to_string(), PolicyConfig::klucb());
    policies.insert(
        "IMED".to_string(),
        PolicyConfig::Imed {
            divergence: Divergence::Bernoulli,
        },
    );
    policies.insert(
        "DMED".to_string(),
        PolicyConfig::Dmed {
            divergence: Divergence::Bernoulli,
            variant: DmedVariant::Standard,
        },
    );
    policies.insert("Thompson".to_string(), PolicyConfig::thompson());
    policies.insert("Bayes-UCB".to_string(), PolicyConfig::bayes_ucb());

    let results = compare(&env, &policies, &config)?;

    println!("{:<20} {:>12} {:>12}", "policy", "regret", "std");
    println!("{}", "-".repeat(46));
    for (label, evaluation) in &results {
        let mean = evaluation.mean_regret();
        let std = evaluation.std_regret();
        let last = mean.len() - 1;
        println!("{:<20} {:>12.2} {:>12.2}", label, mean[last], std[last]);
    }

    println!("\nRegret curve of KL-UCB:");
    let klucb = &results["KL-UCB"];
    for (round, regret) in klucb.checkpoints().iter().zip(klucb.mean_regret().iter()) {
        println!("  t = {round:>5}: {regret:>8.2}");
    }

    Ok(())
}
