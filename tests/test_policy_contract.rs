//! Every configured policy honours the `start_game`/`choice`/`get_reward` contract.

use banditry::policies::DmedVariant;
use banditry::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const HORIZON: usize = 300;

fn catalogue() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig::ucb(),
        PolicyConfig::moss(HORIZON),
        PolicyConfig::ocucb(HORIZON),
        PolicyConfig::OcUcbN { eta: 2.0, rho: 0.5 },
        PolicyConfig::AdaUcb { horizon: HORIZON },
        PolicyConfig::UcbV,
        PolicyConfig::UcbTuned,
        PolicyConfig::UcbNormal,
        PolicyConfig::klucb(),
        PolicyConfig::KlUcbPlus {
            divergence: Divergence::Bernoulli,
        },
        PolicyConfig::Greedy,
        PolicyConfig::Imed {
            divergence: Divergence::Bernoulli,
        },
        PolicyConfig::epsilon_greedy(),
        PolicyConfig::AdaptiveGreedy { c: 1.0 },
        PolicyConfig::Random,
        PolicyConfig::Dmed {
            divergence: Divergence::Bernoulli,
            variant: DmedVariant::Standard,
        },
        PolicyConfig::Dmed {
            divergence: Divergence::Bernoulli,
            variant: DmedVariant::Plus,
        },
        PolicyConfig::Ossb {
            divergence: Divergence::Bernoulli,
            epsilon: 0.1,
            gamma: 0.1,
        },
        PolicyConfig::ImprovedUcb {
            horizon: HORIZON,
            c: 1.0,
        },
        PolicyConfig::thompson(),
        PolicyConfig::ThompsonGaussian,
        PolicyConfig::bayes_ucb(),
        PolicyConfig::BayesUcbGaussian { power: 1.0 },
    ]
}

/// Policies that do not open with a round over every arm.
fn skips_warm_up(config: &PolicyConfig) -> bool {
    matches!(
        config,
        PolicyConfig::Random | PolicyConfig::ThompsonBeta { .. } | PolicyConfig::ImprovedUcb { .. }
    )
}

#[test]
fn test_choices_are_valid_arms() {
    let env = Environment::bernoulli(&[0.3, 0.6, 0.5]).unwrap();
    for config in catalogue() {
        let mut policy = config.build(3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
        let trajectory = env.play(&mut policy, HORIZON, &mut rng).unwrap();
        assert_eq!(trajectory.len(), HORIZON, "{}", policy.name());
        assert!(trajectory.choices().iter().all(|&arm| arm < 3));
        assert_eq!(trajectory.nb_pulls().iter().sum::<usize>(), HORIZON);
    }
}

#[test]
fn test_warm_up_pulls_every_arm_in_order() {
    let env = Environment::bernoulli(&[0.3, 0.6, 0.5, 0.4]).unwrap();
    for config in catalogue().iter().filter(|c| !skips_warm_up(c)) {
        let mut policy = config.build(4).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let trajectory = env.play(&mut policy, 10, &mut rng).unwrap();
        assert_eq!(
            &trajectory.choices()[..4],
            &[0, 1, 2, 3],
            "{}",
            policy.name()
        );
    }
}

#[test]
fn test_replaying_with_same_seed_is_deterministic() {
    let env = Environment::bernoulli(&[0.3, 0.6, 0.5]).unwrap();
    for config in catalogue() {
        let mut policy = config.build(3).unwrap();
        let mut first_rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let first = env.play(&mut policy, 100, &mut first_rng).unwrap();

        // Reusing the same instance: start_game must wipe the previous game.
        let mut second_rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let second = env.play(&mut policy, 100, &mut second_rng).unwrap();
        assert_eq!(first, second, "{}", policy.name());
    }
}

#[test]
fn test_unpulled_arm_has_infinite_index() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let mut ucb = IndexPolicy::ucb(3, 1.0).unwrap();
    let mut klucb = IndexPolicy::klucb(3, Divergence::Poisson).unwrap();
    let mut moss = IndexPolicy::moss(3, 100).unwrap();
    for _ in 0..10 {
        ucb.get_reward(0, 1.0, &mut rng);
        klucb.get_reward(0, 2.0, &mut rng);
        moss.get_reward(2, 0.5, &mut rng);
    }
    assert_eq!(ucb.index(1), f64::INFINITY);
    assert_eq!(klucb.index(2), f64::INFINITY);
    assert_eq!(moss.index(0), f64::INFINITY);
    assert!(ucb.index(0).is_finite());
}
