//! End-to-end evaluation scenarios.
//!
//! Monte-Carlo outputs are checked against closed-form posteriors with
//! tolerances sized for the default 20 000 draws.

use ab_config::{BetaPrior, GammaPrior, SimulationSettings};
use ab_core::experiment::{
    Binary, BinaryVariant, DeltaLognormal, DeltaLognormalVariant, Discrete, DiscreteVariant,
    Experiment, Exponential, Normal, RateVariant,
};
use ab_core::stats::{
    BernoulliStats, DeltaLognormalStats, DirichletStats, NormalStats, RateStats,
};
use ab_core::{
    evaluate_bernoulli, evaluate_delta_lognormal, evaluate_dirichlet, evaluate_exponential,
    evaluate_normal, evaluate_poisson, Error,
};

fn seeded(seed: u64) -> SimulationSettings {
    SimulationSettings::seeded(seed)
}

fn close(actual: f64, expected: f64, tol: f64) -> bool {
    (actual - expected).abs() <= tol
}

/// Standard normal quantile at 0.975.
const Z_975: f64 = 1.959_963_984_540_054;

/// Beta quantile by normal approximation; accurate for large counts.
fn beta_quantile(z: f64, a: f64, b: f64) -> f64 {
    let n = a + b;
    let mean = a / n;
    let sd = (a * b / (n * n * (n + 1.0))).sqrt();
    mean + z * sd
}

/// Gamma(shape, rate) quantile by the Wilson-Hilferty cube-root approximation.
fn gamma_quantile(z: f64, shape: f64, rate: f64) -> f64 {
    let c = 1.0 / (9.0 * shape);
    shape / rate * (1.0 - c + z * c.sqrt()).powi(3)
}

fn conversion_stats() -> Vec<BernoulliStats> {
    vec![
        BernoulliStats::new(31_500, 1_580),
        BernoulliStats::new(32_000, 1_700),
        BernoulliStats::new(31_000, 1_550),
    ]
}

// ============================================================================
// Beta-Bernoulli
// ============================================================================

#[test]
fn bernoulli_three_variants() {
    let result = evaluate_bernoulli(&conversion_stats(), None, &seeded(52)).unwrap();

    let expected = [0.042, 0.922, 0.036];
    for (p, e) in result.probabilities.iter().zip(expected) {
        assert!(close(*p, e, 0.02), "probability {} vs {}", p, e);
    }
    let sum: f64 = result.probabilities.iter().sum();
    assert!(close(sum, 1.0, 1e-6));

    // B is best: smallest loss, and every loss is non-negative
    assert!(result.expected_loss[1] < result.expected_loss[0]);
    assert!(result.expected_loss[1] < result.expected_loss[2]);
    assert!(result.expected_loss.iter().all(|l| *l >= 0.0));
    assert!(close(result.expected_loss[0], 0.00301, 5e-4));
    assert!(close(result.expected_loss[1], 0.00006, 5e-5));
    assert!(close(result.expected_loss[2], 0.00316, 5e-4));
}

#[test]
fn unseeded_runs_differ() {
    let settings = SimulationSettings {
        sim_count: 500,
        ..SimulationSettings::default()
    };
    let a = evaluate_bernoulli(&conversion_stats(), None, &settings).unwrap();
    let b = evaluate_bernoulli(&conversion_stats(), None, &settings).unwrap();
    assert_ne!(a.credible_intervals, b.credible_intervals);
}

#[test]
fn intervals_shrink_with_more_data() {
    let stats = [BernoulliStats::new(100, 10), BernoulliStats::new(10_000, 1_000)];
    let result = evaluate_bernoulli(&stats, None, &seeded(6)).unwrap();
    assert!(result.credible_intervals[1].width() < result.credible_intervals[0].width());
}

#[test]
fn bernoulli_min_is_best_flips_the_winner() {
    let settings = SimulationSettings {
        min_is_best: true,
        ..seeded(52)
    };
    let result = evaluate_bernoulli(&conversion_stats(), None, &settings).unwrap();
    let p = &result.probabilities;
    let loss = &result.expected_loss;

    // B has the highest rate, so it is now the worst choice
    assert!(p[1] < 0.03);
    assert!(p[1] < p[0] && p[1] < p[2]);
    assert!(loss[1] > loss[0] && loss[1] > loss[2]);
    assert!(close(p.iter().sum::<f64>(), 1.0, 1e-6));
}

#[test]
fn bernoulli_intervals_match_beta_quantiles() {
    let stats = conversion_stats();
    let result = evaluate_bernoulli(&stats, None, &seeded(7)).unwrap();
    for (s, interval) in stats.iter().zip(&result.credible_intervals) {
        let a = 0.5 + s.positives as f64;
        let b = 0.5 + (s.total - s.positives) as f64;
        assert!(close(interval.low, beta_quantile(-Z_975, a, b), 5e-4));
        assert!(close(interval.high, beta_quantile(Z_975, a, b), 5e-4));
    }
}

#[test]
fn bernoulli_same_seed_same_result() {
    let a = evaluate_bernoulli(&conversion_stats(), None, &seeded(123)).unwrap();
    let b = evaluate_bernoulli(&conversion_stats(), None, &seeded(123)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn bernoulli_custom_priors_shift_the_posterior() {
    let stats = [BernoulliStats::new(10, 5), BernoulliStats::new(10, 5)];
    let priors = [BetaPrior::new(1.0, 1.0), BetaPrior::new(200.0, 20.0)];
    let result = evaluate_bernoulli(&stats, Some(&priors), &seeded(1)).unwrap();
    assert!(result.probabilities[1] > 0.99);
}

// ============================================================================
// Normal and delta families
// ============================================================================

#[test]
fn normal_posterior_centres_on_sample_mean() {
    let a: Vec<f64> = (0..1000).map(|i| 10.0 + (i % 7) as f64 - 3.0).collect();
    let b: Vec<f64> = (0..1000).map(|i| 10.5 + (i % 7) as f64 - 3.0).collect();
    let stats = [NormalStats::from_values(&a), NormalStats::from_values(&b)];
    let result = evaluate_normal(&stats, None, &seeded(11)).unwrap();

    assert!(result.probabilities[1] > 0.99);
    let ci = result.credible_intervals[0];
    assert!(ci.low < 10.0 && ci.high > 10.0);
    assert!(ci.width() < 0.5);
}

#[test]
fn normal_with_no_observations_is_zero() {
    let stats = [NormalStats::new(0, 0.0, 0.0), NormalStats::new(5, 5.0, 5.0)];
    let result = evaluate_normal(&stats, None, &seeded(3)).unwrap();
    assert_eq!(result.credible_intervals[0].low, 0.0);
    assert_eq!(result.credible_intervals[0].high, 0.0);
    assert_eq!(result.probabilities, vec![0.0, 1.0]);
}

#[test]
fn delta_lognormal_all_zero_is_uniform() {
    let stats: Vec<DeltaLognormalStats> = [1_000, 1_200, 800, 1_500]
        .iter()
        .map(|&total| DeltaLognormalStats::new(total, 0, 0.0, 0.0))
        .collect();
    let settings = SimulationSettings {
        sim_count: 10_000,
        interval_alpha: 0.5,
        ..seeded(52)
    };
    let result = evaluate_delta_lognormal(&stats, None, None, &settings).unwrap();
    assert_eq!(result.probabilities, vec![0.25; 4]);
    assert!(result.expected_loss.iter().all(|l| l.is_nan()));
    assert!(result
        .credible_intervals
        .iter()
        .all(|i| i.low.is_nan() && i.high.is_nan()));
}

#[test]
fn delta_lognormal_prefers_higher_revenue() {
    let mut test = Experiment::new(DeltaLognormal);
    let low: Vec<f64> = (0..500).map(|i| if i % 5 == 0 { 10.0 } else { 0.0 }).collect();
    let high: Vec<f64> = (0..500).map(|i| if i % 5 == 0 { 20.0 } else { 0.0 }).collect();
    test.add_variant_data("low", &low, None, None, true).unwrap();
    test.add_variant_data("high", &high, None, None, true).unwrap();

    let report = test.evaluate(&seeded(8)).unwrap();
    assert!(report[1].decision.prob_being_best > 0.95);
    assert_eq!(report[0].avg_positive_values, 10.0);
    assert_eq!(report[1].avg_values, 4.0);
}

#[test]
fn delta_lognormal_agg_matches_raw() {
    let values = [0.0, 1.5, 0.0, 4.0, 2.5];
    let mut raw = Experiment::new(DeltaLognormal);
    raw.add_variant_data("A", &values, None, None, true).unwrap();

    let logs: Vec<f64> = values.iter().filter(|v| **v > 0.0).map(|v| v.ln()).collect();
    let mut agg = Experiment::new(DeltaLognormal);
    agg.add_variant_data_agg(
        "A",
        DeltaLognormalVariant::new(
            5,
            3,
            8.0,
            logs.iter().sum(),
            logs.iter().map(|l| l * l).sum(),
        ),
        true,
    )
    .unwrap();

    let settings = seeded(21);
    assert_eq!(
        raw.evaluation(&settings).unwrap(),
        agg.evaluation(&settings).unwrap()
    );
}

// ============================================================================
// Dirichlet
// ============================================================================

#[test]
fn dirichlet_single_variant() {
    let states = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let stats = [DirichletStats::new(vec![10.0, 12.0, 9.0, 11.0, 10.0, 8.0])];
    let result = evaluate_dirichlet(&states, &stats, None, &seeded(5)).unwrap();
    assert_eq!(result.probabilities, vec![1.0]);
    assert_eq!(result.expected_loss, vec![0.0]);
    let ci = result.credible_intervals[0];
    assert!(ci.low > 1.0 && ci.high < 6.0);
}

#[test]
fn dirichlet_loaded_die() {
    let mut test = Experiment::new(Discrete::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap());
    test.add_variant_data_agg("fair", DiscreteVariant::new(vec![20.0; 6]), true)
        .unwrap();
    test.add_variant_data_agg(
        "loaded",
        DiscreteVariant::new(vec![5.0, 5.0, 5.0, 5.0, 5.0, 95.0]),
        true,
    )
    .unwrap();
    let pbbs = test.probabilities_of_being_best(&seeded(17)).unwrap();
    assert_eq!(pbbs[1].0, "loaded");
    assert!(pbbs[1].1 > 0.99);
}

// ============================================================================
// Gamma families
// ============================================================================

#[test]
fn poisson_intervals_match_gamma_quantiles() {
    let stats = [RateStats::new(50, 150.0), RateStats::new(40, 140.0)];
    let result = evaluate_poisson(&stats, None, &seeded(13)).unwrap();
    for (s, interval) in stats.iter().zip(&result.credible_intervals) {
        let shape = 0.1 + s.sum;
        let rate = 0.1 + s.total as f64;
        assert!(close(interval.low, gamma_quantile(-Z_975, shape, rate), 0.02));
        assert!(close(interval.high, gamma_quantile(Z_975, shape, rate), 0.02));
    }
    assert!(result.probabilities[1] > result.probabilities[0]);
}

#[test]
fn exponential_reports_mean_duration() {
    let stats = [RateStats::new(20, 45.13), RateStats::new(20, 90.0)];
    let result = evaluate_exponential(&stats, None, &seeded(2)).unwrap();
    // 1/λ with λ ~ Gamma(20.1, 45.23): quantiles swap under inversion
    let ci = result.credible_intervals[0];
    assert!(close(ci.low, 1.0 / gamma_quantile(Z_975, 20.1, 45.23), 0.03));
    assert!(close(ci.high, 1.0 / gamma_quantile(-Z_975, 20.1, 45.23), 0.05));

    let settings = SimulationSettings {
        min_is_best: true,
        ..seeded(2)
    };
    let faster = evaluate_exponential(&stats, None, &settings).unwrap();
    assert!(faster.probabilities[0] > 0.9);
}

#[test]
fn exponential_experiment_with_custom_prior() {
    let mut test = Experiment::new(Exponential);
    test.add_variant_data("A", &[1.0, 2.0, 3.0], Some(GammaPrior::new(1.0, 1.0)), true)
        .unwrap();
    test.add_variant_data_agg("B", RateVariant::new(3, 6.0), true)
        .unwrap();
    let report = test.evaluate(&seeded(4)).unwrap();
    // (1 + 6) / (1 + 3)
    assert_eq!(report[0].posterior_mean, 1.75);
    assert_eq!(report[1].observed_average, 2.0);
}

// ============================================================================
// Settings and input errors
// ============================================================================

#[test]
fn hdi_is_reported_on_request() {
    let settings = SimulationSettings {
        include_hdi: true,
        ..seeded(52)
    };
    let result = evaluate_bernoulli(&conversion_stats(), None, &settings).unwrap();
    let hdis = result.hdi_intervals.unwrap();
    assert_eq!(hdis.len(), 3);
    for (hdi, ci) in hdis.iter().zip(&result.credible_intervals) {
        // symmetric posterior: both intervals nearly coincide
        assert!(close(hdi.low, ci.low, 5e-4));
        assert!(close(hdi.high, ci.high, 5e-4));
    }
}

#[test]
fn hdi_is_narrower_for_skewed_posteriors() {
    let settings = SimulationSettings {
        include_hdi: true,
        ..seeded(31)
    };
    let result = evaluate_exponential(&[RateStats::new(4, 10.0)], None, &settings).unwrap();
    let hdi = result.hdi_intervals.unwrap()[0];
    let ci = result.credible_intervals[0];
    assert!(hdi.width() < ci.width());
    assert!(hdi.low < ci.low);
}

#[test]
fn interval_alpha_endpoints_are_rejected() {
    for alpha in [0.0, 1.0] {
        let settings = SimulationSettings {
            interval_alpha: alpha,
            ..seeded(1)
        };
        let err = evaluate_bernoulli(&conversion_stats(), None, &settings).unwrap_err();
        assert_eq!(err, Error::InvalidIntervalAlpha(alpha));
    }
}

#[test]
fn experiment_wrapper_matches_orchestrator() {
    let mut test = Experiment::new(Binary);
    for (name, s) in ["A", "B", "C"].iter().zip(conversion_stats()) {
        test.add_variant_data_agg(name, BinaryVariant::new(s.total, s.positives), true)
            .unwrap();
    }
    let settings = seeded(52);
    let direct = evaluate_bernoulli(&conversion_stats(), None, &settings).unwrap();
    let wrapped = test.evaluation(&settings).unwrap();
    assert_eq!(direct, wrapped);

    let losses = test.expected_loss(&settings).unwrap();
    assert_eq!(losses[2], ("C".to_string(), direct.expected_loss[2]));
}

#[test]
fn normal_experiment_raw_equals_agg() {
    let mut test = Experiment::new(Normal);
    test.add_variant_data("A", &[2.0, 4.0], None, true).unwrap();
    test.add_variant_data("A", &[6.0], None, false).unwrap();
    let record = test.variant("A").unwrap();
    assert_eq!(record.total, 3);
    assert_eq!(record.sum, 12.0);
    assert_eq!(record.sum_of_squares, 56.0);
}
