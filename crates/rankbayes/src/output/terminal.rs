//! Terminal output formatting with colors.

use std::fmt;

use rankbayes_core::classical::PValueMethod;
use rankbayes_core::{BfType, ClassicalResult, ClassicalTest, Prior};

use super::colors::{bold, dim, evidence, green, red};
use crate::report::TestReport;

/// Separator line used in output.
pub const SEPARATOR: &str = "──────────────────────────────────────────────────────────────";

/// Format a Bayes factor for display.
///
/// Two decimals in the everyday range, scientific notation for very large
/// or very small values so that `BF10 = 0.00` never hides the magnitude.
pub fn format_bf(value: f64) -> String {
    if !value.is_finite() {
        return if value > 0.0 { "∞".to_string() } else { value.to_string() };
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(0.01..1e4).contains(&magnitude) {
        format!("{:.3e}", value)
    } else if magnitude < 1.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a test report for human-readable terminal output.
pub fn format_report(report: &TestReport, bf_type: BfType) -> String {
    ReportView { report, bf_type }.to_string()
}

/// Format one or more classical test results.
pub fn format_classical(results: &[ClassicalResult]) -> String {
    ClassicalView(results).to_string()
}

fn describe_prior(prior: &Prior) -> String {
    match prior {
        Prior::Cauchy { scale } => format!("Cauchy(0, {:.3})", scale),
        Prior::StretchedBeta { kappa } => {
            format!("stretched Beta(1/κ, 1/κ), κ = {}", kappa)
        }
    }
}

fn statistic_name(test: ClassicalTest) -> &'static str {
    match test {
        ClassicalTest::WilcoxonSignedRank => "W",
        ClassicalTest::Spearman => "rho",
        ClassicalTest::MannWhitneyU => "U",
    }
}

fn method_name(method: PValueMethod) -> &'static str {
    match method {
        PValueMethod::Exact => "exact",
        PValueMethod::Normal => "normal approximation",
        PValueMethod::StudentT => "t approximation",
    }
}

fn format_p(p: f64) -> String {
    if p < 0.001 {
        "< 0.001".to_string()
    } else {
        format!("= {:.4}", p)
    }
}

fn write_classical_line(f: &mut fmt::Formatter<'_>, result: &ClassicalResult) -> fmt::Result {
    let statistic = match result.test {
        ClassicalTest::Spearman => format!("{:.3}", result.statistic),
        _ => format!("{:.1}", result.statistic),
    };
    writeln!(
        f,
        "    {} ({}): {} = {}, p {}, n = {}  {}",
        result.test,
        result.alternative,
        statistic_name(result.test),
        statistic,
        format_p(result.p_value),
        result.n,
        dim(&format!("[{}]", method_name(result.method)))
    )
}

struct ReportView<'a> {
    report: &'a TestReport,
    bf_type: BfType,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;

        writeln!(f, "rankbayes")?;
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f)?;

        writeln!(
            f,
            "  {} ({}, n = {})",
            bold(&format!("Bayesian {} test", r.family)),
            r.input_kind,
            r.sample_size
        )?;
        writeln!(
            f,
            "    H1: {}    prior: {}    test value: {}",
            r.alternative,
            describe_prior(&r.prior),
            r.test_value
        )?;
        writeln!(f)?;

        let bf_line = match self.bf_type {
            BfType::Bf10 => format!("BF10 = {}", format_bf(r.bf10)),
            BfType::Bf01 => format!("BF01 = {}", format_bf(r.bf01)),
            BfType::LogBf10 => format!("log(BF10) = {:.3}", r.bayes_factor.log_bf10),
        };
        writeln!(f, "  {}", bold(&bf_line))?;
        if let Some(e) = &r.evidence {
            writeln!(f, "  {}", evidence(e))?;
        }
        writeln!(f)?;

        let p = &r.posterior;
        writeln!(f, "  Posterior {}", r.parameter_symbol())?;
        writeln!(f, "    Mean:     {:.3}  (sd {:.3})", p.mean, p.sd)?;
        writeln!(f, "    Median:   {:.3}", p.median)?;
        writeln!(
            f,
            "    {:.0}% CI:   [{:.3}, {:.3}]",
            p.credible_level * 100.0,
            p.credible_interval.0,
            p.credible_interval.1
        )?;
        writeln!(f)?;

        writeln!(f, "  Sampling")?;
        writeln!(
            f,
            "    Chains:   {} × {} draws ({} burn-in), seed {}",
            r.n_chains, r.n_samples, r.n_burnin, r.seed
        )?;
        let convergence = match r.r_hat {
            Some(rhat) if r.converged => format!("{:.3} ({})", rhat, green("converged")),
            Some(rhat) => format!("{:.3} ({})", rhat, red("not converged")),
            None => dim("n/a"),
        };
        writeln!(f, "    R-hat:    {}", convergence)?;
        writeln!(f, "    ESS:      {:.0}", p.ess)?;

        if let Some(classical) = &r.classical {
            writeln!(f)?;
            writeln!(f, "  Classical")?;
            write_classical_line(f, classical)?;
        }

        writeln!(f)?;
        writeln!(f, "  {}", dim(&format!("Runtime: {:.2}s", r.elapsed_secs)))?;
        write!(f, "{}", SEPARATOR)
    }
}

struct ClassicalView<'a>(&'a [ClassicalResult]);

impl fmt::Display for ClassicalView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rankbayes (classical)")?;
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f)?;
        for result in self.0 {
            write_classical_line(f, result)?;
        }
        writeln!(f)?;
        write!(f, "{}", SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankbayes_core::{
        compute_bayes_factor, Alternative, Evidence, Posterior, PosteriorSummary, TestFamily,
    };

    fn make_report(evidence: bool) -> TestReport {
        let chain: Vec<f64> = (0..400).map(|i| 0.6 + 0.3 * ((i % 20) as f64 / 20.0 - 0.5)).collect();
        let posterior = Posterior::from_chains(
            TestFamily::SignedRank,
            core::f64::consts::FRAC_1_SQRT_2,
            vec![chain.clone(), chain],
            42,
        );
        let bf = compute_bayes_factor(
            &posterior,
            TestFamily::SignedRank,
            core::f64::consts::FRAC_1_SQRT_2,
            Alternative::TwoSided,
        )
        .unwrap();

        TestReport {
            family: TestFamily::SignedRank,
            input_kind: "paired",
            sample_size: 22,
            alternative: Alternative::TwoSided,
            prior: bf.prior,
            test_value: 0.0,
            bf10: bf.bf10(),
            bf01: bf.bf01(),
            evidence: evidence.then(|| Evidence::from_bf10(bf.bf10())),
            posterior: PosteriorSummary::from_chains(&posterior.chains, 0.95),
            r_hat: posterior.r_hat,
            converged: true,
            n_chains: 2,
            n_samples: 401,
            n_burnin: 1,
            seed: 42,
            classical: None,
            bayes_factor: bf,
            elapsed_secs: 0.5,
        }
    }

    #[test]
    fn test_format_report() {
        colored::control::set_override(false);
        let output = format_report(&make_report(true), BfType::Bf10);
        assert!(output.contains("Wilcoxon signed-rank"));
        assert!(output.contains("n = 22"));
        assert!(output.contains("BF10 = "));
        assert!(output.contains("evidence for H1"));
        assert!(output.contains("Cauchy(0, 0.707)"));
        assert!(output.contains("Posterior delta"));
        assert!(output.contains("seed 42"));
    }

    #[test]
    fn test_format_report_without_interpretation() {
        colored::control::set_override(false);
        let output = format_report(&make_report(false), BfType::Bf01);
        assert!(output.contains("BF01 = "));
        assert!(!output.contains("evidence for"));
    }

    #[test]
    fn test_format_bf() {
        assert_eq!(format_bf(15.234), "15.23");
        assert_eq!(format_bf(0.05), "0.050");
        assert_eq!(format_bf(123456.0), "1.235e5");
        assert_eq!(format_bf(0.0001), "1.000e-4");
        assert_eq!(format_bf(f64::INFINITY), "∞");
        assert_eq!(format_bf(0.0), "0");
    }

    #[test]
    fn test_format_classical() {
        colored::control::set_override(false);
        let results = vec![ClassicalResult {
            test: ClassicalTest::MannWhitneyU,
            statistic: 36.0,
            p_value: 0.0000123,
            n: 12,
            alternative: Alternative::TwoSided,
            method: PValueMethod::Normal,
        }];
        let output = format_classical(&results);
        assert!(output.contains("Mann-Whitney U test"));
        assert!(output.contains("U = 36.0"));
        assert!(output.contains("p < 0.001"));
        assert!(output.contains("normal approximation"));
    }
}
