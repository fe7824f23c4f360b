//! Formatted terminal output.
//!
//! All text the CLI prints about a run is built here, so the pipeline stays
//! free of presentation and output changes stay in one file.

use crate::app::pipeline::{N_PARAMS, RunOutput};
use crate::domain::{FitConfig, Observation};
use crate::report::Residual;

/// Format the run summary: inputs, outlier rejection, fitted values.
pub fn format_run_summary(run: &RunOutput, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== rfit - Breit-Wigner resonance fit ===\n");

    out.push_str("Sources:\n");
    for s in &run.sources {
        if let Some(notice) = &s.notice {
            out.push_str(&format!("  {}: {}\n", s.name, notice.describe()));
            continue;
        }
        out.push_str(&format!("  {}: kept {} of {} rows", s.name, s.kept, s.rows_read));
        if s.corrected_uncertainties > 0 {
            out.push_str(&format!(" ({} uncertainty sign(s) corrected)", s.corrected_uncertainties));
        }
        out.push('\n');
        for r in &s.rejections {
            out.push_str(&format!("    line {}: {}\n", r.line, r.reason.describe()));
        }
    }

    match run.combined.x_range() {
        Some((lo, hi)) => out.push_str(&format!(
            "Combined: n={} | energy=[{lo:.3}, {hi:.3}] GeV\n",
            run.combined.len()
        )),
        None => out.push_str(&format!("Combined: n={}\n", run.combined.len())),
    }

    let outcome = &run.outcome;
    out.push_str(&format!(
        "Outliers: {} removed in {} pass(es) (|residual| >= {}σ)\n",
        outcome.rejected.len(),
        outcome.iterations,
        config.outlier_sigma
    ));

    let p = outcome.fit.result.parameters;
    let b = outcome.fit.bounds;
    out.push_str("\nFit:\n");
    out.push_str(&format!(
        "  mass       m = {} ± {} GeV/c^2\n",
        fmt_sig(p.mass, 4),
        fmt_sig(b.mass_uncertainty, 4)
    ));
    out.push_str(&format!(
        "  width      Γ = {} ± {} GeV\n",
        fmt_sig(p.width, 4),
        fmt_sig(b.width_uncertainty, 4)
    ));
    out.push_str(&format!(
        "  lifetime   τ = {} ± {} s\n",
        fmt_sig(run.lifetime.value, 3),
        fmt_sig(run.lifetime.uncertainty, 3)
    ));
    out.push_str(&format!("  chi2 min     = {}\n", fmt_sig(outcome.fit.result.chi_square_min, 3)));
    let n = outcome.dataset.len();
    match run.reduced_chi_square {
        Some(r) => out.push_str(&format!(
            "  reduced chi2 = {} (n={n}, dof={})\n",
            fmt_sig(r, 3),
            n.saturating_sub(N_PARAMS)
        )),
        None => out.push_str(&format!("  reduced chi2 = n/a (n={n}, no degrees of freedom)\n")),
    }

    let notes = format_notices(run);
    if !notes.is_empty() {
        out.push_str("\nNotices:\n");
        out.push_str(&notes);
    }

    out
}

/// Warnings worth surfacing to the user; empty when there are none.
pub fn format_notices(run: &RunOutput) -> String {
    let mut out = String::new();
    let c = run.outcome.fit.convergence;
    if !c.primary {
        out.push_str("- best-fit minimization stopped on its iteration budget; values are best estimates\n");
    }
    if !c.upper_bound || !c.lower_bound {
        out.push_str("- uncertainty search stopped on its iteration budget; uncertainties are best estimates\n");
    }
    if run.outcome.hit_refit_cap {
        out.push_str(&format!(
            "- refit cap reached after {} passes; outliers may remain\n",
            run.outcome.iterations
        ));
    }
    out
}

/// Per-point table of the final fit.
pub fn format_residual_table(rows: &[Residual]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>10} {:>12} {:>10} {:>12} {:>12} {:>8}",
            "energy", "observed", "sigma", "fitted", "residual", "pull"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<12} {:-<10} {:-<12} {:-<12} {:-<8}", "", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        let o = &r.observation;
        out.push_str(
            format!(
                "{:>10.4} {:>12.5} {:>10.5} {:>12.5} {:>12.5} {:>8.2}",
                o.x, o.y, o.sigma, r.fitted, r.residual, r.pull
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// List of observations removed by the outlier filter.
pub fn format_rejected(rejected: &[Observation]) -> String {
    if rejected.is_empty() {
        return "Rejected: none\n".to_string();
    }
    let mut out = format!("Rejected ({}):\n", rejected.len());
    for o in rejected {
        out.push_str(&format!("  energy={:.4} observed={:.5} sigma={:.5}\n", o.x, o.y, o.sigma));
    }
    out
}

/// Format `v` to `digits` significant figures, switching to scientific
/// notation for very large or small magnitudes.
pub fn fmt_sig(v: f64, digits: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, v);
    // Exponent after rounding, so 9.9996 → 10.00 rather than 9.9996.
    let exp: i32 = sci
        .rsplit_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        sci
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        format!("{v:.decimals$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::compute_residuals;
    use crate::domain::Dataset;

    #[test]
    fn significant_figures() {
        assert_eq!(fmt_sig(91.18765, 4), "91.19");
        assert_eq!(fmt_sig(2.4952, 4), "2.495");
        assert_eq!(fmt_sig(0.98765, 3), "0.988");
        assert_eq!(fmt_sig(9.9996, 4), "10.00");
        assert_eq!(fmt_sig(2.6378e-25, 3), "2.64e-25");
        assert_eq!(fmt_sig(12345.0, 3), "1.23e4");
        assert_eq!(fmt_sig(0.0, 3), "0");
    }

    #[test]
    fn residual_table_has_header_rule_and_rows() {
        let data = Dataset::new(vec![Observation::new(88.0, 1.0, 0.5), Observation::new(91.0, 5.0, 0.5)]);
        let rows = compute_residuals(&data, &[1.5, 4.0]).unwrap();
        let txt = format_residual_table(&rows);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("energy") && lines[0].ends_with("pull"));
        assert!(lines[1].chars().all(|c| c == '-' || c == ' '));
        assert!(lines[2].contains("88.0000"));
        assert!(lines[2].ends_with("-1.00"));
        assert!(lines[3].ends_with("2.00"));
    }

    #[test]
    fn run_summary_lists_sources_and_fit() {
        use crate::app::pipeline::run_fit_with_sources;
        use crate::data::{RawRow, SampleConfig, generate_sample};
        use crate::io::{LoadedSource, SourceNotice};

        let data = generate_sample(&SampleConfig {
            count: 40,
            outlier_prob: 0.0,
            ..SampleConfig::default()
        })
        .unwrap();
        let mut rows: Vec<RawRow> = data.iter().enumerate().map(|(i, o)| RawRow::from_observation(i + 2, o)).collect();
        rows.push(RawRow::from_line(99, "91,-3.2,0.4"));
        let sources = vec![
            LoadedSource {
                name: "scan.csv".to_string(),
                rows,
                notice: None,
            },
            LoadedSource {
                name: "gone.csv".to_string(),
                rows: Vec::new(),
                notice: Some(SourceNotice::MissingSource {
                    path: "gone.csv".to_string(),
                    message: "not found".to_string(),
                }),
            },
        ];
        let config = FitConfig::default();
        let run = run_fit_with_sources(sources, &config).unwrap();

        let txt = format_run_summary(&run, &config);
        assert!(txt.contains("scan.csv: kept 40 of 41 rows"));
        assert!(txt.contains("line 99: negative response"));
        assert!(txt.contains("gone.csv: input file 'gone.csv' not found"));
        assert!(txt.contains("Combined: n=40"));
        assert!(txt.contains("mass       m = 91."));
        assert!(txt.contains("lifetime   τ = "));
        assert!(txt.contains("reduced chi2 = "));
    }

    #[test]
    fn rejected_list() {
        assert_eq!(format_rejected(&[]), "Rejected: none\n");
        let txt = format_rejected(&[Observation::new(90.0, 50.0, 0.5)]);
        assert!(txt.starts_with("Rejected (1):"));
        assert!(txt.contains("energy=90.0000"));
    }
}
