//! Plain-text rendering of a prognosis.

pub mod format;

use std::fmt::Write;

use crate::application::CheckResult;
use crate::domain::{Assessment, MinimumDeltaNote, Nihss, Prognosis};

use format::{fixed, percent, DASH};

/// Trajectory days printed in the report, relative to the target day.
const TRAJECTORY_OFFSETS: [i64; 7] = [-30, -14, -7, 0, 7, 14, 30];

const DISCLAIMER: &str =
    "Not a medical device. Illustrative coefficients for education and discussion only.";

/// Probability difference in percentage points, with an explicit sign.
fn signed_points(delta: f64) -> String {
    let text = fixed(delta * 100.0, 1);
    if delta > 0.0 {
        format!("+{text}")
    } else {
        text
    }
}

/// Render the full report for one evaluated assessment.
#[must_use]
pub fn render(assessment: &Assessment, prognosis: &Prognosis) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, assessment, prognosis);
    out
}

fn write_report(out: &mut String, a: &Assessment, p: &Prognosis) -> std::fmt::Result {
    writeln!(out, "{DISCLAIMER}")?;
    writeln!(out)?;

    let m = &a.measurements;
    writeln!(
        out,
        "Measurements: day {} -> {}, day {} -> {}; target day {}",
        fixed(m.day_a, 0),
        fixed(m.score_a, 0),
        fixed(m.day_b, 0),
        fixed(m.score_b, 0),
        fixed(a.target_day, 0)
    )?;
    let c = &a.covariates;
    let nihss = match c.nihss {
        Nihss::Unknown => "unknown".to_string(),
        Nihss::Score(s) => s.to_string(),
    };
    writeln!(
        out,
        "Patient: age {}, household {}{}, stairs {}, hemiparesis {}, NIHSS {nihss}, mRS {}",
        fixed(c.age, 0),
        c.household_size,
        if c.lives_alone { " (alone)" } else { "" },
        if c.stairs_at_home { "yes" } else { "no" },
        c.hemiparesis,
        c.premorbid_mrs
    )?;

    for w in &p.warnings {
        writeln!(out, "! {w}")?;
    }
    writeln!(out)?;

    if !p.is_computable() {
        writeln!(out, "Cannot compute: check the measurement interval (0 < day A < day B).")?;
        return Ok(());
    }

    writeln!(out, "Recovery rate: {}", fixed(p.recovery_rate, 2))?;
    writeln!(
        out,
        "Projected score: {} (capped at 91)",
        fixed(p.projected_score, 0)
    )?;
    let ci = p
        .interval
        .map(|ci| format!(" (interval {}-{})", percent(ci.low), percent(ci.high)))
        .unwrap_or_default();
    writeln!(out, "Home discharge probability: {}{ci}", percent(p.discharge_probability))?;

    let s = &p.sensitivity;
    let t = &a.settings.thresholds;
    writeln!(
        out,
        "Decision: {} [home >= {}, nonhome <= {}]",
        s.bucket.description(),
        percent(t.home_high),
        percent(t.nonhome_low)
    )?;
    writeln!(out)?;

    writeln!(out, "Item attainment (least likely first):")?;
    for item in &p.items {
        let mark = if item.is_tie { " *" } else { "" };
        writeln!(
            out,
            "  {:<30} {:>5}  threshold {}{mark}",
            item.label,
            percent(item.probability),
            fixed(item.adjusted_threshold, 1)
        )?;
    }
    if p.items.iter().any(|i| i.is_tie) {
        writeln!(out, "  * exactly at the item threshold (50%)")?;
    }
    writeln!(out)?;

    writeln!(out, "Sensitivity:")?;
    if let Some(robust) = s.nih_robust {
        writeln!(
            out,
            "  NIHSS range: {}",
            if robust { "decision consistent" } else { "decision varies" }
        )?;
    }
    writeln!(
        out,
        "  Measurement error +/-2: {}",
        if s.measurement_robust { "robust" } else { "sensitive" }
    )?;

    let md = &s.minimum_delta;
    let needed = if md.needed == 0.0 {
        "none".to_string()
    } else {
        fixed(md.needed, 1)
    };
    let days = md
        .days
        .map(|d| format!(", about {d} more days"))
        .unwrap_or_default();
    let note = match md.note {
        MinimumDeltaNote::None => String::new(),
        n => format!(" ({n})"),
    };
    writeln!(out, "  Score gain needed for home: {needed}{days}{note}")?;

    match s.most_effective_lever() {
        Some(lever) => writeln!(
            out,
            "  Most effective lever: {} ({} pts)",
            lever.label,
            signed_points(lever.delta)
        )?,
        None => writeln!(out, "  Most effective lever: {DASH}")?,
    }
    for sc in &s.scenarios {
        writeln!(
            out,
            "    {:<45} {:>5}  {:>6} pts{}",
            sc.label,
            percent(sc.probability),
            signed_points(sc.delta),
            if sc.actionable { "" } else { "  (explanatory)" }
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Trajectory:")?;
    let target = a.target_day.round() as i64;
    for offset in TRAJECTORY_OFFSETS {
        let day = target + offset;
        if let Some(point) = p.trajectory.iter().find(|pt| i64::from(pt.day) == day) {
            writeln!(out, "  day {:>3}: {}", point.day, fixed(point.score, 1))?;
        }
    }

    Ok(())
}

/// Render the consistency-check table.
#[must_use]
pub fn render_checks(results: &[CheckResult]) -> String {
    let mut out = String::new();
    for r in results {
        let _ = writeln!(
            out,
            "{:<32} {}  {}",
            r.name,
            if r.pass { "PASS" } else { "FAIL" },
            r.detail
        );
    }
    let passed = results.iter().filter(|r| r.pass).count();
    let _ = writeln!(out, "{passed}/{} passed", results.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chacha::ChaChaNoise;
    use crate::application::PrognosisService;
    use crate::domain::{MeasurementPair, ModelConfig};

    fn evaluate(a: &Assessment) -> Prognosis {
        PrognosisService::new(ModelConfig::default(), ChaChaNoise::with_seed(9)).evaluate(a)
    }

    #[test]
    fn test_render_default() {
        let a = Assessment::default();
        let text = render(&a, &evaluate(&a));

        assert!(text.starts_with("Not a medical device"));
        assert!(text.contains("Recovery rate: 21.64"));
        assert!(text.contains("Projected score: 54"));
        assert!(text.contains("Stairs"));
        assert!(text.contains("Most effective lever: Score +5"));
        assert!(text.contains("day  21:"));
    }

    #[test]
    fn test_render_invalid_interval() {
        let a = Assessment {
            measurements: MeasurementPair::new(0.0, 30.0, 14.0, 45.0),
            ..Default::default()
        };
        let text = render(&a, &evaluate(&a));
        assert!(text.contains("Cannot compute"));
        assert!(!text.contains("Recovery rate"));
    }

    #[test]
    fn test_render_checks_summary() {
        let results = vec![
            CheckResult {
                name: "rate basic",
                pass: true,
                detail: "rate=21.640".to_string(),
            },
            CheckResult {
                name: "A-B spacing",
                pass: false,
                detail: "A=7, B=10".to_string(),
            },
        ];
        let text = render_checks(&results);
        assert!(text.contains("FAIL"));
        assert!(text.ends_with("1/2 passed\n"));
    }
}
