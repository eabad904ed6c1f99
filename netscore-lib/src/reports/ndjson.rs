use crate::Result;
use crate::scoring::NetScoreReport;
use core::fmt::Write;

/// Write each report as a single-line JSON object followed by a newline.
pub fn generate<W: Write>(reports: &[NetScoreReport], writer: &mut W) -> Result<()> {
    for report in reports {
        writeln!(writer, "{}", serde_json::to_string(report)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricResult;
    use crate::scoring::DimensionResults;
    use core::time::Duration;

    fn report(url: &str, score: f64) -> NetScoreReport {
        let r = MetricResult::scored(score, Duration::from_millis(500));
        let results = DimensionResults {
            bus_factor: r.clone(),
            correctness: r.clone(),
            license: r.clone(),
            ramp_up: r.clone(),
            responsiveness: r,
        };
        NetScoreReport::new(url, &results, Duration::from_secs(3))
    }

    #[test]
    fn test_one_line_per_report() {
        let mut out = String::new();
        generate(&[report("https://github.com/a/b", 1.0), report("https://github.com/c/d", 0.0)], &mut out).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(out.ends_with('\n'));

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["URL"], "https://github.com/a/b");
        assert_eq!(first["NetScore"], 1.0);
        assert_eq!(first["NetScore_Latency"], 3.0);
        assert_eq!(first["License_Latency"], 0.5);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["NetScore"], 0.0);
    }

    #[test]
    fn test_field_order_is_stable() {
        let mut out = String::new();
        generate(&[report("u", 0.5)], &mut out).unwrap();

        assert!(out.starts_with(r#"{"URL":"u","NetScore":0.5,"NetScore_Latency":3.0,"RampUp":0.5,"#));
    }

    #[test]
    fn test_no_reports_no_output() {
        let mut out = String::new();
        generate(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
