//! LGPL-2.1 license compatibility.

use super::MetricResult;
use crate::facts::documents;
use core::time::Duration;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

const LOG_TARGET: &str = "   license";

static LICENSE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ ]{0,3}#{1,2}[ \t]*License\b").expect("invalid regex"));

static NEXT_SECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ ]{0,3}##").expect("invalid regex"));

static LGPL_2_1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(gnu\s+lesser\s+general\s+public\s+license,?\s+(version\s+|v)?2\.1)|(lgpl[\s-]*v?2\.1)|(gnu\.org/licenses/(old-licenses/)?lgpl-2\.1)",
    )
    .expect("invalid regex")
});

/// Extract the License section of a README: from a `#` or `##` License heading up to the
/// next line starting with `##`, or the end.
#[must_use]
pub fn license_section(readme: &str) -> Option<&str> {
    let heading = LICENSE_HEADING.find(readme)?;
    let rest = readme.get(heading.end()..)?;
    let end = NEXT_SECTION.find(rest).map_or(readme.len(), |m| heading.end() + m.start());

    readme.get(heading.start()..end).map(str::trim)
}

#[must_use]
pub fn is_lgpl_2_1(text: &str) -> bool {
    LGPL_2_1.is_match(text)
}

/// Score license compatibility, preferring the README's License section over a LICENSE file.
pub async fn score(repo: &Path, readme: Option<&str>) -> MetricResult {
    let start = Instant::now();

    let from_readme = readme.and_then(license_section);
    let text = match from_readme {
        Some(section) => {
            log::debug!(target: LOG_TARGET, "Using the README license section");
            Some(section.to_string())
        }
        None => documents::read_license(repo).await,
    };

    let Some(text) = text else {
        log::info!(target: LOG_TARGET, "No license information found");
        return MetricResult::scored(0.0, Duration::ZERO);
    };

    let score = if is_lgpl_2_1(&text) { 1.0 } else { 0.0 };
    log::info!(target: LOG_TARGET, "License score is {score}");
    MetricResult::scored_since(score, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_section_runs_to_next_heading() {
        let readme = "# Project\n\n## License\nLGPL-2.1\n\n## Contributing\nPRs welcome";
        assert_eq!(license_section(readme), Some("## License\nLGPL-2.1"));
    }

    #[test]
    fn test_section_runs_to_end() {
        let readme = "# Project\n\n# license\n\nReleased under the MIT license.\n";
        assert_eq!(license_section(readme), Some("# license\n\nReleased under the MIT license."));
    }

    #[test]
    fn test_anchor_links_are_not_headings() {
        let readme = "# P\n\n- [Usage](#usage)\n- [License](#license)\n\n## Usage\nrun it\n\n## License\nGNU Lesser General Public License v2.1\n";
        assert_eq!(license_section(readme), Some("## License\nGNU Lesser General Public License v2.1"));
    }

    #[test]
    fn test_inline_hashes_do_not_end_section() {
        let readme = "## License\nLGPL-2.1, see issue ##12\n\n## Authors\nme";
        assert_eq!(license_section(readme), Some("## License\nLGPL-2.1, see issue ##12"));
    }

    #[test]
    fn test_no_section() {
        assert_eq!(license_section("# Project\n\nNothing to see."), None);
    }

    #[test]
    fn test_lgpl_forms() {
        assert!(is_lgpl_2_1("GNU Lesser General Public License v2.1"));
        assert!(is_lgpl_2_1("GNU LESSER GENERAL PUBLIC LICENSE, Version 2.1, February 1999"));
        assert!(is_lgpl_2_1("Licensed under LGPL-2.1"));
        assert!(is_lgpl_2_1("lgpl v2.1"));
        assert!(is_lgpl_2_1("see https://www.gnu.org/licenses/old-licenses/lgpl-2.1.html"));
        assert!(!is_lgpl_2_1("MIT License"));
        assert!(!is_lgpl_2_1("GNU Lesser General Public License v3.0"));
    }

    #[tokio::test]
    async fn test_readme_lgpl_scores_one() {
        let dir = tempfile::tempdir().unwrap();
        let result = score(dir.path(), Some("## License\nGNU Lesser General Public License v2.1")).await;
        assert!((result.score() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_readme_mit_scores_zero() {
        let dir = tempfile::tempdir().unwrap();
        let result = score(dir.path(), Some("## License\nMIT License")).await;
        assert!(result.is_available());
        assert!(result.score().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_readme_takes_precedence_over_license_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE"), "GNU Lesser General Public License v2.1").unwrap();

        let result = score(dir.path(), Some("## License\nMIT License")).await;
        assert!(result.score().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_table_of_contents_does_not_hide_license_section() {
        let dir = tempfile::tempdir().unwrap();
        let readme = "# P\n\n- [Usage](#usage)\n- [License](#license)\n\n## Usage\nrun it\n\n## License\nGNU Lesser General Public License v2.1\n";
        let result = score(dir.path(), Some(readme)).await;
        assert!((result.score() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_falls_back_to_license_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE.md"), "GNU LESSER GENERAL PUBLIC LICENSE\nVersion 2.1, February 1999\n\nLGPL 2.1").unwrap();

        let result = score(dir.path(), Some("# Project\nNo license heading here.")).await;
        assert!((result.score() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_no_license_information() {
        let dir = tempfile::tempdir().unwrap();
        let result = score(dir.path(), None).await;
        assert_eq!(result, MetricResult::scored(0.0, Duration::ZERO));
    }
}
