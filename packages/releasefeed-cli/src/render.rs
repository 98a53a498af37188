use releasefeed_core::ProcessedRelease;

/// `1247` -> `1,247`
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render_release(release: &ProcessedRelease) -> String {
    let mut out = format!("{}  [{}]", release.version, release.kind);
    if release.is_latest {
        out.push_str("  LATEST");
    }
    if release.prerelease {
        out.push_str("  pre-release");
    }
    out.push('\n');

    let date = if release.date.is_empty() {
        "unpublished"
    } else {
        release.date.as_str()
    };
    out.push_str(&format!(
        "  {} | {} downloads\n",
        date,
        format_count(release.downloads)
    ));
    out.push_str(&format!("  {}\n", release.description));
    for change in &release.changes {
        out.push_str(&format!("    - {}\n", change));
    }
    if !release.html_url.is_empty() {
        out.push_str(&format!("  {}\n", release.html_url));
    }
    out
}

pub fn render_changelog(releases: &[ProcessedRelease]) -> String {
    if releases.is_empty() {
        return "No releases found\n".to_string();
    }
    releases
        .iter()
        .map(render_release)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use releasefeed_core::ReleaseKind;

    fn sample() -> ProcessedRelease {
        ProcessedRelease {
            version: "v2.0.1".to_string(),
            date: "2024-06-08".to_string(),
            kind: ReleaseKind::Patch,
            description: "Bug fixes and performance improvements".to_string(),
            changes: vec![
                "Fixed SSH key management edge cases".to_string(),
                "Updated GCP authentication flow".to_string(),
            ],
            downloads: 1247,
            is_latest: true,
            html_url: "https://github.com/MaximilianLS98/MaxCLI/releases/tag/v2.0.1".to_string(),
            prerelease: false,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1247), "1,247");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_render_release() {
        let expected = "\
v2.0.1  [patch]  LATEST
  2024-06-08 | 1,247 downloads
  Bug fixes and performance improvements
    - Fixed SSH key management edge cases
    - Updated GCP authentication flow
  https://github.com/MaximilianLS98/MaxCLI/releases/tag/v2.0.1
";
        assert_eq!(render_release(&sample()), expected);
    }

    #[test]
    fn test_render_release_without_url_or_notes() {
        let mut release = sample();
        release.is_latest = false;
        release.html_url = String::new();
        release.changes.clear();
        assert_eq!(
            render_release(&release),
            "v2.0.1  [patch]\n  2024-06-08 | 1,247 downloads\n  Bug fixes and performance improvements\n"
        );
    }

    #[test]
    fn test_render_changelog() {
        assert_eq!(render_changelog(&[]), "No releases found\n");

        let mut older = sample();
        older.version = "v2.0.0".to_string();
        older.kind = ReleaseKind::Major;
        older.is_latest = false;
        older.prerelease = true;
        older.date = String::new();

        let text = render_changelog(&[sample(), older]);
        assert!(text.contains("v2.0.0  [major]  pre-release\n  unpublished |"));
        assert_eq!(text.matches("LATEST").count(), 1);
    }
}
