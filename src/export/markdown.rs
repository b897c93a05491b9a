//! export::markdown
//!
//! Full Markdown changelog document.
//!
//! Layout: title, base -> target heading, optional Notes section, a
//! Summary count list, then Added / Removed / Updated sections. Each mod
//! gets its own `####` heading (linked when a URL is known), change
//! notes, authors, and a link line. Mods without a URL get an explicit
//! warning line so maintainers know to verify by hand.

use crate::core::changelog::Changelog;
use crate::core::types::ModEntry;

use super::ExportContext;

const NO_LINK_WARNING: &str =
    "- *No mod link available. Check Modrinth/CurseForge or verify in the launcher.*\n";

/// Render a changelog as a Markdown document.
pub fn render(changelog: &Changelog, ctx: &ExportContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {} - Changelog\n\n", ctx.project_name));
    out.push_str(&format!("## {} → {}\n\n", ctx.base_label, ctx.target_label));

    if !changelog.overall_notes.trim().is_empty() {
        out.push_str(&format!("### Notes\n\n{}\n\n", changelog.overall_notes));
    }

    out.push_str("### Summary\n\n");
    out.push_str(&format!("- Added: {} mods\n", changelog.diff.added.len()));
    out.push_str(&format!("- Removed: {} mods\n", changelog.diff.removed.len()));
    out.push_str(&format!("- Updated: {} mods\n\n", changelog.diff.updated.len()));

    if !changelog.diff.added.is_empty() {
        out.push_str("### Added Mods\n\n");
        for entry in &changelog.diff.added {
            out.push_str(&format!(
                "#### {} ({})\n",
                linked_name(entry),
                entry.version
            ));
            push_note(&mut out, changelog, &entry.name);
            push_authors(&mut out, entry);
            push_link(&mut out, entry.url.as_deref());
            out.push('\n');
        }
    }

    if !changelog.diff.removed.is_empty() {
        out.push_str("### Removed Mods\n\n");
        for entry in &changelog.diff.removed {
            out.push_str(&format!(
                "#### {} ({})\n",
                linked_name(entry),
                entry.version
            ));
            push_note(&mut out, changelog, &entry.name);
            push_link(&mut out, entry.url.as_deref());
            out.push('\n');
        }
    }

    if !changelog.diff.updated.is_empty() {
        out.push_str("### Updated Mods\n\n");
        for update in &changelog.diff.updated {
            out.push_str(&format!(
                "#### {}: {} → {}\n",
                linked_name(&update.entry),
                update.old_version,
                update.new_version
            ));
            push_note(&mut out, changelog, &update.name);
            push_link(&mut out, update.entry.url.as_deref());
            out.push('\n');
        }
    }

    out
}

fn linked_name(entry: &ModEntry) -> String {
    match entry.url.as_deref() {
        Some(url) => format!("[{}]({})", entry.name, url),
        None => entry.name.clone(),
    }
}

fn push_note(out: &mut String, changelog: &Changelog, name: &str) {
    if let Some(note) = changelog.note(name) {
        out.push_str(&format!("**Change Notes:** {}\n\n", note));
    }
}

fn push_authors(out: &mut String, entry: &ModEntry) {
    if !entry.authors.is_empty() {
        out.push_str(&format!("- Authors: {}\n", entry.authors.join(", ")));
    }
}

fn push_link(out: &mut String, url: Option<&str>) {
    match url {
        Some(url) => out.push_str(&format!("- [View Mod Details]({})\n", url)),
        None => out.push_str(NO_LINK_WARNING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diff::diff;
    use crate::core::types::ModEntry;

    fn sample_changelog() -> Changelog {
        let base = vec![
            ModEntry::new("OptiFine", "H9"),
            ModEntry::new("JEI", "10.0.0"),
        ];
        let target = vec![
            ModEntry::new("JEI", "11.0.0"),
            ModEntry::new("Sodium", "0.5.8")
                .with_url("https://modrinth.com/mod/sodium")
                .with_authors(vec!["jellysquid3".to_string()]),
        ];
        let mut changelog = Changelog::new(diff(&base, &target), "v1.0", "v1.1");
        changelog.set_overall_notes("Performance pass.");
        changelog.set_note("Sodium", "Replaces OptiFine");
        changelog
    }

    #[test]
    fn renders_all_sections() {
        let changelog = sample_changelog();
        let ctx = ExportContext::new("My Pack", "v1.0", "v1.1");
        let md = render(&changelog, &ctx);

        assert!(md.starts_with("# My Pack - Changelog\n"));
        assert!(md.contains("## v1.0 → v1.1"));
        assert!(md.contains("### Notes\n\nPerformance pass."));
        assert!(md.contains("- Added: 1 mods"));
        assert!(md.contains("- Removed: 1 mods"));
        assert!(md.contains("- Updated: 1 mods"));
        assert!(md.contains("#### [Sodium](https://modrinth.com/mod/sodium) (0.5.8)"));
        assert!(md.contains("**Change Notes:** Replaces OptiFine"));
        assert!(md.contains("- Authors: jellysquid3"));
        assert!(md.contains("#### JEI: 10.0.0 → 11.0.0"));
        assert!(md.contains("#### OptiFine (H9)"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let list = vec![ModEntry::new("A", "1.0")];
        let changelog = Changelog::new(diff(&list, &list.clone()), "v1", "v1");
        let md = render(&changelog, &ExportContext::new("Pack", "v1", "v1"));

        assert!(md.contains("- Added: 0 mods"));
        assert!(!md.contains("### Added Mods"));
        assert!(!md.contains("### Removed Mods"));
        assert!(!md.contains("### Updated Mods"));
        assert!(!md.contains("### Notes"));
    }

    #[test]
    fn missing_url_gets_a_warning_line() {
        let target = vec![ModEntry::new("Local Mod", "1.0")];
        let changelog = Changelog::new(diff(&[], &target), "v1", "v2");
        let md = render(&changelog, &ExportContext::new("Pack", "v1", "v2"));
        assert!(md.contains("No mod link available"));
    }

    #[test]
    fn output_is_deterministic() {
        let changelog = sample_changelog();
        let ctx = ExportContext::new("My Pack", "v1.0", "v1.1");
        assert_eq!(render(&changelog, &ctx), render(&changelog, &ctx));
    }
}
