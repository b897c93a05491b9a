//! export::discord
//!
//! Discord-flavored Markdown changelog.
//!
//! Discord renders a subset of Markdown and collapses long posts, so
//! this format trades the full document structure for bold headers and
//! one line per mod with the note inlined after a dash.

use crate::core::changelog::Changelog;
use crate::core::types::ModEntry;

use super::ExportContext;

/// Render a changelog as Discord-friendly Markdown.
pub fn render(changelog: &Changelog, ctx: &ExportContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("**{} - Changelog**\n\n", ctx.project_name));
    out.push_str(&format!("**{} → {}**\n\n", ctx.base_label, ctx.target_label));

    if !changelog.overall_notes.trim().is_empty() {
        out.push_str(&format!("**Notes**\n{}\n\n", changelog.overall_notes));
    }

    out.push_str("**Summary**\n");
    out.push_str(&format!("- Added: {} mods\n", changelog.diff.added.len()));
    out.push_str(&format!("- Removed: {} mods\n", changelog.diff.removed.len()));
    out.push_str(&format!("- Updated: {} mods\n\n", changelog.diff.updated.len()));

    if !changelog.diff.added.is_empty() {
        out.push_str("**Added Mods**\n");
        for entry in &changelog.diff.added {
            out.push_str(&format!(
                "- **{}** ({}){}\n",
                linked_name(entry),
                entry.version,
                inline_note(changelog, &entry.name)
            ));
        }
        out.push('\n');
    }

    if !changelog.diff.removed.is_empty() {
        out.push_str("**Removed Mods**\n");
        for entry in &changelog.diff.removed {
            out.push_str(&format!(
                "- **{}** ({}){}\n",
                linked_name(entry),
                entry.version,
                inline_note(changelog, &entry.name)
            ));
        }
        out.push('\n');
    }

    if !changelog.diff.updated.is_empty() {
        out.push_str("**Updated Mods**\n");
        for update in &changelog.diff.updated {
            out.push_str(&format!(
                "- **{}**: {} → {}{}\n",
                linked_name(&update.entry),
                update.old_version,
                update.new_version,
                inline_note(changelog, &update.name)
            ));
        }
        out.push('\n');
    }

    out
}

fn linked_name(entry: &ModEntry) -> String {
    match entry.url.as_deref() {
        Some(url) => format!("[{}]({})", entry.name, url),
        None => entry.name.clone(),
    }
}

fn inline_note(changelog: &Changelog, name: &str) -> String {
    match changelog.note(name) {
        Some(note) => format!(" - {}", note),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diff::diff;
    use crate::core::types::ModEntry;

    #[test]
    fn one_line_per_mod_with_inline_note() {
        let base = vec![ModEntry::new("JEI", "10.0.0")];
        let target = vec![
            ModEntry::new("JEI", "11.0.0"),
            ModEntry::new("Sodium", "0.5.8").with_url("https://modrinth.com/mod/sodium"),
        ];
        let mut changelog = Changelog::new(diff(&base, &target), "v1.0", "v1.1");
        changelog.set_note("Sodium", "new renderer");

        let text = render(&changelog, &ExportContext::new("Pack", "v1.0", "v1.1"));
        assert!(text.starts_with("**Pack - Changelog**\n"));
        assert!(text.contains("**v1.0 → v1.1**"));
        assert!(
            text.contains("- **[Sodium](https://modrinth.com/mod/sodium)** (0.5.8) - new renderer\n")
        );
        assert!(text.contains("- **JEI**: 10.0.0 → 11.0.0\n"));
    }

    #[test]
    fn empty_diff_keeps_only_header_and_summary() {
        let changelog = Changelog::new(diff(&[], &[]), "v1", "v1");
        let text = render(&changelog, &ExportContext::new("Pack", "v1", "v1"));
        assert!(text.contains("- Added: 0 mods"));
        assert!(!text.contains("**Added Mods**"));
        assert!(!text.contains("**Notes**"));
    }
}
