//! export::html
//!
//! Standalone HTML changelog page.
//!
//! One self-contained document: inline stylesheet, no external assets,
//! no scripts. Groups are color-coded with a left-border class per
//! section (green added, red removed, blue updated). All user-supplied
//! text passes through [`escape`] before interpolation.

use crate::core::changelog::Changelog;
use crate::core::types::ModEntry;

use super::ExportContext;

const STYLE: &str = "\
    body { font-family: sans-serif; line-height: 1.6; color: #333; \
max-width: 900px; margin: 0 auto; padding: 20px; }\n\
    h1 { border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }\n\
    .summary { display: flex; gap: 15px; margin: 20px 0; }\n\
    .summary .stat { flex: 1; padding: 12px; border-radius: 6px; \
color: white; text-align: center; }\n\
    .stat.added { background-color: #28a745; }\n\
    .stat.removed { background-color: #dc3545; }\n\
    .stat.updated { background-color: #007bff; }\n\
    .notes { background-color: #f8f9fa; padding: 15px; \
border-left: 4px solid #6c757d; margin: 20px 0; }\n\
    .mod { padding: 10px 15px; margin: 10px 0; background-color: #f8f9fa; }\n\
    .mod.added { border-left: 4px solid #28a745; }\n\
    .mod.removed { border-left: 4px solid #dc3545; }\n\
    .mod.updated { border-left: 4px solid #007bff; }\n\
    .mod .name { font-weight: 600; }\n\
    .mod .meta { color: #6c757d; font-size: 0.9rem; }\n";

/// Render a changelog as a standalone HTML document.
pub fn render(changelog: &Changelog, ctx: &ExportContext) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str(&format!(
        "<title>{} - Changelog</title>\n",
        escape(&ctx.project_name)
    ));
    out.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));

    out.push_str(&format!(
        "<h1>{} - Changelog</h1>\n<h2>{} → {}</h2>\n",
        escape(&ctx.project_name),
        escape(&ctx.base_label),
        escape(&ctx.target_label)
    ));

    out.push_str("<div class=\"summary\">\n");
    out.push_str(&format!(
        "<div class=\"stat added\"><strong>{}</strong> added</div>\n",
        changelog.diff.added.len()
    ));
    out.push_str(&format!(
        "<div class=\"stat removed\"><strong>{}</strong> removed</div>\n",
        changelog.diff.removed.len()
    ));
    out.push_str(&format!(
        "<div class=\"stat updated\"><strong>{}</strong> updated</div>\n",
        changelog.diff.updated.len()
    ));
    out.push_str("</div>\n");

    if !changelog.overall_notes.trim().is_empty() {
        out.push_str(&format!(
            "<div class=\"notes\"><h3>Notes</h3><p>{}</p></div>\n",
            escape(&changelog.overall_notes)
        ));
    }

    if !changelog.diff.added.is_empty() {
        out.push_str("<h2>Added Mods</h2>\n");
        for entry in &changelog.diff.added {
            push_mod(&mut out, changelog, entry, "added", &entry.version);
        }
    }

    if !changelog.diff.removed.is_empty() {
        out.push_str("<h2>Removed Mods</h2>\n");
        for entry in &changelog.diff.removed {
            push_mod(&mut out, changelog, entry, "removed", &entry.version);
        }
    }

    if !changelog.diff.updated.is_empty() {
        out.push_str("<h2>Updated Mods</h2>\n");
        for update in &changelog.diff.updated {
            let versions = format!("{} → {}", update.old_version, update.new_version);
            push_mod(&mut out, changelog, &update.entry, "updated", &versions);
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn push_mod(out: &mut String, changelog: &Changelog, entry: &ModEntry, class: &str, version: &str) {
    out.push_str(&format!("<div class=\"mod {class}\">\n"));
    match entry.url.as_deref() {
        Some(url) => out.push_str(&format!(
            "<span class=\"name\"><a href=\"{}\">{}</a></span>",
            escape(url),
            escape(&entry.name)
        )),
        None => out.push_str(&format!(
            "<span class=\"name\">{}</span>",
            escape(&entry.name)
        )),
    }
    out.push_str(&format!(" <span class=\"meta\">{}</span>\n", escape(version)));

    if !entry.authors.is_empty() {
        out.push_str(&format!(
            "<div class=\"meta\">Authors: {}</div>\n",
            escape(&entry.authors.join(", "))
        ));
    }
    if let Some(note) = changelog.note(&entry.name) {
        out.push_str(&format!(
            "<p><strong>Change Notes:</strong> {}</p>\n",
            escape(note)
        ));
    }
    out.push_str("</div>\n");
}

/// HTML-escape the five significant characters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
