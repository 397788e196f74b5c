//! HTML for the triage page.
//!
//! Three forms side by side with the preview: rename (folder + name), trash,
//! and append-to-previous. Keyboard shortcuts jump between them:
//!
//! | Keys   | Focus |
//! |--------|-------|
//! | Ctrl+U | folder input |
//! | Ctrl+I | trash button |
//! | Ctrl+O | merge target select |

use crate::output::PageView;
use std::fmt::Write as _;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the index page for the current item.
pub fn render_index(view: &PageView) -> String {
    let mut folders = String::new();
    for folder in &view.folders {
        let f = escape_html(folder);
        let _ = writeln!(folders, r#"            <option value="{f}">{f}</option>"#);
    }

    let mut targets = String::new();
    for target in &view.renamed {
        let t = escape_html(target);
        let _ = writeln!(targets, r#"            <option value="{t}">{t}</option>"#);
    }
    let append_disabled = if view.renamed.is_empty() { " disabled" } else { "" };

    let preview = match (&view.preview_url, &view.preview_error) {
        (Some(url), _) => format!(
            r#"<img src="{}" alt="{}" style="max-height: 50rem; border: 1px solid #ddd">"#,
            escape_html(url),
            escape_html(&view.current)
        ),
        (None, Some(err)) => format!(
            r#"<pre style="color: #a00; white-space: pre-wrap">{}</pre>"#,
            escape_html(err)
        ),
        (None, None) => String::from("<p>No preview available.</p>"),
    };

    let current = escape_html(&view.current);
    let position = view.position;
    let total = view.total;

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Scan Organizer</title>
</head>
<body style="background-color: #eee">
    <div style="display: flex;">
    <div style="flex: none; width: 33%; padding: 2rem">
        <p><strong>{position} / {total}</strong> &middot; <code>{current}</code></p>
        <form action="/rename" method="post">
            <input id="folderInput"
                style="display: block; width: 100%; margin-bottom: 1rem; padding: 0.5rem;"
                name="folder"
                type="text"
                list="folders"
                placeholder="Select or type folder name..."
                autocomplete="off"
                autofocus/>
            <datalist id="folders">
{folders}            </datalist>
            <input style="display: block; width: 100%; margin-bottom: 1rem; padding: 0.5rem;"
                type="text"
                name="newname"
                placeholder="Rename to..."
                required>
            <button type="submit">Rename</button>
        </form>
        <hr>
        <form action="/trash" method="post">
            <button id="trashButton" type="submit">Trash</button>
        </form>
        <hr>
        <form action="/append" method="post">
            <select id="targetSelect" name="target"{append_disabled}>
{targets}            </select>
            <button type="submit"{append_disabled}>Append to selected</button>
        </form>
        <hr>
        <div style="display: flex; gap: 0.5rem">
            <form action="/prev" method="post"><button type="submit">&larr; Prev</button></form>
            <form action="/next" method="post"><button type="submit">Next &rarr;</button></form>
            <form action="/rescan" method="post"><button type="submit">Rescan</button></form>
        </div>
    </div>
    <div style="display: block; background-color: white">
        {preview}
    </div>
    </div>

    <script>
        document.addEventListener('keydown', function(e) {{
            if (e.ctrlKey) {{
                switch(e.key) {{
                    case 'u':
                        e.preventDefault();
                        document.getElementById('folderInput').focus();
                        break;
                    case 'i':
                        e.preventDefault();
                        document.getElementById('trashButton').focus();
                        break;
                    case 'o':
                        e.preventDefault();
                        document.getElementById('targetSelect').focus();
                        break;
                }}
            }}
        }});
    </script>
</body>
</html>
"#
    )
}
