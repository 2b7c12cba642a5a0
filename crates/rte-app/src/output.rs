//! Rendering and writing the document for `--output` / stdout.

use std::io;
use std::path::Path;

/// Render editor HTML in the requested output format.
pub fn render(html: &str, markdown: bool) -> String {
    if markdown {
        rte_core::to_markdown(&rte_core::from_html(html))
    } else {
        html.to_string()
    }
}

/// Replace `path` with `contents`, going through a sibling temp file so a
/// reader never sees a half-written document.
pub fn write_document(path: &Path, contents: &str) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}
