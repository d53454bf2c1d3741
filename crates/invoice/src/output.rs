//! Output artifact naming

use std::path::{Path, PathBuf};

/// Fallback name for a blank invoice id
const FALLBACK_NAME: &str = "invoice";

/// Normalize an invoice id into a safe, lowercase filename stem
///
/// Lowercases everything, maps spaces to '-', maps any character outside
/// `[a-z0-9._-]` to '-', and collapses runs of '-' into one. A blank id
/// becomes "invoice".
pub fn sanitize_filename(id: &str) -> String {
    if id.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    let mut out = String::with_capacity(id.len());
    for c in id.to_lowercase().chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' | '.' | '_' => c,
            _ => '-',
        };
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }

    out
}

/// Path of the output artifact for an invoice id and language code
///
/// The filename is `<sanitized-id>-<lowercase lang>.pdf`; a blank language
/// code means the base language.
pub fn output_path(dir: &Path, id: &str, lang: &str) -> PathBuf {
    let lang = if lang.is_empty() { crate::lang::BASE_LANG } else { lang };
    dir.join(format!(
        "{}-{}.pdf",
        sanitize_filename(id),
        lang.to_lowercase()
    ))
}
