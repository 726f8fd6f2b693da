//! Preparation of script source text before it is handed to the engine.

use std::path::Path;

pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Text placed before the script body, turning it into a function expression taking the module locals.
pub const PREFIX: &str = "(function (require, define, __filename, __dirname) { ";

pub const SUFFIX: &str = "\n});";

pub fn strip_byte_order_mark(source: &str) -> &str {
    source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source)
}

/// Wraps a script body in the module function template, removing any leading byte order mark first.
pub fn wrap(source: &str) -> String {
    let body = strip_byte_order_mark(source);
    let mut wrapped = String::with_capacity(PREFIX.len() + body.len() + SUFFIX.len());
    wrapped.push_str(PREFIX);
    wrapped.push_str(body);
    wrapped.push_str(SUFFIX);
    wrapped
}

/// Computes the file name reported to the engine for a script.
///
/// Embedding renderers identify scripts by URI, so in that case the drive letter is uppercased, backslashes become
/// forward slashes, and a `file:///` prefix is added.
pub fn script_filename(path: &Path, embedded_renderer: bool) -> String {
    let path = path.to_string_lossy();
    if !embedded_renderer {
        return path.into_owned();
    }

    let mut filename = String::with_capacity(path.len() + 8);
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            filename.push(drive.to_ascii_uppercase());
            filename.push(':');
            filename.push_str(chars.as_str());
        }
        _ => filename.push_str(&path),
    }

    let filename = filename.replace('\\', "/");
    format!("file:///{}", filename.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use crate::source;
    use std::path::Path;

    #[test]
    fn wrapping_matches_template() {
        assert_eq!(
            source::wrap("console.log(1)"),
            "(function (require, define, __filename, __dirname) { console.log(1)\n});"
        );
    }

    #[test]
    fn byte_order_mark_does_not_change_wrapped_output() {
        assert_eq!(source::wrap("\u{FEFF}console.log(1)"), source::wrap("console.log(1)"));
    }

    #[test]
    fn only_leading_byte_order_mark_is_removed() {
        assert_eq!(source::strip_byte_order_mark("a\u{FEFF}"), "a\u{FEFF}");
    }

    #[test]
    fn renderer_filename_uses_uppercase_drive_and_forward_slashes() {
        assert_eq!(
            source::script_filename(Path::new(r"c:\work\app\main.js"), true),
            "file:///C:/work/app/main.js"
        );
        assert_eq!(source::script_filename(Path::new("/work/main.js"), true), "file:///work/main.js");
        assert_eq!(source::script_filename(Path::new("/work/main.js"), false), "/work/main.js");
    }
}
