//! POSIX shell quoting for rendered script lines.

use std::path::Path;

/// Characters that require quoting in POSIX shells.
const SHELL_SPECIAL_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', // Whitespace
    '\'', '"', '`', // Quotes and backticks
    '$', '!', '&', '|', // Variable expansion and control operators
    ';', '(', ')', '{', '}', '[', ']', // Grouping and subshell
    '<', '>', // Redirection
    '*', '?', // Glob patterns
    '\\', '#', '~', '^', // Escape, comments, home, history
];

fn needs_quoting(word: &str) -> bool {
    word.is_empty() || word.chars().any(|c| SHELL_SPECIAL_CHARS.contains(&c))
}

/// Quote a single shell word.
///
/// Words without special characters are returned unchanged. Everything else
/// is wrapped in single quotes, with embedded single quotes written as `'\''`.
pub fn quote(word: &str) -> String {
    if !needs_quoting(word) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', "'\\''"))
}

/// Quote a path, leaving a leading `~/` unquoted so the shell expands it.
pub fn quote_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if text == "~" {
        return text.into_owned();
    }
    match text.strip_prefix("~/") {
        Some("") => "~/".to_string(),
        Some(rest) => format!("~/{}", quote(rest)),
        None => quote(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words_unquoted() {
        assert_eq!(quote("vim"), "vim");
        assert_eq!(quote("demo:1.0"), "demo:1.0");
        assert_eq!(quote("/usr/local/src"), "/usr/local/src");
    }

    #[test]
    fn test_special_words_quoted() {
        assert_eq!(quote("npm start"), "'npm start'");
        assert_eq!(quote("#[fg=green]"), "'#[fg=green]'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_embedded_single_quote() {
        assert_eq!(quote("echo 'hi'"), "'echo '\\''hi'\\'''");
    }

    #[test]
    fn test_home_paths_stay_expandable() {
        assert_eq!(quote_path(Path::new("~")), "~");
        assert_eq!(quote_path(Path::new("~/")), "~/");
        assert_eq!(quote_path(Path::new("~/src/blog")), "~/src/blog");
        assert_eq!(quote_path(Path::new("~/My Code")), "~/'My Code'");
        assert_eq!(quote_path(Path::new("/tmp/a b")), "'/tmp/a b'");
    }
}
