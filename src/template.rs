//! Template for new project files.
//!
//! New projects start from `default.toml` when the user has one, otherwise
//! from the built-in [`SAMPLE`]. The only substitution is `{name}`.
//!
//! # Example
//!
//! ```
//! use tmuxup::template::fill;
//!
//! assert_eq!(fill("name = \"{name}\"", "blog"), "name = \"blog\"");
//! ```

/// Built-in project template.
pub const SAMPLE: &str = include_str!("../assets/sample.toml");

/// Replace `{name}` placeholders with the project name.
///
/// # Examples
///
/// ```
/// use tmuxup::template::fill;
///
/// let result = fill("# {name}\nname = \"{name}\"", "api");
/// assert_eq!(result, "# api\nname = \"api\"");
/// ```
pub fn fill(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader, normalize};

    #[test]
    fn test_fill() {
        assert_eq!(fill("cd ~/{name}", "blog"), "cd ~/blog");
        assert_eq!(fill("no placeholders", "blog"), "no placeholders");
    }

    #[test]
    fn test_sample_loads_cleanly() {
        let document: toml::Table = toml::from_str(&fill(SAMPLE, "sample")).unwrap();
        let normalized = normalize::normalize(&document).unwrap();
        assert!(normalized.deprecations.is_empty());

        let spec = loader::load(&normalized.document, &[]).unwrap();
        assert_eq!(spec.name(), "sample");
        assert!(!spec.windows().is_empty());
    }
}
