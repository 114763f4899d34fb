//! Color palette and utility-class stylesheet.
//!
//! The palette is static configuration consumed by every page. `content`
//! lists the files a utility-class generator would scan; the console only
//! validates and reports those globs.

use serde::{Deserialize, Serialize};

/// Named colors available to every page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#3b82f6".to_string(),
            success: "#22c55e".to_string(),
            warning: "#f59e0b".to_string(),
            error: "#ef4444".to_string(),
            info: "#06b6d4".to_string(),
        }
    }
}

impl Palette {
    /// `(name, color)` pairs in declaration order.
    pub fn colors(&self) -> [(&'static str, &str); 5] {
        [
            ("primary", self.primary.as_str()),
            ("success", self.success.as_str()),
            ("warning", self.warning.as_str()),
            ("error", self.error.as_str()),
            ("info", self.info.as_str()),
        ]
    }

    /// Look up a color by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.colors()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
    }
}

/// Styling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub palette: Palette,
    /// Globs of files that reference utility classes.
    pub content: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            content: vec![
                "templates/**/*.html".to_string(),
                "src/ui/**/*.rs".to_string(),
            ],
        }
    }
}

impl ThemeConfig {
    /// CSS custom properties plus `text-*`, `bg-*` and `border-*` classes.
    pub fn stylesheet(&self) -> String {
        let colors = self.palette.colors();
        let mut css = String::from(":root {\n");
        for (name, color) in colors {
            css.push_str(&format!("  --color-{name}: {color};\n"));
        }
        css.push_str("}\n");

        for (name, _) in colors {
            css.push_str(&format!(
                ".text-{name} {{ color: var(--color-{name}); }}\n\
                 .bg-{name} {{ background-color: var(--color-{name}); }}\n\
                 .border-{name} {{ border-color: var(--color-{name}); }}\n"
            ));
        }
        css
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_names() {
        let palette = Palette::default();
        let names: Vec<_> = palette.colors().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["primary", "success", "warning", "error", "info"]);
        assert_eq!(palette.get("error"), Some("#ef4444"));
        assert_eq!(palette.get("accent"), None);
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("fff"));
        assert!(!is_hex_color("#ffff"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn test_stylesheet() {
        let mut theme = ThemeConfig::default();
        theme.palette.primary = "#123456".into();
        let css = theme.stylesheet();

        assert!(css.starts_with(":root {"));
        assert!(css.contains("--color-primary: #123456;"));
        assert!(css.contains(".bg-warning { background-color: var(--color-warning); }"));
        assert!(css.contains(".border-info { border-color: var(--color-info); }"));
        assert_eq!(css.matches(".text-").count(), 5);
    }
}
