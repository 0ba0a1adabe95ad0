use std::path::Path;

use crate::error::Result;
use crate::ui::Theme;

/// Parse a theme from RON text. Fields missing from the text keep their
/// defaults.
pub fn parse_theme(content: &str) -> Result<Theme> {
    Ok(ron::from_str::<Theme>(content)?)
}

/// Load a theme from a RON file. Logs a warning and returns the default
/// theme if the file cannot be read or parsed.
pub fn load_theme(path: &Path) -> Theme {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}, using default theme", path.display(), e);
            return Theme::default();
        }
    };
    match parse_theme(&content) {
        Ok(theme) => theme,
        Err(e) => {
            log::warn!(
                "failed to parse RON {}: {}, using default theme",
                path.display(),
                e
            );
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuiError;

    #[test]
    fn partial_theme_keeps_defaults() {
        let theme = parse_theme("(scroll_step: 24, scrollbar_thickness: 8)").expect("parse");
        assert_eq!(theme.scroll_step, 24);
        assert_eq!(theme.scrollbar_thickness, 8);
        assert_eq!(theme.min_thumb_length, Theme::default().min_thumb_length);
    }

    #[test]
    fn malformed_theme_is_an_error() {
        let err = parse_theme("(scroll_step: \"many\")").expect_err("type mismatch");
        assert!(matches!(err, GuiError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let theme = load_theme(Path::new("nonexistent/theme.ron"));
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn shipped_theme_parses() {
        let content = std::fs::read_to_string(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/theme.ron"
        ))
        .expect("data/theme.ron ships with the crate");
        let theme = parse_theme(&content).expect("parse");
        assert!(theme.coarse_scroll_multiplier > 1);
    }
}
