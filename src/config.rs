//! Which panels and controls a page instance shows.
//!
//! The page grew in three steps: a static panel with colors and border
//! style, then rotation/shape toggles and the stretch panel, then the boing,
//! prism and fine-grain panels. [`PageConfig::full`] is the canonical page;
//! the other presets reproduce the earlier subsets.

use serde::Deserialize;

use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct PageConfig {
    /// "spin" button rotating the static layer.
    pub rotation: bool,
    /// squares / circles toggle.
    pub shape_toggle: bool,
    /// Concentric pattern with the rubber-stretch drag.
    pub stretch_panel: bool,
    /// Concentric pattern whose depth boings on drag.
    pub boing_panel: bool,
    /// Isometric prism with the rubber-stretch drag.
    pub prism_panel: bool,
    /// Large fine-grain static with the depth-boing tint.
    pub fine_grain_panel: bool,
}

impl PageConfig {
    pub const fn basic() -> Self {
        Self {
            rotation: false,
            shape_toggle: false,
            stretch_panel: false,
            boing_panel: false,
            prism_panel: false,
            fine_grain_panel: false,
        }
    }

    pub const fn intermediate() -> Self {
        Self {
            rotation: true,
            shape_toggle: true,
            stretch_panel: true,
            ..Self::basic()
        }
    }

    pub const fn full() -> Self {
        Self {
            rotation: true,
            shape_toggle: true,
            stretch_panel: true,
            boing_panel: true,
            prism_panel: true,
            fine_grain_panel: true,
        }
    }

    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::default()
    }

    /// Parse the JSON form; absent fields keep their full-preset values and
    /// an empty or whitespace-only string means the full preset.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::full());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Named preset: `basic`, `intermediate` or `full`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::basic()),
            "intermediate" => Some(Self::intermediate()),
            "full" => Some(Self::full()),
            _ => None,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::full()
    }
}

/// Builder starting from [`PageConfig::basic`].
#[derive(Clone, Debug)]
pub struct PageConfigBuilder {
    config: PageConfig,
}

impl Default for PageConfigBuilder {
    fn default() -> Self {
        Self {
            config: PageConfig::basic(),
        }
    }
}

impl PageConfigBuilder {
    pub fn from_preset(config: PageConfig) -> Self {
        Self { config }
    }

    pub fn rotation(mut self, on: bool) -> Self {
        self.config.rotation = on;
        self
    }

    pub fn shape_toggle(mut self, on: bool) -> Self {
        self.config.shape_toggle = on;
        self
    }

    pub fn stretch_panel(mut self, on: bool) -> Self {
        self.config.stretch_panel = on;
        self
    }

    pub fn boing_panel(mut self, on: bool) -> Self {
        self.config.boing_panel = on;
        self
    }

    pub fn prism_panel(mut self, on: bool) -> Self {
        self.config.prism_panel = on;
        self
    }

    pub fn fine_grain_panel(mut self, on: bool) -> Self {
        self.config.fine_grain_panel = on;
        self
    }

    pub fn build(self) -> PageConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn presets_are_nested() {
        let basic = PageConfig::basic();
        let mid = PageConfig::intermediate();
        let full = PageConfig::full();
        assert!(!basic.rotation && !basic.stretch_panel);
        assert!(mid.rotation && mid.shape_toggle && mid.stretch_panel);
        assert!(!mid.boing_panel && !mid.prism_panel && !mid.fine_grain_panel);
        assert_eq!(PageConfig::default(), full);
    }

    #[test]
    fn builder_toggles_individual_flags() {
        let config = PageConfig::builder().boing_panel(true).rotation(true).build();
        assert_eq!(
            config,
            PageConfig {
                rotation: true,
                boing_panel: true,
                ..PageConfig::basic()
            }
        );
        let trimmed = PageConfigBuilder::from_preset(PageConfig::full())
            .prism_panel(false)
            .build();
        assert!(!trimmed.prism_panel && trimmed.fine_grain_panel);
    }

    #[test]
    fn json_defaults_to_full() {
        assert_eq!(PageConfig::from_json("").unwrap(), PageConfig::full());
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::full());
        let config = PageConfig::from_json(r#"{"prism_panel": false}"#).unwrap();
        assert_eq!(
            config,
            PageConfig {
                prism_panel: false,
                ..PageConfig::full()
            }
        );
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let err = PageConfig::from_json(r#"{"lasers": true}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("invalid page config"));
    }

    #[test]
    fn named_presets() {
        assert_eq!(PageConfig::preset("basic"), Some(PageConfig::basic()));
        assert_eq!(PageConfig::preset("intermediate"), Some(PageConfig::intermediate()));
        assert_eq!(PageConfig::preset("deluxe"), None);
    }
}
