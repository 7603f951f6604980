use crate::core::{config::MapConfig, constants::ATTRIBUTION_CLASS_NAME};

/// Attribution control listing the credits of the base layer
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    attributions: Vec<String>,
    visible: bool,
    collapsible: bool,
    collapsed: bool,
    class_name: String,
}

impl Attribution {
    pub fn new(attributions: Vec<String>) -> Self {
        Self {
            attributions,
            visible: true,
            collapsible: true,
            collapsed: false,
            class_name: ATTRIBUTION_CLASS_NAME.to_string(),
        }
    }

    /// Builds the control for `config` with the credits of the base layer
    pub fn from_config(config: &MapConfig, attributions: Vec<String>) -> Self {
        let mut attribution = Self::new(attributions);
        attribution.apply_config(config);
        attribution
    }

    /// Applies the attribution fields of `config` in place
    pub fn apply_config(&mut self, config: &MapConfig) {
        self.visible = config.attribution;
        self.collapsible = config.attribution_collapsible;
        // a control that cannot collapse is always expanded
        self.collapsed = config.attribution_collapsible && config.attribution_collapsed;
    }

    pub fn attributions(&self) -> &[String] {
        &self.attributions
    }

    pub fn set_attributions(&mut self, attributions: Vec<String>) {
        self.attributions = attributions;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Flips between collapsed and expanded; ignored when not collapsible
    pub fn toggle(&mut self) -> bool {
        if self.collapsible {
            self.collapsed = !self.collapsed;
        }
        self.collapsed
    }

    /// Credits joined for display, empty when hidden
    pub fn text(&self) -> String {
        if !self.visible {
            return String::new();
        }
        self.attributions.join(" | ")
    }
}
