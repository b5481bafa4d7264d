//! Editor settings, loadable from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wf_core::Size;

use crate::{ProjectError, ProjectResult};

/// Tunables of the designer. Every field has a default, so a YAML file only
/// needs the keys it overrides.
///
/// ```yaml
/// history_capacity: 100
/// zoom_step: 1.25
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept for undo/redo.
    pub history_capacity: usize,
    /// Offset applied to a pasted node, in canvas units.
    pub paste_offset: (f64, f64),
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Padding around the nodes' bounds on fit-view.
    pub fit_padding: f64,
    /// Assumed size of nodes the renderer has not measured yet.
    pub default_node_size: Size,
    /// Name of the local save slot.
    pub slot_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            paste_offset: (50.0, 50.0),
            zoom_step: 1.2,
            min_zoom: 0.2,
            max_zoom: 4.0,
            fit_padding: 50.0,
            default_node_size: Size::new(150.0, 40.0),
            slot_name: "workflow-designer".to_string(),
        }
    }
}

impl EditorConfig {
    /// Reject settings the editor cannot run with.
    pub fn validate(&self) -> ProjectResult<()> {
        let invalid = |reason: String| Err(ProjectError::InvalidConfig { reason });

        if self.history_capacity == 0 {
            return invalid("history_capacity must be at least 1".to_string());
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return invalid(format!("zoom_step must be above 1, got {}", self.zoom_step));
        }
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite() && self.min_zoom > 0.0) {
            return invalid(format!(
                "zoom limits must be finite and positive, got {}..{}",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.min_zoom > self.max_zoom {
            return invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            ));
        }
        if !(self.fit_padding.is_finite() && self.fit_padding >= 0.0) {
            return invalid(format!("fit_padding must be >= 0, got {}", self.fit_padding));
        }
        let (dx, dy) = self.paste_offset;
        let size = self.default_node_size;
        if !(dx.is_finite() && dy.is_finite() && size.width.is_finite() && size.height.is_finite())
        {
            return invalid("paste_offset and default_node_size must be finite".to_string());
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> ProjectResult<EditorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EditorConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: EditorConfig = serde_yaml::from_str("history_capacity: 10\n").unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.slot_name, "workflow-designer");
        assert_eq!(config.default_node_size, Size::new(150.0, 40.0));
    }

    #[test]
    fn defaults_are_valid() {
        EditorConfig::default().validate().unwrap();
    }

    #[test]
    fn crossed_zoom_limits_rejected() {
        let config: EditorConfig =
            serde_yaml::from_str("min_zoom: 4.0\nmax_zoom: 0.2\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ProjectError::InvalidConfig { .. })
        ));

        let path = std::env::temp_dir().join("wf_project_config_crossed.yaml");
        std::fs::write(&path, "min_zoom: 4.0\nmax_zoom: 0.2\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ProjectError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn degenerate_values_rejected() {
        for config in [
            EditorConfig { history_capacity: 0, ..EditorConfig::default() },
            EditorConfig { zoom_step: 0.0, ..EditorConfig::default() },
            EditorConfig { max_zoom: f64::NAN, ..EditorConfig::default() },
            EditorConfig { min_zoom: -1.0, ..EditorConfig::default() },
        ] {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join("wf_project_config.yaml");
        std::fs::write(&path, "zoom_step: 1.5\nslot_name: scratch\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.zoom_step, 1.5);
        assert_eq!(config.slot_name, "scratch");
    }
}
