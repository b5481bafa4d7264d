//! Directed connections between workflow nodes.

use serde::{Deserialize, Serialize};
use wf_core::{EdgeId, NodeId};

/// Line shape used by the canvas renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineShape {
    Default,
    Straight,
    Step,
    #[default]
    SmoothStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(rename = "stroke", default = "default_color")]
    pub color: String,
    #[serde(rename = "strokeWidth", default = "default_width")]
    pub width: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: default_color(),
            width: default_width(),
        }
    }
}

fn default_color() -> String {
    "#409EFF".to_string()
}

fn default_width() -> f64 {
    2.0
}

/// Render style of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    #[serde(rename = "type", default)]
    pub shape: LineShape,
    #[serde(default = "default_animated")]
    pub animated: bool,
    #[serde(rename = "style", default)]
    pub stroke: Stroke,
}

fn default_animated() -> bool {
    true
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            shape: LineShape::default(),
            animated: default_animated(),
            stroke: Stroke::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Guard expression evaluated by the workflow engine.
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub description: String,
}

/// An edge. Endpoints are not checked against the node set here; see
/// [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub style: EdgeStyle,
    #[serde(default)]
    pub data: EdgeData,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            label: String::new(),
            style: EdgeStyle::default(),
            data: EdgeData::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        self.source == *node || self.target == *node
    }

    /// Shallow merge of an edge-editor patch.
    pub fn patched(&self, patch: &EdgePatch) -> Edge {
        let mut edge = self.clone();
        if let Some(label) = &patch.label {
            edge.label = label.clone();
        }
        if let Some(condition) = &patch.condition {
            edge.data.condition = condition.clone();
        }
        if let Some(description) = &patch.description {
            edge.data.description = description.clone();
        }
        if let Some(shape) = patch.shape {
            edge.style.shape = shape;
        }
        if let Some(animated) = patch.animated {
            edge.style.animated = animated;
        }
        if let Some(color) = &patch.color {
            edge.style.stroke.color = color.clone();
        }
        if let Some(width) = patch.width {
            edge.style.stroke.width = width;
        }
        edge
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub label: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub shape: Option<LineShape>,
    pub animated: Option<bool>,
    pub color: Option<String>,
    pub width: Option<f64>,
}
