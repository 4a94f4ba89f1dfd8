use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Case-insensitive; anything other than "vertical" is horizontal.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("vertical") {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGroup {
    pub orientation: Orientation,
    pub weight: f64,
    pub children: Vec<LayoutNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub component_name: String,
    pub weight: f64,
}

/// Node of the dashboard layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    Group(LayoutGroup),
    Item(LayoutItem),
}

impl LayoutNode {
    pub fn group(orientation: Orientation, weight: f64, children: Vec<LayoutNode>) -> Self {
        LayoutNode::Group(LayoutGroup {
            orientation,
            weight,
            children,
        })
    }

    pub fn item(component_name: impl Into<String>, weight: f64) -> Self {
        LayoutNode::Item(LayoutItem {
            component_name: component_name.into(),
            weight,
        })
    }

    /// Declared weight with negative and non-finite values read as zero.
    pub fn weight(&self) -> f64 {
        let w = match self {
            LayoutNode::Group(g) => g.weight,
            LayoutNode::Item(i) => i.weight,
        };
        if w.is_finite() && w > 0.0 { w } else { 0.0 }
    }

    /// Component names of every item leaf, depth-first in declared order.
    pub fn component_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_names(self, &mut out);
        out
    }
}

fn collect_names<'a>(node: &'a LayoutNode, out: &mut Vec<&'a str>) {
    match node {
        LayoutNode::Item(item) => out.push(&item.component_name),
        LayoutNode::Group(group) => {
            for child in &group.children {
                collect_names(child, out);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Anything produced by a layout pass that belongs to a named dashboard item.
pub trait Slot {
    fn component_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteSlot {
    pub component_name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexSlot {
    pub component_name: String,
    pub flex_basis_percent: f64,
    pub axis: Orientation,
}

impl Slot for AbsoluteSlot {
    fn component_name(&self) -> &str {
        &self.component_name
    }
}

impl Slot for FlexSlot {
    fn component_name(&self) -> &str {
        &self.component_name
    }
}
