use models::{AbsoluteSlot, Container, FlexSlot, LayoutGroup, LayoutNode, Orientation, Slot};

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Bounds {
    fn slot(self, component_name: &str) -> AbsoluteSlot {
        AbsoluteSlot {
            component_name: component_name.to_string(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Fraction of the group's primary axis given to each child, in declared order.
/// Without any positive weight the children share the axis evenly.
fn child_shares(group: &LayoutGroup) -> Vec<f64> {
    let weights: Vec<f64> = group.children.iter().map(LayoutNode::weight).collect();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        return weights.iter().map(|w| w / total).collect();
    }
    let each = 1.0 / weights.len() as f64;
    weights.iter().map(|_| each).collect()
}

/// Places every item of the tree inside `container`, in pixels.
///
/// Each group splits its box along its orientation by child weight; children
/// keep the full cross-axis extent. Groups themselves produce no slot.
pub fn resolve_absolute(root: &LayoutNode, container: Container) -> Vec<AbsoluteSlot> {
    let bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: container.width,
        height: container.height,
    };
    let mut slots = Vec::new();
    match root {
        LayoutNode::Item(item) => slots.push(bounds.slot(&item.component_name)),
        LayoutNode::Group(group) => place_group(group, bounds, &mut slots),
    }
    slots
}

fn place_group(group: &LayoutGroup, bounds: Bounds, slots: &mut Vec<AbsoluteSlot>) {
    let mut offset = 0.0;
    for (child, share) in group.children.iter().zip(child_shares(group)) {
        let child_bounds = match group.orientation {
            Orientation::Horizontal => {
                let width = share * bounds.width;
                let b = Bounds {
                    x: bounds.x + offset,
                    y: bounds.y,
                    width,
                    height: bounds.height,
                };
                offset += width;
                b
            }
            Orientation::Vertical => {
                let height = share * bounds.height;
                let b = Bounds {
                    x: bounds.x,
                    y: bounds.y + offset,
                    width: bounds.width,
                    height,
                };
                offset += height;
                b
            }
        };
        match child {
            LayoutNode::Item(item) => slots.push(child_bounds.slot(&item.component_name)),
            LayoutNode::Group(inner) => place_group(inner, child_bounds, slots),
        }
    }
}

/// Same split as [`resolve_absolute`], expressed as flex-basis percentages
/// relative to the parent group along the parent's axis.
pub fn resolve_proportional(root: &LayoutNode) -> Vec<FlexSlot> {
    let mut slots = Vec::new();
    match root {
        LayoutNode::Item(item) => slots.push(FlexSlot {
            component_name: item.component_name.clone(),
            flex_basis_percent: 100.0,
            axis: Orientation::Horizontal,
        }),
        LayoutNode::Group(group) => flex_group(group, &mut slots),
    }
    slots
}

fn flex_group(group: &LayoutGroup, slots: &mut Vec<FlexSlot>) {
    for (child, share) in group.children.iter().zip(child_shares(group)) {
        match child {
            LayoutNode::Item(item) => slots.push(FlexSlot {
                component_name: item.component_name.clone(),
                flex_basis_percent: share * 100.0,
                axis: group.orientation,
            }),
            LayoutNode::Group(inner) => flex_group(inner, slots),
        }
    }
}

/// Row-major fixed grid, used when the dashboard declares no layout tree.
pub fn resolve_grid(names: &[&str], container: Container, columns: usize) -> Vec<AbsoluteSlot> {
    if names.is_empty() {
        return Vec::new();
    }
    let columns = columns.max(1);
    let rows = names.len().div_ceil(columns);
    let width = container.width / columns as f64;
    let height = container.height / rows as f64;
    names
        .iter()
        .enumerate()
        .map(|(i, name)| AbsoluteSlot {
            component_name: name.to_string(),
            x: (i % columns) as f64 * width,
            y: (i / columns) as f64 * height,
            width,
            height,
        })
        .collect()
}

/// First slot whose component name matches exactly.
pub fn find_slot<'a, S: Slot>(slots: &'a [S], component_name: &str) -> Option<&'a S> {
    slots.iter().find(|s| s.component_name() == component_name)
}
