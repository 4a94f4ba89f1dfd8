use std::collections::HashSet;
use std::fs;
use std::path::Path;

use models::{DashboardConfig, ItemConfig, ItemKind, LayoutNode, Orientation, SeriesType};
use roxmltree::Node;

use crate::error::{ConfigError, Result};

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| n.has_tag_name(name))
}

fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Missing or non-numeric weights read as zero.
fn weight(node: Node) -> f64 {
    node.attribute("Weight")
        .and_then(|w| w.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Parses a dashboard XML document into a typed configuration.
///
/// The document must have a `<Dashboard>` root. `Items` and `LayoutTree` are
/// optional: without them the configuration has no items or no layout tree.
pub fn parse_dashboard(xml: &str) -> Result<DashboardConfig> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    if !root.has_tag_name("Dashboard") {
        return Err(ConfigError::UnexpectedRoot {
            expected: "Dashboard",
            found: root.tag_name().name().to_string(),
        });
    }

    let title = child(root, "Title").and_then(|t| attr(t, "Text"));
    let items = child(root, "Items").map(parse_items).unwrap_or_default();
    let layout = child(root, "LayoutTree")
        .and_then(|tree| tree.children().find(|n| n.is_element()))
        .and_then(parse_layout_node);

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.component_name.as_str()) {
            tracing::warn!(
                component = %item.component_name,
                "duplicate component name, only the first item will be used"
            );
        }
    }

    Ok(DashboardConfig {
        title,
        items,
        layout,
    })
}

/// Loads and parses a dashboard XML file
pub fn load_dashboard<P: AsRef<Path>>(path: P) -> Result<DashboardConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_dashboard(&raw)?;
    tracing::info!(
        items = config.items.len(),
        has_layout = config.layout.is_some(),
        path = %path.display(),
        "loaded dashboard configuration"
    );
    Ok(config)
}

fn parse_items(items: Node) -> Vec<ItemConfig> {
    items
        .children()
        .filter(|n| n.is_element())
        .filter_map(|node| {
            let tag = node.tag_name().name();
            let Some(kind) = ItemKind::from_element(tag) else {
                tracing::debug!(element = tag, "skipping unsupported dashboard item");
                return None;
            };
            let Some(component_name) = attr(node, "ComponentName") else {
                tracing::warn!(element = tag, "dashboard item without ComponentName skipped");
                return None;
            };
            Some(parse_item(node, kind, component_name))
        })
        .collect()
}

fn parse_item(node: Node, kind: ItemKind, component_name: String) -> ItemConfig {
    let name = attr(node, "Name").unwrap_or_else(|| component_name.clone());
    let rotated = node
        .attribute("Rotated")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    let argument_title = child(node, "AxisX").and_then(|a| attr(a, "Title"));
    let value_title = descendant(node, "AxisY").and_then(|a| attr(a, "Title"));
    let data_member = child(node, "DataItems")
        .and_then(|d| child(d, "Dimension"))
        .and_then(|d| attr(d, "DataMember"));

    let declared = descendant(node, "Simple").map(|s| attr(s, "SeriesType"));
    let series_type = match kind {
        ItemKind::Chart => Some(
            declared
                .flatten()
                .map(|t| SeriesType::from_token(&t))
                .unwrap_or_default(),
        ),
        ItemKind::Pie => Some(match attr(node, "PieType") {
            Some(t) if SeriesType::from_token(&t) == SeriesType::Doughnut => SeriesType::Doughnut,
            _ => SeriesType::Pie,
        }),
        ItemKind::Pivot => None,
    };

    ItemConfig {
        component_name,
        name,
        kind,
        rotated,
        argument_title,
        value_title,
        series_type,
        data_member,
    }
}

fn parse_layout_node(node: Node) -> Option<LayoutNode> {
    match node.tag_name().name() {
        "LayoutGroup" => {
            let orientation = node
                .attribute("Orientation")
                .map(Orientation::from_token)
                .unwrap_or_default();
            let children: Vec<LayoutNode> = node
                .children()
                .filter(|n| n.is_element())
                .filter_map(parse_layout_node)
                .collect();
            if !children.is_empty() && children.iter().all(|c| c.weight() <= 0.0) {
                tracing::debug!(
                    children = children.len(),
                    "layout group has no positive weight, children will share it evenly"
                );
            }
            Some(LayoutNode::group(orientation, weight(node), children))
        }
        "LayoutItem" => match attr(node, "DashboardItem") {
            Some(name) => Some(LayoutNode::item(name, weight(node))),
            None => {
                tracing::warn!("layout item without DashboardItem skipped");
                None
            }
        },
        other => {
            tracing::debug!(element = other, "ignoring unknown layout element");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::LayoutGroup;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Dashboard>
  <Title Text="Finance Overview" />
  <Items>
    <Chart ComponentName="chartGlCode" Name="Amount by GL Code" Rotated="true">
      <DataItems>
        <Dimension DataMember="GlCode" UniqueName="DataItem0" />
        <Measure DataMember="Amount" UniqueName="DataItem1" />
      </DataItems>
      <Panes>
        <Pane Name="Pane 1">
          <AxisY Title="Amount" />
          <Series>
            <Simple SeriesType="Line">
              <Value UniqueName="DataItem1" />
            </Simple>
          </Series>
        </Pane>
      </Panes>
      <AxisX Title="GL Code" />
    </Chart>
    <Pie ComponentName="pieCompGroup" Name="By Company Group" PieType="Donut">
      <DataItems>
        <Dimension DataMember="CompGroupId" UniqueName="DataItem0" />
      </DataItems>
    </Pie>
    <Pivot ComponentName="pivotRaw" Name="Details" />
    <Chart Name="No component" />
    <Gauge ComponentName="gauge1" />
    <Chart ComponentName="chartMonthly">
      <Panes><Pane><Series><Simple /></Series></Pane></Panes>
    </Chart>
  </Items>
  <LayoutTree>
    <LayoutGroup Orientation="Vertical" Weight="100">
      <LayoutGroup Weight="60">
        <LayoutItem DashboardItem="chartGlCode" Weight="30" />
        <LayoutItem DashboardItem="pieCompGroup" Weight="70" />
      </LayoutGroup>
      <LayoutItem DashboardItem="pivotRaw" Weight="40" />
      <LayoutItem Weight="10" />
    </LayoutGroup>
  </LayoutTree>
</Dashboard>"#;

    #[test]
    fn test_parse_items_in_document_order() {
        let config = parse_dashboard(SAMPLE).unwrap();
        assert_eq!(config.title.as_deref(), Some("Finance Overview"));
        let names: Vec<&str> = config
            .items
            .iter()
            .map(|i| i.component_name.as_str())
            .collect();
        assert_eq!(names, vec!["chartGlCode", "pieCompGroup", "pivotRaw", "chartMonthly"]);
    }

    #[test]
    fn test_parse_chart_metadata() {
        let config = parse_dashboard(SAMPLE).unwrap();
        let chart = config.item("chartGlCode").unwrap();
        assert_eq!(chart.kind, ItemKind::Chart);
        assert_eq!(chart.name, "Amount by GL Code");
        assert!(chart.rotated);
        assert_eq!(chart.argument_title.as_deref(), Some("GL Code"));
        assert_eq!(chart.value_title.as_deref(), Some("Amount"));
        assert_eq!(chart.series_type, Some(SeriesType::Line));
        assert_eq!(chart.data_member.as_deref(), Some("GlCode"));
    }

    #[test]
    fn test_series_type_defaults() {
        let config = parse_dashboard(SAMPLE).unwrap();
        let monthly = config.item("chartMonthly").unwrap();
        assert_eq!(monthly.series_type, Some(SeriesType::Bar));
        assert_eq!(monthly.name, "chartMonthly");
        assert!(!monthly.rotated);
        assert_eq!(
            config.item("pieCompGroup").unwrap().series_type,
            Some(SeriesType::Doughnut)
        );
        assert_eq!(config.item("pivotRaw").unwrap().series_type, None);
    }

    #[test]
    fn test_parse_layout_tree() {
        let config = parse_dashboard(SAMPLE).unwrap();
        let Some(LayoutNode::Group(root)) = config.layout else {
            panic!("expected a layout group at the root");
        };
        assert_eq!(root.orientation, Orientation::Vertical);
        assert_eq!(root.weight, 100.0);
        // The weightless, nameless item is dropped.
        assert_eq!(root.children.len(), 2);

        let LayoutNode::Group(LayoutGroup {
            orientation,
            weight,
            children,
        }) = &root.children[0]
        else {
            panic!("expected nested group");
        };
        assert_eq!(*orientation, Orientation::Horizontal);
        assert_eq!(*weight, 60.0);
        assert_eq!(children[1], LayoutNode::item("pieCompGroup", 70.0));
        assert_eq!(root.children[1], LayoutNode::item("pivotRaw", 40.0));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let config = parse_dashboard("<Dashboard />").unwrap();
        assert!(config.items.is_empty());
        assert!(config.layout.is_none());
        assert!(config.title.is_none());
    }

    #[test]
    fn test_layout_weight_and_orientation_fallbacks() {
        let xml = r#"<Dashboard><LayoutTree>
            <LayoutGroup Orientation="sideways">
              <LayoutItem DashboardItem="a" Weight="abc" />
            </LayoutGroup>
        </LayoutTree></Dashboard>"#;
        let config = parse_dashboard(xml).unwrap();
        assert_eq!(
            config.layout,
            Some(LayoutNode::group(
                Orientation::Horizontal,
                0.0,
                vec![LayoutNode::item("a", 0.0)]
            ))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_dashboard("does/not/exist.xml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.xml"));
    }

    #[test]
    fn test_wrong_root_and_malformed_xml() {
        assert!(matches!(
            parse_dashboard("<Report />"),
            Err(ConfigError::UnexpectedRoot { .. })
        ));
        assert!(matches!(parse_dashboard("<Dashboard>"), Err(ConfigError::Xml(_))));
    }
}
