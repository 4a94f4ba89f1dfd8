use serde::{Deserialize, Serialize};

use crate::layout::{AbsoluteSlot, Container, FlexSlot, LayoutNode};
use crate::records::{AggregatedSeries, FinancialRecord, TimeBucketedTotals};

/// Chart series types understood by the rendering widgets. Serialized names
/// are the widget tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    #[default]
    Bar,
    StackedBar,
    FullStackedBar,
    #[serde(rename = "scatter")]
    Point,
    Line,
    StackedLine,
    FullStackedLine,
    StepLine,
    Spline,
    Area,
    StackedArea,
    FullStackedArea,
    StepArea,
    SplineArea,
    Pie,
    Doughnut,
}

impl SeriesType {
    /// Maps a dashboard token (e.g. `StackedBar`, `spline`, `Donut`) to a series type.
    /// Unknown tokens fall back to [`SeriesType::Bar`].
    pub fn from_token(token: &str) -> Self {
        let normalized: String = token
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "stackedbar" => SeriesType::StackedBar,
            "fullstackedbar" => SeriesType::FullStackedBar,
            "point" | "scatter" => SeriesType::Point,
            "line" => SeriesType::Line,
            "stackedline" => SeriesType::StackedLine,
            "fullstackedline" => SeriesType::FullStackedLine,
            "stepline" => SeriesType::StepLine,
            "spline" => SeriesType::Spline,
            "area" => SeriesType::Area,
            "stackedarea" => SeriesType::StackedArea,
            "fullstackedarea" => SeriesType::FullStackedArea,
            "steparea" => SeriesType::StepArea,
            "splinearea" => SeriesType::SplineArea,
            "pie" => SeriesType::Pie,
            "donut" | "doughnut" => SeriesType::Doughnut,
            _ => SeriesType::Bar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Chart,
    Pie,
    Pivot,
}

impl ItemKind {
    /// Element name under `Dashboard/Items`.
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "Chart" => Some(ItemKind::Chart),
            "Pie" => Some(ItemKind::Pie),
            "Pivot" => Some(ItemKind::Pivot),
            _ => None,
        }
    }
}

/// One dashboard item as declared in the XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemConfig {
    pub component_name: String,
    pub name: String,
    pub kind: ItemKind,
    pub rotated: bool,
    pub argument_title: Option<String>,
    pub value_title: Option<String>,
    pub series_type: Option<SeriesType>,
    pub data_member: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardConfig {
    pub title: Option<String>,
    pub items: Vec<ItemConfig>,
    pub layout: Option<LayoutNode>,
}

impl DashboardConfig {
    /// First item with this component name.
    pub fn item(&self, component_name: &str) -> Option<&ItemConfig> {
        self.items.iter().find(|i| i.component_name == component_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "camelCase")]
pub enum PanelData {
    Series(AggregatedSeries),
    MonthYear(TimeBucketedTotals),
    Records(Vec<FinancialRecord>),
    Empty,
}

impl PanelData {
    pub fn is_empty(&self) -> bool {
        match self {
            PanelData::Series(s) => s.is_empty(),
            PanelData::MonthYear(t) => t.is_empty(),
            PanelData::Records(r) => r.is_empty(),
            PanelData::Empty => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub component_name: String,
    pub title: String,
    pub kind: ItemKind,
    pub series_type: Option<SeriesType>,
    pub rotated: bool,
    pub argument_title: Option<String>,
    pub value_title: Option<String>,
    pub slot: Option<AbsoluteSlot>,
    pub flex: Option<FlexSlot>,
    pub data: PanelData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetadata {
    pub generated_at: String,
    pub title: Option<String>,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub metadata: DashboardMetadata,
    pub container: Container,
    pub panels: Vec<Panel>,
}
