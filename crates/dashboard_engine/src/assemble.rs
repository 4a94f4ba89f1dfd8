use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use models::{
    AbsoluteSlot, Aggregates, Container, DashboardConfig, DashboardMetadata, DashboardView,
    FlexSlot, ItemConfig, ItemKind, Panel, PanelData,
};

use crate::layout::{find_slot, resolve_absolute, resolve_grid, resolve_proportional};

#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    pub container: Container,
    /// Columns of the fallback grid used when there is no layout tree.
    pub grid_columns: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            container: Container::new(1200.0, 800.0),
            grid_columns: 2,
        }
    }
}

/// Picks the aggregate a dashboard item draws from.
///
/// Pivots show the raw records; charts and pies bind through the data member
/// of their first dimension. Anything unbound or empty renders as a placeholder.
fn bind_data(item: &ItemConfig, aggregates: &Aggregates) -> PanelData {
    let data = if item.kind == ItemKind::Pivot {
        PanelData::Records(aggregates.raw.clone())
    } else {
        match item.data_member.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("glcode") => PanelData::Series(aggregates.by_gl_code.clone()),
            Some("compgroupid") => PanelData::Series(aggregates.by_comp_group.clone()),
            Some("acccompid") => PanelData::Series(aggregates.by_acc_comp.clone()),
            Some("docdate") => PanelData::MonthYear(aggregates.by_month_year.clone()),
            other => {
                tracing::debug!(
                    component = %item.component_name,
                    data_member = ?other,
                    "no data source for dashboard item"
                );
                PanelData::Empty
            }
        }
    };
    if data.is_empty() { PanelData::Empty } else { data }
}

/// Joins configuration, resolved placement and aggregate data into one panel
/// per configured item, in configuration order.
pub fn assemble(
    config: &DashboardConfig,
    aggregates: &Aggregates,
    options: &AssembleOptions,
) -> DashboardView {
    let (slots, flex): (Vec<AbsoluteSlot>, Vec<FlexSlot>) = match &config.layout {
        Some(root) => (
            resolve_absolute(root, options.container),
            resolve_proportional(root),
        ),
        None => {
            let names: Vec<&str> = config
                .items
                .iter()
                .map(|i| i.component_name.as_str())
                .collect();
            (
                resolve_grid(&names, options.container, options.grid_columns),
                Vec::new(),
            )
        }
    };

    let panels = config
        .items
        .iter()
        .map(|item| {
            let slot = find_slot(&slots, &item.component_name).cloned();
            if slot.is_none() {
                tracing::debug!(component = %item.component_name, "item is not placed by the layout");
            }
            Panel {
                component_name: item.component_name.clone(),
                title: item.name.clone(),
                kind: item.kind,
                series_type: item.series_type,
                rotated: item.rotated,
                argument_title: item.argument_title.clone(),
                value_title: item.value_title.clone(),
                slot,
                flex: find_slot(&flex, &item.component_name).cloned(),
                data: bind_data(item, aggregates),
            }
        })
        .collect();

    DashboardView {
        metadata: DashboardMetadata {
            generated_at: Local::now().to_rfc3339(),
            title: config.title.clone(),
            record_count: aggregates.raw.len(),
        },
        container: options.container,
        panels,
    }
}

pub fn write_view(view: &DashboardView, out_path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output dir: {}", parent.display()))?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(view)?
    } else {
        serde_json::to_string(view)?
    };
    fs::write(out_path, json).with_context(|| format!("Writing output file: {}", out_path.display()))?;
    Ok(())
}
