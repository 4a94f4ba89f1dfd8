use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Three-letter month names in calendar order, as used for month-year buckets.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Company groups that always lead the company-group series, in this order.
pub const PREFERRED_COMP_GROUPS: [&str; 4] = ["ASP", "OTH", "PC", "RMX"];

// Raw input record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    #[serde(default, deserialize_with = "text_or_number")]
    pub comp_group_id: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub doc_date: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub gl_code: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub acc_comp_id: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Exports sometimes carry codes and amounts as bare JSON numbers; keep their textual form.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

impl FinancialRecord {
    /// Returns the amount as a finite number, or `None` when it does not parse.
    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Parses the document date in any of the formats found in exports
    /// (RFC 3339, ISO date-time, `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`).
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let s = self.doc_date.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }
        ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    }

    /// Year and short month name of the document date.
    pub fn month_year(&self) -> Option<(String, &'static str)> {
        let date = self.parsed_date()?;
        Some((
            format!("{:04}", date.year()),
            MONTH_ABBREVIATIONS[date.month0() as usize],
        ))
    }
}

// Output models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub key: String,
    pub total: f64,
}

pub type AggregatedSeries = Vec<SeriesPoint>;

/// Months of one year with their summed amounts.
pub type MonthTotals = IndexMap<String, f64>;

/// Year -> month -> summed amount. Both levels keep the order in which they
/// were first added; use [`TimeBucketedTotals::chronological`] for calendar order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TimeBucketedTotals {
    years: IndexMap<String, MonthTotals>,
}

impl TimeBucketedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, year: &str, month: &str, amount: f64) {
        *self
            .years
            .entry(year.to_string())
            .or_default()
            .entry(month.to_string())
            .or_insert(0.0) += amount;
    }

    pub fn get(&self, year: &str, month: &str) -> Option<f64> {
        self.years.get(year)?.get(month).copied()
    }

    pub fn years(&self) -> &IndexMap<String, MonthTotals> {
        &self.years
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Copy with years ascending and months in calendar order.
    pub fn chronological(&self) -> Self {
        let mut years = self.years.clone();
        years.sort_keys();
        for months in years.values_mut() {
            months.sort_by(|a, _, b, _| calendar_index(a).cmp(&calendar_index(b)));
        }
        Self { years }
    }
}

fn calendar_index(month: &str) -> usize {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == month)
        .unwrap_or(MONTH_ABBREVIATIONS.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SkipCounts {
    pub amount: usize,
    pub date: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub by_gl_code: AggregatedSeries,
    pub by_comp_group: AggregatedSeries,
    pub by_acc_comp: AggregatedSeries,
    pub by_month_year: TimeBucketedTotals,
    pub raw: Vec<FinancialRecord>,
    pub skipped: SkipCounts,
}
