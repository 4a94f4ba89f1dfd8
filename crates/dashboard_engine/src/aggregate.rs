use indexmap::IndexMap;
use models::{
    AggregatedSeries, Aggregates, FinancialRecord, PREFERRED_COMP_GROUPS, SeriesPoint,
    SkipCounts, TimeBucketedTotals,
};

/// Running sums per key, in the order keys were first seen.
#[derive(Default)]
struct KeyedTotals(IndexMap<String, f64>);

impl KeyedTotals {
    fn add(&mut self, key: &str, amount: f64) {
        *self.0.entry(key.to_string()).or_insert(0.0) += amount;
    }

    fn into_series(self) -> AggregatedSeries {
        self.0
            .into_iter()
            .map(|(key, total)| SeriesPoint { key, total })
            .collect()
    }

    /// Largest total first; equal totals keep first-seen order.
    fn into_descending(self) -> AggregatedSeries {
        let mut series = self.into_series();
        series.sort_by(|a, b| b.total.total_cmp(&a.total));
        series
    }
}

/// Builds every chart data source from the flat record list in one pass.
///
/// A record whose amount does not parse is left out of all amount sums; one
/// whose date does not parse is left out of the month-year buckets only.
/// Every record, valid or not, is kept in `raw`.
pub fn aggregate(records: &[FinancialRecord]) -> Aggregates {
    let mut by_gl_code = KeyedTotals::default();
    let mut by_comp_group = KeyedTotals::default();
    let mut by_acc_comp = KeyedTotals::default();
    let mut by_month_year = TimeBucketedTotals::new();
    let mut skipped = SkipCounts::default();

    for record in records {
        let Some(amount) = record.parsed_amount() else {
            skipped.amount += 1;
            continue;
        };
        by_gl_code.add(&record.gl_code, amount);
        by_comp_group.add(&record.comp_group_id, amount);
        by_acc_comp.add(&record.acc_comp_id, amount);

        match record.month_year() {
            Some((year, month)) => by_month_year.add(&year, month, amount),
            None => skipped.date += 1,
        }
    }

    if skipped.amount > 0 || skipped.date > 0 {
        tracing::debug!(
            amount = skipped.amount,
            date = skipped.date,
            total = records.len(),
            "records excluded from aggregates"
        );
    }

    Aggregates {
        by_gl_code: by_gl_code.into_descending(),
        by_comp_group: order_comp_groups(by_comp_group.into_series()),
        by_acc_comp: by_acc_comp.into_descending(),
        by_month_year,
        raw: records.to_vec(),
        skipped,
    }
}

/// Preferred groups first (only those present), then the rest in first-seen order.
fn order_comp_groups(mut remaining: AggregatedSeries) -> AggregatedSeries {
    let mut ordered = Vec::with_capacity(remaining.len());
    for key in PREFERRED_COMP_GROUPS {
        if let Some(pos) = remaining.iter().position(|p| p.key == key) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.extend(remaining);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<FinancialRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Vec<FinancialRecord> {
        records(json!([
            {"compGroupId": "RMX", "docDate": "2024-03-05", "glCode": "4000", "accCompId": "C1", "amount": "100"},
            {"compGroupId": "ZZZ", "docDate": "2024-01-10", "glCode": "5000", "accCompId": "C2", "amount": "250.5"},
            {"compGroupId": "ASP", "docDate": "2023-12-31", "glCode": "4000", "accCompId": "C1", "amount": "50"},
            {"compGroupId": "NEW", "docDate": "2024-03-20", "glCode": "6000", "accCompId": "C3", "amount": "10"},
            {"compGroupId": "PC",  "docDate": "2024-01-02", "glCode": "5000", "accCompId": "C3", "amount": "-20"}
        ]))
    }

    fn keys(series: &AggregatedSeries) -> Vec<&str> {
        series.iter().map(|p| p.key.as_str()).collect()
    }

    fn sum(series: &AggregatedSeries) -> f64 {
        series.iter().map(|p| p.total).sum()
    }

    #[test]
    fn test_empty_input_yields_empty_aggregates() {
        let out = aggregate(&[]);
        assert!(out.by_gl_code.is_empty());
        assert!(out.by_comp_group.is_empty());
        assert!(out.by_acc_comp.is_empty());
        assert!(out.by_month_year.is_empty());
        assert!(out.raw.is_empty());
        assert_eq!(out.skipped, SkipCounts::default());
    }

    #[test]
    fn test_gl_code_sorted_descending() {
        let out = aggregate(&sample());
        assert_eq!(keys(&out.by_gl_code), vec!["5000", "4000", "6000"]);
        assert_eq!(out.by_gl_code[0].total, 230.5);
        assert_eq!(out.by_gl_code[1].total, 150.0);
    }

    #[test]
    fn test_acc_comp_sorted_descending() {
        let out = aggregate(&sample());
        assert_eq!(keys(&out.by_acc_comp), vec!["C2", "C1", "C3"]);
        assert_eq!(out.by_acc_comp[2].total, -10.0);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let recs = records(json!([
            {"glCode": "B", "amount": "5", "docDate": "2024-01-01"},
            {"glCode": "A", "amount": "5", "docDate": "2024-01-01"},
            {"glCode": "C", "amount": "9", "docDate": "2024-01-01"}
        ]));
        let out = aggregate(&recs);
        assert_eq!(keys(&out.by_gl_code), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_comp_group_preferred_order_then_first_seen() {
        let out = aggregate(&sample());
        assert_eq!(keys(&out.by_comp_group), vec!["ASP", "PC", "RMX", "ZZZ", "NEW"]);
    }

    #[test]
    fn test_gl_and_acc_comp_partition_same_total() {
        let out = aggregate(&sample());
        assert!((sum(&out.by_gl_code) - sum(&out.by_acc_comp)).abs() < 1e-9);
        assert!((sum(&out.by_comp_group) - 390.5).abs() < 1e-9);
    }

    #[test]
    fn test_month_buckets_in_encounter_order() {
        let out = aggregate(&sample());
        let years: Vec<&str> = out.by_month_year.years().keys().map(String::as_str).collect();
        assert_eq!(years, vec!["2024", "2023"]);

        // Mar is seen before Jan, so it stays first; this is not calendar order.
        let months: Vec<&str> = out.by_month_year.years()["2024"]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(months, vec!["Mar", "Jan"]);
        assert_eq!(out.by_month_year.get("2024", "Mar"), Some(110.0));
        assert_eq!(out.by_month_year.get("2024", "Jan"), Some(230.5));
        assert_eq!(out.by_month_year.get("2023", "Dec"), Some(50.0));
    }

    #[test]
    fn test_bad_fields_only_affect_dependent_aggregates() {
        let recs = records(json!([
            {"compGroupId": "ASP", "docDate": "2024-02-01", "glCode": "4000", "accCompId": "C1", "amount": "N/A"},
            {"compGroupId": "OTH", "docDate": "not-a-date", "glCode": "4000", "accCompId": "C1", "amount": "75"},
            {"compGroupId": "OTH", "docDate": "2024-02-03", "glCode": "4000", "accCompId": "C1", "amount": "25"}
        ]));
        let out = aggregate(&recs);

        assert_eq!(out.raw, recs);
        assert_eq!(out.skipped, SkipCounts { amount: 1, date: 1 });
        // The N/A amount is nowhere; the undated record still counts by key.
        assert_eq!(keys(&out.by_comp_group), vec!["OTH"]);
        assert_eq!(out.by_gl_code[0].total, 100.0);
        assert_eq!(out.by_acc_comp[0].total, 100.0);
        assert_eq!(out.by_month_year.get("2024", "Feb"), Some(25.0));
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let recs = sample();
        let (first, second) = (aggregate(&recs), aggregate(&recs));
        assert_eq!(first, second);
        // Map equality ignores order, so compare the serialized form too.
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
