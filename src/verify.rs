//! Consistency checks for a generated dataset.
//!
//! # Verification Categories
//!
//! - **Date Coverage**: one weather entry per day of the range, no gaps
//! - **Extreme Weather**: event days use the extreme sets, other days the normal ranges
//! - **Consumption Coverage**: each resource exactly once per day
//! - **Event Linkage**: a record carries an event id iff an event falls on its date
//! - **Quantity Scaling**: quantities are positive and equal base times the rule factor

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;

use crate::calendar::DateRange;
use crate::consumption::Resource;
use crate::dataset::Dataset;
use crate::weather::{EXTREME_RADIATION, EXTREME_TEMPERATURES, NORMAL_RADIATION, NORMAL_TEMPERATURE};

/// Severity of a verification issue
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Value outside its documented range, tables still line up
    Medium,
    /// Tables disagree with each other
    High,
    /// Rows missing or duplicated
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Category of verification check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerifyCategory {
    DateCoverage,
    ExtremeWeather,
    ConsumptionCoverage,
    EventLinkage,
    QuantityScaling,
}

impl VerifyCategory {
    pub fn all() -> &'static [VerifyCategory] {
        &[
            VerifyCategory::DateCoverage,
            VerifyCategory::ExtremeWeather,
            VerifyCategory::ConsumptionCoverage,
            VerifyCategory::EventLinkage,
            VerifyCategory::QuantityScaling,
        ]
    }
}

impl fmt::Display for VerifyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyCategory::DateCoverage => write!(f, "Date Coverage"),
            VerifyCategory::ExtremeWeather => write!(f, "Extreme Weather"),
            VerifyCategory::ConsumptionCoverage => write!(f, "Consumption Coverage"),
            VerifyCategory::EventLinkage => write!(f, "Event Linkage"),
            VerifyCategory::QuantityScaling => write!(f, "Quantity Scaling"),
        }
    }
}

/// A single failed check
#[derive(Clone, Debug)]
pub struct VerifyIssue {
    pub category: VerifyCategory,
    pub message: String,
    pub date: Option<NaiveDate>,
    pub severity: Severity,
}

impl VerifyIssue {
    pub fn new(category: VerifyCategory, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            category,
            message: message.into(),
            date: None,
            severity,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

impl fmt::Display for VerifyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;
        if let Some(date) = self.date {
            write!(f, " (on {})", date)?;
        }
        Ok(())
    }
}

/// Statistics for a verification category
#[derive(Clone, Debug, Default)]
pub struct CategoryStats {
    pub checks: usize,
    pub failed: usize,
}

/// Complete verification report
#[derive(Clone, Debug)]
pub struct VerificationReport {
    pub issues: Vec<VerifyIssue>,
    pub category_stats: HashMap<VerifyCategory, CategoryStats>,
}

impl VerificationReport {
    pub fn new() -> Self {
        let category_stats = VerifyCategory::all()
            .iter()
            .map(|c| (*c, CategoryStats::default()))
            .collect();
        Self {
            issues: Vec::new(),
            category_stats,
        }
    }

    /// Record one check; `issue` is `None` when it passed.
    pub fn record(&mut self, category: VerifyCategory, issue: Option<VerifyIssue>) {
        let stats = self.category_stats.entry(category).or_default();
        stats.checks += 1;
        if let Some(issue) = issue {
            stats.failed += 1;
            self.issues.push(issue);
        }
    }

    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn total_checks(&self) -> usize {
        self.category_stats.values().map(|s| s.checks).sum()
    }

    pub fn issues_in(&self, category: VerifyCategory) -> Vec<&VerifyIssue> {
        self.issues.iter().filter(|i| i.category == category).collect()
    }
}

impl Default for VerificationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "PASSED" } else { "FAILED" };
        writeln!(f, "Verification {}: {} checks", status, self.total_checks())?;
        for category in VerifyCategory::all() {
            if let Some(stats) = self.category_stats.get(category) {
                writeln!(f, "  {}: {}/{} passed", category, stats.checks - stats.failed, stats.checks)?;
            }
        }
        for issue in self.issues.iter().take(20) {
            writeln!(f, "  {}", issue)?;
        }
        if self.issues.len() > 20 {
            writeln!(f, "  ... and {} more", self.issues.len() - 20)?;
        }
        Ok(())
    }
}

/// Check every cross-table invariant of `dataset` over `range`.
pub fn verify_dataset(dataset: &Dataset, range: &DateRange) -> VerificationReport {
    let mut report = VerificationReport::new();
    check_date_coverage(dataset, range, &mut report);
    check_weather(dataset, &mut report);
    check_consumption_coverage(dataset, range, &mut report);
    check_event_linkage(dataset, &mut report);
    check_quantities(dataset, &mut report);
    report
}

fn check_date_coverage(dataset: &Dataset, range: &DateRange, report: &mut VerificationReport) {
    let category = VerifyCategory::DateCoverage;

    let count_issue = (dataset.weather.len() != range.len()).then(|| {
        VerifyIssue::new(
            category,
            format!("{} weather days for a {}-day range", dataset.weather.len(), range.len()),
            Severity::Critical,
        )
    });
    report.record(category, count_issue);

    for date in range.days() {
        let issue = dataset.weather.get(date).is_none().then(|| {
            VerifyIssue::new(category, "no weather entry", Severity::Critical).on(date)
        });
        report.record(category, issue);
    }

    for day in dataset.weather.iter() {
        let issue = (!range.contains(day.date)).then(|| {
            VerifyIssue::new(category, "weather entry outside range", Severity::High).on(day.date)
        });
        report.record(category, issue);
    }
}

fn check_weather(dataset: &Dataset, report: &mut VerificationReport) {
    let category = VerifyCategory::ExtremeWeather;
    let index = dataset.event_index();

    for day in dataset.weather.iter() {
        let temp = day.avg_temperature_celsius;
        let rad = day.solar_radiation_kwh_m2;
        let ok = if index.is_event_day(day.date) {
            EXTREME_TEMPERATURES.contains(&temp) && EXTREME_RADIATION.contains(&rad)
        } else {
            NORMAL_TEMPERATURE.contains(&temp) && NORMAL_RADIATION.contains(&rad)
        };
        let issue = (!ok).then(|| {
            VerifyIssue::new(
                category,
                format!("temperature {} / radiation {} out of place", temp, rad),
                Severity::Medium,
            )
            .on(day.date)
        });
        report.record(category, issue);
    }
}

fn check_consumption_coverage(dataset: &Dataset, range: &DateRange, report: &mut VerificationReport) {
    let category = VerifyCategory::ConsumptionCoverage;
    let mut seen: BTreeMap<(NaiveDate, Resource), usize> = BTreeMap::new();
    for record in &dataset.consumption {
        *seen.entry((record.date, record.resource)).or_insert(0) += 1;
    }

    for date in range.days() {
        for &resource in Resource::all() {
            let count = seen.remove(&(date, resource)).unwrap_or(0);
            let issue = (count != 1).then(|| {
                VerifyIssue::new(
                    category,
                    format!("{} appears {} times", resource, count),
                    Severity::Critical,
                )
                .on(date)
            });
            report.record(category, issue);
        }
    }

    for ((date, resource), _) in seen {
        report.record(
            category,
            Some(VerifyIssue::new(category, format!("{} record outside range", resource), Severity::High).on(date)),
        );
    }
}

fn check_event_linkage(dataset: &Dataset, report: &mut VerificationReport) {
    let category = VerifyCategory::EventLinkage;
    let index = dataset.event_index();

    let duplicate = (index.len() != dataset.events.len()).then(|| {
        VerifyIssue::new(category, "two events share a date", Severity::High)
    });
    report.record(category, duplicate);

    for record in &dataset.consumption {
        let expected = index.event_on(record.date);
        let issue = (record.event_id.as_deref() != expected).then(|| {
            VerifyIssue::new(
                category,
                format!(
                    "{} record has event {:?}, expected {:?}",
                    record.resource, record.event_id, expected
                ),
                Severity::High,
            )
            .on(record.date)
        });
        report.record(category, issue);
    }
}

fn check_quantities(dataset: &Dataset, report: &mut VerificationReport) {
    let category = VerifyCategory::QuantityScaling;

    for record in &dataset.consumption {
        let issue = if record.quantity <= 0.0 {
            Some(VerifyIssue::new(
                category,
                format!("{} quantity {} is not positive", record.resource, record.quantity),
                Severity::High,
            ))
        } else if !record.resource.base_range().contains(&record.base_quantity) {
            Some(VerifyIssue::new(
                category,
                format!("{} base {} outside its range", record.resource, record.base_quantity),
                Severity::Medium,
            ))
        } else if record.quantity != record.base_quantity * record.factor() {
            Some(VerifyIssue::new(
                category,
                format!(
                    "{} quantity {} != base {} x {}",
                    record.resource,
                    record.quantity,
                    record.base_quantity,
                    record.factor()
                ),
                Severity::High,
            ))
        } else {
            None
        };
        report.record(category, issue.map(|i| i.on(record.date)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    fn minimal_dataset() -> Dataset {
        Dataset::generate(&GeneratorConfig::minimal()).unwrap()
    }

    #[test]
    fn test_generated_dataset_passes() {
        let dataset = Dataset::generate(&GeneratorConfig::default()).unwrap();
        let report = verify_dataset(&dataset, &dataset.range);

        assert!(report.passed(), "{}", report);
        // 365 days: 1 + 365 + 365 coverage, 365 weather, 1095 coverage,
        // 1 + 1095 linkage, 1095 scaling
        assert_eq!(report.total_checks(), 731 + 365 + 1095 + 1096 + 1095);
    }

    #[test]
    fn test_detects_missing_record() {
        let mut dataset = minimal_dataset();
        let removed = dataset.consumption.remove(4);
        let report = verify_dataset(&dataset, &dataset.range);

        let issues = report.issues_in(VerifyCategory::ConsumptionCoverage);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].date, Some(removed.date));
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_detects_broken_linkage() {
        let mut dataset = minimal_dataset();
        dataset.consumption[0].event_id = Some("E999".to_string());
        let report = verify_dataset(&dataset, &dataset.range);

        assert!(!report.passed());
        assert_eq!(report.issues_in(VerifyCategory::EventLinkage).len(), 1);
        // factor now includes x20, so scaling fails too
        assert_eq!(report.issues_in(VerifyCategory::QuantityScaling).len(), 1);
    }

    #[test]
    fn test_detects_tampered_quantity() {
        let mut dataset = minimal_dataset();
        dataset.consumption[8].quantity *= 2.0;
        let report = verify_dataset(&dataset, &dataset.range);

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].category, VerifyCategory::QuantityScaling);
    }

    #[test]
    fn test_detects_mild_event_day() {
        let mut dataset = minimal_dataset();
        let event_day = dataset.events[0].date;
        let mut day = *dataset.weather.get(event_day).unwrap();
        day.avg_temperature_celsius = 0.0;
        dataset.weather.insert(day);
        let report = verify_dataset(&dataset, &dataset.range);

        let issues = report.issues_in(VerifyCategory::ExtremeWeather);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].date, Some(event_day));
    }
}
