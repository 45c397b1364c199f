use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{ActivityRecord, ActivitySource};

/// Request and error counts for one service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceCounts {
    /// Requests made.
    pub total: usize,
    /// Requests answered with 4xx or 5xx.
    pub errors: usize,
}

/// Requests per reporting side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    /// Reported by the agent.
    pub agent: usize,
    /// Reported by a service.
    pub service: usize,
}

/// Aggregate view over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    /// The earliest timestamp, or empty when there are no records.
    pub period_start: String,
    /// The latest timestamp, or empty when there are no records.
    pub period_end: String,
    /// Number of records.
    pub total_requests: usize,
    /// Share of 2xx responses in `[0, 1]`; zero when there are no records.
    pub success_rate: f64,
    /// Counts per service, in order of first appearance.
    pub by_service: IndexMap<String, ServiceCounts>,
    /// Counts per status code, ascending.
    pub by_status: BTreeMap<u16, usize>,
    /// Counts per reporting side.
    pub by_source: SourceCounts,
}

/// Summarizes and formats activity records.
#[derive(Debug, Clone, Default)]
pub struct ActivityReporter {
    records: Vec<ActivityRecord>,
}

impl ActivityReporter {
    /// Report over `records`.
    pub fn new(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    /// Aggregate the records.
    pub fn summary(&self) -> ActivitySummary {
        let mut by_service: IndexMap<String, ServiceCounts> = IndexMap::new();
        let mut by_status = BTreeMap::new();
        let mut by_source = SourceCounts::default();
        let mut successes = 0;

        for record in &self.records {
            let counts = by_service.entry(record.service.clone()).or_default();
            counts.total += 1;
            if record.is_error() {
                counts.errors += 1;
            }

            *by_status.entry(record.status).or_insert(0) += 1;

            if record.is_success() {
                successes += 1;
            }

            match record.source {
                ActivitySource::Agent => by_source.agent += 1,
                ActivitySource::Service => by_source.service += 1,
            }
        }

        let total_requests = self.records.len();
        let timestamps = self.records.iter().map(|record| record.timestamp.as_str());

        ActivitySummary {
            period_start: timestamps.clone().min().unwrap_or_default().to_owned(),
            period_end: timestamps.max().unwrap_or_default().to_owned(),
            total_requests,
            success_rate: if total_requests > 0 {
                successes as f64 / total_requests as f64
            } else {
                0.0
            },
            by_service,
            by_status,
            by_source,
        }
    }

    /// Render the summary as a plain-text report.
    ///
    /// ```text
    /// Activity Summary (2026-02-14T08:00:00Z - 2026-02-14T14:00:00Z):
    ///
    /// Total Requests: 4
    /// Success Rate: 50%
    ///
    /// By Service:
    ///   - gmail.com: 4 requests (2 errors)
    ///
    /// By Status:
    ///   - 2xx (Success): 2
    ///   - 4xx (Client Error): 1
    ///     - 429: 1
    ///   - 5xx (Server Error): 1
    ///     - 500: 1
    /// ```
    ///
    /// The source breakdown appears only when some records came from a
    /// service.
    pub fn format(&self) -> String {
        let summary = self.summary();
        let mut lines = vec![
            format!(
                "Activity Summary ({} - {}):",
                summary.period_start, summary.period_end
            ),
            String::new(),
            format!(
                "Total Requests: {}",
                thousands(summary.total_requests)
            ),
            format!(
                "Success Rate: {}%",
                (summary.success_rate * 100.0).round() as u64
            ),
        ];

        if summary.by_source.service > 0 {
            lines.push(String::new());
            lines.push("By Source:".into());
            lines.push(format!(
                "  - Agent-reported: {}",
                thousands(summary.by_source.agent)
            ));
            lines.push(format!(
                "  - Service-verified: {}",
                thousands(summary.by_source.service)
            ));
        }

        lines.push(String::new());
        lines.push("By Service:".into());
        for (service, counts) in &summary.by_service {
            lines.push(format!(
                "  - {service}: {} requests ({} errors)",
                thousands(counts.total),
                counts.errors
            ));
        }

        let mut classes: IndexMap<StatusClass, Vec<(u16, usize)>> = IndexMap::new();
        for (&status, &count) in &summary.by_status {
            classes
                .entry(StatusClass::of(status))
                .or_default()
                .push((status, count));
        }

        lines.push(String::new());
        lines.push("By Status:".into());
        for (class, codes) in &classes {
            let total: usize = codes.iter().map(|(_, count)| count).sum();
            lines.push(format!("  - {}: {}", class.label(), thousands(total)));
            if *class != StatusClass::Success {
                for (status, count) in codes {
                    lines.push(format!("    - {status}: {}", thousands(*count)));
                }
            }
        }

        lines.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    // Anything below 300 counts as success here, informational codes included.
    fn of(status: u16) -> Self {
        match status {
            0..300 => Self::Success,
            300..400 => Self::Redirect,
            400..500 => Self::ClientError,
            _ => Self::ServerError,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Success => "2xx (Success)",
            Self::Redirect => "3xx (Redirect)",
            Self::ClientError => "4xx (Client Error)",
            Self::ServerError => "5xx (Server Error)",
        }
    }
}

fn thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn status_classes_follow_the_hundreds_digit() {
        assert_eq!(StatusClass::of(100), StatusClass::Success);
        assert_eq!(StatusClass::of(204), StatusClass::Success);
        assert_eq!(StatusClass::of(302), StatusClass::Redirect);
        assert_eq!(StatusClass::of(429), StatusClass::ClientError);
        assert_eq!(StatusClass::of(503), StatusClass::ServerError);
    }
}
