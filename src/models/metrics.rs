use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Metric series selectable on the timeseries endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricKind {
    #[default]
    Cpu,
    Memory,
}

impl MetricKind {
    /// Returns the value of the `type` query parameter.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU %",
            Self::Memory => "Memory %",
        }
    }
}

/// Snapshot from `GET /{provider}/metrics/live`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LiveMetrics {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: Option<f64>,
    #[serde(default)]
    pub network_in_mbps: Option<f64>,
    #[serde(default)]
    pub network_out_mbps: Option<f64>,
    #[serde(default)]
    pub instances_monitored: u32,
    #[serde(default)]
    pub error: Option<String>,
}

/// Series from `GET /{provider}/metrics/timeseries`. The backend names the
/// value array after the metric, so all known keys land in `values`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Timeseries {
    #[serde(default)]
    pub ts: Vec<String>,
    #[serde(default, alias = "cpu_percent", alias = "memory_percent")]
    pub values: Vec<f64>,
}

impl Timeseries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Chart series with `HH:MM` labels; unparsable timestamps are kept verbatim.
    pub fn series_data(&self) -> (Vec<String>, Vec<f64>) {
        let labels = self
            .ts
            .iter()
            .map(|raw| {
                parse_timestamp(raw)
                    .map_or_else(|| raw.clone(), |t| t.format("%H:%M").to_string())
            })
            .collect();
        (labels, self.values.clone())
    }
}

/// Parses RFC 3339 timestamps as well as naive ISO timestamps, which the
/// backend emits for some providers and which are taken to be UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let trimmed = s.strip_suffix('Z').unwrap_or(s);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("Failed to parse datetime '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_metrics_accept_naive_timestamps() {
        let json = r#"{
            "updated_at": "2025-10-04T08:15:30.123456",
            "cpu_percent": 41.5,
            "instances_monitored": 3
        }"#;

        let metrics: LiveMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.cpu_percent, 41.5);
        assert_eq!(
            metrics.updated_at.unwrap().format("%H:%M").to_string(),
            "08:15"
        );
        assert_eq!(metrics.memory_percent, None);
    }

    #[test]
    fn timeseries_reads_metric_named_series() {
        let cpu: Timeseries =
            serde_json::from_str(r#"{"ts": ["2025-10-04T08:00:00+00:00"], "cpu_percent": [12.5]}"#)
                .unwrap();
        let memory: Timeseries =
            serde_json::from_str(r#"{"ts": ["a"], "memory_percent": [70.0]}"#).unwrap();
        let other: Timeseries = serde_json::from_str(r#"{"ts": [], "values": []}"#).unwrap();

        assert_eq!(cpu.latest(), Some(12.5));
        assert_eq!(cpu.series_data().0, vec!["08:00"]);
        assert_eq!(memory.values, vec![70.0]);
        assert_eq!(memory.series_data().0, vec!["a"]);
        assert!(other.is_empty());
    }

    #[test]
    fn metric_kind_query_values() {
        assert_eq!(MetricKind::Cpu.as_str(), "cpu");
        assert_eq!(MetricKind::Memory.as_str(), "memory");
    }
}
