//! Report renderers: pretty JSON and a plain-text executive summary.

use crate::metrics::{
    domain::{MetricHealth, MetricsReport, PeriodMetrics},
    ports::{ReportRenderError, ReportRenderer},
};
use minijinja::{Environment, context};
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

const SUMMARY_TEMPLATE: &str = "\
DELIVERY METRICS{% if team %}: {{ team }}{% endif %}
profile: {{ profile }} | team size: {{ team_size }} | config: {{ fingerprint }}

SPRINTS
{% for row in sprints -%}
{{ row.period }}{% if row.month %} ({{ row.month }}){% endif %}: throughput {{ row.throughput }}, velocity {{ row.velocity }}, cycle time {{ row.cycle_time }}, predictability {{ row.predictability }}, efficiency {{ row.efficiency }}, rework {{ row.rework }}
{% endfor %}
MONTHS
{% for row in months -%}
{{ row.period }} [{{ row.sources }}]: throughput {{ row.throughput }} ({{ row.throughput_avg }}/sprint), velocity {{ row.velocity }} ({{ row.velocity_avg }}/sprint), cycle time {{ row.cycle_time }}, predictability {{ row.predictability }}, efficiency {{ row.efficiency }}, rework {{ row.rework }}
{% else -%}
no mapped months
{% endfor %}
AVERAGES
throughput {{ means.throughput }} tasks/sprint
velocity {{ means.velocity }} points/sprint
cycle time {{ means.cycle_time }} days ({{ means.cycle_time_rating }})
predictability {{ means.predictability }} ({{ means.predictability_rating }})
efficiency {{ means.efficiency }} points/person ({{ means.efficiency_rating }})
rework {{ means.rework }} ({{ means.rework_rating }})

best sprint: {{ best }}
worst sprint: {{ worst }}
{% if warnings %}
WARNINGS
{% for warning in warnings -%}
- {{ warning }}
{% endfor %}{% endif %}";

/// Renders the full report as pretty-printed JSON, nulls included.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn render(&self, report: &MetricsReport) -> Result<String, ReportRenderError> {
        serde_json::to_string_pretty(report)
            .map_err(|error| ReportRenderError::Serialize(error.to_string()))
    }
}

/// Renders a plain-text executive summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReportRenderer {
    team_name: Option<String>,
}

impl TextReportRenderer {
    /// Creates a renderer without a team name.
    #[must_use]
    pub const fn new() -> Self {
        Self { team_name: None }
    }

    /// Sets the team name shown in the heading.
    #[must_use]
    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }
}

impl ReportRenderer for TextReportRenderer {
    fn render(&self, report: &MetricsReport) -> Result<String, ReportRenderError> {
        let summary = &report.summary;
        let means = &summary.means;
        let ratings = &summary.ratings;
        let context = context! {
            team => self.team_name.as_deref(),
            profile => summary.profile.as_str(),
            team_size => summary.team_size.value(),
            fingerprint => report.config_fingerprint.get(..12).unwrap_or(report.config_fingerprint.as_str()),
            sprints => report.sprint_metrics.iter().map(PeriodRow::from).collect::<Vec<_>>(),
            months => report.month_metrics.iter().map(PeriodRow::from).collect::<Vec<_>>(),
            means => MeansView {
                throughput: number(means.throughput),
                velocity: number(means.velocity),
                cycle_time: number(means.cycle_time_days),
                cycle_time_rating: rating(ratings.cycle_time_days),
                predictability: percent(means.predictability_pct),
                predictability_rating: rating(ratings.predictability_pct),
                efficiency: number(means.efficiency),
                efficiency_rating: rating(ratings.efficiency),
                rework: percent(means.rework_pct),
                rework_rating: rating(ratings.rework_pct),
            },
            best => format!(
                "{} (velocity {:.1}, {} tasks)",
                summary.best_sprint.period_id, summary.best_sprint.velocity, summary.best_sprint.throughput
            ),
            worst => format!(
                "{} (velocity {:.1}, {} tasks)",
                summary.worst_sprint.period_id, summary.worst_sprint.velocity, summary.worst_sprint.throughput
            ),
            warnings => report.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        };

        Environment::new()
            .render_str(SUMMARY_TEMPLATE, context)
            .map_err(|error| ReportRenderError::Template(error.to_string()))
    }
}

#[derive(Serialize)]
struct PeriodRow {
    period: String,
    month: Option<String>,
    sources: String,
    throughput: u32,
    throughput_avg: String,
    velocity: String,
    velocity_avg: String,
    cycle_time: String,
    predictability: String,
    efficiency: String,
    rework: String,
}

impl From<&PeriodMetrics> for PeriodRow {
    fn from(metrics: &PeriodMetrics) -> Self {
        Self {
            period: metrics.period_id.clone(),
            month: metrics.month.as_ref().map(ToString::to_string),
            sources: metrics.source_labels.join(", "),
            throughput: metrics.throughput,
            throughput_avg: number(metrics.throughput_avg),
            velocity: number(Some(metrics.velocity)),
            velocity_avg: number(metrics.velocity_avg),
            cycle_time: number(metrics.cycle_time_days),
            predictability: percent(metrics.predictability_pct),
            efficiency: number(Some(metrics.efficiency)),
            rework: percent(Some(metrics.rework_pct)),
        }
    }
}

#[derive(Serialize)]
struct MeansView {
    throughput: String,
    velocity: String,
    cycle_time: String,
    cycle_time_rating: &'static str,
    predictability: String,
    predictability_rating: &'static str,
    efficiency: String,
    efficiency_rating: &'static str,
    rework: String,
    rework_rating: &'static str,
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |figure| format!("{figure:.1}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |figure| format!("{figure:.1}%"))
}

fn rating(value: Option<MetricHealth>) -> &'static str {
    value.map_or(NOT_AVAILABLE, MetricHealth::as_str)
}
