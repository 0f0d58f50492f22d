//! Pure mappers from aggregate arrays to renderable chart data. Every
//! mapper returns `None` for empty or absent input so the views can show
//! their "No data available" placeholder; none of them fetch anything.

use sendra_core::{CountBucket, Funnel, TimePoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

/// Horizontal bar chart. `max` is the largest bar value, kept at hand so
/// the renderer can scale widths without rescanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    /// Share of the total, in `0.0..=1.0`.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSeries {
    pub name: &'static str,
    pub points: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChart {
    pub x_labels: Vec<String>,
    pub series: Vec<LineSeries>,
    pub max: u64,
}

fn bar_chart(bars: Vec<Bar>) -> BarChart {
    let max = bars.iter().map(|bar| bar.value).max().unwrap_or(0);
    BarChart { bars, max }
}

/// Application-status distribution as horizontal bars.
pub fn status_chart(buckets: &[CountBucket]) -> Option<BarChart> {
    if buckets.is_empty() {
        return None;
    }

    let bars = buckets
        .iter()
        .map(|bucket| Bar {
            label: bucket.display_key().to_uppercase(),
            value: bucket.count,
        })
        .collect();
    Some(bar_chart(bars))
}

/// Job-type distribution as pie slices.
pub fn job_type_chart(buckets: &[CountBucket]) -> Option<PieChart> {
    if buckets.is_empty() {
        return None;
    }

    let total: u64 = buckets.iter().map(|bucket| bucket.count).sum();
    let slices = buckets
        .iter()
        .map(|bucket| PieSlice {
            label: bucket
                .key
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| "Unknown".to_string()),
            value: bucket.count,
            fraction: if total == 0 {
                0.0
            } else {
                bucket.count as f64 / total as f64
            },
        })
        .collect();
    Some(PieChart { slices, total })
}

/// Experience-level distribution as horizontal bars.
pub fn experience_chart(buckets: &[CountBucket]) -> Option<BarChart> {
    status_chart(buckets)
}

/// Application funnel in stage order. Renders whenever the summary
/// carries a funnel, even an all-zero one; `None` only when absent.
pub fn funnel_chart(funnel: Option<&Funnel>) -> Option<BarChart> {
    let funnel = funnel?;
    let bars = vec![
        Bar {
            label: "Applied".to_string(),
            value: funnel.applied,
        },
        Bar {
            label: "Interview".to_string(),
            value: funnel.interview,
        },
        Bar {
            label: "Offer".to_string(),
            value: funnel.offer,
        },
        Bar {
            label: "Rejected".to_string(),
            value: funnel.rejected,
        },
    ];
    Some(bar_chart(bars))
}

/// Applications-over-time as one line per stage.
pub fn applications_over_time(points: &[TimePoint]) -> Option<LineChart> {
    if points.is_empty() {
        return None;
    }

    let x_labels = points.iter().map(|point| point.date.clone()).collect();
    let series = vec![
        LineSeries {
            name: "Applied",
            points: points.iter().map(|point| point.applied).collect(),
        },
        LineSeries {
            name: "Interview",
            points: points.iter().map(|point| point.interview).collect(),
        },
        LineSeries {
            name: "Offer",
            points: points.iter().map(|point| point.offer).collect(),
        },
        LineSeries {
            name: "Rejected",
            points: points.iter().map(|point| point.rejected).collect(),
        },
    ];
    let max = series
        .iter()
        .flat_map(|line| line.points.iter().copied())
        .max()
        .unwrap_or(0);

    Some(LineChart {
        x_labels,
        series,
        max,
    })
}
