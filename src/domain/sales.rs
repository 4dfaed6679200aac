// Sales domain models
use serde::{Deserialize, Serialize};

/// Chart-ready labelled series, the shape the dashboard widgets consume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

impl ChartSeries {
    pub fn single(label: &str, labels: &[&str], data: &[f64]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            datasets: vec![Dataset {
                label: label.to_string(),
                data: data.to_vec(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesData {
    pub total_revenue: f64,
    pub revenue_change: f64,
    pub total_orders: u64,
    pub order_change: f64,
    pub average_order_value: f64,
    pub aov_change: f64,
    pub conversion_rate: f64,
    pub conversion_change: f64,
    pub revenue_trend: ChartSeries,
    pub top_products: ChartSeries,
    pub sales_by_channel: ChartSeries,
    pub geographic_distribution: ChartSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_styling_fields() {
        let json = r#"{
            "labels": ["Week 1", "Week 2"],
            "datasets": [{
                "label": "Revenue",
                "data": [85000, 92000],
                "borderColor": "rgba(147, 104, 233, 1)",
                "fill": true
            }]
        }"#;

        let series: ChartSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series, ChartSeries::single("Revenue", &["Week 1", "Week 2"], &[85000.0, 92000.0]));
    }
}
