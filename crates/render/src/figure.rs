//! Interactive figure construction
//!
//! [`SensorFigure`] is the internal figure handle shared by every renderer;
//! [`FigureDescription`] is its JSON-serializable chart description. Both are
//! built from the same inputs, so a figure and its description always agree
//! on point count and time bounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::{SensorDataPoint, SensorMetadata, UnitMetadata};

/// JSON-serializable description of an interactive chart (plotly-shaped)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureDescription {
    pub data: Vec<ScatterTrace>,
    pub layout: FigureLayout,
}

/// A single scatter trace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub name: String,
    pub mode: String,
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<Option<f64>>,
}

/// Chart layout: title and axis labels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureLayout {
    pub title: String,
    pub xaxis: AxisSpec,
    pub yaxis: AxisSpec,
}

/// Axis specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisSpec {
    pub title: String,
}

/// Internal figure handle for a sensor series over one request
#[derive(Debug, Clone)]
pub struct SensorFigure {
    title: String,
    series_name: String,
    y_label: String,
    points: Vec<SensorDataPoint>,
}

impl SensorFigure {
    /// Build a figure from sensor metadata and its chronological series.
    ///
    /// The unit, when resolvable, supplies the y-axis label; otherwise the
    /// sensor type stands in.
    pub fn from_sensor(
        metadata: &SensorMetadata,
        unit: Option<&UnitMetadata>,
        series: &[SensorDataPoint],
    ) -> Self {
        let y_label = match unit {
            Some(unit) => format!("{} ({})", unit.name, unit.symbol),
            None => metadata.sensor_type.clone(),
        };

        Self {
            title: format!("Sensor {} ({})", metadata.sensor_name, metadata.location),
            series_name: metadata.sensor_name.clone(),
            y_label,
            points: series.to_vec(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Number of points in the series, missing readings included
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// First and last timestamps of the series, if any
    pub fn time_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.timestamp, last.timestamp))
    }

    /// Points with a finite reading, the only ones a raster chart can draw
    pub(crate) fn plottable(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.points
            .iter()
            .filter_map(|p| match p.value {
                Some(v) if v.is_finite() => Some((p.timestamp, v)),
                _ => None,
            })
            .collect()
    }

    /// Produce the JSON-serializable chart description.
    ///
    /// Missing readings stay in the trace as `null` y values so the
    /// description carries the full series, not just the drawable part.
    pub fn describe(&self) -> FigureDescription {
        let x = self.points.iter().map(|p| p.timestamp).collect();
        let y = self
            .points
            .iter()
            .map(|p| p.value.filter(|v| v.is_finite()))
            .collect();

        FigureDescription {
            data: vec![ScatterTrace {
                trace_type: "scatter".to_string(),
                name: self.series_name.clone(),
                mode: "lines+markers".to_string(),
                x,
                y,
            }],
            layout: FigureLayout {
                title: self.title.clone(),
                xaxis: AxisSpec {
                    title: "Time".to_string(),
                },
                yaxis: AxisSpec {
                    title: self.y_label.clone(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture() -> (SensorMetadata, UnitMetadata, Vec<SensorDataPoint>) {
        let metadata = SensorMetadata {
            sensor_id: 7,
            sensor_name: "Boiler".to_string(),
            sensor_type: "temperature".to_string(),
            location: "plant".to_string(),
            unit_id: 1,
        };
        let unit = UnitMetadata {
            unit_id: 1,
            name: "Celsius".to_string(),
            symbol: "°C".to_string(),
        };
        let series = (0..5)
            .map(|i| SensorDataPoint {
                timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, i, 0).unwrap(),
                value: if i == 2 { None } else { Some(f64::from(i)) },
            })
            .collect();
        (metadata, unit, series)
    }

    #[test]
    fn test_description_matches_figure_shape() {
        let (metadata, unit, series) = fixture();
        let figure = SensorFigure::from_sensor(&metadata, Some(&unit), &series);
        let description = figure.describe();

        // Same point count and time bounds between figure and description
        assert_eq!(description.data.len(), 1);
        let trace = &description.data[0];
        assert_eq!(trace.x.len(), figure.point_count());
        assert_eq!(trace.y.len(), figure.point_count());

        let (t_first, t_last) = figure.time_bounds().unwrap();
        assert_eq!(*trace.x.first().unwrap(), t_first);
        assert_eq!(*trace.x.last().unwrap(), t_last);
    }

    #[test]
    fn test_missing_reading_stays_null_in_trace() {
        let (metadata, unit, series) = fixture();
        let figure = SensorFigure::from_sensor(&metadata, Some(&unit), &series);

        let trace = &figure.describe().data[0];
        assert_eq!(trace.y[2], None);
        assert_eq!(figure.plottable().len(), 4);
    }

    #[test]
    fn test_non_finite_reading_never_reaches_description() {
        let (metadata, unit, mut series) = fixture();
        series[1].value = Some(f64::NAN);
        let figure = SensorFigure::from_sensor(&metadata, Some(&unit), &series);

        let trace = &figure.describe().data[0];
        assert_eq!(trace.y[1], None);
        // NaN is not plottable either
        assert_eq!(figure.plottable().len(), 3);
    }

    #[test]
    fn test_unit_label_falls_back_to_sensor_type() {
        let (metadata, unit, series) = fixture();

        let with_unit = SensorFigure::from_sensor(&metadata, Some(&unit), &series);
        assert_eq!(with_unit.y_label(), "Celsius (°C)");

        let without_unit = SensorFigure::from_sensor(&metadata, None, &series);
        assert_eq!(without_unit.y_label(), "temperature");
    }

    #[test]
    fn test_description_serializes_plotly_shaped() {
        let (metadata, unit, series) = fixture();
        let figure = SensorFigure::from_sensor(&metadata, Some(&unit), &series);

        let json = serde_json::to_value(figure.describe()).unwrap();
        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "lines+markers");
        assert_eq!(json["layout"]["yaxis"]["title"], "Celsius (°C)");
        assert!(json["data"][0]["y"][2].is_null());
    }

    #[test]
    fn test_empty_series_describes_as_empty_trace() {
        let (metadata, unit, _) = fixture();
        let figure = SensorFigure::from_sensor(&metadata, Some(&unit), &[]);

        let description = figure.describe();
        assert!(description.data[0].x.is_empty());
        assert!(figure.time_bounds().is_none());
    }
}
