//! Repository Implementation
//!
//! In-memory stores for sensor metadata, point series and units. Series are
//! kept chronological so range queries return points in time order.

use crate::model::{SensorDataPoint, SensorMetadata, TimeRange, UnitMetadata};
use crate::StorageError;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Optional, combinable filters for sensor lookup. All present filters must
/// match exactly.
#[derive(Debug, Clone, Default)]
pub struct SensorFilter {
    pub sensor_type: Option<String>,
    pub sensor_name: Option<String>,
    pub location: Option<String>,
}

impl SensorFilter {
    fn matches(&self, meta: &SensorMetadata) -> bool {
        self.sensor_type
            .as_ref()
            .map_or(true, |t| meta.sensor_type == *t)
            && self
                .sensor_name
                .as_ref()
                .map_or(true, |n| meta.sensor_name == *n)
            && self.location.as_ref().map_or(true, |l| meta.location == *l)
    }
}

struct SensorEntry {
    metadata: SensorMetadata,
    /// Chronological point series
    points: Vec<SensorDataPoint>,
}

/// Store for sensor metadata and point-series data (in-memory implementation)
pub struct SensorStore {
    sensors: Mutex<BTreeMap<i64, SensorEntry>>,
}

impl SensorStore {
    /// Create an empty in-memory sensor store
    pub fn new() -> Self {
        info!("Creating in-memory sensor store");
        Self {
            sensors: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<i64, SensorEntry>>, StorageError> {
        self.sensors
            .lock()
            .map_err(|e| StorageError::StoreError(format!("Lock error: {}", e)))
    }

    /// Register a sensor. An existing sensor with the same id keeps its
    /// series and gets the new metadata.
    pub fn register_sensor(&self, metadata: SensorMetadata) -> Result<(), StorageError> {
        let mut sensors = self.lock()?;
        let id = metadata.sensor_id;

        match sensors.get_mut(&id) {
            Some(entry) => entry.metadata = metadata,
            None => {
                sensors.insert(
                    id,
                    SensorEntry {
                        metadata,
                        points: Vec::new(),
                    },
                );
            }
        }

        debug!("Registered sensor {}", id);
        Ok(())
    }

    /// Look up metadata for a sensor id
    pub fn get_sensor_metadata(&self, sensor_id: i64) -> Result<SensorMetadata, StorageError> {
        let sensors = self.lock()?;
        sensors
            .get(&sensor_id)
            .map(|e| e.metadata.clone())
            .ok_or(StorageError::SensorNotFound(sensor_id))
    }

    /// All registered sensors, in store order (ascending id)
    pub fn list_sensors(&self) -> Result<Vec<SensorMetadata>, StorageError> {
        let sensors = self.lock()?;
        Ok(sensors.values().map(|e| e.metadata.clone()).collect())
    }

    /// Sensors matching every present filter; empty result is not an error
    pub fn find_sensors(&self, filter: &SensorFilter) -> Result<Vec<SensorMetadata>, StorageError> {
        let sensors = self.lock()?;
        Ok(sensors
            .values()
            .map(|e| &e.metadata)
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    /// Points for a sensor within `range`, in chronological order
    pub fn get_sensor_data(
        &self,
        sensor_id: i64,
        range: TimeRange,
    ) -> Result<Vec<SensorDataPoint>, StorageError> {
        let sensors = self.lock()?;
        let entry = sensors
            .get(&sensor_id)
            .ok_or(StorageError::SensorNotFound(sensor_id))?;

        Ok(entry
            .points
            .iter()
            .filter(|p| range.contains(p.timestamp))
            .copied()
            .collect())
    }

    /// Insert a point for a sensor, keeping the series chronological
    pub fn insert_point(&self, sensor_id: i64, point: SensorDataPoint) -> Result<(), StorageError> {
        let mut sensors = self.lock()?;
        let entry = sensors
            .get_mut(&sensor_id)
            .ok_or(StorageError::SensorNotFound(sensor_id))?;

        let idx = entry
            .points
            .partition_point(|p| p.timestamp <= point.timestamp);
        entry.points.insert(idx, point);

        debug!("Inserted point for sensor {}", sensor_id);
        Ok(())
    }

    /// Number of registered sensors
    pub fn sensor_count(&self) -> usize {
        self.sensors.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for SensorStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Store for unit metadata (in-memory implementation)
pub struct UnitStore {
    units: Mutex<BTreeMap<i64, UnitMetadata>>,
}

impl UnitStore {
    /// Create an empty in-memory unit store
    pub fn new() -> Self {
        Self {
            units: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a unit, replacing any previous metadata for the same id
    pub fn register_unit(&self, unit: UnitMetadata) -> Result<(), StorageError> {
        let mut units = self
            .units
            .lock()
            .map_err(|e| StorageError::StoreError(format!("Lock error: {}", e)))?;
        units.insert(unit.unit_id, unit);
        Ok(())
    }

    /// Look up metadata for a unit id
    pub fn get_unit_metadata(&self, unit_id: i64) -> Result<UnitMetadata, StorageError> {
        let units = self
            .units
            .lock()
            .map_err(|e| StorageError::StoreError(format!("Lock error: {}", e)))?;
        units
            .get(&unit_id)
            .cloned()
            .ok_or(StorageError::UnitNotFound(unit_id))
    }

    /// All registered units, in store order (ascending id)
    pub fn list_units(&self) -> Result<Vec<UnitMetadata>, StorageError> {
        let units = self
            .units
            .lock()
            .map_err(|e| StorageError::StoreError(format!("Lock error: {}", e)))?;
        Ok(units.values().cloned().collect())
    }
}

impl Default for UnitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn meta(id: i64, name: &str, sensor_type: &str, location: &str) -> SensorMetadata {
        SensorMetadata {
            sensor_id: id,
            sensor_name: name.to_string(),
            sensor_type: sensor_type.to_string(),
            location: location.to_string(),
            unit_id: 1,
        }
    }

    fn point(secs: u32, value: Option<f64>) -> SensorDataPoint {
        SensorDataPoint {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, secs).unwrap(),
            value,
        }
    }

    #[test]
    fn test_unknown_sensor_is_not_found() {
        let store = SensorStore::new();
        let err = store.get_sensor_metadata(42).unwrap_err();
        assert!(matches!(err, StorageError::SensorNotFound(42)));
    }

    #[test]
    fn test_points_kept_chronological() {
        let store = SensorStore::new();
        store.register_sensor(meta(7, "Boiler", "temperature", "plant")).unwrap();

        // Insert out of order
        store.insert_point(7, point(20, Some(2.0))).unwrap();
        store.insert_point(7, point(0, Some(1.0))).unwrap();
        store.insert_point(7, point(40, None)).unwrap();

        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 40).unwrap(),
        )
        .unwrap();

        let data = store.get_sensor_data(7, range).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].value, Some(1.0));
        assert_eq!(data[1].value, Some(2.0));
        assert_eq!(data[2].value, None);
    }

    #[test]
    fn test_range_query_excludes_outside_points() {
        let store = SensorStore::new();
        store.register_sensor(meta(1, "S", "temperature", "lab")).unwrap();
        store.insert_point(1, point(0, Some(1.0))).unwrap();
        store.insert_point(1, point(30, Some(2.0))).unwrap();

        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 10).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 59).unwrap(),
        )
        .unwrap();

        let data = store.get_sensor_data(1, range).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].value, Some(2.0));
    }

    #[test]
    fn test_find_combines_filters() {
        let store = SensorStore::new();
        store.register_sensor(meta(1, "A", "temperature", "lab")).unwrap();
        store.register_sensor(meta(2, "B", "temperature", "roof")).unwrap();
        store.register_sensor(meta(3, "C", "humidity", "lab")).unwrap();

        let by_type = store
            .find_sensors(&SensorFilter {
                sensor_type: Some("temperature".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_type.len(), 2);

        let by_type_and_location = store
            .find_sensors(&SensorFilter {
                sensor_type: Some("temperature".to_string()),
                location: Some("lab".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_type_and_location.len(), 1);
        assert_eq!(by_type_and_location[0].sensor_id, 1);

        // No match is an empty list, not an error
        let none = store
            .find_sensors(&SensorFilter {
                sensor_type: Some("pressure".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_insert_point_for_unknown_sensor_fails() {
        let store = SensorStore::new();
        let err = store.insert_point(9, point(0, Some(1.0))).unwrap_err();
        assert!(matches!(err, StorageError::SensorNotFound(9)));
    }

    #[test]
    fn test_unit_store_lookup_and_list() {
        let store = UnitStore::new();
        store
            .register_unit(UnitMetadata {
                unit_id: 1,
                name: "Celsius".to_string(),
                symbol: "°C".to_string(),
            })
            .unwrap();

        let unit = store.get_unit_metadata(1).unwrap();
        assert_eq!(unit.symbol, "°C");

        assert!(matches!(
            store.get_unit_metadata(2).unwrap_err(),
            StorageError::UnitNotFound(2)
        ));
        assert_eq!(store.list_units().unwrap().len(), 1);
    }
}
