//! Demo data seeding
//!
//! The service fakes a fulfillment backend, so the binary seeds a small
//! sensor/unit fixture at startup to make every endpoint immediately usable.

use chrono::{Duration, Utc};
use storage::{SensorDataPoint, SensorMetadata, SensorStore, StorageError, UnitMetadata, UnitStore};
use tracing::info;

pub fn seed_demo_data(sensors: &SensorStore, units: &UnitStore) -> Result<(), StorageError> {
    units.register_unit(UnitMetadata {
        unit_id: 1,
        name: "Celsius".to_string(),
        symbol: "°C".to_string(),
    })?;
    units.register_unit(UnitMetadata {
        unit_id: 2,
        name: "Relative humidity".to_string(),
        symbol: "%".to_string(),
    })?;

    let fixtures = [
        (1, "Boiler", "temperature", "plant floor", 1),
        (2, "Roof probe", "temperature", "roof", 1),
        (3, "Greenhouse", "humidity", "greenhouse", 2),
    ];

    let now = Utc::now();
    for (sensor_id, name, sensor_type, location, unit_id) in fixtures {
        sensors.register_sensor(SensorMetadata {
            sensor_id,
            sensor_name: name.to_string(),
            sensor_type: sensor_type.to_string(),
            location: location.to_string(),
            unit_id,
        })?;

        // One reading per hour over the past day; every 7th reading missing
        for i in 0..24i64 {
            let value = if i % 7 == 6 {
                None
            } else {
                let phase = (i as f64) / 24.0 * std::f64::consts::TAU;
                Some(20.0 + 5.0 * phase.sin() + sensor_id as f64)
            };
            sensors.insert_point(
                sensor_id,
                SensorDataPoint {
                    timestamp: now - Duration::hours(23 - i),
                    value,
                },
            )?;
        }
    }

    info!(
        "Seeded {} demo sensors and {} units",
        sensors.sensor_count(),
        units.list_units()?.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_registers_sensors_with_points() {
        let sensors = SensorStore::new();
        let units = UnitStore::new();
        seed_demo_data(&sensors, &units).unwrap();

        assert_eq!(sensors.sensor_count(), 3);
        assert_eq!(units.list_units().unwrap().len(), 2);

        let range = storage::TimeRange::new(Utc::now() - Duration::days(2), Utc::now()).unwrap();
        let data = sensors.get_sensor_data(1, range).unwrap();
        assert_eq!(data.len(), 24);
        assert!(data.iter().any(|p| p.value.is_none()));
    }
}
