//! Power and battery estimation helpers
//!
//! Pure conversions shared by the control loop and the telemetry store:
//! rider power from torque and cadence, assist power from the motor
//! electrical side, battery percentage from a linear voltage window, and
//! road speed from electrical RPM.

use core::f32::consts::PI;

use crate::config::{BatteryConfig, DriveConfig};

/// Rider input power: P = torque * angular velocity
pub fn human_power_w(torque_nm: f32, cadence_rpm: f32) -> f32 {
    torque_nm * cadence_rpm * 2.0 * PI / 60.0
}

/// Motor-side assist power: P = |I| * V
///
/// Current is signed (negative while regenerating); assist power is
/// reported as magnitude.
pub fn assist_power_w(battery_voltage: f32, motor_current: f32) -> f32 {
    let current = if motor_current < 0.0 {
        -motor_current
    } else {
        motor_current
    };
    current * battery_voltage
}

/// Battery percentage from a linear window between critical and full
pub fn battery_percentage(voltage: f32, config: &BatteryConfig) -> f32 {
    let span = config.full_voltage - config.critical_voltage;
    if span <= 0.0 {
        return 0.0;
    }
    ((voltage - config.critical_voltage) / span * 100.0).clamp(0.0, 100.0)
}

/// Road speed from electrical RPM via pole pairs and wheel circumference
pub fn speed_kmh_from_erpm(erpm: f32, config: &DriveConfig) -> f32 {
    if config.motor_pole_pairs == 0 {
        return 0.0;
    }
    let mech_rpm = erpm / config.motor_pole_pairs as f32;
    mech_rpm * config.wheel_circumference_m * 60.0 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_power() {
        // 40 Nm at 60 RPM = 40 * 2π ≈ 251 W
        let p = human_power_w(40.0, 60.0);
        assert!((p - 251.3).abs() < 0.5);
        assert_eq!(human_power_w(0.0, 90.0), 0.0);
    }

    #[test]
    fn test_assist_power_uses_current_magnitude() {
        assert_eq!(assist_power_w(50.0, 10.0), 500.0);
        assert_eq!(assist_power_w(50.0, -10.0), 500.0);
    }

    #[test]
    fn test_battery_percentage_window() {
        let config = BatteryConfig {
            full_voltage: 54.6,
            critical_voltage: 42.0,
        };

        assert_eq!(battery_percentage(60.0, &config), 100.0);
        assert_eq!(battery_percentage(40.0, &config), 0.0);

        let mid = battery_percentage(48.3, &config);
        assert!((mid - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_speed_from_erpm() {
        let config = DriveConfig {
            motor_pole_pairs: 23,
            wheel_circumference_m: 2.23,
        };

        assert_eq!(speed_kmh_from_erpm(0.0, &config), 0.0);

        // 4600 eRPM = 200 wheel RPM = 200 * 2.23 * 60 / 1000 ≈ 26.8 km/h
        let speed = speed_kmh_from_erpm(4600.0, &config);
        assert!((speed - 26.76).abs() < 0.1);
    }
}
