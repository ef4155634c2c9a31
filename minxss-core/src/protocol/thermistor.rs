//! Voltage-divider thermistor model shared by every temperature channel.
//!
//! The two raw bytes are summed (not bit-combined) into a divider voltage,
//! converted to a thermistor resistance and then to a temperature through a
//! simplified Beta-parameter law. The same constants apply to the main, battery,
//! interface board and EPS board sensors.

use ordered_float::NotNan;

use super::DomainError;

/// Divider supply voltage.
pub const SUPPLY: f64 = 3.3;
/// Fixed series resistor of the divider, in ohms.
pub const SERIES_RESISTANCE: f64 = 23_000.0;
/// Thermistor resistance at the reference temperature, in ohms.
pub const NOMINAL_RESISTANCE: f64 = 10_000.0;
/// Reference temperature in kelvin.
pub const REFERENCE_KELVIN: f64 = 298.0;
pub const BETA: f64 = 3430.0;
pub const KELVIN_OFFSET: f64 = 273.0;

pub fn to_celsius(raw: [u8; 2]) -> Result<NotNan<f64>, DomainError> {
    let vraw = u16::from(raw[0]) + u16::from(raw[1]);
    let voltage = f64::from(vraw);

    let divisor = SUPPLY - voltage;
    if divisor == 0.0 {
        return Err(DomainError::ZeroDivisor { vraw });
    }

    let resistance = (voltage / divisor) * SERIES_RESISTANCE;
    let ratio = resistance / NOMINAL_RESISTANCE;
    if ratio <= 0.0 {
        return Err(DomainError::NonPositiveResistance { vraw });
    }

    let kelvin = 1.0 / (1.0 / REFERENCE_KELVIN + ratio.ln() / BETA);
    NotNan::new(kelvin - KELVIN_OFFSET)
        .ok()
        .filter(|celsius| celsius.is_finite())
        .ok_or(DomainError::NonFinite { vraw })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn celsius(raw: [u8; 2]) -> f64 {
        to_celsius(raw).unwrap().into_inner()
    }

    #[test]
    fn unit_ratio_is_reference_temperature() {
        // 1 / (3.3 - 1) * 23000 / 10000 == 1, ln(1) == 0
        assert!((celsius([0, 1]) - 25.0).abs() < EPSILON);
        assert!((celsius([1, 0]) - 25.0).abs() < EPSILON);
    }

    #[test]
    fn bytes_are_summed() {
        let expected = -4.480767808134829;
        assert!((celsius([1, 1]) - expected).abs() < EPSILON);
        assert!((celsius([0, 2]) - expected).abs() < EPSILON);
        assert!((celsius([2, 1]) - -38.79934884649535).abs() < EPSILON);
    }

    #[test]
    fn voltage_above_supply_is_out_of_domain() {
        assert_eq!(
            to_celsius([149, 150]),
            Err(DomainError::NonPositiveResistance { vraw: 299 })
        );
        assert_eq!(
            to_celsius([2, 10]),
            Err(DomainError::NonPositiveResistance { vraw: 12 })
        );
        assert_eq!(
            to_celsius([255, 255]),
            Err(DomainError::NonPositiveResistance { vraw: 510 })
        );
    }

    #[test]
    fn zero_voltage_has_no_logarithm() {
        assert_eq!(
            to_celsius([0, 0]),
            Err(DomainError::NonPositiveResistance { vraw: 0 })
        );
    }

    #[test]
    fn every_input_is_a_value_or_a_domain_error() {
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                let vraw = u16::from(a) + u16::from(b);
                match to_celsius([a, b]) {
                    Ok(value) => {
                        assert!((1..=3).contains(&vraw));
                        assert!(value.is_finite());
                    }
                    Err(err) => assert!(!(1..=3).contains(&vraw), "{err}"),
                }
            }
        }
    }
}
