use numbus::core::{
    AxisMapping, AxisRange, LOG_DOMAIN_FLOOR, ScaleKind, apply_scale, calculate_range,
    format_tick_label, generate_ticks, inverse_scale,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_ticks_hit_both_endpoints_evenly(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        frequency in 2usize..20
    ) {
        let max = min + span;
        let ticks = generate_ticks(min, max, frequency, ScaleKind::Linear);

        prop_assert_eq!(ticks.len(), frequency);
        prop_assert_eq!(ticks[0], min);
        prop_assert!((ticks[frequency - 1] - max).abs() <= 1e-6 * span.max(1.0));

        let step = span / (frequency as f64 - 1.0);
        for pair in ticks.windows(2) {
            prop_assert!(((pair[1] - pair[0]) - step).abs() <= 1e-6 * step.max(1.0));
        }
    }

    #[test]
    fn log_ticks_stay_inside_range(
        low_exp in -3i32..3,
        decades in 0i32..6,
        factor in 1.0f64..9.0
    ) {
        let min = factor * 10f64.powi(low_exp);
        let max = min * 10f64.powi(decades);
        for tick in generate_ticks(min, max, 5, ScaleKind::Log) {
            prop_assert!(tick >= min && tick <= max);
            let exponent = tick.log10();
            prop_assert!((exponent - exponent.round()).abs() <= 1e-9);
        }
    }

    #[test]
    fn zero_always_formats_as_zero(log in any::<bool>()) {
        let scale = if log { ScaleKind::Log } else { ScaleKind::Linear };
        prop_assert_eq!(format_tick_label(0.0, scale), "0");
    }

    #[test]
    fn linear_labels_never_carry_unsigned_exponent(value in -1e6f64..1e6) {
        let label = format_tick_label(value, ScaleKind::Linear);
        if let Some((_, exponent)) = label.split_once('e') {
            prop_assert!(exponent.starts_with('-') || exponent.starts_with('+'));
        }
    }

    #[test]
    fn two_decimal_labels_stay_within_half_a_unit(value in 1.0f64..99.99) {
        let label = format_tick_label(value, ScaleKind::Linear);
        let (_, fraction) = label.split_once('.').expect("two decimals");
        prop_assert_eq!(fraction.len(), 2);

        let shown: f64 = label.parse().expect("numeric label");
        prop_assert!((shown - value).abs() <= 0.005 + 1e-12);
    }

    #[test]
    fn scale_then_inverse_is_identity(value in -1e12f64..1e12, log_value in 1.001e-4f64..1e12) {
        prop_assert_eq!(
            inverse_scale(apply_scale(value, ScaleKind::Linear), ScaleKind::Linear),
            value
        );

        let recovered = inverse_scale(apply_scale(log_value, ScaleKind::Log), ScaleKind::Log);
        prop_assert!((recovered - log_value).abs() <= 1e-12 * log_value);
    }

    #[test]
    fn linear_mapping_round_trip(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        value_factor in 0.0f64..1.0,
        inverted in any::<bool>()
    ) {
        let range = AxisRange::new(min, min + span);
        let value = min + value_factor * span;
        let mapping = AxisMapping::new(range, ScaleKind::Linear, 1024.0, inverted);

        let recovered = mapping.from_pixel(mapping.to_pixel(value));
        prop_assert!((recovered - value).abs() <= 1e-7);
    }

    #[test]
    fn log_mapping_round_trip_above_floor(
        low_exp in -3.0f64..3.0,
        decades in 0.5f64..6.0,
        value_factor in 0.0f64..1.0
    ) {
        let min = 10f64.powf(low_exp);
        let max = 10f64.powf(low_exp + decades);
        let value = 10f64.powf(low_exp + value_factor * decades);
        prop_assume!(value > LOG_DOMAIN_FLOOR);

        let mapping = AxisMapping::new(AxisRange::new(min, max), ScaleKind::Log, 800.0, true);
        let recovered = mapping.from_pixel(mapping.to_pixel(value));
        prop_assert!((recovered - value).abs() <= 1e-9 * value.max(1.0));
    }

    #[test]
    fn log_range_is_strictly_positive(
        data_min in -1_000.0f64..1_000.0,
        data_max in -1_000.0f64..1_000.0
    ) {
        let range = calculate_range(data_min, data_max, None, None, ScaleKind::Log);
        prop_assert!(range.min >= LOG_DOMAIN_FLOOR);
        prop_assert!(range.max > 0.0);
        let mapping = AxisMapping::new(range, ScaleKind::Log, 500.0, false);
        prop_assert!(mapping.to_pixel(range.min).is_finite());
        prop_assert!(mapping.to_pixel(range.max).is_finite());
    }
}
