//! Relative-movement step quantizer.
//!
//! A mouse report carries one signed byte of motion per axis, so an arbitrary
//! pixel displacement has to be decomposed into a sequence of per-report
//! deltas.  The quantizer emits full-ceiling steps while the remaining
//! distance allows, then decays by repeated halving as the target approaches,
//! which converges without overshoot in roughly
//! `displacement / ceiling + log2(ceiling)` reports instead of one pixel per
//! report.
//!
//! Negative displacements are handled by pre-negating into the positive
//! domain and re-mapping the emitted step as `256 - step`, the
//! two's-complement byte the host's HID driver expects.

/// Step ceiling for positive-direction motion (largest positive signed byte).
pub const POSITIVE_CEILING: u16 = 127;

/// Step ceiling for negative-direction motion (largest negative magnitude).
pub const NEGATIVE_CEILING: u16 = 128;

/// Computes the next step magnitude for a remaining displacement `rel`.
///
/// The effective ceiling is `ceil(step_ceiling * speed)`.  Behaviour:
///
/// - `rel == 0` (or negative): no step, returns 0.
/// - `rel >= ceiling`: full-ceiling step.
/// - `1 <= rel < ceiling`: the ceiling is halved (`ceil(x / 2)`) until it no
///   longer exceeds `rel`, and that value is the step.
///
/// Callers with a negative displacement pass `-rel` and wrap the result
/// themselves; see [`axis_step`].
pub fn step_divider(rel: i32, step_ceiling: u16, speed: f64) -> u16 {
    let mut step = (f64::from(step_ceiling) * speed).ceil() as u16;
    let rel_step = i32::from(step);

    if rel.abs() < 1 {
        return 0;
    }
    if rel >= rel_step {
        return step;
    }
    if rel >= 1 {
        // ceil(step / 2) in integer form
        while i32::from(step) > rel {
            step = (step + 1) / 2;
        }
        tracing::trace!(rel, step, "step decayed below ceiling");
        return step;
    }
    0
}

/// The outcome of quantizing one axis for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisStep {
    /// The motion byte to place in the report (already wrapped for negative
    /// motion).
    pub delta: u8,
    /// Displacement still to cover after this report.
    pub remaining: i32,
    /// Ceiling to use for the next call on this axis.  The emitted step is
    /// carried forward, so the decay is monotone once it begins.
    pub next_ceiling: u16,
}

/// Quantizes one axis: computes the next motion byte and the leftover
/// displacement.
pub fn axis_step(rel: i32, ceiling: u16, speed: f64) -> AxisStep {
    if rel > 0 {
        let step = step_divider(rel, ceiling, speed);
        AxisStep {
            delta: step as u8,
            remaining: rel - i32::from(step),
            next_ceiling: step,
        }
    } else if rel < 0 {
        let step = step_divider(-rel, ceiling, speed);
        let delta = if step == 0 { 0 } else { (256 - i32::from(step)) as u8 };
        AxisStep {
            delta,
            remaining: rel + i32::from(step),
            next_ceiling: step,
        }
    } else {
        AxisStep {
            delta: 0,
            remaining: 0,
            next_ceiling: ceiling,
        }
    }
}

/// Scales a raw pixel displacement by the per-OS movement coefficient,
/// truncating toward zero.
pub fn scale_displacement(px: i32, coefficient: f64) -> i32 {
    (f64::from(px) * coefficient) as i32
}

/// Decomposes a signed `(dx, dy)` displacement into a sequence of
/// `(x_byte, y_byte)` report deltas.
///
/// One combined report is emitted per iteration even when only one axis still
/// has distance to cover; the settled axis contributes 0.  The loop ends when
/// both axes reach exactly 0, and the signed sum of emitted deltas equals the
/// input displacement.
pub fn plan_move(dx: i32, dy: i32, speed: f64) -> Vec<(u8, u8)> {
    // Speed scales the starting ceilings only; once a step has been emitted
    // it carries forward as the next ceiling unscaled, or the decay would
    // compound on every iteration.
    let scaled = |ceiling: u16| (f64::from(ceiling) * speed).ceil() as u16;

    let mut rel_x = dx;
    let mut rel_y = dy;
    let mut ceiling_x = scaled(if rel_x < 0 { NEGATIVE_CEILING } else { POSITIVE_CEILING });
    let mut ceiling_y = scaled(if rel_y < 0 { NEGATIVE_CEILING } else { POSITIVE_CEILING });
    let mut reports = Vec::new();

    while rel_x != 0 || rel_y != 0 {
        let x = axis_step(rel_x, ceiling_x, 1.0);
        let y = axis_step(rel_y, ceiling_y, 1.0);
        rel_x = x.remaining;
        rel_y = y.remaining;
        ceiling_x = x.next_ceiling;
        ceiling_y = y.next_ceiling;
        reports.push((x.delta, y.delta));
    }

    reports
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Signed interpretation of a motion byte.
    fn signed(delta: u8) -> i32 {
        i32::from(delta as i8)
    }

    #[test]
    fn test_full_step_when_displacement_at_or_above_ceiling() {
        assert_eq!(step_divider(127, 127, 1.0), 127);
        assert_eq!(step_divider(300, 127, 1.0), 127);
        assert_eq!(step_divider(128, 128, 1.0), 128);
    }

    #[test]
    fn test_halving_decay_below_ceiling() {
        assert_eq!(step_divider(100, 127, 1.0), 64);
        assert_eq!(step_divider(15, 127, 1.0), 8);
        assert_eq!(step_divider(1, 127, 1.0), 1);
        assert_eq!(step_divider(50, 128, 1.0), 32);
    }

    #[test]
    fn test_zero_displacement_emits_zero() {
        assert_eq!(step_divider(0, 127, 1.0), 0);
        assert_eq!(step_divider(0, 128, 0.5), 0);
    }

    #[test]
    fn test_speed_scales_the_ceiling() {
        // Halving the speed is the same as starting from a halved ceiling.
        assert_eq!(step_divider(200, 127, 0.5), step_divider(200, 64, 1.0));
        assert_eq!(step_divider(30, 127, 0.5), step_divider(30, 64, 1.0));
    }

    #[test]
    fn test_negative_axis_wraps_into_byte_domain() {
        let step = axis_step(-1, NEGATIVE_CEILING, 1.0);
        assert_eq!(step.delta, 255);
        assert_eq!(step.remaining, 0);

        let step = axis_step(-50, NEGATIVE_CEILING, 1.0);
        assert_eq!(step.delta, 224); // 256 - 32
        assert_eq!(signed(step.delta), -32);
        assert_eq!(step.remaining, -18);
        assert_eq!(step.next_ceiling, 32);
    }

    #[test]
    fn test_positive_negative_symmetry() {
        // Complementary ceilings: 127 forward, 128 logical backward.
        for r in 1..127 {
            let pos = step_divider(r, POSITIVE_CEILING, 1.0);
            let neg = axis_step(-r, NEGATIVE_CEILING, 1.0).delta;
            assert_eq!(
                i32::from(neg),
                256 - i32::from(pos),
                "asymmetric at r = {r}"
            );
        }
    }

    #[test]
    fn test_convergence_without_overshoot() {
        for start in [1, 2, 63, 64, 127, 128, 129, 300, 1000, 5000] {
            for sign in [1, -1] {
                let target = start * sign;
                let mut rel = target;
                let mut ceiling = if rel < 0 { NEGATIVE_CEILING } else { POSITIVE_CEILING };
                let mut sum = 0i32;
                let mut iterations = 0;

                while rel != 0 {
                    let step = axis_step(rel, ceiling, 1.0);
                    sum += signed(step.delta);
                    rel = step.remaining;
                    ceiling = step.next_ceiling;
                    iterations += 1;
                    assert!(iterations < 10_000, "no convergence for {target}");
                    assert!(
                        rel.signum() == 0 || rel.signum() == target.signum(),
                        "overshoot for {target}: remaining {rel}"
                    );
                }

                assert_eq!(sum, target, "deltas do not sum for {target}");
            }
        }
    }

    #[test]
    fn test_scale_displacement_truncates_toward_zero() {
        assert_eq!(scale_displacement(10, 1.5), 15);
        assert_eq!(scale_displacement(3, 0.5), 1);
        assert_eq!(scale_displacement(-3, 0.5), -1);
        assert_eq!(scale_displacement(0, 2.0), 0);
    }

    #[test]
    fn test_plan_move_combined_sequence() {
        // Arrange / Act
        let reports = plan_move(300, -50, 1.0);

        // Assert – exact decomposition of a long X move with a shorter
        // negative Y move riding along
        assert_eq!(
            reports,
            vec![
                (127, 224),
                (127, 240),
                (32, 254),
                (8, 0),
                (4, 0),
                (2, 0),
            ]
        );

        let sum_x: i32 = reports.iter().map(|&(x, _)| signed(x)).sum();
        let sum_y: i32 = reports.iter().map(|&(_, y)| signed(y)).sum();
        assert_eq!(sum_x, 300);
        assert_eq!(sum_y, -50);
    }

    #[test]
    fn test_plan_move_speed_caps_steps_without_compounding() {
        let reports = plan_move(200, 0, 0.25);

        let sum_x: i32 = reports.iter().map(|&(x, _)| signed(x)).sum();
        assert_eq!(sum_x, 200);
        // ceil(127 * 0.25) = 32 caps every step; the cap does not shrink
        // while full steps are still possible.
        assert!(reports.iter().all(|&(x, _)| signed(x) <= 32));
        assert_eq!(reports[0].0, 32);
        assert_eq!(reports[1].0, 32);
    }

    #[test]
    fn test_plan_move_zero_displacement_is_empty() {
        assert!(plan_move(0, 0, 1.0).is_empty());
    }

    #[test]
    fn test_plan_move_single_pixel_each_direction() {
        assert_eq!(plan_move(1, 0, 1.0), vec![(1, 0)]);
        assert_eq!(plan_move(0, -1, 1.0), vec![(0, 255)]);
    }
}
