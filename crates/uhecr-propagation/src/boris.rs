//! Boris-push propagation of charged particles.
//!
//! Each step is a leapfrog: half a step along the (advection-corrected)
//! direction, a Boris rotation with the magnetic field sampled at the
//! midpoint, then the second half step. The rotation preserves the norm
//! of the direction exactly, so long trajectories do not drift in speed.
//!
//! With [`StepControl::Adaptive`] every trial step is repeated as two half
//! steps; the position discrepancy drives the step size between the
//! configured bounds. Neutral particles skip the rotation and move along
//! a straight line.

use std::sync::Arc;

use uhecr_core::units::{C_LIGHT, C_SQUARED, KPC};
use uhecr_core::{
    AdvectionField, Candidate, ConfigError, InteractionError, MagneticField, RandomSource,
    Vector3,
};
use uhecr_interaction::Process;

const NAME: &str = "BorisPropagator";

/// Tolerance used in fixed mode, where it never enters a decision.
const FIXED_TOLERANCE: f64 = 0.42;
/// Upstream field weakening at the shock: B is compressed by sqrt(11).
const SHOCK_COMPRESSION: f64 = 3.316_624_790_355_4; // sqrt(11)
/// Safety factor applied to every step-size proposal.
const SAFETY: f64 = 0.95;
/// Exponent of the error ratio in the step-size proposal.
const ERROR_EXPONENT: f64 = -0.2;
/// A retry shrinks the step by at most this factor.
const MAX_SHRINK: f64 = 0.1;
/// A proposal grows the step by at most this factor.
const MAX_GROWTH: f64 = 5.0;
/// One step versus two half steps of a second-order scheme: 1 - (1/2)^2.
const ORDER_NORMALIZATION: f64 = 0.75;

/// How the propagator chooses its step length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepControl {
    /// Every step has the same length [m].
    Fixed {
        /// Step length [m].
        step: f64,
    },
    /// Step length adapts to the local error estimate.
    Adaptive {
        /// Target relative position error, in `[0, 1]`.
        tolerance: f64,
        /// Smallest step [m].
        min_step: f64,
        /// Largest step [m].
        max_step: f64,
    },
}

/// Position and direction after a (partial) push.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Phase {
    position: Vector3,
    direction: Vector3,
}

/// Boris-push propagator with optional advection and shock scaling.
pub struct BorisPropagator {
    field: Arc<dyn MagneticField>,
    advection: Option<Arc<dyn AdvectionField>>,
    tolerance: f64,
    min_step: f64,
    max_step: f64,
    shock_radius: f64,
}

/// Builder for [`BorisPropagator`].
///
/// Required: `field` and `step_control`. No advection and no shock
/// (`shock_radius = 0`) by default.
pub struct BorisPropagatorBuilder {
    field: Option<Arc<dyn MagneticField>>,
    advection: Option<Arc<dyn AdvectionField>>,
    step_control: Option<StepControl>,
    shock_radius: f64,
}

impl BorisPropagator {
    /// Create a builder.
    pub fn builder() -> BorisPropagatorBuilder {
        BorisPropagatorBuilder {
            field: None,
            advection: None,
            step_control: None,
            shock_radius: 0.0,
        }
    }
}

impl BorisPropagatorBuilder {
    /// Magnetic field to propagate through.
    pub fn field(mut self, field: Arc<dyn MagneticField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Bulk flow added to the particle direction.
    pub fn advection(mut self, advection: Arc<dyn AdvectionField>) -> Self {
        self.advection = Some(advection);
        self
    }

    /// Fixed or adaptive step control.
    pub fn step_control(mut self, control: StepControl) -> Self {
        self.step_control = Some(control);
        self
    }

    /// Shorthand for [`StepControl::Fixed`].
    pub fn fixed_step(self, step: f64) -> Self {
        self.step_control(StepControl::Fixed { step })
    }

    /// Shorthand for [`StepControl::Adaptive`].
    pub fn adaptive(self, tolerance: f64, min_step: f64, max_step: f64) -> Self {
        self.step_control(StepControl::Adaptive {
            tolerance,
            min_step,
            max_step,
        })
    }

    /// Radius [m] inside which the field is scaled as upstream of a
    /// spherical shock. Zero disables the scaling.
    pub fn shock_radius(mut self, radius: f64) -> Self {
        self.shock_radius = radius;
        self
    }

    /// Validate the configuration and build the propagator.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] without a field or step control,
    /// [`ConfigError::InvalidTolerance`] for a tolerance outside `[0, 1]`,
    /// [`ConfigError::InvalidStep`] for negative, non-finite or inverted
    /// step bounds, [`ConfigError::InvalidShockRadius`] for a negative
    /// radius.
    pub fn build(self) -> Result<BorisPropagator, ConfigError> {
        let field = self.field.ok_or(ConfigError::MissingField { name: "field" })?;
        let control = self
            .step_control
            .ok_or(ConfigError::MissingField { name: "step_control" })?;
        let (tolerance, min_step, max_step) = match control {
            StepControl::Fixed { step } => (FIXED_TOLERANCE, step, step),
            StepControl::Adaptive {
                tolerance,
                min_step,
                max_step,
            } => (tolerance, min_step, max_step),
        };
        check_tolerance(tolerance)?;
        check_bounds(min_step, max_step)?;
        check_shock_radius(self.shock_radius)?;
        Ok(BorisPropagator {
            field,
            advection: self.advection,
            tolerance,
            min_step,
            max_step,
            shock_radius: self.shock_radius,
        })
    }
}

fn check_tolerance(tolerance: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&tolerance) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { value: tolerance })
    }
}

fn check_bounds(min_step: f64, max_step: f64) -> Result<(), ConfigError> {
    if !min_step.is_finite() || !max_step.is_finite() {
        return Err(ConfigError::InvalidStep {
            reason: format!("bounds must be finite, got [{min_step}, {max_step}]"),
        });
    }
    if min_step < 0.0 {
        return Err(ConfigError::InvalidStep {
            reason: format!("minimum step {min_step} < 0"),
        });
    }
    if min_step > max_step {
        return Err(ConfigError::InvalidStep {
            reason: format!("minimum step {min_step} > maximum step {max_step}"),
        });
    }
    Ok(())
}

fn check_shock_radius(radius: f64) -> Result<(), ConfigError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidShockRadius { value: radius })
    }
}

impl BorisPropagator {
    /// Target relative error.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Smallest allowed step [m].
    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    /// Largest allowed step [m].
    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Shock radius [m]; zero when disabled.
    pub fn shock_radius(&self) -> f64 {
        self.shock_radius
    }

    /// Whether the step size is adapted (minimum below maximum).
    pub fn is_adaptive(&self) -> bool {
        self.min_step < self.max_step
    }

    /// Set the target error.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTolerance`] outside `[0, 1]`.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), ConfigError> {
        check_tolerance(tolerance)?;
        self.tolerance = tolerance;
        Ok(())
    }

    /// Set the smallest step.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidStep`] if negative or above the maximum.
    pub fn set_min_step(&mut self, min_step: f64) -> Result<(), ConfigError> {
        check_bounds(min_step, self.max_step)?;
        self.min_step = min_step;
        Ok(())
    }

    /// Set the largest step.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidStep`] if below the minimum.
    pub fn set_max_step(&mut self, max_step: f64) -> Result<(), ConfigError> {
        check_bounds(self.min_step, max_step)?;
        self.max_step = max_step;
        Ok(())
    }

    /// Set the shock radius.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidShockRadius`] if negative or non-finite.
    pub fn set_shock_radius(&mut self, radius: f64) -> Result<(), ConfigError> {
        check_shock_radius(radius)?;
        self.shock_radius = radius;
        Ok(())
    }

    /// Replace the advection field; `None` removes it.
    pub fn set_advection(&mut self, advection: Option<Arc<dyn AdvectionField>>) {
        self.advection = advection;
    }

    /// Magnetic field [T] at `position`, including the shock scaling.
    ///
    /// Evaluation failures are logged and yield a zero field.
    pub fn field_at(&self, position: &Vector3, z: f64) -> Vector3 {
        let b = match self.field.field(position, z) {
            Ok(b) => b,
            Err(e) => {
                log::error!("{NAME}: magnetic field evaluation failed: {e}");
                return Vector3::zeros();
            }
        };
        let r = position.norm();
        if r > 0.0 && r < self.shock_radius {
            b * (self.shock_radius / r / SHOCK_COMPRESSION)
        } else {
            b
        }
    }

    /// Advection velocity [m/s] at `position`; zero without a field.
    ///
    /// Evaluation failures are logged and yield zero.
    pub fn advection_at(&self, position: &Vector3) -> Vector3 {
        let Some(advection) = &self.advection else {
            return Vector3::zeros();
        };
        advection.velocity(position).unwrap_or_else(|e| {
            log::error!("{NAME}: advection field evaluation failed: {e}");
            Vector3::zeros()
        })
    }

    /// Human-readable summary of the configuration.
    pub fn description(&self) -> String {
        format!(
            "Propagation in magnetic fields using the adaptive Boris push method. \
             Target error: {}, Minimum Step: {} kpc, Maximum Step: {} kpc",
            self.tolerance,
            in_kpc(self.min_step),
            in_kpc(self.max_step)
        )
    }

    /// One leapfrog step of length `step` with the Boris rotation.
    ///
    /// `q_over_m` uses the relativistic mass E/c².
    fn push(&self, start: Phase, step: f64, z: f64, q_over_m: f64) -> Phase {
        // The wind is sampled once, at the start of the step.
        let wind = self.advection_at(&start.position) / C_LIGHT;

        let mut position = start.position + advected(&start.direction, &wind) * (step / 2.0);
        let b = self.field_at(&position, z);

        let t = b * (q_over_m / 2.0 * step / C_LIGHT);
        let s = t * (2.0 / (1.0 + t.dot(&t)));
        let d = start.direction;
        let v = d + d.cross(&t);
        let direction = d + v.cross(&s);

        position += advected(&direction, &wind) * (step / 2.0);
        Phase {
            position,
            direction,
        }
    }

    /// Full step plus the normalised discrepancy against two half steps.
    fn try_step(&self, start: Phase, step: f64, z: f64, q_over_m: f64) -> (Phase, f64) {
        let full = self.push(start, step, z, q_over_m);
        let half = self.push(start, step / 2.0, z, q_over_m);
        let halves = self.push(half, step / 2.0, z, q_over_m);
        let error = (full.position - halves.position).norm() / (step * ORDER_NORMALIZATION);
        (full, error)
    }

    fn error_ratio(&self, error: f64) -> f64 {
        if error == 0.0 {
            0.0
        } else {
            error / self.tolerance
        }
    }

    /// Adaptive retry loop. Returns the accepted phase, the step taken and
    /// the proposal for the next step.
    fn adaptive_step(
        &self,
        start: Phase,
        requested: f64,
        z: f64,
        q_over_m: f64,
    ) -> (Phase, f64, f64) {
        let mut step = requested.clamp(self.min_step, self.max_step);
        let mut next = step;
        loop {
            let (out, error) = self.try_step(start, step, z, q_over_m);
            let r = self.error_ratio(error);
            if r > 1.0 {
                if step == self.min_step {
                    log::warn!(
                        "{NAME}: accepting minimum step {} m with error ratio {r}",
                        self.min_step
                    );
                    return (out, step, next);
                }
                next = (step * SAFETY * r.powf(ERROR_EXPONENT))
                    .max(MAX_SHRINK * step)
                    .max(self.min_step);
                step = next;
            } else {
                if step != self.max_step {
                    next = (step * SAFETY * r.powf(ERROR_EXPONENT))
                        .min(MAX_GROWTH * step)
                        .min(self.max_step)
                        .max(self.min_step);
                }
                return (out, step, next);
            }
        }
    }
}

/// Direction combined with the wind velocity `wind` (in units of c).
fn advected(direction: &Vector3, wind: &Vector3) -> Vector3 {
    if *wind == Vector3::zeros() {
        return *direction;
    }
    (direction + wind)
        .try_normalize(0.0)
        .unwrap_or(*direction)
}

impl Process for BorisPropagator {
    fn name(&self) -> &str {
        NAME
    }

    fn process(
        &self,
        candidate: &mut Candidate,
        _rng: &mut dyn RandomSource,
    ) -> Result<(), InteractionError> {
        candidate.previous = candidate.current.clone();
        let start = Phase {
            position: candidate.current.position(),
            direction: candidate.current.direction(),
        };
        let q = candidate.current.charge();
        let energy = candidate.current.energy();

        if q == 0.0 || energy <= 0.0 {
            let step = candidate.next_step().clamp(self.min_step, self.max_step);
            candidate
                .current
                .set_position(start.position + start.direction * step);
            candidate.set_current_step(step);
            candidate.set_next_step(self.max_step);
            return Ok(());
        }

        let z = candidate.redshift();
        let q_over_m = q * C_SQUARED / energy;
        let (out, step, next) = if self.is_adaptive() {
            self.adaptive_step(start, candidate.next_step(), z, q_over_m)
        } else {
            let out = self.push(start, self.max_step, z, q_over_m);
            (out, self.max_step, self.max_step)
        };

        candidate.current.set_position(out.position);
        candidate.current.set_direction(out.direction);
        candidate.set_current_step(step);
        candidate.set_next_step(next);
        Ok(())
    }
}

/// `length` in kpc, rounded to a micro-kpc so unit round-off stays out of
/// printed output.
fn in_kpc(length: f64) -> f64 {
    (length / KPC * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uhecr_core::units::{EEV, MPC, NANOGAUSS};
    use uhecr_core::{ParticleId, UniformAdvectionField, UniformMagneticField};
    use uhecr_test_utils::{CountingField, FailingField, MockRandom};

    fn uniform(b: Vector3) -> Arc<dyn MagneticField> {
        Arc::new(UniformMagneticField::new(b))
    }

    fn fixed(b: Vector3, step: f64) -> BorisPropagator {
        BorisPropagator::builder()
            .field(uniform(b))
            .fixed_step(step)
            .build()
            .unwrap()
    }

    fn proton() -> Candidate {
        Candidate::new(ParticleId::PROTON, 1.0 * EEV)
    }

    #[test]
    fn builder_requires_field_and_step_control() {
        let err = BorisPropagator::builder().fixed_step(1.0).build().err().unwrap();
        assert_eq!(err, ConfigError::MissingField { name: "field" });
        let err = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::MissingField { name: "step_control" });
    }

    #[test]
    fn builder_validates_ranges() {
        let base = || BorisPropagator::builder().field(uniform(Vector3::zeros()));
        assert_eq!(
            base().adaptive(1.5, 1.0, 2.0).build().err(),
            Some(ConfigError::InvalidTolerance { value: 1.5 })
        );
        assert_eq!(
            base().adaptive(-0.1, 1.0, 2.0).build().err(),
            Some(ConfigError::InvalidTolerance { value: -0.1 })
        );
        assert!(matches!(
            base().adaptive(0.1, 3.0, 2.0).build(),
            Err(ConfigError::InvalidStep { .. })
        ));
        assert!(matches!(
            base().adaptive(0.1, -1.0, 2.0).build(),
            Err(ConfigError::InvalidStep { .. })
        ));
        assert!(matches!(
            base().fixed_step(f64::INFINITY).build(),
            Err(ConfigError::InvalidStep { .. })
        ));
        assert_eq!(
            base().fixed_step(1.0).shock_radius(-1.0).build().err(),
            Some(ConfigError::InvalidShockRadius { value: -1.0 })
        );
    }

    #[test]
    fn fixed_mode_pins_bounds() {
        let p = fixed(Vector3::zeros(), 2.0 * KPC);
        assert_eq!(p.min_step(), 2.0 * KPC);
        assert_eq!(p.max_step(), 2.0 * KPC);
        assert_eq!(p.tolerance(), FIXED_TOLERANCE);
        assert!(!p.is_adaptive());
    }

    #[test]
    fn setters_keep_bounds_ordered() {
        let mut p = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .adaptive(0.1, 1.0, 10.0)
            .build()
            .unwrap();
        assert!(p.set_min_step(11.0).is_err());
        assert!(p.set_max_step(0.5).is_err());
        assert!(p.set_tolerance(2.0).is_err());
        p.set_max_step(20.0).unwrap();
        p.set_min_step(5.0).unwrap();
        p.set_tolerance(0.0).unwrap();
        assert_eq!((p.min_step(), p.max_step(), p.tolerance()), (5.0, 20.0, 0.0));
    }

    #[test]
    fn neutral_particle_moves_in_a_straight_line() {
        let step = 0.1 * MPC;
        let p = fixed(Vector3::new(0.0, 0.0, 1e3 * NANOGAUSS), step);
        let direction = Vector3::new(1.0, 2.0, -3.0).normalize();
        let start = Vector3::new(1.0 * MPC, -2.0 * MPC, 0.5 * MPC);
        let mut c = Candidate::new(ParticleId::NEUTRON, 1.0 * EEV).at_position(start);
        c.current.set_direction(direction);
        let direction = c.current.direction();

        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.current.position(), start + direction * step);
        assert_eq!(c.current.direction(), direction);
        assert_eq!(c.current_step(), step);
        assert_eq!(c.next_step(), step);
    }

    #[test]
    fn neutral_step_is_clipped_and_next_step_reset() {
        let p = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .adaptive(0.1, 1.0 * KPC, 100.0 * KPC)
            .build()
            .unwrap();
        let mut c = Candidate::new(ParticleId::PHOTON, 1.0 * EEV);
        c.set_next_step(0.01 * KPC);
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.current_step(), 1.0 * KPC);
        assert_eq!(c.next_step(), 100.0 * KPC);

        c.set_next_step(f64::MAX);
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.current_step(), 100.0 * KPC);
    }

    #[test]
    fn previous_holds_the_state_before_the_step() {
        let p = fixed(Vector3::new(0.0, 0.0, NANOGAUSS), 1.0 * KPC);
        let mut c = proton();
        c.current.set_position(Vector3::new(3.0, 4.0, 5.0));
        let before = c.current.clone();
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.previous, before);
        assert_ne!(c.current.position(), before.position());
    }

    #[test]
    fn field_is_sampled_at_the_midpoint() {
        let field = Arc::new(CountingField::new(Vector3::new(0.0, 0.0, NANOGAUSS)));
        let p = BorisPropagator::builder()
            .field(field.clone())
            .fixed_step(2.0 * KPC)
            .build()
            .unwrap();
        let mut c = proton();
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        let positions = field.positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0], Vector3::new(-1.0 * KPC, 0.0, 0.0));
    }

    #[test]
    fn adaptive_trial_samples_three_midpoints() {
        let field = Arc::new(CountingField::new(Vector3::zeros()));
        let p = BorisPropagator::builder()
            .field(field.clone())
            .adaptive(0.1, 1.0 * KPC, 4.0 * KPC)
            .build()
            .unwrap();
        let mut c = proton();
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        let xs: Vec<f64> = field.positions().iter().map(|x| x.x / KPC).collect();
        assert_eq!(xs.len(), 3);
        assert!((xs[0] + 2.0).abs() < 1e-12);
        assert!((xs[1] + 1.0).abs() < 1e-12);
        assert!((xs[2] + 3.0).abs() < 1e-12);
    }

    #[test]
    fn failing_field_counts_as_zero() {
        let field = Arc::new(FailingField::always());
        let p = BorisPropagator::builder()
            .field(field.clone())
            .fixed_step(1.0 * KPC)
            .build()
            .unwrap();
        let mut c = proton();
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(field.calls(), 1);
        assert_eq!(c.current.direction(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(c.current.position(), Vector3::new(-1.0 * KPC, 0.0, 0.0));
    }

    #[test]
    fn shock_scales_the_upstream_field() {
        let b = Vector3::new(0.0, NANOGAUSS, 0.0);
        let p = BorisPropagator::builder()
            .field(uniform(b))
            .fixed_step(1.0)
            .shock_radius(10.0 * KPC)
            .build()
            .unwrap();

        let inside = p.field_at(&Vector3::new(2.0 * KPC, 0.0, 0.0), 0.0);
        let expected = 5.0 / 11f64.sqrt() * NANOGAUSS;
        assert!((inside.y / expected - 1.0).abs() < 1e-12);

        assert_eq!(p.field_at(&Vector3::new(20.0 * KPC, 0.0, 0.0), 0.0), b);
        assert_eq!(p.field_at(&Vector3::zeros(), 0.0), b);
        assert_eq!(fixed(b, 1.0).field_at(&Vector3::new(1.0, 0.0, 0.0), 0.0), b);
    }

    #[test]
    fn advection_tilts_the_path() {
        let p = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .advection(Arc::new(UniformAdvectionField::new(Vector3::new(
                0.0,
                0.5 * C_LIGHT,
                0.0,
            ))))
            .fixed_step(1.0 * KPC)
            .build()
            .unwrap();
        let mut c = proton();
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        let expected = Vector3::new(-1.0, 0.5, 0.0).normalize() * KPC;
        assert!((c.current.position() - expected).norm() / KPC < 1e-12);
        // The wind moves the particle but does not turn it.
        assert!((c.current.direction() - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-15);
    }

    #[test]
    fn straight_line_grows_the_step() {
        let p = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .adaptive(0.1, 1.0 * KPC, 100.0 * KPC)
            .build()
            .unwrap();
        let mut c = proton();
        c.set_next_step(2.0 * KPC);
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.current_step(), 2.0 * KPC);
        assert!((c.next_step() / (10.0 * KPC) - 1.0).abs() < 1e-12);

        c.set_next_step(50.0 * KPC);
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.next_step(), 100.0 * KPC);
    }

    #[test]
    fn unreachable_tolerance_settles_on_the_minimum() {
        // 1 EeV proton in 1 mG: Larmor radius of about 1 pc.
        let p = BorisPropagator::builder()
            .field(uniform(Vector3::new(0.0, 0.0, 1e6 * NANOGAUSS)))
            .adaptive(1e-9, 0.01 * KPC, 10.0 * KPC)
            .build()
            .unwrap();
        let mut c = proton();
        p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
        assert_eq!(c.current_step(), 0.01 * KPC);
    }

    #[test]
    fn description_lists_bounds_in_kpc() {
        let p = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .adaptive(0.1, 1.0 * KPC, 10.0 * KPC)
            .build()
            .unwrap();
        let text = p.description();
        assert!(text.contains("Target error: 0.1"));
        assert!(text.contains("Minimum Step: 1 kpc"));
        assert!(text.contains("Maximum Step: 10 kpc"));

        let p = BorisPropagator::builder()
            .field(uniform(Vector3::zeros()))
            .adaptive(1e-4, 0.3 * KPC, 1000.0 * KPC)
            .build()
            .unwrap();
        let text = p.description();
        assert!(text.ends_with("Minimum Step: 0.3 kpc, Maximum Step: 1000 kpc"), "{text}");
    }

    proptest! {
        #[test]
        fn rotation_preserves_the_norm(
            bx in -1e-6f64..1e-6,
            by in -1e-6f64..1e-6,
            bz in -1e-6f64..1e-6,
            step_kpc in 0.01f64..100.0,
            steps in 1usize..200,
        ) {
            let p = fixed(Vector3::new(bx, by, bz), step_kpc * KPC);
            let q_over_m = uhecr_core::units::ELEMENTARY_CHARGE * C_SQUARED / EEV;
            let mut phase = Phase {
                position: Vector3::zeros(),
                direction: Vector3::new(0.0, 0.6, 0.8),
            };
            for _ in 0..steps {
                phase = p.push(phase, step_kpc * KPC, 0.0, q_over_m);
            }
            prop_assert!((phase.direction.norm() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn adaptive_steps_stay_within_bounds(
            b_ng in 0.0f64..1e4,
            tolerance in 1e-6f64..1.0,
            requested_kpc in 0.0f64..1e3,
        ) {
            let (min, max) = (0.1 * KPC, 50.0 * KPC);
            let p = BorisPropagator::builder()
                .field(uniform(Vector3::new(0.0, 0.0, b_ng * NANOGAUSS)))
                .adaptive(tolerance, min, max)
                .build()
                .unwrap();
            let mut c = proton();
            c.set_next_step(requested_kpc * KPC);
            p.process(&mut c, &mut MockRandom::seeded(0)).unwrap();
            prop_assert!(c.current_step() >= min && c.current_step() <= max);
            prop_assert!(c.next_step() >= min && c.next_step() <= max);
        }
    }
}
