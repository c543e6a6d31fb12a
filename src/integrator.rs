use std::f64::consts::PI;
use serde::{Serialize, Deserialize};
use futures::future::join_all;
use crate::deposition::EnergyModel;
use crate::geometry::Irradiation;
use crate::quadrature::{self, Quadrature, Tolerances};


/// 1 kt = 4184 jerks = 4.184e4 Perg.
static PERGS_PER_KT: f64 = 4.184e4;

/// Perg/cm^3 to Perg/m^3, matching the radial integration variable in m.
static CM3_PER_M3: f64 = 1e6;

/// Pulse-smearing constant for the time-of-flight spread across an angular
/// bin; slant lengths are in meters.
static LIGHT_SPEED: f64 = 2.99792458e2;

/// The depth-bound search stops once the on-axis density falls below this.
static SEARCH_FLOOR: f64 = 1e-80;

/// A sweep ray is converged once its density falls below this.
static RAY_FLOOR: f64 = 1e-10;




// ============================================================================
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error("energy density never fell below {threshold:e} within {depth:e} cm of the surface")]
    InsufficientDepth { depth: f64, threshold: f64 },
}


/**
 * Total-deposition driver: evaluates the energy model over the illuminated
 * cap of the target, twice. The adaptive double integral is the primary
 * estimate; the zone-volume summation is an independent discretization kept
 * as its cross-check, not as a legacy path.
 */
pub struct DepositionIntegrator {
    pub model: EnergyModel,
    pub irradiation: Irradiation,
    pub tolerances: Tolerances,
}


/**
 * Run products: the three energy reports plus the discovered depth bound
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct DepositionReport {

    /// Yield fraction geometrically intercepted by the target [kt]
    pub intercepted_kt: f64,

    /// Adaptive double integral of the deposition [kt]
    pub integrated_kt: f64,

    /// Error estimate reported by the quadrature [kt]
    pub integration_error_kt: f64,

    /// Independent zone-volume summation of the deposition [kt]
    pub zone_summed_kt: f64,

    /// Depth bound found by the on-axis search [cm]
    pub max_depth_cm: f64,
}




// ============================================================================
impl DepositionReport {

    /**
     * Whether the quadrature error estimate is in proportion to the value;
     * a false return is a warning condition, not a failure.
     */
    pub fn quadrature_converged(&self) -> bool {
        self.integration_error_kt <= 0.01 * self.integrated_kt.abs()
    }
}




// ============================================================================
impl DepositionIntegrator {

    pub fn new(model: EnergyModel, irradiation: Irradiation, tolerances: Tolerances) -> Self {
        Self { model, irradiation, tolerances }
    }

    /**
     * Run the full survey: depth bound, adaptive integral, zone summation.
     */
    pub fn total_deposition(&self, runtime: &tokio::runtime::Runtime) -> Result<DepositionReport, Error> {
        let intercepted_kt = self.irradiation.intercepted_energy();
        let max_depth = self.max_depth()?;

        println!("\tdeposition depth bound ..... {:.6e} cm", max_depth);
        println!("\tstarting adaptive integral, this may be slow");

        let integrated = self.integrated(max_depth);
        let zone_summed_kt = self.zone_summed(max_depth, runtime)?;

        Ok(DepositionReport {
            intercepted_kt,
            integrated_kt: integrated.value,
            integration_error_kt: integrated.error,
            zone_summed_kt,
            max_depth_cm: max_depth,
        })
    }

    /**
     * Find a practical maximum penetration depth [cm]: grow a candidate
     * geometrically from the depth-resolution seed until the on-axis energy
     * density is numerically zero. Geometric growth keeps the search to
     * O(log depth) evaluations however deep the profile extends.
     */
    pub fn max_depth(&self) -> Result<f64, Error> {
        let irr = &self.irradiation;
        let fluence = irr.reference_fluence();
        let bound = 2.0 * irr.target_radius * 100.0;
        let mut depth = irr.depth_resolution;

        loop {
            depth *= 1.5;
            let density = self.model.energy_density(depth, 1.0, fluence, irr.pulse_duration, irr.porosity);
            if density < SEARCH_FLOOR {
                return Ok(depth)
            }
            if depth > bound {
                return Err(Error::InsufficientDepth { depth, threshold: SEARCH_FLOOR })
            }
        }
    }

    /**
     * Adaptive double integral of the deposition over the illuminated cap,
     * in kt, with the quadrature's error estimate. The integrand carries the
     * spherical-shell Jacobian 2 pi r^2 sin(theta), with r in meters.
     */
    pub fn integrated(&self, max_depth: f64) -> Quadrature {
        let irr = self.irradiation;
        let model = self.model;
        let r_inner = irr.target_radius - max_depth / 100.0;

        let integrand = move |theta: f64, radius: f64| {
            let depth = irr.target_radius - radius;
            let ray = irr.ray(theta);
            let density = model.energy_density(
                depth * 100.0,
                ray.cos_incidence,
                ray.fluence,
                irr.pulse_duration,
                irr.porosity);
            density * CM3_PER_M3 * 2.0 * PI * radius * radius * theta.sin()
        };
        let q = quadrature::integrate_2d(
            integrand,
            0.0,
            irr.theta_max(),
            r_inner,
            irr.target_radius,
            self.tolerances);

        Quadrature {
            value: q.value / PERGS_PER_KT,
            error: q.error / PERGS_PER_KT,
        }
    }

    /**
     * Zone-volume summation of the deposition in kt: every other angular bin
     * center from pole to limb, exact wedge-shell volumes in depth. The rays
     * are independent, so they run as parallel tasks; the reduction is in
     * ray order, keeping repeated runs bit-identical.
     */
    pub fn zone_summed(&self, max_depth: f64, runtime: &tokio::runtime::Runtime) -> Result<f64, Error> {
        let tasks: Vec<_> = (1..self.irradiation.angular_resolution)
            .step_by(2)
            .map(|t| {
                let model = self.model;
                let irr = self.irradiation;
                runtime.spawn(async move {
                    ray_sum(&model, &irr, max_depth, t)
                })
            })
            .collect();

        let mut total = 0.0;
        for sum in runtime.block_on(join_all(tasks)) {
            match sum.unwrap() {
                Some(ray_total) => total += ray_total,
                None => return Err(Error::InsufficientDepth { depth: max_depth, threshold: RAY_FLOOR }),
            }
        }
        Ok(total / PERGS_PER_KT)
    }
}




/**
 * Sum of density times cell volume down one sampled ray, in Perg. Returns
 * None if the ray reaches the depth bound before its density converges to
 * zero, which invalidates the whole sweep.
 */
fn ray_sum(model: &EnergyModel, irr: &Irradiation, max_depth: f64, t: usize) -> Option<f64> {
    let theta_max = irr.theta_max();
    let n = irr.angular_resolution as f64;
    let theta = theta_max * t as f64 / n;
    let theta0 = theta_max * (t as f64 - 1.0) / n;
    let theta1 = theta_max * (t as f64 + 1.0) / n;

    let ray = irr.ray(theta);
    let smeared_pulse = irr.pulse_duration
        + f64::abs(irr.slant_length(theta1) - irr.slant_length(theta0)) / LIGHT_SPEED;

    let radius_cm = irr.target_radius * 100.0;
    let wedge = theta0.cos() - theta1.cos();
    let step = irr.depth_resolution;

    let mut total = 0.0;
    let mut depth = step;

    while depth < max_depth {
        let density = model.energy_density(depth, ray.cos_incidence, ray.fluence, smeared_pulse, irr.porosity);
        if density < RAY_FLOOR {
            return Some(total)
        }
        let outer = radius_cm - (depth - step);
        let inner = radius_cm - (depth + step);
        let volume = 2.0 * PI * (outer.powi(3) - inner.powi(3)) * wedge / 3.0;
        total += density * volume;
        depth += 2.0 * step;
    }
    None
}
