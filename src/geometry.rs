use std::f64::consts::PI;
use serde::{Serialize, Deserialize};




/**
 * Everything geometric and radiometric about one irradiation scenario: a
 * point source detonated above a spherical target of uniform material. Plain
 * value data, constant per run.
 */
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Irradiation {

    /// Target body radius [m]
    pub target_radius: f64,

    /// Altitude of the source above the surface [m]
    pub height_of_burst: f64,

    /// Source yield [kt]
    pub source_yield: f64,

    /// Source pulse duration [ns]
    pub pulse_duration: f64,

    /// Fractional void volume of the target material, in (0, 1)
    pub porosity: f64,

    /// Number of angular bins in the zone-volume sweep
    pub angular_resolution: usize,

    /// Depth sampling resolution [cm]; also seeds the depth-bound search
    pub depth_resolution: f64,
}


/**
 * Local illumination at one polar angle on the surface
 */
#[derive(Clone, Copy)]
pub struct Ray {

    /// Cosine of the angle of incidence at the surface point
    pub cos_incidence: f64,

    /// Local fluence [kt/m^2]
    pub fluence: f64,
}




// ============================================================================
impl Irradiation {

    /**
     * Polar angle at which the ray from the source grazes the surface; the
     * illuminated cap spans [0, theta_max].
     */
    pub fn theta_max(&self) -> f64 {
        (self.target_radius / (self.target_radius + self.height_of_burst)).acos()
    }

    /**
     * Half-angle subtended by the target as seen from the source.
     */
    pub fn alpha_max(&self) -> f64 {
        (self.target_radius / (self.target_radius + self.height_of_burst)).asin()
    }

    /**
     * The portion of the yield whose solid angle is intercepted by the
     * target. Purely geometric, independent of material. [kt]
     */
    pub fn intercepted_energy(&self) -> f64 {
        self.source_yield * 0.5 * (1.0 - self.alpha_max().cos())
    }

    /**
     * Slant distance from the source to the surface point at polar angle
     * `theta` from the sub-burst axis. [m]
     */
    pub fn slant_length(&self, theta: f64) -> f64 {
        let s = self.target_radius + self.height_of_burst;
        let r = self.target_radius;
        f64::sqrt(s * s + r * r - 2.0 * s * r * theta.cos())
    }

    /**
     * Illumination of the surface point at polar angle `theta`.
     */
    pub fn ray(&self, theta: f64) -> Ray {
        let s = self.target_radius + self.height_of_burst;
        let length = self.slant_length(theta);
        let cos_incidence = f64::cos(f64::asin(theta.sin() * s / length));
        let fluence = self.source_yield * cos_incidence / (4.0 * PI * length * length);
        Ray { cos_incidence, fluence }
    }

    /**
     * On-axis fluence directly beneath the burst, used as the reference when
     * searching for the maximum penetration depth. [kt/m^2]
     */
    pub fn reference_fluence(&self) -> f64 {
        self.source_yield / (4.0 * PI * self.height_of_burst * self.height_of_burst)
    }
}
