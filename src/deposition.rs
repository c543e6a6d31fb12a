use crate::curves::ParametricCurve;
use crate::materials::{DecayRate, Material, MaterialProfile, SourceTemperature};


/// Internal time unit is the shake (10 ns); pulse durations arrive in ns.
static SHAKES_PER_NS: f64 = 0.1;

/// The curves were fitted in jerks/cm^3; results are reported in Perg/cm^3.
static PERGS_PER_JERK: f64 = 10.0;

/// Below this scaled fluence the log-fluence input is clamped and a linear
/// edge factor takes over, keeping the low-fluence limit smooth.
static EDGE_FLUENCE: f64 = 1.0e-4;




/**
 * Energy deposition model for one material at one source temperature. Pure:
 * the only state is a reference into the constant profile table, so repeated
 * evaluations with equal inputs are bit-identical.
 */
#[derive(Clone, Copy)]
pub struct EnergyModel {
    pub material: Material,
    pub temperature: SourceTemperature,
    profile: &'static MaterialProfile,
}


/**
 * The seven fitted shape parameters plus the decay sharpness, evaluated at
 * one (duration, log-fluence, porosity) point. These parametrize the master
 * depth profile below.
 */
struct ShapeParameters {
    amplitude: f64,
    x_scale: f64,
    y_scale: f64,
    tail_fraction: f64,
    square_height: f64,
    base_height: f64,
    cutoff_depth: f64,
    decay_rate: f64,
}




// ============================================================================
impl EnergyModel {

    pub fn new(material: Material, temperature: SourceTemperature) -> Self {
        Self {
            material,
            temperature,
            profile: MaterialProfile::lookup(material, temperature),
        }
    }

    /**
     * Volumetric energy density in Perg/cm^3 at the given depth beneath the
     * surface.
     *
     * * `depth` - depth from the surface [cm]
     * * `cos_incidence` - cosine of the angle of incidence
     * * `fluence` - local fluence [kt/m^2]; non-positive fluence deposits
     *   nothing and returns exactly 0.0
     * * `pulse_duration` - source duration [ns]
     * * `porosity` - fractional void volume, in (0, 1)
     */
    pub fn energy_density(
        &self,
        depth: f64,
        cos_incidence: f64,
        fluence: f64,
        pulse_duration: f64,
        porosity: f64) -> f64
    {
        if fluence <= 0.0 {
            return 0.0
        }
        let tsrc = pulse_duration * SHAKES_PER_NS;
        let angle_scale = self.profile.angle_scale.eval((cos_incidence, fluence.log10(), tsrc));
        let scaled_fluence = fluence * angle_scale;

        if scaled_fluence <= 0.0 {
            return 0.0
        }
        let (log_fluence, edge_scale) = if scaled_fluence < EDGE_FLUENCE {
            (-4.0, scaled_fluence * 1.0e4)
        } else {
            (scaled_fluence.log10(), 1.0)
        };

        let par = self.shape_parameters((tsrc, log_fluence, porosity));
        let x = depth * (1.0 - porosity);

        PERGS_PER_JERK * par.amplitude * master_profile(x, &par) * (1.0 - porosity) * edge_scale
    }

    fn shape_parameters(&self, m: (f64, f64, f64)) -> ShapeParameters {
        let p = self.profile;
        ShapeParameters {
            amplitude: p.overall_scale.eval(m),
            x_scale: p.x_scale.eval(m),
            y_scale: p.y_scale.eval(m),
            tail_fraction: p.tail_fraction.eval(m),
            square_height: p.square_height.eval(m),
            base_height: p.base_height.eval(m),
            cutoff_depth: p.cutoff_depth.eval(m),
            decay_rate: match &p.decay_rate {
                DecayRate::Fixed(rate) => *rate,
                DecayRate::Fitted(curve) => curve.eval(m),
            },
        }
    }
}




/**
 * The master depth profile, in jerks/cm^3 before the overall amplitude is
 * applied. Piecewise in porosity-rescaled depth `x` about the lobe diameter
 * `2 x_scale`: a semicircular lobe over a constant shelf inside, a hyperbolic
 * tail closed by a logistic gate at the cutoff depth outside. Both branches
 * equal `square_height` at the seam.
 */
fn master_profile(x: f64, par: &ShapeParameters) -> f64 {
    let ex_scale = (1.0 - par.tail_fraction) * 2.0 * par.x_scale;
    let mut aux = (par.square_height - par.base_height) * (2.0 * par.x_scale - ex_scale);
    let mut base = par.base_height;

    // A shelf below the floor would leave a negative-height step at the seam.
    if par.square_height - par.base_height < 0.0 {
        aux = 0.0;
        base = par.square_height;
    }

    if x < 2.0 * par.x_scale {
        par.y_scale * semicircle(x / par.x_scale - 1.0) + aux / (2.0 * par.x_scale - ex_scale) + base
    } else {
        (aux / (x - ex_scale) + base) * logistic((par.cutoff_depth - x) * par.decay_rate.abs())
    }
}


/// Semicircular density lobe, normalized to unit height: sqrt(1 - u^2) on
/// [-1, 1] and zero outside.
fn semicircle(u: f64) -> f64 {
    if u.abs() <= 1.0 {
        (1.0 - u * u).sqrt()
    } else {
        0.0
    }
}


/// Logistic sigmoid, 1 / (1 + exp(-x)).
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-x))
}




// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn reference_model() -> EnergyModel {
        EnergyModel::new(Material::SiO2, SourceTemperature::TwoKev)
    }

    // On-axis fluence for the 1000 kt, 10 m height-of-burst scenario.
    static FLUENCE: f64 = 0.7957747154594768;
    static PULSE: f64 = 50.0;
    static POROSITY: f64 = 0.21;

    #[test]
    fn zero_fluence_deposits_exactly_nothing() {
        let model = reference_model();
        assert!(model.energy_density(0.01, 1.0, 0.0, PULSE, POROSITY) == 0.0);
        assert!(model.energy_density(0.01, 1.0, -1.0, PULSE, POROSITY) == 0.0);
    }

    #[test]
    fn density_is_non_negative_over_depth() {
        let model = reference_model();
        let mut depth = 1e-4;
        while depth < 10.0 {
            let density = model.energy_density(depth, 1.0, FLUENCE, PULSE, POROSITY);
            assert!(density >= 0.0 && density.is_finite());
            depth *= 1.3;
        }
    }

    #[test]
    fn density_decays_monotonically_beyond_the_lobe() {
        let model = reference_model();

        // Find the lobe diameter in physical depth, then require the profile
        // never to rise again past it.
        let mut depth = 1e-3;
        let mut peak_depth = depth;
        let mut peak = 0.0;
        while depth < 10.0 {
            let density = model.energy_density(depth, 1.0, FLUENCE, PULSE, POROSITY);
            if density > peak {
                peak = density;
                peak_depth = depth;
            }
            depth *= 1.05;
        }
        let mut last = f64::MAX;
        let mut depth = peak_depth;
        while depth < 10.0 {
            let density = model.energy_density(depth, 1.0, FLUENCE, PULSE, POROSITY);
            assert!(density <= last * (1.0 + 1e-12));
            last = density;
            depth *= 1.05;
        }
    }

    #[test]
    fn low_fluence_limit_is_continuous() {
        let model = reference_model();

        // Walk the raw fluence down until the scaled fluence crosses the
        // 1e-4 edge threshold, and require no jump across the crossing.
        let mut fluence = 1e-3;
        let mut last = model.energy_density(0.01, 1.0, fluence, PULSE, POROSITY);
        while fluence > 1e-6 {
            fluence *= 0.995;
            let density = model.energy_density(0.01, 1.0, fluence, PULSE, POROSITY);
            let scale = f64::max(last.abs(), density.abs());
            if scale > 0.0 {
                assert!((density - last).abs() / scale < 0.05);
            }
            last = density;
        }
    }

    #[test]
    fn profile_is_continuous_at_the_lobe_diameter() {
        let model = reference_model();
        let m = (PULSE * 0.1, 0.0, POROSITY);
        let par = model.shape_parameters(m);
        let seam = 2.0 * par.x_scale;
        let inside = master_profile(seam * (1.0 - 1e-9), &par);
        let outside = master_profile(seam * (1.0 + 1e-9), &par);

        // The gate is fully open at the seam whenever the cutoff sits beyond
        // it, which holds for this fit. The lobe term vanishes like the
        // square root of the offset, so the tolerance is set accordingly.
        assert!(par.cutoff_depth > seam);
        assert!((inside - outside).abs() < 1e-3 * inside.abs());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let model = reference_model();
        let a = model.energy_density(0.3, 0.8, FLUENCE, PULSE, POROSITY);
        let b = model.energy_density(0.3, 0.8, FLUENCE, PULSE, POROSITY);
        assert!(a.to_bits() == b.to_bits());
    }

    #[test]
    fn porosity_suppresses_the_deposition() {
        let model = reference_model();
        let dense = model.energy_density(0.05, 1.0, FLUENCE, PULSE, 0.05);
        let porous = model.energy_density(0.05, 1.0, FLUENCE, PULSE, 0.6);
        assert!(dense > 0.0 && porous > 0.0);
        assert!(porous < dense);
    }
}
