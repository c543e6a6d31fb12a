use serde::{Serialize, Deserialize};




/**
 * Input to a fitted curve surface: three scalars whose meaning depends on the
 * curve family. For [`AngleCurve`] the slots are (cosine of incidence, log10
 * fluence, source duration in shakes); for every other family they are
 * (source duration in shakes, log10 scaled fluence, porosity).
 */
pub type CurveInput = (f64, f64, f64);




/**
 * A nonlinear surface fitted over a fixed-size coefficient vector. The eight
 * deposition sub-models all share this shape: three scalar inputs in, one
 * shape or scale parameter out. New material fits only supply coefficients;
 * the functional forms below never change per material.
 */
pub trait ParametricCurve {
    fn eval(&self, input: CurveInput) -> f64;
}




/**
 * Fluence scale factor for oblique incidence
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct AngleCurve(pub [f64; 12]);


/**
 * Horizontal radius of the semicircular lobe
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct RadiusCurve(pub [f64; 13]);


/**
 * Vertical scale of the semicircular lobe
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct HeightCurve(pub [f64; 6]);


/**
 * Fraction controlling where the hyperbolic tail is anchored; fitted as a
 * fraction to keep the optimizer away from unphysical anchor points
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct TailCurve(pub [f64; 9]);


/**
 * Height of the shelf beneath the lobe; must meet the tail at the lobe
 * diameter for continuity
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct ShelfCurve(pub [f64; 7]);


/**
 * Constant floor height under the tail
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct FloorCurve(pub [f64; 10]);


/**
 * Depth where the deposition drops off sharply; held fixed during profile
 * fitting to stabilize the other parameters
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct CutoffCurve(pub [f64; 10]);


/**
 * Overall amplitude of the deposition, in jerks/cm^3
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct AmplitudeCurve(pub [f64; 20]);


/**
 * Sharpness of the logistic gate that closes the tail beyond the cutoff
 * depth. Coefficients are fixed: only one material fit ever floated this
 * parameter (see [`crate::materials::DecayRate`]).
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct SharpnessCurve {
    pub power: [f64; 7],
    pub ramp: [f64; 3],
}




// ============================================================================
impl ParametricCurve for AngleCurve {
    fn eval(&self, (x, y, z): CurveInput) -> f64 {
        let p = &self.0;
        p[0] + p[1] * x + p[2] * x.powi(2)
             + p[3] * y + p[4] * y.powi(2)
             + p[5] * y.powi(2) * x.powi(2)
             + p[6] * y.powi(3)
             + p[7] * y.powi(3) * x.powi(2)
             + p[8] * z + p[9] * z.powi(2)
             + p[10] * x.powi(2) * z.powi(2)
             + p[11] * z * x.powi(2)
    }
}

impl ParametricCurve for RadiusCurve {
    fn eval(&self, (x, y, z): CurveInput) -> f64 {
        let p = &self.0;
        let power = p[0] + p[1] * x
                  + p[2] * y + p[3] * y.powi(2)
                  + p[4] * y.powi(2) * x
                  + p[5] * y.powi(3)
                  + p[6] * y.powi(3) * x.powi(2);
        let bump = p[7]
                 * f64::exp((p[8] * x.powi(2) + p[9] * x) * (z - p[10]))
                 * f64::exp(-(p[11] * x.powi(2)) * (y - p[12]).powi(2));
        10f64.powf(power) * (1.0 + bump)
    }
}

impl ParametricCurve for HeightCurve {
    fn eval(&self, (x, y, _z): CurveInput) -> f64 {
        let p = &self.0;
        let power = p[0] + p[1] * y
                  + p[2] * y * x.powi(3)
                  + p[3] * y.powi(2)
                  + p[4] * y.powi(2) * x.powi(3)
                  + p[5] * y.powi(3);
        10f64.powf(power)
    }
}

impl ParametricCurve for TailCurve {
    fn eval(&self, (x, y, _z): CurveInput) -> f64 {
        let p = &self.0;
        let power = p[0] + p[1] * x + p[2] * x.powi(2) + p[3] * x.powi(3)
                  + p[4] * y + p[5] * y.powi(2)
                  + p[6] * y.powi(3) * x
                  + p[7] * y.powi(3) * x.powi(2)
                  + p[8] * y.powi(3) * x.powi(3);
        10f64.powf(power)
    }
}

impl ParametricCurve for ShelfCurve {
    fn eval(&self, (x, y, _z): CurveInput) -> f64 {
        let p = &self.0;
        let f = p[0] + p[1] * x.powi(2)
              + p[2] * y + p[3] * y * x.powi(2)
              + p[4] * y.powi(2)
              + p[5] * y.powi(2) * x.powi(2)
              + p[6] * y.powi(3);
        f.abs()
    }
}

impl ParametricCurve for FloorCurve {
    fn eval(&self, (x, y, z): CurveInput) -> f64 {
        let p = &self.0;
        let power = p[0] + p[1] * x + p[2] * x.powi(2)
                  + p[3] * y + p[4] * y * x
                  + p[5] * y.powi(3);
        let ramp = 1.0 + p[6] * z
                 + p[7] * y.powi(2) * z.powi(3)
                 + p[8] * y.powi(3) * z.powi(3)
                 + p[9] * x * z;
        10f64.powf(power) * ramp
    }
}

impl ParametricCurve for CutoffCurve {
    fn eval(&self, (x, y, z): CurveInput) -> f64 {
        let p = &self.0;
        let power = p[0] + p[1] * x
                  + p[2] * y + p[3] * y * x
                  + p[4] * y * x.powi(2)
                  + p[5] * y.powi(2);
        let ramp = 1.0 + p[6] * z + p[7] * z.powi(3)
                 + p[8] * y.powi(2) * z
                 + p[9] * x * z;
        10f64.powf(power) * ramp
    }
}

impl ParametricCurve for AmplitudeCurve {
    fn eval(&self, (x, y, z): CurveInput) -> f64 {
        let p = &self.0;
        let base = p[0] + p[1] * x.powi(3)
                 + p[2] * y + p[3] * y * x + p[4] * y * x.powi(2)
                 + p[5] * y.powi(2) + p[6] * y.powi(2) * x + p[7] * y.powi(2) * x.powi(2)
                 + p[8] * y.powi(3) + p[9] * y.powi(3) * x + p[10] * y.powi(3) * x.powi(2)
                 + p[11] * y.powi(4);
        let ramp_a = 1.0 + p[12] * z + p[13] * y.powi(2) * z + p[14] * x * z;
        let ramp_b = 1.0 + p[15] * z.powi(3) + p[16] * y * z
                   + p[17] * y.powi(2) * z.powi(2)
                   + p[18] * y.powi(2) * z.powi(3)
                   + p[19] * x * z.powi(2);
        (base * ramp_a * ramp_b).abs()
    }
}

impl ParametricCurve for SharpnessCurve {
    fn eval(&self, (x, y, z): CurveInput) -> f64 {
        let p = &self.power;
        let q = &self.ramp;
        let power = p[0] + p[1] * y
                  + p[2] * y * x + p[3] * y * x.powi(2) + p[4] * y * x.powi(3)
                  + p[5] * y.powi(2) + p[6] * y.powi(3);
        let ramp = 1.0 + q[0] * z
                 + q[1] * y.powi(2) * z
                 + q[2] * y.powi(3) * z;
        10f64.powf(power) * ramp
    }
}
