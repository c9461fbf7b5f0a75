//! Renderer-ready pattern data
//!
//! Turns a field slice into the four real-valued panels a pattern plot
//! shows (two representations of each of two components) together with the
//! planar coordinates of the chosen map projection. Drawing is left to the
//! caller.
//!
//! | Projection              | x                | y                | axes                                |
//! |-------------------------|------------------|------------------|-------------------------------------|
//! | `orthographic`          | sin θ · cos φ    | sin θ · sin φ    | `l`, `m` (θ > 90° masked)           |
//! | `azimuthal-equidistant` | θ · cos φ        | θ · sin φ        | `theta*cos(phi)`, `theta*sin(phi)`  |
//! | `equirectangular`       | φ in degrees     | θ in degrees     | `phi`, `theta`                      |

use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

use crate::field::TangentialField;
use crate::grid::SphericalGrid;
use crate::polarization::{sph_to_circular, sph_to_ludwig3};
use crate::types::{Complex, ComplexGrid, FieldError, FieldResult};

/// Map projection of the sphere onto the plot plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    #[default]
    Orthographic,
    AzimuthalEquidistant,
    Equirectangular,
}

/// Component basis shown in the panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VectorComponents {
    #[default]
    #[serde(rename = "sph")]
    Spherical,
    #[serde(rename = "Ludwig3")]
    Ludwig3,
    #[serde(rename = "circ")]
    Circular,
}

/// Real-valued split of a complex component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComplexRepr {
    ReIm,
    #[default]
    AbsAng,
}

impl FromStr for Projection {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orthographic" => Ok(Projection::Orthographic),
            "azimuthal-equidistant" => Ok(Projection::AzimuthalEquidistant),
            "equirectangular" => Ok(Projection::Equirectangular),
            other => Err(FieldError::Configuration(format!("unknown map projection '{}'", other))),
        }
    }
}

impl FromStr for VectorComponents {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sph" => Ok(VectorComponents::Spherical),
            "Ludwig3" => Ok(VectorComponents::Ludwig3),
            "circ" => Ok(VectorComponents::Circular),
            other => Err(FieldError::Configuration(format!(
                "unknown vector component coord sys '{}'",
                other
            ))),
        }
    }
}

impl FromStr for ComplexRepr {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReIm" => Ok(ComplexRepr::ReIm),
            "AbsAng" => Ok(ComplexRepr::AbsAng),
            other => Err(FieldError::Configuration(format!(
                "unknown complex representation '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Projection::Orthographic => "orthographic",
            Projection::AzimuthalEquidistant => "azimuthal-equidistant",
            Projection::Equirectangular => "equirectangular",
        };
        write!(f, "{}", s)
    }
}

/// Planar coordinates of every grid sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    /// `true` marks samples hidden from the plot
    pub mask: Option<Array2<bool>>,
    pub axis_names: (&'static str, &'static str),
    /// Suggested x tick positions
    pub x_ticks: Option<Vec<f64>>,
}

impl Projection {
    pub fn axis_names(self) -> (&'static str, &'static str) {
        match self {
            Projection::Orthographic => ("l", "m"),
            Projection::AzimuthalEquidistant => ("theta*cos(phi)", "theta*sin(phi)"),
            Projection::Equirectangular => ("phi", "theta"),
        }
    }

    /// Project the grid. Orthographic views always hide the lower
    /// hemisphere.
    pub fn project(self, grid: &SphericalGrid) -> ProjectedGrid {
        let (theta, phi) = (grid.theta(), grid.phi());
        let mut x = Array2::zeros(grid.dim());
        let mut y = Array2::zeros(grid.dim());
        Zip::from(&mut x)
            .and(&mut y)
            .and(theta)
            .and(phi)
            .for_each(|x, y, &t, &p| {
                let (a, b) = match self {
                    Projection::Orthographic => (t.sin() * p.cos(), t.sin() * p.sin()),
                    Projection::AzimuthalEquidistant => (t * p.cos(), t * p.sin()),
                    Projection::Equirectangular => (p.to_degrees(), t.to_degrees()),
                };
                *x = a;
                *y = b;
            });
        let mask = match self {
            Projection::Orthographic => Some(lower_hemisphere(grid)),
            _ => None,
        };
        let x_ticks = match self {
            Projection::Equirectangular => Some((0..=8).map(|k| 45.0 * k as f64).collect()),
            _ => None,
        };
        ProjectedGrid {
            x,
            y,
            mask,
            axis_names: self.axis_names(),
            x_ticks,
        }
    }
}

fn lower_hemisphere(grid: &SphericalGrid) -> Array2<bool> {
    grid.theta().mapv(|t| t > FRAC_PI_2)
}

impl VectorComponents {
    pub fn names(self) -> (&'static str, &'static str) {
        match self {
            VectorComponents::Spherical => ("E_theta", "E_phi"),
            VectorComponents::Ludwig3 => ("E_u", "E_v"),
            VectorComponents::Circular => ("LCP", "RCP"),
        }
    }

    /// Convert spherical components sampled at azimuths `phi`.
    pub fn convert(
        self,
        phi: &Array2<f64>,
        f_th: ArrayView2<Complex>,
        f_ph: ArrayView2<Complex>,
    ) -> FieldResult<(ComplexGrid, ComplexGrid)> {
        match self {
            VectorComponents::Spherical => {
                if f_th.shape() != f_ph.shape() {
                    return Err(FieldError::shape("second component", f_th.shape(), f_ph.shape()));
                }
                Ok((f_th.to_owned(), f_ph.to_owned()))
            }
            VectorComponents::Ludwig3 => sph_to_ludwig3(phi, &f_th, &f_ph),
            VectorComponents::Circular => sph_to_circular(&f_th, &f_ph),
        }
    }
}

impl ComplexRepr {
    pub fn op_names(self) -> (&'static str, &'static str) {
        match self {
            ComplexRepr::ReIm => ("Re", "Im"),
            ComplexRepr::AbsAng => ("Abs", "Arg"),
        }
    }

    /// Split into (real, imaginary) or (magnitude, phase in degrees).
    pub fn split(self, values: &ComplexGrid) -> (Array2<f64>, Array2<f64>) {
        match self {
            ComplexRepr::ReIm => (values.mapv(|z| z.re), values.mapv(|z| z.im)),
            ComplexRepr::AbsAng => (values.mapv(|z| z.norm()), values.mapv(|z| z.arg().to_degrees())),
        }
    }
}

/// Plot options; also the `display` section of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub projection: Projection,
    pub components: VectorComponents,
    pub complex_repr: ComplexRepr,
    /// Hide θ > 90° in every projection, not only orthographic
    pub hemisphere_only: bool,
}

/// One real-valued plot panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    /// Masked samples are NaN
    pub values: Array2<f64>,
}

/// Everything needed to draw one pattern figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternView {
    pub title: String,
    /// Radius or frequency of the slice shown (0 without radial axis)
    pub radius: f64,
    pub grid: ProjectedGrid,
    /// `[r0(E0), r1(E0), r0(E1), r1(E1)]`
    pub panels: [Panel; 4],
}

/// Build the four-panel view of one radial slice of `field`.
///
/// With a radial axis, `radius` picks the nearest stored value (the first
/// one when `None`).
pub fn pattern_view(
    field: &TangentialField,
    radius: Option<f64>,
    options: &DisplayOptions,
    name: &str,
) -> FieldResult<PatternView> {
    let selected = field.select_radius(radius);
    let (f_th, f_ph) = field.components_at(selected)?;
    let grid = field.grid();

    let mut projected = options.projection.project(grid);
    if options.hemisphere_only && projected.mask.is_none() {
        projected.mask = Some(lower_hemisphere(grid));
    }

    let (e0, e1) = options.components.convert(grid.phi(), f_th, f_ph)?;
    let (n0, n1) = options.components.names();
    let (op0, op1) = options.complex_repr.op_names();
    let (e0_r0, e0_r1) = options.complex_repr.split(&e0);
    let (e1_r0, e1_r1) = options.complex_repr.split(&e1);

    let freq = selected.unwrap_or(0.0);
    let mk = |op: &str, comp: &str, mut values: Array2<f64>| {
        if let Some(mask) = &projected.mask {
            Zip::from(&mut values).and(mask).for_each(|v, &hidden| {
                if hidden {
                    *v = f64::NAN;
                }
            });
        }
        Panel {
            title: format!("{}({})", op, comp),
            values,
        }
    };
    let panels = [
        mk(op0, n0, e0_r0),
        mk(op1, n0, e0_r1),
        mk(op0, n1, e1_r0),
        mk(op1, n1, e1_r1),
    ];
    Ok(PatternView {
        title: format!("{} @ {} MHz, projection: {}", name, freq / 1e6, options.projection),
        radius: freq,
        grid: projected,
        panels,
    })
}
