//! Sub-sample refinement of extrema.
//!
//! Each extremum is refined from its sample and the two neighbours around it.
//!
//! # Cosine model
//!
//! Around an extremum the signal is modelled as `y(k) = A cos(ω k - φ)`. For
//! the samples at `k = -1, 0, 1`:
//!
//! ```text
//! y1 + y-1 = 2 cos(ω) y0           =>  ω = acos((y1 + y-1) / (2 y0))
//! y1 - y-1 = 2 A sin(ω) sin(φ)     =>  φ = atan((y1 - y-1) / (2 y0 sin ω))
//! ```
//!
//! The extremum sits at `k = φ / ω` with value `y0 / cos φ`, and the model's
//! half period is `π / ω` samples. The sign of `A` follows `y0`, so the same
//! expressions serve peaks and troughs.
//!
//! # Parabola fallback
//!
//! [`lagrange3`] fits the Lagrange parabola through the three points. It is
//! only ever a fallback for the extrema beside the central pair; the central
//! pair itself has to fit the model selected by [`RefinementMode`].

use core::f64::consts::PI;
use libm::{acos, atan, cos, sin};

use crate::error::{MeasureError, RefineFailure};
use crate::neighbors::CentralQuad;

/// Which fit refines the extrema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefinementMode {
    /// Cosine fit everywhere; side extrema fall back to the parabola.
    #[default]
    CosineWithFallback,
    /// Parabola fit everywhere.
    LagrangeOnly,
}

/// Output of a single 3-point fit, relative to the centre sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refined {
    /// Offset of the fitted extremum from the centre sample, in samples.
    pub shift: f64,
    /// Fitted extremum value.
    pub value: f64,
    /// Half period implied by the fit, in samples (cosine fit only).
    pub half_period: Option<f64>,
}

/// Fit the cosine model through `(y-1, y0, y1)`.
pub fn cos_parameters(ym1: f64, y0: f64, y1: f64) -> Result<Refined, RefineFailure> {
    if ym1 - 2.0 * y0 + y1 == 0.0 {
        return Err(RefineFailure::Collinear);
    }
    if y0 == 0.0 {
        return Err(RefineFailure::NoRealSolution {
            factor: f64::INFINITY,
        });
    }
    let factor = (y1 + ym1) / (2.0 * y0);
    if factor.is_nan() || factor.abs() >= 1.0 {
        return Err(RefineFailure::NoRealSolution { factor });
    }

    let omega = acos(factor);
    let phase = atan((y1 - ym1) / (2.0 * y0 * sin(omega)));

    Ok(Refined {
        shift: phase / omega,
        value: y0 / cos(phase),
        half_period: Some(PI / omega),
    })
}

/// Fit a parabola through `(y-1, y0, y1)` and return its vertex.
pub fn lagrange3(ym1: f64, y0: f64, y1: f64) -> Result<Refined, RefineFailure> {
    let curvature = ym1 - 2.0 * y0 + y1;
    if curvature == 0.0 {
        return Err(RefineFailure::Collinear);
    }
    let shift = 0.5 * (ym1 - y1) / curvature;
    if shift.is_nan() || shift.abs() >= 1.0 {
        return Err(RefineFailure::ShiftOutOfRange { shift });
    }
    Ok(Refined {
        shift,
        value: y0 - 0.25 * (ym1 - y1) * shift,
        half_period: None,
    })
}

/// A refined extremum in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedPosition {
    /// Window index of the discrete extremum.
    pub index: usize,
    /// Sub-sample position inside the window.
    pub position: f64,
    /// Fitted extremum value.
    pub value: f64,
    /// Half period implied by the local fit, if the cosine model was used.
    pub half_period: Option<f64>,
}

/// All refined members of a [`CentralQuad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedQuad {
    /// Refined backward neighbour; `None` if absent or not refinable.
    pub backward: Option<RefinedPosition>,
    /// Refined earlier pair extremum.
    pub center_left: RefinedPosition,
    /// Refined later pair extremum.
    pub center_right: RefinedPosition,
    /// Refined forward neighbour; `None` if absent or not refinable.
    pub forward: Option<RefinedPosition>,
}

fn triplet(samples: &[f64], index: usize) -> Result<(f64, f64, f64), RefineFailure> {
    if index == 0 || index + 1 >= samples.len() {
        return Err(RefineFailure::AtWindowEdge);
    }
    Ok((samples[index - 1], samples[index], samples[index + 1]))
}

fn place(index: usize, fit: Refined) -> RefinedPosition {
    RefinedPosition {
        index,
        position: index as f64 + fit.shift,
        value: fit.value,
        half_period: fit.half_period,
    }
}

/// Refine one of the central pair. There is no fallback: failure is fatal.
pub fn refine_central(
    samples: &[f64],
    index: usize,
    mode: RefinementMode,
) -> Result<RefinedPosition, MeasureError> {
    let fit = triplet(samples, index).and_then(|(ym1, y0, y1)| match mode {
        RefinementMode::CosineWithFallback => cos_parameters(ym1, y0, y1),
        RefinementMode::LagrangeOnly => lagrange3(ym1, y0, y1),
    });
    fit.map(|fit| place(index, fit))
        .map_err(|reason| MeasureError::RefinementFailed { index, reason })
}

/// Refine a side extremum, falling back to the parabola when the cosine fit
/// fails. Returns `None` when no fit succeeds.
pub fn refine_side(samples: &[f64], index: usize, mode: RefinementMode) -> Option<RefinedPosition> {
    let (ym1, y0, y1) = triplet(samples, index).ok()?;
    let fit = match mode {
        RefinementMode::CosineWithFallback => {
            cos_parameters(ym1, y0, y1).or_else(|_| lagrange3(ym1, y0, y1))
        }
        RefinementMode::LagrangeOnly => lagrange3(ym1, y0, y1),
    };
    match fit {
        Ok(fit) => Some(place(index, fit)),
        Err(_reason) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, reason = %_reason, "side extremum dropped");
            None
        }
    }
}

/// Refine every member of `quad`.
pub fn refine_quad(
    samples: &[f64],
    quad: &CentralQuad,
    mode: RefinementMode,
) -> Result<RefinedQuad, MeasureError> {
    let center_left = refine_central(samples, quad.center_left, mode)?;
    let center_right = refine_central(samples, quad.center_right, mode)?;
    Ok(RefinedQuad {
        backward: quad.backward.and_then(|i| refine_side(samples, i, mode)),
        center_left,
        center_right,
        forward: quad.forward.and_then(|i| refine_side(samples, i, mode)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled_cos(amplitude: f64, omega: f64, peak_at: f64) -> (f64, f64, f64) {
        let y = |k: f64| amplitude * (omega * (k - peak_at)).cos();
        (y(-1.0), y(0.0), y(1.0))
    }

    #[test]
    fn cosine_recovers_exact_model() {
        let omega = PI / 5.0;
        let (ym1, y0, y1) = sampled_cos(2.5, omega, 0.3);
        let fit = cos_parameters(ym1, y0, y1).unwrap();
        assert!((fit.shift - 0.3).abs() < 1e-12);
        assert!((fit.value - 2.5).abs() < 1e-12);
        assert!((fit.half_period.unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_handles_troughs() {
        let omega = PI / 7.0;
        let (ym1, y0, y1) = sampled_cos(-1.5, omega, -0.4);
        let fit = cos_parameters(ym1, y0, y1).unwrap();
        assert!((fit.shift + 0.4).abs() < 1e-12);
        assert!((fit.value + 1.5).abs() < 1e-12);
        assert!((fit.half_period.unwrap() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_rejects_collinear() {
        assert_eq!(
            cos_parameters(1.0, 2.0, 3.0),
            Err(RefineFailure::Collinear)
        );
    }

    #[test]
    fn cosine_rejects_unreal_factor() {
        // (y1 + y-1) / (2 y0) = 1.5: no real frequency.
        assert!(matches!(
            cos_parameters(2.0, 1.0, 1.0),
            Err(RefineFailure::NoRealSolution { .. })
        ));
        assert!(matches!(
            cos_parameters(-1.0, 0.0, 1.5),
            Err(RefineFailure::NoRealSolution { .. })
        ));
    }

    #[test]
    fn parabola_vertex() {
        let f = |x: f64| 3.0 - (x - 0.25) * (x - 0.25);
        let fit = lagrange3(f(-1.0), f(0.0), f(1.0)).unwrap();
        assert!((fit.shift - 0.25).abs() < 1e-12);
        assert!((fit.value - 3.0).abs() < 1e-12);
        assert_eq!(fit.half_period, None);
    }

    #[test]
    fn parabola_rejects_far_vertex() {
        assert!(matches!(
            lagrange3(0.0, 1.0, 1.9),
            Err(RefineFailure::ShiftOutOfRange { .. })
        ));
        assert_eq!(lagrange3(0.0, 0.0, 0.0), Err(RefineFailure::Collinear));
    }

    #[test]
    fn side_falls_back_to_parabola() {
        // Cosine factor (1.3 + 1.2) / 2 > 1, parabola vertex is fine.
        let y = [0.0, 1.2, 1.0, 1.3, 0.0];
        let side = refine_side(&y, 2, RefinementMode::CosineWithFallback).unwrap();
        assert_eq!(side.half_period, None);
        assert!((side.position - 1.9).abs() < 1e-12);
    }

    #[test]
    fn central_has_no_fallback() {
        let y = [0.0, 1.2, 1.0, 1.3, 0.0];
        assert!(matches!(
            refine_central(&y, 2, RefinementMode::CosineWithFallback),
            Err(MeasureError::RefinementFailed { index: 2, .. })
        ));
        assert!(refine_central(&y, 2, RefinementMode::LagrangeOnly).is_ok());
    }

    /// Odd-length clipped plateau at index 3: the label sits on three equal
    /// samples, so neither fit can place it.
    const CLIPPED_LEAD: [f64; 20] = [
        0.0, 0.5, 0.8, 0.8, 0.8, 0.3, -0.5, -1.4, -1.5, -1.2, 0.0, 1.2, 1.5, 1.4, 0.5, 0.0, -0.6,
        -0.7, -0.6, 0.0,
    ];

    #[test]
    fn quad_drops_unrefinable_side() {
        let quad = CentralQuad {
            backward: Some(3),
            center_left: 8,
            center_right: 12,
            forward: Some(17),
        };
        let refined =
            refine_quad(&CLIPPED_LEAD, &quad, RefinementMode::CosineWithFallback).unwrap();
        assert_eq!(refined.backward, None);
        assert_eq!(refined.forward.unwrap().index, 17);
        assert!((refined.center_left.position - 7.746).abs() < 1e-3);
        assert!((refined.center_right.position - 12.254).abs() < 1e-3);
        assert!((refined.center_right.value - 1.5133).abs() < 1e-3);
    }

    #[test]
    fn quad_fails_on_unrefinable_center() {
        let quad = CentralQuad {
            backward: None,
            center_left: 3,
            center_right: 8,
            forward: Some(12),
        };
        assert!(matches!(
            refine_quad(&CLIPPED_LEAD, &quad, RefinementMode::CosineWithFallback),
            Err(MeasureError::RefinementFailed {
                index: 3,
                reason: RefineFailure::Collinear,
            })
        ));
    }

    #[test]
    fn edge_index_not_refinable() {
        let y = [1.0, 0.0, 1.0];
        assert!(refine_side(&y, 0, RefinementMode::LagrangeOnly).is_none());
        assert!(matches!(
            refine_central(&y, 2, RefinementMode::LagrangeOnly),
            Err(MeasureError::RefinementFailed {
                reason: RefineFailure::AtWindowEdge,
                ..
            })
        ));
    }
}
