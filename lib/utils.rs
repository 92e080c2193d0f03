//! Miscellaneous tools: quadrature, wavefunction norms, and FFT plumbing.

use std::sync::Arc;
use ndarray::{ self as nd, Ix1, concatenate };
use num_complex::Complex64 as C64;
use num_traits::Float;
use rustfft::{ self as fft, Fft, Length };

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    let inner = y.slice(nd::s![1..n - 1]).iter()
        .fold(A::zero(), |acc, yk| acc + *yk);
    (dx / two) * (y[0] + two * inner + y[n - 1])
}

/// Integrate using the rectangle rule, i.e. a plain sum times `dx`.
///
/// Unlike [`trapz`], this accepts arrays of any length (including empty ones,
/// which integrate to zero).
pub fn rectz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    y.iter().fold(A::zero(), |acc, yk| acc + *yk) * dx
}

/// Calculate the norm ∫|q|² dx of a wavefunction with the trapezoidal rule.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S>(q: &nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    trapz(&q.mapv(|qk| qk.norm_sqr()), dx)
}

/// Renormalize a wavefunction in place, returning the norm it had before.
///
/// A wavefunction with zero norm is left untouched.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_renormalize<S>(q: &mut nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::DataMut<Elem = C64>
{
    let norm = wf_norm(q, dx);
    if norm > 0.0 {
        let scale = norm.sqrt().recip();
        q.iter_mut().for_each(|qk| { *qk *= scale; });
    }
    norm
}

/// Return a normalized copy of a wavefunction.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_normalized<S>(q: &nd::ArrayBase<S, Ix1>, dx: f64) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let mut p = q.to_owned();
    wf_renormalize(&mut p, dx);
    p
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling interval `dt`.
///
/// Non-negative frequencies come first, followed by the negative ones, in the
/// same order the transform produces them.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    let m = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let fp: nd::Array1<f64>
        = (0..m)
        .map(|k| k as f64 / (n as f64 * dt))
        .collect();
    let fm: nd::Array1<f64>
        = (1..n - m + 1).rev()
        .map(|k| -(k as f64) / (n as f64 * dt))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

/// Forward and inverse FFT plans of a fixed size, planned once and reused.
#[derive(Clone)]
pub struct FftPair {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<C64>,
}

impl std::fmt::Debug for FftPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftPair")
            .field("len", &self.forward.len())
            .finish()
    }
}

impl FftPair {
    /// Plan both directions for arrays of length `n`.
    pub fn new(n: usize) -> Self {
        let mut plan = fft::FftPlanner::new();
        let forward = plan.plan_fft_forward(n);
        let inverse = plan.plan_fft_inverse(n);
        let scratch_len
            = forward.get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let scratch = vec![C64::default(); scratch_len];
        Self { forward, inverse, scratch }
    }

    /// Length of the arrays these plans apply to.
    pub fn len(&self) -> usize { self.forward.len() }

    /// Perform the one-dimensional, complex-valued FFT in place.
    ///
    /// *Panics if `f` is not contiguous or has the wrong length*.
    pub fn fft_inplace<S>(&mut self, f: &mut nd::ArrayBase<S, Ix1>)
    where S: nd::DataMut<Elem = C64>
    {
        let buf = f.as_slice_mut().expect("fft: array must be contiguous");
        self.forward.process_with_scratch(buf, &mut self.scratch);
    }

    /// Perform the one-dimensional, complex-valued inverse FFT in place,
    /// including the `1/n` factor so that a round trip is the identity.
    ///
    /// *Panics if `x` is not contiguous or has the wrong length*.
    pub fn ifft_inplace<S>(&mut self, x: &mut nd::ArrayBase<S, Ix1>)
    where S: nd::DataMut<Elem = C64>
    {
        let buf = x.as_slice_mut().expect("ifft: array must be contiguous");
        self.inverse.process_with_scratch(buf, &mut self.scratch);
        let n = buf.len() as f64;
        x.map_inplace(|xk| { *xk /= n; });
    }
}
