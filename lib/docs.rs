//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Discretization](#discretization)
//! - [Time dependence](#time-dependence)
//! - [Barriers](#barriers)
//! - [Radial wavefunctions](#radial-wavefunctions)
//! - [Absorbing sink](#absorbing-sink)
//! - [Observables](#observables)
//!
//! # Background
//! A particle of mass *m* in a static potential *V*(*x*) evolves under the
//! time-dependent Schrödinger equation (TDSE). Throughout this crate *ħ* = *m*
//! = 1, so that
//! ```text
//!   ∂ψ      1 ∂²ψ
//! i -- = - - --- + V(x) ψ
//!   ∂t      2 ∂x²
//! ```
//! A packet with central wavenumber *k*₀ then carries nominal energy
//! *E* = *k*₀²/2 and moves with group velocity *k*₀. When *E* lies below the
//! height of a finite barrier the packet is classically forbidden from
//! crossing it, but a fraction of the probability still appears on the far
//! side: tunneling.
//!
//! # Discretization
//! The domain [-*L*/2, *L*/2) is sampled on *N* points
//! ```text
//! x[i] = -L/2 + i dx,  dx = L / N,  i ∊ {0, ..., N - 1}
//! ```
//! so that for even *N* the point *x*[*N*/2] sits exactly on the origin. The
//! right endpoint is excluded because the spectral method treats the domain as
//! periodic. Wavenumbers follow the usual FFT ordering,
//! ```text
//! k[j] = 2π j / L            for j < N/2
//! k[j] = 2π (j - N) / L      otherwise
//! ```
//! with the largest magnitude π / *dx* at the Nyquist index.
//!
//! Periodicity means a packet leaving one edge re-enters at the other. No
//! absorbing boundary is applied at the domain edges; packets are meant to be
//! placed and timed so that they stay clear of them.
//!
//! # Time dependence
//! The Hamiltonian splits into a kinetic part *H*<sub>*k*</sub> = *k*²/2,
//! diagonal in momentum space, and a potential part *H*<sub>*v*</sub> = *V*,
//! diagonal in position space. The two do not commute, but the symmetric
//! (Strang) product
//! ```text
//!               -i H_v dt/2  -i H_k dt  -i H_v dt/2
//! ψ(t + dt) = [e            e          e           ] ψ(t) + O(dt³)
//! ```
//! is second-order accurate and exactly unitary, since each factor is a
//! pointwise phase in the basis where it is diagonal. One step is therefore
//! ```text
//! ψ ← exp(-i V dt/2) ψ
//! ψ ← F⁻¹[ exp(-i k²/2 dt) F[ψ] ]
//! ψ ← exp(-i V dt/2) ψ
//! ```
//! where *F* is the discrete Fourier transform and *F*⁻¹ its inverse including
//! the 1/*N* factor.
//!
//! Unitarity holds up to floating-point round-off only, so the norm-conserving
//! modes renormalize after every step. This is a correction of accumulated
//! error, not a physical operation.
//!
//! The kinetic phase at the Nyquist wavenumber is (π/*dx*)² *dt*/2. Once it
//! exceeds π, the large-*k* components scattered off a sharp barrier edge wrap
//! around in phase and the splitting error is no longer small: a packet may
//! leak through a barrier it should not cross. Shrinking *dt* or coarsening
//! the grid fixes this.
//!
//! # Barriers
//! Three landscapes are provided.
//! - A single rectangular barrier of height *V*₀ on the open interval
//!   (*c* - *w*/2, *c* + *w*/2).
//! - Two barriers of height *V*₀ and width *w* around a well of width *g*, on
//!   the closed intervals [*c* - *g*/2 - *w*, *c* - *g*/2] and [*c* + *g*/2,
//!   *c* + *g*/2 + *w*]. Transmission through this structure peaks sharply at
//!   energies near the quasi-bound levels of the well (resonant tunneling).
//! - A hard wall: a single barrier whose height is clamped to a sentinel
//!   standing in for infinity. Any finite height is penetrable in principle,
//!   so after every step the field is additionally set to exactly zero on the
//!   wall.
//!
//! A zero-width barrier contributes nothing.
//!
//! # Radial wavefunctions
//! For a spherically symmetric potential and zero angular momentum, the radial
//! part *R*(*r*) of the wavefunction satisfies a one-dimensional equation in
//! the auxiliary function *u*(*r*) = *r* *R*(*r*):
//! ```text
//!   ∂u      1 ∂²u
//! i -- = - - --- + V(r) u(r)
//!   ∂t      2 ∂r²
//! ```
//! which has exactly the Cartesian form. Here it is propagated on the same
//! symmetric grid using *r* = |*x*|. The substitution is only regular if
//! *u*(0) = 0, so after each step *u* is pinned to zero at the origin. The
//! radial probability density is |*u*|², with no extra factor of *r*².
//!
//! # Absorbing sink
//! A toy model for exciton transport to a reaction center replaces the
//! Hermitian Hamiltonian with one that loses probability inside a region *S*.
//! After an ordinary Cartesian step, the probability captured during that step
//! is booked as
//! ```text
//! ΔP = γ Σ_{x ∊ S} |ψ(x)|² dx
//! ```
//! and the field inside *S* is damped by exp(-γ), where γ is the sink strength.
//! The total norm then decreases monotonically and the field is never
//! renormalized; the cumulative captured probability, capped at 100%, is the
//! transfer efficiency.
//!
//! # Observables
//! The total probability is integrated with the trapezoidal rule over the
//! whole grid. Transmission and reflection are computed instead by summing
//! |ψ|² *dx* over the points strictly right and strictly left of the barrier,
//! whose extent is taken from the leftmost to the rightmost point where
//! *V* > 0. Probability inside the barrier (and, for the double barrier, inside
//! the well) counts toward neither, so *T* + *R* ≤ 100% up to quadrature error.
