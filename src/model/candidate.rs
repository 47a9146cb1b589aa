//! Candidate: the four-momentum embedded in every record.

use serde::{Deserialize, Serialize};

// ============================================================================
// Capability traits
// ============================================================================

/// Lifecycle shared by all records: fill, read, reset, refill.
///
/// `Default` must equal the reset state, so a freshly constructed record and
/// a recycled one are indistinguishable.
pub trait Record: Copy + Default {
    /// Resets the record to the state right after default construction.
    fn reset(&mut self);
}

/// Four-momentum access for any record that embeds a `Candidate`.
///
/// Setters store values verbatim. Range checks, if any, belong to callers.
pub trait Kinematics {
    fn p4(&self) -> &Candidate;
    fn p4_mut(&mut self) -> &mut Candidate;

    /// Transverse momentum, GeV.
    fn pt(&self) -> f32 { self.p4().pt }
    /// Pseudorapidity.
    fn eta(&self) -> f32 { self.p4().eta }
    /// Azimuthal angle, expected in (−π, π].
    fn phi(&self) -> f32 { self.p4().phi }
    /// Invariant mass, GeV.
    fn mass(&self) -> f32 { self.p4().mass }

    fn set_pt(&mut self, pt: f32) { self.p4_mut().pt = pt; }
    fn set_eta(&mut self, eta: f32) { self.p4_mut().eta = eta; }
    fn set_phi(&mut self, phi: f32) { self.p4_mut().phi = phi; }
    fn set_mass(&mut self, mass: f32) { self.p4_mut().mass = mass; }

    /// Sets all four components at once.
    fn set_p4(&mut self, pt: f32, eta: f32, phi: f32, mass: f32) {
        *self.p4_mut() = Candidate::new(pt, eta, phi, mass);
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// Four-momentum in collider coordinates (pt, eta, phi, mass).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pt: f32,
    eta: f32,
    phi: f32,
    mass: f32,
}

impl Candidate {
    /// The zero four-vector; also the reset state.
    pub const ZERO: Candidate = Candidate { pt: 0.0, eta: 0.0, phi: 0.0, mass: 0.0 };

    pub const fn new(pt: f32, eta: f32, phi: f32, mass: f32) -> Self {
        Self { pt, eta, phi, mass }
    }
}

impl Kinematics for Candidate {
    fn p4(&self) -> &Candidate { self }
    fn p4_mut(&mut self) -> &mut Candidate { self }
}

impl Record for Candidate {
    fn reset(&mut self) {
        *self = Self::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_four_vector() {
        assert_eq!(Candidate::default(), Candidate::ZERO);
    }

    #[test]
    fn setters_store_verbatim() {
        let mut c = Candidate::default();
        c.set_pt(-3.0); // no validation at this level
        c.set_eta(2.4);
        c.set_phi(7.0);
        c.set_mass(-0.5);

        assert_eq!(c.pt(), -3.0);
        assert_eq!(c.eta(), 2.4);
        assert_eq!(c.phi(), 7.0);
        assert_eq!(c.mass(), -0.5);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut c = Candidate::new(40.0, -1.2, 0.3, 4.8);
        c.reset();
        let once = c;
        c.reset();
        assert_eq!(c, once);
        assert_eq!(c, Candidate::default());
    }

    #[test]
    fn copies_are_independent() {
        let src = Candidate::new(10.0, 0.5, 1.0, 0.1);
        let mut copy = src;
        copy.set_pt(99.0);
        assert_eq!(src.pt(), 10.0);
        assert_eq!(copy.pt(), 99.0);
    }

    #[test]
    fn set_p4_overwrites_all_components() {
        let mut c = Candidate::new(1.0, 1.0, 1.0, 1.0);
        c.set_p4(25.0, 0.0, -3.0, 0.0);
        assert_eq!(c, Candidate::new(25.0, 0.0, -3.0, 0.0));
    }
}
