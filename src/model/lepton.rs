//! Lepton: base record for charged leptons.

use serde::{Deserialize, Serialize};

use super::{Candidate, CandidateWithId, Identified, Kinematics, Record};
use crate::{Error, Result};

// ============================================================================
// Charge
// ============================================================================

/// Sign of the electric charge. There is no neutral lepton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charge {
    /// Antiparticle (e⁺, μ⁺).
    #[default]
    Positive,
    /// Particle (e⁻, μ⁻).
    Negative,
}

impl Charge {
    /// Keeps only the sign of `charge`. Zero has no sign and is rejected.
    pub fn from_sign(charge: i32) -> Result<Self> {
        match charge.signum() {
            1 => Ok(Charge::Positive),
            -1 => Ok(Charge::Negative),
            _ => Err(Error::InvalidArgument(
                "lepton charge must be non-zero".into(),
            )),
        }
    }

    pub fn from_negative_flag(negative: bool) -> Self {
        if negative { Charge::Negative } else { Charge::Positive }
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Charge::Negative)
    }

    /// `+1` or `-1`.
    pub fn as_i32(self) -> i32 {
        match self {
            Charge::Positive => 1,
            Charge::Negative => -1,
        }
    }
}

// ============================================================================
// ChargedLepton capability
// ============================================================================

/// Charge, isolation and impact parameter of any record built on `Lepton`.
pub trait ChargedLepton: Identified {
    fn lepton(&self) -> &Lepton;
    fn lepton_mut(&mut self) -> &mut Lepton;

    /// Electric charge, exactly `+1` or `-1`.
    fn charge(&self) -> i32 {
        self.lepton().charge.as_i32()
    }

    /// Records the sign of `charge`; fails on zero and leaves the record untouched.
    fn set_charge(&mut self, charge: i32) -> Result<()> {
        let charge = Charge::from_sign(charge)?;
        self.lepton_mut().charge = charge;
        Ok(())
    }

    fn charge_sign(&self) -> Charge {
        self.lepton().charge
    }

    /// Relative isolation. Stored verbatim, negative values included.
    fn rel_iso(&self) -> f32 {
        self.lepton().rel_iso
    }

    fn set_rel_iso(&mut self, rel_iso: f32) {
        self.lepton_mut().rel_iso = rel_iso;
    }

    /// Transverse impact parameter, cm. Always non-negative.
    fn db(&self) -> f32 {
        self.lepton().db
    }

    /// The sign of `db` is discarded here; only the magnitude is kept.
    fn set_db(&mut self, db: f32) {
        self.lepton_mut().db = db.abs();
    }
}

// ============================================================================
// Lepton
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Lepton {
    base: CandidateWithId,
    charge: Charge,
    rel_iso: f32,
    #[serde(deserialize_with = "magnitude")]
    db: f32,
}

fn magnitude<'de, D>(deserializer: D) -> std::result::Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f32::deserialize(deserializer).map(f32::abs)
}

impl Lepton {
    /// Builds a lepton from raw parts. `db` is stored as its magnitude.
    pub fn from_parts(base: CandidateWithId, charge: Charge, rel_iso: f32, db: f32) -> Self {
        Self { base, charge, rel_iso, db: db.abs() }
    }
}

impl Kinematics for Lepton {
    fn p4(&self) -> &Candidate { self.base.p4() }
    fn p4_mut(&mut self) -> &mut Candidate { self.base.p4_mut() }
}

impl Identified for Lepton {
    const FIRST_USER_BIT: u32 = 0;

    fn candidate_with_id(&self) -> &CandidateWithId { &self.base }
    fn candidate_with_id_mut(&mut self) -> &mut CandidateWithId { &mut self.base }
}

impl ChargedLepton for Lepton {
    fn lepton(&self) -> &Lepton { self }
    fn lepton_mut(&mut self) -> &mut Lepton { self }
}

impl Record for Lepton {
    fn reset(&mut self) {
        self.base.reset();
        self.charge = Charge::Positive;
        self.rel_iso = 0.0;
        self.db = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_keeps_only_sign() {
        let mut l = Lepton::default();
        l.set_charge(5).unwrap();
        assert_eq!(l.charge(), 1);
        l.set_charge(-3).unwrap();
        assert_eq!(l.charge(), -1);
        assert_eq!(l.charge_sign(), Charge::Negative);
    }

    #[test]
    fn zero_charge_is_rejected_without_mutation() {
        let mut l = Lepton::default();
        l.set_charge(-1).unwrap();
        let err = l.set_charge(0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(l.charge(), -1);
    }

    #[test]
    fn db_discards_sign() {
        let mut l = Lepton::default();
        l.set_db(-1.5);
        assert_eq!(l.db(), 1.5);
        l.set_db(0.02);
        assert_eq!(l.db(), 0.02);
    }

    #[test]
    fn rel_iso_is_verbatim() {
        let mut l = Lepton::default();
        l.set_rel_iso(-0.1);
        assert_eq!(l.rel_iso(), -0.1);
    }

    #[test]
    fn reset_restores_default() {
        let mut l = Lepton::default();
        l.set_p4(35.0, -0.7, 2.2, 0.000511);
        l.set_charge(-1).unwrap();
        l.set_rel_iso(0.08);
        l.set_db(0.003);
        l.set_user_selection(2, true).unwrap();

        l.reset();
        assert_eq!(l, Lepton::default());
        assert_eq!(l.charge(), 1);
        l.reset();
        assert_eq!(l, Lepton::default());
    }

    #[test]
    fn deserialized_db_is_magnitude_and_charge_round_trips() {
        let mut l = Lepton::default();
        l.set_charge(-1).unwrap();
        let mut json = serde_json::to_value(l).unwrap();
        assert_eq!(json["charge"], serde_json::json!("Negative"));

        json["db"] = serde_json::json!(-0.5);
        let back: Lepton = serde_json::from_value(json).unwrap();
        assert_eq!(back.db(), 0.5);
        assert_eq!(back.charge(), -1);

        for charge in [Charge::Positive, Charge::Negative] {
            let text = serde_json::to_string(&charge).unwrap();
            assert_eq!(serde_json::from_str::<Charge>(&text).unwrap(), charge);
        }
    }

    #[test]
    fn from_parts_normalises_db() {
        let l = Lepton::from_parts(CandidateWithId::default(), Charge::Negative, 0.1, -0.4);
        assert_eq!(l.db(), 0.4);
        assert_eq!(l.charge(), -1);
    }
}
