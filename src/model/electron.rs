//! Electron: a lepton with electron-specific identification.
//!
//! ID bit layout:
//!
//! | Bit | Meaning |
//! |-----|---------|
//! | 0 | trigger-emulating preselection passed |
//! | 1 | conversion veto passed (true for good electrons) |
//! | 2..16 | user selections |

use serde::{Deserialize, Serialize};

use super::{Candidate, CandidateWithId, ChargedLepton, Identified, Kinematics, Lepton, Record};

const TRIGGER_PRESELECTION_BIT: u32 = 0;
const CONVERSION_VETO_BIT: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Electron {
    lepton: Lepton,
    mva_id: f32,
}

impl Electron {
    pub fn from_parts(lepton: Lepton, mva_id: f32) -> Self {
        Self { lepton, mva_id }
    }

    /// Output of the multivariate identification.
    pub fn mva_id(&self) -> f32 {
        self.mva_id
    }

    pub fn set_mva_id(&mut self, mva_id: f32) {
        self.mva_id = mva_id;
    }

    pub fn passes_trigger_preselection(&self) -> bool {
        self.candidate_with_id().flag(TRIGGER_PRESELECTION_BIT)
    }

    pub fn set_trigger_preselection(&mut self, passed: bool) {
        self.candidate_with_id_mut().set_flag(TRIGGER_PRESELECTION_BIT, passed);
    }

    pub fn passes_conversion_veto(&self) -> bool {
        self.candidate_with_id().flag(CONVERSION_VETO_BIT)
    }

    pub fn set_conversion_veto(&mut self, passed: bool) {
        self.candidate_with_id_mut().set_flag(CONVERSION_VETO_BIT, passed);
    }
}

impl Kinematics for Electron {
    fn p4(&self) -> &Candidate { self.lepton.p4() }
    fn p4_mut(&mut self) -> &mut Candidate { self.lepton.p4_mut() }
}

impl Identified for Electron {
    const FIRST_USER_BIT: u32 = 2;

    fn candidate_with_id(&self) -> &CandidateWithId { self.lepton.candidate_with_id() }
    fn candidate_with_id_mut(&mut self) -> &mut CandidateWithId { self.lepton.candidate_with_id_mut() }
}

impl ChargedLepton for Electron {
    fn lepton(&self) -> &Lepton { &self.lepton }
    fn lepton_mut(&mut self) -> &mut Lepton { &mut self.lepton }
}

impl Record for Electron {
    fn reset(&mut self) {
        self.lepton.reset();
        self.mva_id = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_user_selections_do_not_overlap() {
        let mut e = Electron::default();
        e.set_trigger_preselection(true);
        e.set_conversion_veto(true);
        e.set_user_selection(0, true).unwrap();

        assert!(e.passes_trigger_preselection());
        assert!(e.passes_conversion_veto());
        assert!(e.user_selection(0));
        assert_eq!(e.id_bits().raw(), 0b111);

        e.set_conversion_veto(false);
        assert_eq!(e.id_bits().raw(), 0b101);
    }

    #[test]
    fn user_slots_are_limited() {
        let mut e = Electron::default();
        assert_eq!(Electron::USER_SELECTION_SLOTS, 14);
        assert!(e.set_user_selection(13, true).is_ok());
        assert!(e.set_user_selection(14, true).is_err());
        assert!(e.id_bits().bit(15));
    }

    #[test]
    fn reset_clears_everything() {
        let mut e = Electron::default();
        e.set_p4(42.0, 1.1, -2.0, 0.0);
        e.set_charge(-1).unwrap();
        e.set_mva_id(0.93);
        e.set_db(-0.01);
        e.set_trigger_preselection(true);

        e.reset();
        assert_eq!(e, Electron::default());
        assert!(!e.passes_trigger_preselection());
        assert_eq!(e.charge(), 1);
    }
}
