//! Muon: a lepton with a tight-quality flag in ID bit 0.

use serde::{Deserialize, Serialize};

use super::{Candidate, CandidateWithId, ChargedLepton, Identified, Kinematics, Lepton, Record};

const TIGHT_QUALITY_BIT: u32 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Muon {
    lepton: Lepton,
}

impl Muon {
    pub fn from_lepton(lepton: Lepton) -> Self {
        Self { lepton }
    }

    pub fn is_tight(&self) -> bool {
        self.candidate_with_id().flag(TIGHT_QUALITY_BIT)
    }

    pub fn set_tight(&mut self, tight: bool) {
        self.candidate_with_id_mut().set_flag(TIGHT_QUALITY_BIT, tight);
    }
}

impl Kinematics for Muon {
    fn p4(&self) -> &Candidate { self.lepton.p4() }
    fn p4_mut(&mut self) -> &mut Candidate { self.lepton.p4_mut() }
}

impl Identified for Muon {
    const FIRST_USER_BIT: u32 = 1;

    fn candidate_with_id(&self) -> &CandidateWithId { self.lepton.candidate_with_id() }
    fn candidate_with_id_mut(&mut self) -> &mut CandidateWithId { self.lepton.candidate_with_id_mut() }
}

impl ChargedLepton for Muon {
    fn lepton(&self) -> &Lepton { &self.lepton }
    fn lepton_mut(&mut self) -> &mut Lepton { &mut self.lepton }
}

impl Record for Muon {
    fn reset(&mut self) {
        self.lepton.reset();
    }
}
