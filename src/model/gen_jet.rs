//! GenJet: generator-level jet with nearby heavy-quark multiplicities.

use serde::{Deserialize, Serialize};

use super::{Candidate, Kinematics, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenJet {
    candidate: Candidate,
    b_mult: u8,
    c_mult: u8,
}

impl GenJet {
    pub fn from_parts(candidate: Candidate, b_mult: u8, c_mult: u8) -> Self {
        Self { candidate, b_mult, c_mult }
    }

    /// Number of status-2 b quarks in the jet cone.
    pub fn b_mult(&self) -> u8 {
        self.b_mult
    }

    /// Number of status-2 c quarks in the jet cone.
    pub fn c_mult(&self) -> u8 {
        self.c_mult
    }

    /// Saturates at `u8::MAX`.
    pub fn set_b_mult(&mut self, count: usize) {
        self.b_mult = saturate("b", count);
    }

    /// Saturates at `u8::MAX`.
    pub fn set_c_mult(&mut self, count: usize) {
        self.c_mult = saturate("c", count);
    }
}

fn saturate(quark: &'static str, count: usize) -> u8 {
    u8::try_from(count).unwrap_or_else(|_| {
        tracing::warn!(quark, count, "quark multiplicity saturated at {}", u8::MAX);
        u8::MAX
    })
}

impl Kinematics for GenJet {
    fn p4(&self) -> &Candidate { &self.candidate }
    fn p4_mut(&mut self) -> &mut Candidate { &mut self.candidate }
}

impl Record for GenJet {
    fn reset(&mut self) {
        self.candidate.reset();
        self.b_mult = 0;
        self.c_mult = 0;
    }
}
