//! GenParticle: minimalistic description of a generator-level particle.
//!
//! The PDG ID is folded into a narrow range, so the record suits fundamental
//! particles only; exotic hadron and BSM codes lose their high digits.
//!
//! Mother indices point into the small, already filtered list of particles
//! the caller stores for the same event, not into the original generator
//! collection. The record neither owns nor checks that list.

use serde::{Deserialize, Serialize};

use super::{Candidate, Kinematics, Record};
use crate::{Error, Result};

// ============================================================================
// PDG ID
// ============================================================================

/// PDG particle code after the fold-on-overflow policy.
///
/// Codes with `|id| <= 30000` are kept exactly. Larger codes keep their sign
/// and the last three decimal digits: `sign(id) * 30000 + id % 1000`. The
/// result always lies in `[-30999, 30999]`, which fits a two-byte field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct PdgId(i32);

impl PdgId {
    /// Largest magnitude stored without folding.
    pub const FOLD_THRESHOLD: i64 = 30_000;
    /// Folded codes keep `id % FOLD_MODULUS`.
    pub const FOLD_MODULUS: i64 = 1_000;
    /// Largest magnitude a folded code can have.
    pub const MAX_MAGNITUDE: i32 = 30_999;

    /// Applies the fold. Never fails.
    pub fn fold(id: i64) -> Self {
        if id.unsigned_abs() <= Self::FOLD_THRESHOLD as u64 {
            return Self(id as i32);
        }
        // Truncated remainder carries the sign of `id`.
        let folded = id.signum() * Self::FOLD_THRESHOLD + id % Self::FOLD_MODULUS;
        Self(folded as i32)
    }

    /// Whether `id` would be altered by the fold.
    pub fn needs_fold(id: i64) -> bool {
        id.unsigned_abs() > Self::FOLD_THRESHOLD as u64
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i64> for PdgId {
    fn from(id: i64) -> Self {
        Self::fold(id)
    }
}

impl From<PdgId> for i64 {
    fn from(id: PdgId) -> Self {
        i64::from(id.0)
    }
}

// ============================================================================
// Mother index
// ============================================================================

/// Optional position of a mother in the filtered per-event particle list.
///
/// The logical form is `-1` for "no mother" and `0..=MAX` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MotherIndex(Option<u8>);

impl MotherIndex {
    pub const NONE: MotherIndex = MotherIndex(None);
    /// Largest storable index.
    pub const MAX: i32 = 253;

    /// Validates a logical index; `-1` means no mother.
    pub fn new(index: i32) -> Result<Self> {
        match index {
            -1 => Ok(Self::NONE),
            0..=Self::MAX => Ok(Self(Some(index as u8))),
            _ => Err(Error::InvalidArgument(format!(
                "illegal mother index {index}: expected -1 or 0..={}",
                Self::MAX
            ))),
        }
    }

    pub fn from_option(index: Option<usize>) -> Result<Self> {
        match index {
            None => Ok(Self::NONE),
            Some(i) if i <= Self::MAX as usize => Ok(Self(Some(i as u8))),
            Some(i) => Err(Error::InvalidArgument(format!(
                "illegal mother index {i}: exceeds {}",
                Self::MAX
            ))),
        }
    }

    /// Logical index, `-1` when absent.
    pub fn get(self) -> i32 {
        self.0.map_or(-1, i32::from)
    }

    pub fn as_option(self) -> Option<usize> {
        self.0.map(usize::from)
    }

    pub fn is_none(self) -> bool {
        self.0.is_none()
    }
}

impl TryFrom<i32> for MotherIndex {
    type Error = Error;

    fn try_from(index: i32) -> Result<Self> {
        Self::new(index)
    }
}

impl From<MotherIndex> for i32 {
    fn from(index: MotherIndex) -> Self {
        index.get()
    }
}

// ============================================================================
// GenParticle
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenParticle {
    candidate: Candidate,
    pdg_id: PdgId,
    first_mother: MotherIndex,
    last_mother: MotherIndex,
}

impl GenParticle {
    pub fn from_parts(
        candidate: Candidate,
        pdg_id: PdgId,
        first_mother: MotherIndex,
        last_mother: MotherIndex,
    ) -> Self {
        Self { candidate, pdg_id, first_mother, last_mother }
    }

    /// Stores the PDG ID, folding codes that exceed the storable range.
    pub fn set_pdg_id(&mut self, pdg_id: i64) {
        let folded = PdgId::fold(pdg_id);
        if PdgId::needs_fold(pdg_id) {
            tracing::debug!(pdg_id, folded = folded.get(), "PDG ID folded into storable range");
        }
        self.pdg_id = folded;
    }

    pub fn pdg_id(&self) -> i32 {
        self.pdg_id.get()
    }

    /// Sets the first mother; `-1` means the mother is not in the list.
    pub fn set_first_mother_index(&mut self, index: i32) -> Result<()> {
        self.first_mother = MotherIndex::new(index)?;
        Ok(())
    }

    /// Sets the last mother. Expected to differ from `-1` only if the
    /// particle has more than one mother.
    pub fn set_last_mother_index(&mut self, index: i32) -> Result<()> {
        self.last_mother = MotherIndex::new(index)?;
        Ok(())
    }

    /// Sets both mothers, or neither if either index is illegal.
    pub fn set_mother_indices(&mut self, first: i32, last: i32) -> Result<()> {
        let first = MotherIndex::new(first)?;
        let last = MotherIndex::new(last)?;
        self.first_mother = first;
        self.last_mother = last;
        Ok(())
    }

    /// Index of the first mother in the filtered list, `-1` if absent.
    pub fn first_mother_index(&self) -> i32 {
        self.first_mother.get()
    }

    /// Index of the last mother in the filtered list, `-1` if absent.
    pub fn last_mother_index(&self) -> i32 {
        self.last_mother.get()
    }

    pub fn first_mother(&self) -> Option<usize> {
        self.first_mother.as_option()
    }

    pub fn last_mother(&self) -> Option<usize> {
        self.last_mother.as_option()
    }

    pub fn set_first_mother(&mut self, index: Option<usize>) -> Result<()> {
        self.first_mother = MotherIndex::from_option(index)?;
        Ok(())
    }

    pub fn set_last_mother(&mut self, index: Option<usize>) -> Result<()> {
        self.last_mother = MotherIndex::from_option(index)?;
        Ok(())
    }

    pub(crate) fn mothers(&self) -> (MotherIndex, MotherIndex) {
        (self.first_mother, self.last_mother)
    }
}

impl Kinematics for GenParticle {
    fn p4(&self) -> &Candidate { &self.candidate }
    fn p4_mut(&mut self) -> &mut Candidate { &mut self.candidate }
}

impl Record for GenParticle {
    fn reset(&mut self) {
        self.candidate.reset();
        self.pdg_id = PdgId::default();
        self.first_mother = MotherIndex::NONE;
        self.last_mother = MotherIndex::NONE;
    }
}
