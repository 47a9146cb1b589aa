//! CandidateWithId: a candidate carrying a packed identification bitset.
//!
//! The bitset has no meaning at this level. Each record type decides which
//! low bits hold its own quality flags; the remaining high bits are free
//! slots for the results of user-defined selections.

use serde::{Deserialize, Serialize};

use super::{Candidate, Kinematics, Record};
use crate::{Error, Result};

// ============================================================================
// IdBits
// ============================================================================

/// Fixed-width (16-bit) flag field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdBits(u16);

impl IdBits {
    /// Number of addressable bits.
    pub const WIDTH: u32 = u16::BITS;

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Value of bit `n`. Bits beyond `WIDTH` read as unset.
    pub fn bit(self, n: u32) -> bool {
        n < Self::WIDTH && (self.0 >> n) & 1 == 1
    }

    pub fn set_bit(&mut self, n: u32, value: bool) -> Result<()> {
        if n >= Self::WIDTH {
            return Err(Error::InvalidArgument(format!(
                "ID bit {n} is outside the {}-bit field", Self::WIDTH
            )));
        }
        if value {
            self.0 |= 1 << n;
        } else {
            self.0 &= !(1 << n);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

// ============================================================================
// Identified capability
// ============================================================================

/// Access to the ID bitset of records built on `CandidateWithId`.
pub trait Identified: Kinematics {
    /// First bit available to user selections. Lower bits are reserved for
    /// flags defined by the record type.
    const FIRST_USER_BIT: u32;

    /// Number of user-selection slots.
    const USER_SELECTION_SLOTS: u32 = IdBits::WIDTH - Self::FIRST_USER_BIT;

    fn candidate_with_id(&self) -> &CandidateWithId;
    fn candidate_with_id_mut(&mut self) -> &mut CandidateWithId;

    fn id_bits(&self) -> IdBits {
        self.candidate_with_id().id_bits
    }

    fn set_id_bits(&mut self, bits: IdBits) {
        self.candidate_with_id_mut().id_bits = bits;
    }

    /// Result of the user selection stored in slot `index`.
    fn user_selection(&self, index: u32) -> bool {
        index < Self::USER_SELECTION_SLOTS && self.id_bits().bit(Self::FIRST_USER_BIT + index)
    }

    fn set_user_selection(&mut self, index: u32, passed: bool) -> Result<()> {
        if index >= Self::USER_SELECTION_SLOTS {
            return Err(Error::InvalidArgument(format!(
                "user selection {index} exceeds the {} available slots",
                Self::USER_SELECTION_SLOTS
            )));
        }
        self.candidate_with_id_mut()
            .id_bits
            .set_bit(Self::FIRST_USER_BIT + index, passed)
    }
}

// ============================================================================
// CandidateWithId
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateWithId {
    candidate: Candidate,
    id_bits: IdBits,
}

impl CandidateWithId {
    pub const fn new(candidate: Candidate, id_bits: IdBits) -> Self {
        Self { candidate, id_bits }
    }

    /// Record-specific flag bit, for types that reserve low bits.
    pub(crate) fn flag(&self, n: u32) -> bool {
        self.id_bits.bit(n)
    }

    /// Sets a record-specific flag bit. `n` is a compile-time constant of
    /// the calling record and always below `IdBits::WIDTH`.
    pub(crate) fn set_flag(&mut self, n: u32, value: bool) {
        debug_assert!(n < IdBits::WIDTH);
        let mask = 1u16 << (n % IdBits::WIDTH);
        let raw = self.id_bits.raw();
        self.id_bits = IdBits::from_raw(if value { raw | mask } else { raw & !mask });
    }
}

impl Kinematics for CandidateWithId {
    fn p4(&self) -> &Candidate { &self.candidate }
    fn p4_mut(&mut self) -> &mut Candidate { &mut self.candidate }
}

impl Identified for CandidateWithId {
    const FIRST_USER_BIT: u32 = 0;

    fn candidate_with_id(&self) -> &CandidateWithId { self }
    fn candidate_with_id_mut(&mut self) -> &mut CandidateWithId { self }
}

impl Record for CandidateWithId {
    fn reset(&mut self) {
        self.candidate.reset();
        self.id_bits.clear();
    }
}
