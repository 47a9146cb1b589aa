//! # Record Model
//!
//! Plain value types for physics objects. Every record is fixed-size,
//! `Copy`, and resets to its `Default` state.
//!
//! Design rule: no I/O and no packed encodings here. Narrowing to
//! fixed-width storage happens in `crate::codec`.

pub mod candidate;
pub mod candidate_with_id;
pub mod lepton;
pub mod electron;
pub mod muon;
pub mod jet;
pub mod gen_particle;
pub mod gen_jet;

pub use candidate::{Candidate, Kinematics, Record};
pub use candidate_with_id::{CandidateWithId, IdBits, Identified};
pub use lepton::{Lepton, Charge, ChargedLepton};
pub use electron::Electron;
pub use muon::Muon;
pub use jet::Jet;
pub use gen_particle::{GenParticle, PdgId, MotherIndex};
pub use gen_jet::GenJet;
