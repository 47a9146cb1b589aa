//! # pec-tuples: Compact Physics-Event Records
//!
//! Fixed-size value types for storing reconstructed and generator-level
//! physics objects in flat, fixed-schema tuples.
//!
//! ## Design Principles
//!
//! 1. **Plain values**: every record is `Copy`, owns nothing, and resets to
//!    its `Default` state so one instance can be refilled per event.
//! 2. **Composition over inheritance**: records embed a `Candidate` and expose
//!    capability traits (`Kinematics`, `Record`, `Identified`, `ChargedLepton`).
//! 3. **Invariants at write time**: setters reject what cannot be stored and
//!    fold what can be stored lossily. Nothing is validated later.
//! 4. **Narrow only at the boundary**: in-memory fields are full width; the
//!    `codec` module packs them into fixed-width little-endian bytes.
//!
//! ## Quick Start
//!
//! ```rust
//! use pec_tuples::{GenParticle, Kinematics, Record};
//!
//! # fn example() -> pec_tuples::Result<()> {
//! let mut particle = GenParticle::default();
//! particle.set_pdg_id(-211);
//! particle.set_first_mother_index(-1)?;
//! particle.set_pt(12.5);
//!
//! assert_eq!(particle.pdg_id(), -211);
//! assert_eq!(particle.first_mother_index(), -1);
//!
//! particle.reset();
//! assert_eq!(particle, GenParticle::default());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Record Types
//!
//! | Record | Embeds | Adds |
//! |--------|--------|------|
//! | `Candidate` | | pt, eta, phi, mass |
//! | `CandidateWithId` | `Candidate` | 16 ID bits |
//! | `Lepton` | `CandidateWithId` | charge sign, rel. isolation, impact parameter |
//! | `Electron` | `Lepton` | MVA ID, preselection / conversion-veto bits |
//! | `Muon` | `Lepton` | tight-quality bit |
//! | `Jet` | `CandidateWithId` | b-tags, JEC/JER systematics, charge, pull, flavours |
//! | `GenParticle` | `Candidate` | PDG ID, mother indices |
//! | `GenJet` | `Candidate` | b / c quark multiplicities |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod codec;
pub mod buffer;
pub mod config;

// ============================================================================
// Re-exports: Model (the records)
// ============================================================================

pub use model::{
    Candidate, CandidateWithId, IdBits, Lepton, Charge, Electron, Muon, Jet,
    GenParticle, GenJet, PdgId, MotherIndex,
    Kinematics, Record, Identified, ChargedLepton,
};

// ============================================================================
// Re-exports: Codec, buffers, configuration
// ============================================================================

pub use codec::{
    CodecError, PackedRecord, Precision, Reader, Writer,
    encode_collection, decode_collection,
};
pub use buffer::{RecordBuffer, OverflowPolicy};
pub use config::TupleConfig;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
