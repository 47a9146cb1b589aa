//! Jet: a reconstructed jet with b-tagging and systematic information.
//!
//! All ID bits are user-selection slots.
//!
//! The JER-shifted fields hold pt and mass of the same jet taken from the
//! collections smeared with the resolution shifted up or down by one sigma.
//! Eta and phi are the same as for the nominal jet.

use serde::{Deserialize, Serialize};

use super::{Candidate, CandidateWithId, Identified, Kinematics, Record};
use crate::{Error, Result};

/// Number of float fields a jet adds to its `CandidateWithId`.
pub(crate) const JET_FLOAT_FIELDS: usize = 10;
/// Number of one-byte flavour codes a jet carries.
pub(crate) const JET_FLAVOUR_BYTES: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    base: CandidateWithId,
    b_tag_tchp: f32,
    b_tag_csv: f32,
    sec_vertex_mass: f32,
    jec_uncertainty: f32,
    pt_jer_up: f32,
    mass_jer_up: f32,
    pt_jer_down: f32,
    mass_jer_down: f32,
    charge: f32,
    pull_angle: f32,
    flavour: i8,
    gen_parton_flavour: i8,
}

impl Jet {
    /// TCHP b-tagging discriminator.
    pub fn b_tag_tchp(&self) -> f32 { self.b_tag_tchp }
    pub fn set_b_tag_tchp(&mut self, value: f32) { self.b_tag_tchp = value; }

    /// CSV b-tagging discriminator.
    pub fn b_tag_csv(&self) -> f32 { self.b_tag_csv }
    pub fn set_b_tag_csv(&mut self, value: f32) { self.b_tag_csv = value; }

    /// Mass of the secondary vertex, GeV.
    pub fn sec_vertex_mass(&self) -> f32 { self.sec_vertex_mass }
    pub fn set_sec_vertex_mass(&mut self, value: f32) { self.sec_vertex_mass = value; }

    /// Relative JEC uncertainty.
    pub fn jec_uncertainty(&self) -> f32 { self.jec_uncertainty }
    pub fn set_jec_uncertainty(&mut self, value: f32) { self.jec_uncertainty = value; }

    pub fn pt_jer_up(&self) -> f32 { self.pt_jer_up }
    pub fn set_pt_jer_up(&mut self, value: f32) { self.pt_jer_up = value; }

    pub fn mass_jer_up(&self) -> f32 { self.mass_jer_up }
    pub fn set_mass_jer_up(&mut self, value: f32) { self.mass_jer_up = value; }

    pub fn pt_jer_down(&self) -> f32 { self.pt_jer_down }
    pub fn set_pt_jer_down(&mut self, value: f32) { self.pt_jer_down = value; }

    pub fn mass_jer_down(&self) -> f32 { self.mass_jer_down }
    pub fn set_mass_jer_down(&mut self, value: f32) { self.mass_jer_down = value; }

    /// Sum of constituent charges weighted with their pt.
    pub fn charge(&self) -> f32 { self.charge }
    pub fn set_charge(&mut self, value: f32) { self.charge = value; }

    /// Angle between the pull vector and the rapidity axis, radians.
    pub fn pull_angle(&self) -> f32 { self.pull_angle }
    pub fn set_pull_angle(&mut self, value: f32) { self.pull_angle = value; }

    /// Algorithmic flavour code.
    pub fn flavour(&self) -> i32 {
        i32::from(self.flavour)
    }

    pub fn set_flavour(&mut self, flavour: i32) -> Result<()> {
        self.flavour = one_byte("flavour", flavour)?;
        Ok(())
    }

    /// Flavour of the parton matched to the jet, 0 if there is no match.
    pub fn gen_parton_flavour(&self) -> i32 {
        i32::from(self.gen_parton_flavour)
    }

    pub fn set_gen_parton_flavour(&mut self, flavour: i32) -> Result<()> {
        self.gen_parton_flavour = one_byte("generator parton flavour", flavour)?;
        Ok(())
    }

    pub(crate) fn from_parts(
        base: CandidateWithId,
        floats: [f32; JET_FLOAT_FIELDS],
        [flavour, gen_parton_flavour]: [i8; JET_FLAVOUR_BYTES],
    ) -> Self {
        let [
            b_tag_tchp,
            b_tag_csv,
            sec_vertex_mass,
            jec_uncertainty,
            pt_jer_up,
            mass_jer_up,
            pt_jer_down,
            mass_jer_down,
            charge,
            pull_angle,
        ] = floats;
        Self {
            base,
            b_tag_tchp,
            b_tag_csv,
            sec_vertex_mass,
            jec_uncertainty,
            pt_jer_up,
            mass_jer_up,
            pt_jer_down,
            mass_jer_down,
            charge,
            pull_angle,
            flavour,
            gen_parton_flavour,
        }
    }

    /// Float fields in packed order.
    pub(crate) fn float_fields(&self) -> [f32; JET_FLOAT_FIELDS] {
        [
            self.b_tag_tchp,
            self.b_tag_csv,
            self.sec_vertex_mass,
            self.jec_uncertainty,
            self.pt_jer_up,
            self.mass_jer_up,
            self.pt_jer_down,
            self.mass_jer_down,
            self.charge,
            self.pull_angle,
        ]
    }

    pub(crate) fn raw_flavours(&self) -> [i8; JET_FLAVOUR_BYTES] {
        [self.flavour, self.gen_parton_flavour]
    }
}

fn one_byte(what: &str, flavour: i32) -> Result<i8> {
    i8::try_from(flavour).map_err(|_| {
        Error::InvalidArgument(format!("jet {what} {flavour} does not fit into one byte"))
    })
}

impl Kinematics for Jet {
    fn p4(&self) -> &Candidate { self.base.p4() }
    fn p4_mut(&mut self) -> &mut Candidate { self.base.p4_mut() }
}

impl Identified for Jet {
    const FIRST_USER_BIT: u32 = 0;

    fn candidate_with_id(&self) -> &CandidateWithId { &self.base }
    fn candidate_with_id_mut(&mut self) -> &mut CandidateWithId { &mut self.base }
}

impl Record for Jet {
    fn reset(&mut self) {
        self.base.reset();
        self.b_tag_tchp = 0.0;
        self.b_tag_csv = 0.0;
        self.sec_vertex_mass = 0.0;
        self.jec_uncertainty = 0.0;
        self.pt_jer_up = 0.0;
        self.mass_jer_up = 0.0;
        self.pt_jer_down = 0.0;
        self.mass_jer_down = 0.0;
        self.charge = 0.0;
        self.pull_angle = 0.0;
        self.flavour = 0;
        self.gen_parton_flavour = 0;
    }
}
