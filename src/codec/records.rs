//! Fixed-width layouts of every record type.
//!
//! ```text
//! Candidate        pt | eta | phi | mass                          4F
//! CandidateWithId  Candidate | id_bits:u16                        4F + 2
//! Lepton           CandidateWithId | charge:u8 | rel_iso | db     6F + 3
//! Electron         Lepton | mva_id                                7F + 3
//! Muon             Lepton                                         6F + 3
//! Jet              CandidateWithId | tchp | csv | sv_mass | jec_unc
//!                  | pt_jer_up | mass_jer_up | pt_jer_down
//!                  | mass_jer_down | charge | pull
//!                  | flavour:i8 | gen_parton_flavour:i8           14F + 4
//! GenParticle      Candidate | pdg_id:i16 | mother+1:u8 ×2        4F + 4
//! GenJet           Candidate | b_mult:u8 | c_mult:u8              4F + 2
//! ```
//!
//! `F` is the float width of the chosen `Precision`.

use super::{CodecError, PackedRecord, Precision, Reader, Writer};
use crate::model::jet::{JET_FLAVOUR_BYTES, JET_FLOAT_FIELDS};
use crate::model::{
    Candidate, CandidateWithId, Charge, ChargedLepton, Electron, GenJet, GenParticle, IdBits,
    Identified, Jet, Kinematics, Lepton, MotherIndex, Muon, PdgId,
};

// ============================================================================
// Candidate / CandidateWithId
// ============================================================================

impl PackedRecord for Candidate {
    fn packed_size(precision: Precision) -> usize {
        4 * precision.float_width()
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        writer.write_real(self.pt(), precision);
        writer.write_real(self.eta(), precision);
        writer.write_real(self.phi(), precision);
        writer.write_real(self.mass(), precision);
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let pt = reader.read_real(precision)?;
        let eta = reader.read_real(precision)?;
        let phi = reader.read_real(precision)?;
        let mass = reader.read_real(precision)?;
        Ok(Candidate::new(pt, eta, phi, mass))
    }
}

impl PackedRecord for CandidateWithId {
    fn packed_size(precision: Precision) -> usize {
        Candidate::packed_size(precision) + 2
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.p4().encode(writer, precision);
        writer.write_u16_le(self.id_bits().raw());
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let candidate = Candidate::decode(reader, precision)?;
        let id_bits = IdBits::from_raw(reader.read_u16_le()?);
        Ok(CandidateWithId::new(candidate, id_bits))
    }
}

// ============================================================================
// Leptons
// ============================================================================

impl PackedRecord for Lepton {
    fn packed_size(precision: Precision) -> usize {
        CandidateWithId::packed_size(precision) + 1 + 2 * precision.float_width()
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.candidate_with_id().encode(writer, precision);
        writer.write_u8(u8::from(self.charge_sign().is_negative()));
        writer.write_real(self.rel_iso(), precision);
        writer.write_real(self.db(), precision);
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let base = CandidateWithId::decode(reader, precision)?;
        let charge = match reader.read_u8()? {
            0 => Charge::Positive,
            1 => Charge::Negative,
            other => {
                return Err(CodecError::InvalidValue { field: "charge", value: i64::from(other) });
            }
        };
        let rel_iso = reader.read_real(precision)?;
        let db = reader.read_real(precision)?;
        // Only magnitudes are ever written.
        if db.is_sign_negative() {
            return Err(CodecError::InvalidValue { field: "db", value: i64::from(db.to_bits()) });
        }
        Ok(Lepton::from_parts(base, charge, rel_iso, db))
    }
}

impl PackedRecord for Electron {
    fn packed_size(precision: Precision) -> usize {
        Lepton::packed_size(precision) + precision.float_width()
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.lepton().encode(writer, precision);
        writer.write_real(self.mva_id(), precision);
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let lepton = Lepton::decode(reader, precision)?;
        let mva_id = reader.read_real(precision)?;
        Ok(Electron::from_parts(lepton, mva_id))
    }
}

impl PackedRecord for Muon {
    fn packed_size(precision: Precision) -> usize {
        Lepton::packed_size(precision)
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.lepton().encode(writer, precision);
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        Lepton::decode(reader, precision).map(Muon::from_lepton)
    }
}

// ============================================================================
// Jets
// ============================================================================

impl PackedRecord for Jet {
    fn packed_size(precision: Precision) -> usize {
        CandidateWithId::packed_size(precision)
            + JET_FLOAT_FIELDS * precision.float_width()
            + JET_FLAVOUR_BYTES
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.candidate_with_id().encode(writer, precision);
        for value in self.float_fields() {
            writer.write_real(value, precision);
        }
        for flavour in self.raw_flavours() {
            writer.write_i8(flavour);
        }
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let base = CandidateWithId::decode(reader, precision)?;
        let mut floats = [0.0f32; JET_FLOAT_FIELDS];
        for value in &mut floats {
            *value = reader.read_real(precision)?;
        }
        let mut flavours = [0i8; JET_FLAVOUR_BYTES];
        for flavour in &mut flavours {
            *flavour = reader.read_i8()?;
        }
        Ok(Jet::from_parts(base, floats, flavours))
    }
}

impl PackedRecord for GenJet {
    fn packed_size(precision: Precision) -> usize {
        Candidate::packed_size(precision) + 2
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.p4().encode(writer, precision);
        writer.write_u8(self.b_mult());
        writer.write_u8(self.c_mult());
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let candidate = Candidate::decode(reader, precision)?;
        let b_mult = reader.read_u8()?;
        let c_mult = reader.read_u8()?;
        Ok(GenJet::from_parts(candidate, b_mult, c_mult))
    }
}

// ============================================================================
// GenParticle
// ============================================================================

/// Mother indices are stored as `index + 1`; 0 marks an absent mother.
fn mother_to_byte(index: MotherIndex) -> u8 {
    // MotherIndex::MAX + 1 fits u8
    index.as_option().map_or(0, |i| i as u8 + 1)
}

fn mother_from_byte(field: &'static str, byte: u8) -> Result<MotherIndex, CodecError> {
    MotherIndex::new(i32::from(byte) - 1)
        .map_err(|_| CodecError::InvalidValue { field, value: i64::from(byte) })
}

impl PackedRecord for GenParticle {
    fn packed_size(precision: Precision) -> usize {
        Candidate::packed_size(precision) + 4
    }

    fn encode(&self, writer: &mut Writer, precision: Precision) {
        self.p4().encode(writer, precision);
        // Folded codes are bounded by PdgId::MAX_MAGNITUDE < i16::MAX.
        writer.write_i16_le(self.pdg_id() as i16);
        let (first, last) = self.mothers();
        writer.write_u8(mother_to_byte(first));
        writer.write_u8(mother_to_byte(last));
    }

    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError> {
        let candidate = Candidate::decode(reader, precision)?;
        let raw_pdg = reader.read_i16_le()?;
        if i32::from(raw_pdg).abs() > PdgId::MAX_MAGNITUDE {
            return Err(CodecError::InvalidValue { field: "pdg_id", value: i64::from(raw_pdg) });
        }
        let first = mother_from_byte("first_mother", reader.read_u8()?)?;
        let last = mother_from_byte("last_mother", reader.read_u8()?)?;
        Ok(GenParticle::from_parts(candidate, PdgId::fold(i64::from(raw_pdg)), first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_from_bytes, encode_to_vec};
    use pretty_assertions::assert_eq;

    fn sample_particle() -> GenParticle {
        let mut p = GenParticle::default();
        p.set_p4(12.5, -2.25, 3.0, 0.139_57);
        p.set_pdg_id(-211);
        p.set_mother_indices(0, 253).unwrap();
        p
    }

    #[test]
    fn packed_sizes_match_layout() {
        assert_eq!(Candidate::packed_size(Precision::Full), 16);
        assert_eq!(Candidate::packed_size(Precision::Half), 8);
        assert_eq!(Lepton::packed_size(Precision::Full), 16 + 2 + 1 + 8);
        assert_eq!(Electron::packed_size(Precision::Half), 8 + 2 + 1 + 4 + 2);
        assert_eq!(Jet::packed_size(Precision::Full), 16 + 2 + 40 + 2);
        assert_eq!(Jet::packed_size(Precision::Half), 8 + 2 + 20 + 2);
        assert_eq!(GenParticle::packed_size(Precision::Full), 20);
        assert_eq!(GenJet::packed_size(Precision::Half), 10);
    }

    #[test]
    fn encoded_length_equals_packed_size() {
        let p = sample_particle();
        for precision in [Precision::Full, Precision::Half] {
            assert_eq!(encode_to_vec(&p, precision).len(), GenParticle::packed_size(precision));
            assert_eq!(
                encode_to_vec(&Jet::default(), precision).len(),
                Jet::packed_size(precision)
            );
            assert_eq!(
                encode_to_vec(&Electron::default(), precision).len(),
                Electron::packed_size(precision)
            );
        }
    }

    #[test]
    fn mother_indices_use_offset_encoding() {
        let bytes = encode_to_vec(&sample_particle(), Precision::Full);
        assert_eq!(&bytes[16..], &[0x2D, 0xFF, 1, 254]); // -211 as i16 LE, 0+1, 253+1

        let orphan = GenParticle::default();
        let bytes = encode_to_vec(&orphan, Precision::Full);
        assert_eq!(&bytes[18..], &[0, 0]);
    }

    #[test]
    fn gen_particle_round_trip_is_exact_at_full_precision() {
        let p = sample_particle();
        let back: GenParticle = decode_from_bytes(&encode_to_vec(&p, Precision::Full), Precision::Full).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.first_mother_index(), 0);
        assert_eq!(back.last_mother_index(), 253);
    }

    #[test]
    fn folded_pdg_id_survives_two_byte_field() {
        let mut p = GenParticle::default();
        p.set_pdg_id(-1_000_039);
        let back: GenParticle = decode_from_bytes(&encode_to_vec(&p, Precision::Half), Precision::Half).unwrap();
        assert_eq!(back.pdg_id(), -30039);
    }

    #[test]
    fn invalid_mother_byte_is_rejected() {
        let mut bytes = encode_to_vec(&sample_particle(), Precision::Full);
        bytes[19] = 255;
        let err = decode_from_bytes::<GenParticle>(&bytes, Precision::Full).unwrap_err();
        assert_eq!(err, CodecError::InvalidValue { field: "last_mother", value: 255 });
    }

    #[test]
    fn invalid_pdg_id_is_rejected() {
        let mut bytes = encode_to_vec(&sample_particle(), Precision::Full);
        bytes[16..18].copy_from_slice(&32000i16.to_le_bytes());
        let err = decode_from_bytes::<GenParticle>(&bytes, Precision::Full).unwrap_err();
        assert_eq!(err, CodecError::InvalidValue { field: "pdg_id", value: 32000 });
    }

    #[test]
    fn invalid_charge_flag_is_rejected() {
        let mut bytes = encode_to_vec(&Lepton::default(), Precision::Full);
        bytes[18] = 2;
        let err = decode_from_bytes::<Lepton>(&bytes, Precision::Full).unwrap_err();
        assert_eq!(err, CodecError::InvalidValue { field: "charge", value: 2 });
    }

    #[test]
    fn negative_db_is_rejected() {
        let mut bytes = encode_to_vec(&Lepton::default(), Precision::Full);
        // candidate 16 | id 2 | charge 1 | rel_iso 4 | db 4
        bytes[23..27].copy_from_slice(&(-0.5f32).to_le_bytes());
        let err = decode_from_bytes::<Lepton>(&bytes, Precision::Full).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue { field: "db", value: i64::from((-0.5f32).to_bits()) }
        );

        let mut bytes = encode_to_vec(&Muon::default(), Precision::Half);
        let db = bytes.len() - 2;
        bytes[db..].copy_from_slice(&0x8000u16.to_le_bytes()); // f16 -0.0
        assert!(decode_from_bytes::<Muon>(&bytes, Precision::Half).is_err());
    }

    #[test]
    fn electron_round_trip_keeps_flags() {
        let mut e = Electron::default();
        e.set_p4(33.0, 0.4, -1.1, 0.0);
        e.set_charge(-1).unwrap();
        e.set_rel_iso(0.12);
        e.set_db(-0.004);
        e.set_mva_id(0.95);
        e.set_conversion_veto(true);
        e.set_user_selection(5, true).unwrap();

        let back: Electron = decode_from_bytes(&encode_to_vec(&e, Precision::Full), Precision::Full).unwrap();
        assert_eq!(back, e);
        assert!(back.passes_conversion_veto());
        assert!(back.user_selection(5));
        assert_eq!(back.db(), 0.004);
    }

    #[test]
    fn jet_round_trip() {
        let mut j = Jet::default();
        j.set_p4(80.0, -1.9, 0.7, 11.0);
        j.set_b_tag_tchp(3.41);
        j.set_b_tag_csv(0.679);
        j.set_sec_vertex_mass(2.1);
        j.set_jec_uncertainty(0.025);
        j.set_pt_jer_up(84.0);
        j.set_mass_jer_up(11.4);
        j.set_pt_jer_down(76.5);
        j.set_mass_jer_down(10.6);
        j.set_charge(0.33);
        j.set_pull_angle(-2.8);
        j.set_flavour(-4).unwrap();
        j.set_gen_parton_flavour(21).unwrap();
        j.set_user_selection(1, true).unwrap();

        let bytes = encode_to_vec(&j, Precision::Full);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFC, 21]);
        let back: Jet = decode_from_bytes(&bytes, Precision::Full).unwrap();
        assert_eq!(back, j);
        assert_eq!(back.gen_parton_flavour(), 21);
        assert_eq!(back.pt_jer_down(), 76.5);
    }

    #[test]
    fn truncated_input_is_out_of_bounds() {
        let bytes = encode_to_vec(&Muon::default(), Precision::Full);
        let err = decode_from_bytes::<Muon>(&bytes[..bytes.len() - 1], Precision::Full).unwrap_err();
        assert_eq!(err, CodecError::OutOfBounds);
    }
}
