//! Preallocated per-event record collections.
//!
//! A `RecordBuffer` allocates its slots once and is refilled for every
//! event. Slots are reset when handed out, so nothing from a previous event
//! leaks into the next one.
//!
//! ## Overflow
//!
//! | Policy | Behaviour when full |
//! |--------|---------------------|
//! | `Truncate` | extra records are dropped and counted; one warning per event |
//! | `Fail` | `Error::CapacityExceeded` |
//!
//! Capacity is bounded by the `u16` count prefix of the packed collection,
//! so a buffer can always be encoded once it has been filled.

use serde::{Deserialize, Serialize};

use crate::codec::{encode_collection, PackedRecord, Precision};
use crate::config::{check_collection_size, TupleConfig};
use crate::model::Record;
use crate::{Error, Result};

/// What a full buffer does with further records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    #[default]
    Truncate,
    Fail,
}

/// Fixed-capacity collection of records for one event.
#[derive(Debug, Clone)]
pub struct RecordBuffer<T: Record> {
    slots: Vec<T>,
    len: usize,
    policy: OverflowPolicy,
    precision: Precision,
    dropped: usize,
}

impl<T: Record> RecordBuffer<T> {
    /// Preallocates `capacity` records, which must lie in `1..=MAX_COLLECTION_SIZE`.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Result<Self> {
        check_collection_size(capacity)?;
        Ok(Self {
            slots: vec![T::default(); capacity],
            len: 0,
            policy,
            precision: Precision::default(),
            dropped: 0,
        })
    }

    /// Validates `config`, then takes its capacity, policy and precision.
    pub fn from_config(config: &TupleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.max_collection_size, config.overflow_policy)?
            .with_precision(config.precision))
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Starts a new event. Keeps the allocation.
    pub fn clear(&mut self) {
        self.len = 0;
        self.dropped = 0;
    }

    /// Next free slot, reset to the default state.
    ///
    /// Returns `Ok(None)` when the buffer is full and the policy is
    /// `Truncate`.
    pub fn next_slot(&mut self) -> Result<Option<&mut T>> {
        if self.len == self.slots.len() {
            self.overflow()?;
            return Ok(None);
        }
        let slot = &mut self.slots[self.len];
        slot.reset();
        self.len += 1;
        Ok(Some(slot))
    }

    /// Copies `record` into the next slot. Returns whether it was stored.
    pub fn push(&mut self, record: T) -> Result<bool> {
        match self.next_slot()? {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn overflow(&mut self) -> Result<()> {
        match self.policy {
            OverflowPolicy::Fail => Err(Error::CapacityExceeded(format!(
                "collection is limited to {} records",
                self.slots.len()
            ))),
            OverflowPolicy::Truncate => {
                if self.dropped == 0 {
                    tracing::warn!(
                        capacity = self.slots.len(),
                        "collection full, dropping further records for this event"
                    );
                }
                self.dropped += 1;
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Records dropped in the current event under `Truncate`.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Record + PackedRecord> RecordBuffer<T> {
    /// Packs the filled part of the buffer as one collection.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(self.precision)
    }

    /// Like [`encode`](Self::encode), at an explicit precision.
    pub fn encode_with(&self, precision: Precision) -> Result<Vec<u8>> {
        Ok(encode_collection(self.as_slice(), precision)?)
    }
}

impl<'a, T: Record> IntoIterator for &'a RecordBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_collection;
    use crate::model::{GenParticle, Kinematics, Muon};

    #[test]
    fn slots_are_preallocated() {
        let buf: RecordBuffer<Muon> = RecordBuffer::new(8, OverflowPolicy::Fail).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert!(buf.is_empty());
        assert!(buf.as_slice().is_empty());
        assert_eq!(buf.precision(), Precision::Full);
    }

    #[test]
    fn capacity_outside_count_prefix_is_rejected() {
        for capacity in [0, 65_536, 70_000] {
            let err = RecordBuffer::<Muon>::new(capacity, OverflowPolicy::Truncate).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "capacity {capacity}");
        }
        assert_eq!(
            RecordBuffer::<Muon>::new(65_535, OverflowPolicy::Fail).unwrap().capacity(),
            65_535
        );
    }

    #[test]
    fn from_config_revalidates_builder_output() {
        let oversized = TupleConfig::default().with_max_collection_size(70_000);
        let err = RecordBuffer::<GenParticle>::from_config(&oversized).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let empty = TupleConfig::default().with_max_collection_size(0);
        assert!(RecordBuffer::<GenParticle>::from_config(&empty).is_err());
    }

    #[test]
    fn truncate_drops_and_counts() {
        let mut buf: RecordBuffer<Muon> = RecordBuffer::new(2, OverflowPolicy::Truncate).unwrap();
        for pt in [30.0, 20.0, 10.0, 5.0] {
            let mut m = Muon::default();
            m.set_pt(pt);
            buf.push(m).unwrap();
        }
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.dropped(), 2);
        let pts: Vec<f32> = buf.iter().map(|m| m.pt()).collect();
        assert_eq!(pts, vec![30.0, 20.0]);
    }

    #[test]
    fn fail_policy_errors_on_overflow() {
        let mut buf: RecordBuffer<Muon> = RecordBuffer::new(1, OverflowPolicy::Fail).unwrap();
        assert!(buf.push(Muon::default()).unwrap());
        let err = buf.push(Muon::default()).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded(_)));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn reused_slots_come_back_reset() {
        let mut buf: RecordBuffer<GenParticle> = RecordBuffer::new(4, OverflowPolicy::Fail).unwrap();
        {
            let p = buf.next_slot().unwrap().unwrap();
            p.set_pdg_id(5);
            p.set_first_mother_index(0).unwrap();
            p.set_pt(45.0);
        }
        buf.clear();
        let p = buf.next_slot().unwrap().unwrap();
        assert_eq!(*p, GenParticle::default());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn clear_resets_dropped_counter() {
        let mut buf: RecordBuffer<Muon> = RecordBuffer::new(1, OverflowPolicy::Truncate).unwrap();
        assert!(buf.push(Muon::default()).unwrap());
        assert!(buf.next_slot().unwrap().is_none());
        assert_eq!(buf.dropped(), 1);
        buf.clear();
        assert_eq!(buf.dropped(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn from_config_uses_size_policy_and_precision() {
        let config = TupleConfig::default()
            .with_max_collection_size(3)
            .with_overflow_policy(OverflowPolicy::Fail)
            .with_precision(Precision::Half);
        let buf: RecordBuffer<Muon> = RecordBuffer::from_config(&config).unwrap();
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.policy(), OverflowPolicy::Fail);
        assert_eq!(buf.precision(), Precision::Half);
    }

    #[test]
    fn encode_uses_configured_precision() {
        let config = TupleConfig::default().with_precision(Precision::Half);
        let mut buf: RecordBuffer<Muon> = RecordBuffer::from_config(&config).unwrap();
        let m = buf.next_slot().unwrap().unwrap();
        m.set_pt(25.0);

        let bytes = buf.encode().unwrap();
        assert_eq!(bytes.len(), 2 + Muon::packed_size(Precision::Half));
        assert_eq!(bytes, buf.encode_with(Precision::Half).unwrap());

        let full = buf.encode_with(Precision::Full).unwrap();
        assert_eq!(full.len(), 2 + Muon::packed_size(Precision::Full));

        let back: Vec<Muon> = decode_collection(&bytes, buf.precision()).unwrap();
        assert_eq!(back[0].pt(), 25.0);
    }
}
