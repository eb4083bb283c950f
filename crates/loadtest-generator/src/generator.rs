//! Main record generator.

use crate::decimal::FixedDecimal;
use crate::encoding::{Encoder, EncodingMode};
use crate::error::EncodingError;
use crate::record::{GenerationState, Record};
use loadtest_dataset::{DatasetDescriptor, DimensionResolver, FieldCatalog};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Upper bound (exclusive) of every drawn metric value.
pub const VALUE_RANGE: f64 = 1_000_000.0;

/// Record generator that walks users and samples in order.
///
/// The generator uses one seeded random number generator, drawn in
/// field-catalog order and never reseeded, so a fixed seed, dataset,
/// user type, catalog and resolver always produce the same bytes.
/// It is strictly sequential; restart it by building a new one.
pub struct RecordGenerator {
    descriptor: Arc<dyn DatasetDescriptor>,
    resolver: Arc<dyn DimensionResolver>,
    catalog: FieldCatalog,
    encoder: Encoder,
    user_type: u32,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    state: GenerationState,
    produced: u64,
}

impl RecordGenerator {
    /// Create a generator emitting text lines with the default separator.
    pub fn new(
        descriptor: Arc<dyn DatasetDescriptor>,
        resolver: Arc<dyn DimensionResolver>,
        catalog: FieldCatalog,
        seed: i64,
    ) -> Self {
        Self {
            descriptor,
            resolver,
            catalog,
            encoder: Encoder::default(),
            user_type: 0,
            rng: StdRng::seed_from_u64(seed as u64),
            state: GenerationState::default(),
            produced: 0,
        }
    }

    /// Set the user-type flag passed to alarm-type resolution.
    pub fn with_user_type(mut self, user_type: u32) -> Self {
        self.user_type = user_type;
        self
    }

    /// Set the encoder used by [`RecordGenerator::try_advance`].
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn encoding_mode(&self) -> EncodingMode {
        self.encoder.mode()
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Number of records produced so far.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Number of records still to come.
    pub fn remaining(&self) -> u64 {
        self.descriptor.total_records().saturating_sub(self.produced)
    }

    /// Build the next record, or `None` once every user is done.
    ///
    /// A draw without a decimal form fails the record instead of shortening
    /// its value list.
    pub fn next_record(&mut self) -> Result<Option<Record>, EncodingError> {
        let Some(user_id) = self.state.user_id(
            self.descriptor.start_user_id(),
            self.descriptor.end_user_id(),
        ) else {
            return Ok(None);
        };

        let sample_index = self.state.current_sample_index;
        let timestamp = self.descriptor.timestamp_at(sample_index);
        // Roll over only after the timestamp of the last sample was taken
        self.state.advance(self.descriptor.samples_per_user());

        let tags = self.resolver.resolve(user_id, self.user_type);
        let values = draw_values(&mut self.rng, self.catalog.len(), VALUE_RANGE)?;

        self.produced += 1;
        Ok(Some(Record {
            timestamp,
            user_id,
            sample_index,
            tags,
            values,
        }))
    }

    /// Produce the next encoded record.
    ///
    /// `Ok(None)` signals exhaustion; errors are fatal for the run.
    pub fn try_advance(&mut self) -> Result<Option<Vec<u8>>, EncodingError> {
        match self.next_record()? {
            Some(record) => self.encoder.encode(&record, &self.catalog).map(Some),
            None => Ok(None),
        }
    }
}

/// Draw one value per field, uniform in `[0, range)`, in catalog order.
fn draw_values(
    rng: &mut StdRng,
    fields: usize,
    range: f64,
) -> Result<Vec<FixedDecimal>, EncodingError> {
    (0..fields)
        .map(|_| FixedDecimal::from_f64(rng.gen::<f64>() * range))
        .collect()
}

impl Iterator for RecordGenerator {
    type Item = Result<Vec<u8>, EncodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_advance().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}
