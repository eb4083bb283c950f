//! Multi-field point protocol.
//!
//! Each record becomes a single-point `MputRequest`:
//!
//! ```text
//! message MputPoint {
//!   int64 timestamp = 1;
//!   string serieskey = 2;
//!   repeated double fvalues = 3;   // packed, aligned with fnames
//! }
//!
//! message MputRequest {
//!   repeated string fnames = 1;
//!   repeated MputPoint points = 2;
//! }
//! ```
//!
//! The series key is `metric,K1=v1,K2=v2,...` with tags sorted by key, e.g.
//! `electric,AREA=area_0,BJLX=3,DISTRICT=zhuhai,LINE=line_0,MPID=00000,PROVINCE=gd,SYSTEM=TMR,ZCUSID=0`.
//!
//! Unframed output is not line-splittable. Every `fnames` entry opens with
//! tag byte `0x0A` (field 1, wire type 2), which is also `\n`, so the sink's
//! newline terminator does not mark record boundaries. Readers that need to
//! recover records must use [`Framing::LengthPrefixed`].

use super::check_field_counts;
use crate::error::EncodingError;
use crate::record::Record;
use loadtest_dataset::FieldCatalog;
use protobuf::CodedOutputStream;

/// Separator between series-key components.
pub const SERIES_KEY_DELIMITER: char = ',';

/// Separator between a tag key and its value.
pub const KEY_VALUE_DELIMITER: char = '=';

/// Length of the little-endian size prefix of a framed record.
pub const FRAME_HEADER_LEN: usize = 8;

/// How an encoded request is delimited in the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `u64` little-endian message length, then the message bytes.
    LengthPrefixed,
    /// Message bytes reinterpreted as UTF-8 text, followed by the sink's
    /// newline. The payload itself contains newlines, so the stream cannot
    /// be split back into records.
    Unframed,
}

/// Encoder producing one `MputRequest` per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEncoder {
    metric: String,
    framing: Framing,
}

impl PointEncoder {
    pub fn new(metric: impl Into<String>, framing: Framing) -> Self {
        Self {
            metric: metric.into(),
            framing,
        }
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn encode(&self, record: &Record, catalog: &FieldCatalog) -> Result<Vec<u8>, EncodingError> {
        let message = self.encode_request(record, catalog)?;
        Ok(match self.framing {
            Framing::LengthPrefixed => frame(message),
            Framing::Unframed => String::from_utf8_lossy(&message).into_owned().into_bytes(),
        })
    }

    /// Encode the bare `MputRequest` message without framing.
    pub fn encode_request(
        &self,
        record: &Record,
        catalog: &FieldCatalog,
    ) -> Result<Vec<u8>, EncodingError> {
        check_field_counts(record, catalog)?;
        let series_key = self.series_key(record)?;

        let mut point = Vec::new();
        {
            let mut stream = CodedOutputStream::vec(&mut point);
            stream.write_int64(1, record.timestamp)?;
            stream.write_string(2, &series_key)?;
            // Packed repeated double: one length-delimited run of fixed64 values
            let mut packed = Vec::with_capacity(record.values.len() * 8);
            for value in &record.values {
                packed.extend_from_slice(&value.as_f64().to_le_bytes());
            }
            stream.write_bytes(3, &packed)?;
            stream.flush()?;
        }

        let mut request = Vec::with_capacity(point.len() + catalog.len() * 8);
        {
            let mut stream = CodedOutputStream::vec(&mut request);
            for name in catalog.iter() {
                stream.write_string(1, name)?;
            }
            stream.write_bytes(2, &point)?;
            stream.flush()?;
        }

        Ok(request)
    }

    /// Build the series key of a record.
    pub fn series_key(&self, record: &Record) -> Result<String, EncodingError> {
        check_reserved("metric", &self.metric)?;

        let mut key = String::with_capacity(128);
        key.push_str(&self.metric);
        for (tag, value) in record.series_tags() {
            check_reserved(tag, &value)?;
            key.push(SERIES_KEY_DELIMITER);
            key.push_str(tag);
            key.push(KEY_VALUE_DELIMITER);
            key.push_str(&value);
        }
        Ok(key)
    }
}

/// Prefix a message with its length as a little-endian `u64`.
pub fn frame(message: Vec<u8>) -> Vec<u8> {
    let mut framed = Vec::with_capacity(FRAME_HEADER_LEN + message.len());
    framed.extend_from_slice(&(message.len() as u64).to_le_bytes());
    framed.extend_from_slice(&message);
    framed
}

fn check_reserved(tag: &str, value: &str) -> Result<(), EncodingError> {
    match value
        .chars()
        .find(|c| *c == SERIES_KEY_DELIMITER || *c == KEY_VALUE_DELIMITER)
    {
        Some(character) => Err(EncodingError::ReservedCharacter {
            tag: tag.to_string(),
            value: value.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::FixedDecimal;
    use loadtest_dataset::{DimensionResolver, LookupTables};
    use protobuf::CodedInputStream;

    /// Decoded view of a single-point request.
    struct DecodedRequest {
        fnames: Vec<String>,
        timestamp: i64,
        series_key: String,
        fvalues: Vec<f64>,
    }

    fn decode(message: &[u8]) -> DecodedRequest {
        let mut fnames = Vec::new();
        let mut point = Vec::new();
        let mut stream = CodedInputStream::from_bytes(message);
        while !stream.eof().unwrap() {
            let tag = stream.read_raw_varint32().unwrap();
            match tag >> 3 {
                1 => fnames.push(stream.read_string().unwrap()),
                2 => point = stream.read_bytes().unwrap(),
                other => panic!("unexpected request field {other}"),
            }
        }

        let mut timestamp = 0;
        let mut series_key = String::new();
        let mut fvalues = Vec::new();
        let mut stream = CodedInputStream::from_bytes(&point);
        while !stream.eof().unwrap() {
            let tag = stream.read_raw_varint32().unwrap();
            match tag >> 3 {
                1 => timestamp = stream.read_int64().unwrap(),
                2 => series_key = stream.read_string().unwrap(),
                3 => {
                    let packed = stream.read_bytes().unwrap();
                    fvalues = packed
                        .chunks_exact(8)
                        .map(|chunk| f64::from_le_bytes(chunk.try_into().unwrap()))
                        .collect();
                }
                other => panic!("unexpected point field {other}"),
            }
        }

        DecodedRequest {
            fnames,
            timestamp,
            series_key,
            fvalues,
        }
    }

    fn record(user_id: i32) -> Record {
        Record {
            timestamp: 1_577_836_800_000,
            user_id,
            sample_index: 0,
            tags: LookupTables::default().resolve(user_id, 2),
            values: vec![
                FixedDecimal::from_f64(123.455).unwrap(),
                FixedDecimal::from_f64(0.5).unwrap(),
            ],
        }
    }

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(["f1", "f2"]).unwrap()
    }

    #[test]
    fn test_series_key_shape() {
        let encoder = PointEncoder::new("electric", Framing::LengthPrefixed);
        let key = encoder.series_key(&record(0)).unwrap();

        assert_eq!(
            key,
            "electric,AREA=area_0,BJLX=3,DISTRICT=zhuhai,LINE=line_0,MPID=00000,PROVINCE=gd,SYSTEM=TMR,ZCUSID=0"
        );
    }

    #[test]
    fn test_series_key_is_deterministic() {
        let encoder = PointEncoder::new("electric", Framing::Unframed);
        let record = record(17);
        assert_eq!(
            encoder.series_key(&record).unwrap(),
            encoder.series_key(&record).unwrap()
        );
    }

    #[test]
    fn test_request_decodes() {
        let encoder = PointEncoder::new("electric", Framing::LengthPrefixed);
        let message = encoder.encode_request(&record(0), &catalog()).unwrap();
        let decoded = decode(&message);

        assert_eq!(decoded.fnames, vec!["f1", "f2"]);
        assert_eq!(decoded.timestamp, 1_577_836_800_000);
        assert!(decoded.series_key.starts_with("electric,AREA=area_0,"));
        assert_eq!(decoded.fvalues, vec![123.46, 0.5]);
    }

    #[test]
    fn test_length_prefixed_framing() {
        let encoder = PointEncoder::new("electric", Framing::LengthPrefixed);
        let message = encoder.encode_request(&record(0), &catalog()).unwrap();
        let framed = encoder.encode(&record(0), &catalog()).unwrap();

        assert_eq!(framed.len(), FRAME_HEADER_LEN + message.len());
        let header: [u8; 8] = framed[..FRAME_HEADER_LEN].try_into().unwrap();
        assert_eq!(u64::from_le_bytes(header), message.len() as u64);
        assert_eq!(&framed[FRAME_HEADER_LEN..], &message[..]);
    }

    #[test]
    fn test_unframed_is_text() {
        let encoder = PointEncoder::new("electric", Framing::Unframed);
        let payload = encoder.encode(&record(0), &catalog()).unwrap();

        assert!(String::from_utf8(payload.clone()).is_ok());
        assert!(payload.windows(8).any(|w| w == b"electric"));
    }

    #[test]
    fn test_unframed_payload_embeds_newlines() {
        let encoder = PointEncoder::new("electric", Framing::Unframed);
        let payload = encoder.encode(&record(0), &catalog()).unwrap();

        // Field 1, wire type 2 is tag byte 0x0A: one per field name.
        assert_eq!(payload[0], b'\n');
        assert!(payload.iter().filter(|b| **b == b'\n').count() >= catalog().len());
    }

    #[test]
    fn test_reserved_character_rejected() {
        let mut record = record(0);
        record.tags.district = "zhu,hai".to_string();

        let encoder = PointEncoder::new("electric", Framing::LengthPrefixed);
        let result = encoder.encode(&record, &catalog());
        assert!(matches!(
            result,
            Err(EncodingError::ReservedCharacter { character: ',', .. })
        ));
    }

    #[test]
    fn test_reserved_character_in_metric() {
        let encoder = PointEncoder::new("elec=tric", Framing::LengthPrefixed);
        let result = encoder.series_key(&record(0));
        assert!(matches!(
            result,
            Err(EncodingError::ReservedCharacter { character: '=', .. })
        ));
    }

    #[test]
    fn test_catalog_mismatch_rejected() {
        let encoder = PointEncoder::new("electric", Framing::LengthPrefixed);
        let catalog = FieldCatalog::new(["only"]).unwrap();
        let result = encoder.encode(&record(0), &catalog);
        assert!(matches!(
            result,
            Err(EncodingError::FieldCountMismatch {
                names: 1,
                values: 2
            })
        ));

        let empty = FieldCatalog::new_unchecked(Vec::<String>::new());
        let result = encoder.encode(&record(0), &empty);
        assert!(matches!(result, Err(EncodingError::EmptyFieldCatalog)));
    }
}
