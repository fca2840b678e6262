//! Record parser
//!
//! Turns one raw dataset row into an [`IpRange`]. Rows whose numeric bounds do
//! not parse are dropped without error; the datasets are consumed on a best
//! effort basis.

use num_bigint::BigUint;

use super::types::{IpRange, RawRecord};

/// Parse a raw record into a range, or `None` if a bound is malformed
///
/// The country field is taken verbatim.
pub fn parse_record(record: &RawRecord) -> Option<IpRange> {
    let Some(start) = parse_decimal(&record.start) else {
        log::debug!("Skipping record with malformed start: {:?}", record);
        return None;
    };
    let Some(end) = parse_decimal(&record.end) else {
        log::debug!("Skipping record with malformed end: {:?}", record);
        return None;
    };

    Some(IpRange {
        start,
        end,
        country: record.country.clone(),
    })
}

/// Build a raw record from CSV fields
///
/// Returns `None` for rows with fewer than three fields. Extra fields are ignored.
pub fn raw_from_fields<'a, I>(fields: I) -> Option<RawRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();
    let start = fields.next()?;
    let end = fields.next()?;
    let country = fields.next()?;
    Some(RawRecord::new(start, end, country))
}

/// Parse a base-10, unsigned, arbitrary-precision integer
///
/// Only ASCII digits are accepted: no sign, no whitespace, no separators.
pub fn parse_decimal(text: &str) -> Option<BigUint> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
}
