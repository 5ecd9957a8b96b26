//! Case records as they come out of the dashboard backend, and the locations we derive from them.
//!
//! The backend is not very strict about its output: identifiers and postal codes can be strings
//! or numbers, coordinates can be numbers, numeric strings or `null`, and text fields are
//! sometimes `null`.  All of that is absorbed here so the rest of the engine only sees clean
//! values.
//!

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use strum::{Display, EnumString};
use tracing::{debug, trace, warn};

use poshan_common::Coord;

use crate::BatchError;

/// Severity of a case.
///
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumString, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    #[serde(alias = "Severe", alias = "SEVERE")]
    Severe,
    #[default]
    #[serde(alias = "Moderate", alias = "MODERATE")]
    Moderate,
}

/// One case as fetched from the backend.
///
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Opaque identifier of the child
    #[serde(alias = "id", default, deserialize_with = "string_or_number")]
    pub child_id: String,
    /// Postal code, the deduplication and geocoding key
    #[serde(alias = "pin_code", alias = "pincode", default, deserialize_with = "opt_string_or_number")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub village: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub district: String,
    pub severity: Severity,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CaseRecord {
    /// Trimmed postal code, `None` if missing or blank.
    ///
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Coordinates carried by the record itself, only if both are present and valid.
    ///
    pub fn coord(&self) -> Option<Coord> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coord::new(lat, lon)).filter(Coord::is_valid),
            _ => None,
        }
    }

    /// Parse a backend answer.  It can be a plain array of records or an object wrapping the
    /// array under `results`, `data` or `cases`.  Elements that do not look like a case are
    /// skipped and counted.
    ///
    #[tracing::instrument(skip(data))]
    pub fn parse_batch(data: &str) -> Result<Batch, BatchError> {
        let value: Value = serde_json::from_str(data)?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut obj) => ["results", "data", "cases"]
                .iter()
                .find_map(|k| match obj.remove(*k) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .ok_or(BatchError::NotAList)?,
            _ => return Err(BatchError::NotAList),
        };
        trace!("{} elements", items.len());

        let mut batch = Batch::default();
        for (n, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<CaseRecord>(item) {
                Ok(rec) => batch.records.push(rec),
                Err(e) => {
                    warn!("element #{n} is not a case record: {e}");
                    batch.malformed += 1;
                }
            }
        }
        debug!(
            "{} records, {} malformed",
            batch.records.len(),
            batch.malformed
        );
        Ok(batch)
    }
}

/// Result of parsing a backend answer.
///
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub records: Vec<CaseRecord>,
    /// Elements we could not make sense of
    pub malformed: usize,
}

/// A case with usable coordinates.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub postal_code: String,
    pub child_id: String,
    pub village: String,
    pub district: String,
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
}

impl ResolvedLocation {
    /// Combine a record and a position.  `None` if the record has no postal code or the position
    /// is not valid.
    ///
    pub fn new(rec: CaseRecord, at: Coord) -> Option<Self> {
        if !at.is_valid() {
            return None;
        }
        let postal_code = rec.postal_code()?.to_owned();
        Some(ResolvedLocation::with_code(postal_code, rec, at))
    }

    fn with_code(postal_code: String, rec: CaseRecord, at: Coord) -> Self {
        ResolvedLocation {
            postal_code,
            child_id: rec.child_id,
            village: rec.village,
            district: rec.district,
            severity: rec.severity,
            latitude: at.lat,
            longitude: at.lon,
        }
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        Coord::new(self.latitude, self.longitude)
    }
}

/// Where a deduplicated record stands before the geocoding pass.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// Needs a geocoder call
    Unresolved(CaseRecord),
    /// Already has valid coordinates
    Resolved(ResolvedLocation),
}

impl From<CaseRecord> for Entry {
    fn from(rec: CaseRecord) -> Self {
        match (rec.coord(), rec.postal_code().map(str::to_owned)) {
            (Some(at), Some(code)) => Entry::Resolved(ResolvedLocation::with_code(code, rec, at)),
            _ => Entry::Unresolved(rec),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }
}

fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(d)?
        .map(String::from)
        .unwrap_or_default())
}

fn opt_string_or_number<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(d)?.map(String::from))
}

fn string_or_null<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}
