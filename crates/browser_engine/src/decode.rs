use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::{FailureKind, SiteInfo, StatusPayload, TransportError};

/// Extracts the job id from a `GET /list` body.
///
/// Plain text is the normal form; a JSON string literal is accepted as well.
pub fn decode_job_id(body: &str) -> Result<String, TransportError> {
    let trimmed = body.trim();
    let job_id = if trimmed.starts_with('"') {
        serde_json::from_str::<String>(trimmed)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))?
    } else {
        trimmed.to_string()
    };
    let job_id = job_id.trim();
    if job_id.is_empty() {
        return Err(TransportError::new(FailureKind::Decode, "empty job id"));
    }
    Ok(job_id.to_string())
}

pub fn decode_status(body: &[u8]) -> Result<StatusPayload, TransportError> {
    serde_json::from_slice(body)
        .map_err(|err| TransportError::new(FailureKind::Decode, format!("status body: {err}")))
}

pub fn decode_sites(body: &[u8]) -> Result<Vec<SiteInfo>, TransportError> {
    serde_json::from_slice(body)
        .map_err(|err| TransportError::new(FailureKind::Decode, format!("sites body: {err}")))
}

// Backends written against `stat` results sometimes send sizes and times as
// floats or strings.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .ok_or_else(|| de::Error::custom(format!("not an unsigned number: {number}"))),
        Value::String(text) => text.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected number, got {other}"))),
    }
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|v| v as i64))
            .ok_or_else(|| de::Error::custom(format!("not a number: {number}"))),
        Value::String(text) => text.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected number, got {other}"))),
    }
}
