use serde::de::DeserializeOwned;
use crate::errors::{SpectraceError, SpectraceResult};

/// Strips at most one surrounding ```json fence. Any other text around the object is a violation.
pub fn extract_json(raw: &str) -> Result<&str, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty response".to_string());
    }

    let body = if let Some(rest) = trimmed.strip_prefix("```") {
        let (lang, inner) = rest.split_once('\n').ok_or("unterminated code fence")?;
        if !matches!(lang.trim(), "" | "json") {
            return Err(format!("unexpected code fence language '{}'", lang.trim()));
        }
        inner
            .trim_end()
            .strip_suffix("```")
            .ok_or("unterminated code fence")?
            .trim()
    } else {
        trimmed
    };

    if !body.starts_with('{') || !body.ends_with('}') {
        return Err("response is not a single JSON object".to_string());
    }
    Ok(body)
}

/// Strict decode of a reasoning reply into `T`; nothing is coerced or defaulted.
pub fn decode<T: DeserializeOwned>(contract: &str, raw: &str) -> SpectraceResult<T> {
    let body = extract_json(raw).map_err(|reason| SpectraceError::contract_violation(contract, &reason))?;
    serde_json::from_str(body).map_err(|e| SpectraceError::contract_violation(contract, &e.to_string()))
}
