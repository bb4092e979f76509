use rabe_bn::Fr;
use crate::error::McpAbeError;

/// Returns true if `value` is one of the attributes in `data`
pub fn contains(data: &[String], value: &str) -> bool {
    data.iter().any(|i| i == value)
}

/// Returns the first attribute that occurs more than once in `data`
pub fn find_duplicate<'a>(data: &[&'a str]) -> Option<&'a str> {
    data.iter()
        .enumerate()
        .find(|&(i, attr)| data[..i].contains(attr))
        .map(|(_, attr)| *attr)
}

/// Maps an unsigned integer (e.g. a numeric identity) into [`rabe_bn::Fr`]
pub fn u64_to_fr(i: u64) -> Result<Fr, McpAbeError> {
    Fr::from_str(&i.to_string())
        .ok_or_else(|| McpAbeError::new(&format!("could not map {} into Fr", i)))
}

/// Maps a (signed) span program coefficient into [`rabe_bn::Fr`]
pub fn i8_to_fr(i: i8) -> Result<Fr, McpAbeError> {
    let abs = u64_to_fr(u64::from(i.unsigned_abs()))?;
    if i < 0 {
        Ok(-abs)
    } else {
        Ok(abs)
    }
}
