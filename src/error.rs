use std::{fmt::{
    Display,
    Result,
    Formatter
}, cmp};
use pest::{
    RuleType,
    error::{Error as PestError, LineColLocation}
};
#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "borsh")]
use borsh::{BorshSerialize, BorshDeserialize};

/// Simple, generic Error that is compose of a String
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpAbeError {
    details: String,
}

impl McpAbeError {
    /// Creates a new Error
    pub fn new(msg: &str) -> McpAbeError {
        McpAbeError { details: msg.to_string() }
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

impl Display for McpAbeError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "Error: {}", self.details)
    }
}

impl std::error::Error for McpAbeError {}

impl<R: RuleType> From<PestError<R>> for McpAbeError {
    fn from(error: PestError<R>) -> Self {
        let line = match error.line_col.to_owned() {
            LineColLocation::Pos((line, _)) => line,
            LineColLocation::Span((start_line, _), (end_line, _)) => cmp::max(start_line, end_line),
        };
        McpAbeError::new(
            format!("Policy Error in line {}\n", line).as_ref()
        )
    }
}

impl From<aes_gcm::Error> for McpAbeError {
    fn from(_error: aes_gcm::Error) -> Self {
        // Aead's error is intentionally opaque, there is no more information in here
        McpAbeError::new("symmetric decryption failed: ciphertext could not be authenticated")
    }
}

impl From<String> for McpAbeError {
    fn from(error: String) -> Self {
        McpAbeError::new(error.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = McpAbeError::new("unknown attribute A11");
        assert_eq!(error.to_string(), "Error: unknown attribute A11");
        assert_eq!(error.details(), "unknown attribute A11");
    }

    #[test]
    fn test_from_string() {
        let error: McpAbeError = String::from("no key for authority 3").into();
        assert_eq!(error, McpAbeError::new("no key for authority 3"));
    }
}
