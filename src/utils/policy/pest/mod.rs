use pest::Parser;
use crate::error::McpAbeError;
#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "borsh")]
use borsh::{BorshSerialize, BorshDeserialize};

pub(crate) mod human;
pub(crate) mod json;

use self::{
    human::HumanPolicyParser,
    json::JSONPolicyParser
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyLanguage {
    JsonPolicy,
    HumanPolicy,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PolicyType {
    And,
    Or,
}

/// A parsed policy. Gates are an `Object` holding their type and an `Array` of children.
#[derive(Clone, PartialEq, Debug)]
pub enum PolicyValue<'a> {
    Object((PolicyType, Box<PolicyValue<'a>>)),
    Array(Vec<PolicyValue<'a>>),
    String(&'a str),
}

pub fn parse(policy: &str, language: PolicyLanguage) -> Result<PolicyValue<'_>, McpAbeError> {
    match language {
        PolicyLanguage::JsonPolicy => {
            use self::json::Rule;
            let mut result = JSONPolicyParser::parse(Rule::content, policy)?;
            match result.next() {
                Some(pair) => json::parse(pair),
                None => Err(McpAbeError::new("empty json policy")),
            }
        },
        PolicyLanguage::HumanPolicy => {
            use self::human::Rule;
            let mut result = HumanPolicyParser::parse(Rule::content, policy)?;
            match result.next() {
                Some(pair) => human::parse(pair),
                None => Err(McpAbeError::new("empty human policy")),
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and(children: Vec<PolicyValue<'_>>) -> PolicyValue<'_> {
        PolicyValue::Object((PolicyType::And, Box::new(PolicyValue::Array(children))))
    }

    fn or(children: Vec<PolicyValue<'_>>) -> PolicyValue<'_> {
        PolicyValue::Object((PolicyType::Or, Box::new(PolicyValue::Array(children))))
    }

    #[test]
    fn test_single_parsing() {
        let json = parse(r#"{"name": "A"}"#, PolicyLanguage::JsonPolicy).expect("unsuccessful parse");
        assert_eq!(json, PolicyValue::String("A"));
        let human = parse(r#""A""#, PolicyLanguage::HumanPolicy).expect("unsuccessful parse");
        assert_eq!(human, PolicyValue::String("A"));
    }

    #[test]
    fn test_children_parsing() {
        let pol = r#"{"name": "and", "children": [{"name": "B"}, {"name": "or", "children": [{"name": "C"}, {"name": "D"}]}]}"#;
        let json = parse(pol, PolicyLanguage::JsonPolicy).expect("unsuccessful parse");
        assert_eq!(json, and(vec![
            PolicyValue::String("B"),
            or(vec![PolicyValue::String("C"), PolicyValue::String("D")])
        ]));
    }

    #[test]
    fn test_human_precedence() {
        let human = parse("A1 and A2 or A3 AND (A4 Or \"A 5\")", PolicyLanguage::HumanPolicy).expect("unsuccessful parse");
        assert_eq!(human, or(vec![
            and(vec![PolicyValue::String("A1"), PolicyValue::String("A2")]),
            and(vec![
                PolicyValue::String("A3"),
                or(vec![PolicyValue::String("A4"), PolicyValue::String("A 5")])
            ]),
        ]));
    }

    #[test]
    fn test_human_keyword_prefix() {
        let human = parse("(android and oracle)", PolicyLanguage::HumanPolicy).expect("unsuccessful parse");
        assert_eq!(human, and(vec![PolicyValue::String("android"), PolicyValue::String("oracle")]));
    }

    #[test]
    fn test_invalid_policies() {
        assert!(parse("A and", PolicyLanguage::HumanPolicy).is_err());
        assert!(parse("(A or B", PolicyLanguage::HumanPolicy).is_err());
        assert!(parse("and", PolicyLanguage::HumanPolicy).is_err());
        assert!(parse(r#"{"name": "and", "children": []}"#, PolicyLanguage::JsonPolicy).is_err());
    }
}
