//! Access policies and their monotone span programs.
//!
//! The cryptographic core only depends on the [`PolicyToolkit`] trait: it parses a policy,
//! converts it into an [`msp::AbePolicy`] and prunes it against a set of attributes.
//! [`LewkoWaters`] is the toolkit used by default.
use std::fmt::{Display, Formatter, Result as FormatResult};
use crate::{
    error::McpAbeError,
    utils::secretsharing::calc_pruned
};
use self::{
    msp::AbePolicy,
    pest::{parse, PolicyLanguage, PolicyValue}
};
#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "borsh")]
use borsh::{BorshSerialize, BorshDeserialize};

pub mod msp;
pub mod pest;

/// A leaf of a policy: the attribute name and the index of this occurrence among all leaves
/// (depth-first, left to right). The same attribute may occur several times in one policy.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeLabel {
    pub attribute: String,
    pub index: usize,
}

impl NodeLabel {
    pub fn new(attribute: &str, index: usize) -> NodeLabel {
        NodeLabel { attribute: attribute.to_string(), index }
    }

    /// The attribute name without the occurrence index
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Display for NodeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "{}_{}", self.attribute, self.index)
    }
}

/// Parsing, span program conversion and pruning of access policies.
pub trait PolicyToolkit {
    /// The parsed form of a policy
    type Tree<'a>;

    fn parse<'a>(&self, policy: &'a str, language: PolicyLanguage) -> Result<Self::Tree<'a>, McpAbeError>;

    /// Converts a parsed policy into a span program. Every row is labelled with the leaf it
    /// belongs to and all rows share the same width.
    fn to_msp(&self, tree: &Self::Tree<'_>) -> Result<AbePolicy, McpAbeError>;

    /// Returns `None` if `attributes` do not satisfy the policy. Otherwise returns the labels of
    /// a set of rows that sum up to the target vector `(1, 0, ..., 0)`.
    fn prune(&self, tree: &Self::Tree<'_>, attributes: &[String]) -> Result<Option<Vec<NodeLabel>>, McpAbeError>;
}

/// Policy toolkit based on the Lewko-Waters conversion from boolean formulas to LSSS matrices.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct LewkoWaters;

impl PolicyToolkit for LewkoWaters {
    type Tree<'a> = PolicyValue<'a>;

    fn parse<'a>(&self, policy: &'a str, language: PolicyLanguage) -> Result<PolicyValue<'a>, McpAbeError> {
        parse(policy, language)
    }

    fn to_msp(&self, tree: &PolicyValue<'_>) -> Result<AbePolicy, McpAbeError> {
        AbePolicy::from_policy(tree)
    }

    fn prune(&self, tree: &PolicyValue<'_>, attributes: &[String]) -> Result<Option<Vec<NodeLabel>>, McpAbeError> {
        if attributes.is_empty() {
            return Ok(None);
        }
        let (matched, list) = calc_pruned(attributes, tree, None, &mut 0)?;
        if matched {
            Ok(Some(list))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_label() {
        let label = NodeLabel::new("A3", 2);
        assert_eq!(label.to_string(), "A3_2");
        assert_eq!(label.attribute(), "A3");
    }

    #[test]
    fn test_toolkit_prune() {
        let toolkit = LewkoWaters;
        let tree = toolkit.parse("A and (B or C)", PolicyLanguage::HumanPolicy).unwrap();
        assert_eq!(
            toolkit.prune(&tree, &attributes(&["C", "A"])).unwrap(),
            Some(vec![NodeLabel::new("A", 0), NodeLabel::new("C", 2)])
        );
        assert_eq!(toolkit.prune(&tree, &attributes(&["B", "C"])).unwrap(), None);
        assert_eq!(toolkit.prune(&tree, &[]).unwrap(), None);
    }

    #[test]
    fn test_toolkit_labels_match_msp() {
        let toolkit = LewkoWaters;
        let tree = toolkit.parse("(A or B) and (C or A)", PolicyLanguage::HumanPolicy).unwrap();
        let msp = toolkit.to_msp(&tree).unwrap();
        let labels = toolkit.prune(&tree, &attributes(&["A"])).unwrap().unwrap();
        assert_eq!(labels.len(), 2);
        for label in labels {
            assert!(msp.row(&label).is_some());
        }
    }
}
