use crate::{
    error::McpAbeError,
    utils::policy::{
        NodeLabel,
        pest::{PolicyLanguage, PolicyValue, parse, PolicyType}
    }
};
use std::fmt::{Display, Formatter, Result as FormatResult};

const ZERO: i8 = 0;
const PLUS: i8 = 1;
const MINUS: i8 = -1;

/// A monotone span program: one row per policy leaf, `c` columns.
#[derive(Clone, PartialEq, Debug)]
pub struct AbePolicy {
    pub m: Vec<Vec<i8>>,
    pub pi: Vec<NodeLabel>,
    pub c: usize,
}

impl AbePolicy {
    /// Returns a new ABE policy based on a textual policy. The policy is generated using Lewko et al. conversion algorithm.
    ///
    /// # Arguments
    ///
    /// * `policy` - A policy as String in the given language
    pub fn new(policy: &str, language: PolicyLanguage) -> Result<AbePolicy, McpAbeError> {
        calculate_msp(&parse(policy, language)?)
    }

    pub fn from_policy(content: &PolicyValue) -> Result<AbePolicy, McpAbeError> {
        calculate_msp(content)
    }

    /// Returns the row belonging to a policy leaf
    pub fn row(&self, label: &NodeLabel) -> Option<&[i8]> {
        self.pi
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.m.get(i))
            .map(Vec::as_slice)
    }
}

impl Display for AbePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        let pi: Vec<String> = self.pi.iter().map(|label| format!("\"{}\"", label)).collect();
        let m: Vec<String> = self.m
            .iter()
            .map(|row| {
                let cols: Vec<String> = row.iter().map(|col| col.to_string()).collect();
                format!("({})", cols.join(","))
            })
            .collect();
        write!(f, "{{m: [{}], pi: [{}], c: {}}}", m.join(","), pi.join(","), self.c)
    }
}

pub fn calculate_msp(p: &PolicyValue) -> Result<AbePolicy, McpAbeError> {
    let mut msp = AbePolicy {
        m: Vec::new(),
        pi: Vec::new(),
        c: 1,
    };
    lw(&mut msp, p, &[PLUS], None)?;
    for val in &mut msp.m {
        val.resize(msp.c, ZERO);
    }
    // permutate both pi and m according to pi
    let permutation = permutation::sort(&msp.pi[..]);
    msp.pi = permutation.apply_slice(&msp.pi[..]);
    msp.m = permutation.apply_slice(&msp.m[..]);
    Ok(msp)
}

/// Converting from Boolean Formulas to LSSS Matrices
/// Lewko Waters: "Decentralizing Attribute-Based Encryption" Appendix G
fn lw(msp: &mut AbePolicy, p: &PolicyValue, v: &[i8], parent: Option<PolicyType>) -> Result<(), McpAbeError> {
    match p {
        PolicyValue::String(attr) => {
            let index = msp.pi.len();
            msp.m.push(v.to_vec());
            msp.pi.push(NodeLabel::new(attr, index));
            Ok(())
        },
        PolicyValue::Object(obj) => lw(msp, obj.1.as_ref(), v, Some(obj.0)),
        PolicyValue::Array(policies) => {
            match parent {
                Some(PolicyType::Or) => {
                    if policies.is_empty() {
                        return Err(McpAbeError::new("lw: OR without children"));
                    }
                    for policy in policies {
                        lw(msp, policy, v, None)?;
                    }
                    Ok(())
                },
                Some(PolicyType::And) => lw_and(msp, policies, v),
                None => Err(McpAbeError::new("lw: children outside of an AND or OR gate")),
            }
        }
    }
}

/// An AND over n children is handled as the chain `c_1 and (c_2 and (... and c_n))`,
/// every link adds one column.
fn lw_and(msp: &mut AbePolicy, policies: &[PolicyValue], v: &[i8]) -> Result<(), McpAbeError> {
    match policies {
        [] => Err(McpAbeError::new("lw: AND without children")),
        [last] => lw(msp, last, v, None),
        [first, rest @ ..] => {
            let mut v_left = v.to_vec();
            v_left.resize(msp.c, ZERO);
            v_left.push(PLUS);
            let mut v_right = vec![ZERO; msp.c];
            v_right.push(MINUS);
            msp.c += 1;
            lw(msp, first, &v_left, None)?;
            lw_and(msp, rest, &v_right)
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_msp_from() {
        let policy = r#"{name:"and", children:[{name:"A"}, {name:"or", "children":[{name:"D"}, {name:"and", "children":[{name:"B"},{name:"C"}]}]} ]}"#;
        let msp = AbePolicy::new(policy, PolicyLanguage::JsonPolicy).unwrap();
        let msp_static = AbePolicy {
            m: vec![
                vec![PLUS, PLUS, ZERO],
                vec![ZERO, MINUS, PLUS],
                vec![ZERO, ZERO, MINUS],
                vec![ZERO, MINUS, ZERO],
            ],
            pi: vec![
                NodeLabel::new("A", 0),
                NodeLabel::new("B", 2),
                NodeLabel::new("C", 3),
                NodeLabel::new("D", 1),
            ],
            c: 3,
        };
        assert_eq!(msp, msp_static);
    }

    #[test]
    fn test_msp_nary_and() {
        let msp = AbePolicy::new("A1 and A2 and A3", PolicyLanguage::HumanPolicy).unwrap();
        assert_eq!(msp.c, 3);
        assert_eq!(msp.m, vec![
            vec![PLUS, PLUS, ZERO],
            vec![ZERO, MINUS, PLUS],
            vec![ZERO, ZERO, MINUS],
        ]);
        let mut sum = vec![ZERO; msp.c];
        for row in &msp.m {
            for (s, x) in sum.iter_mut().zip(row) {
                *s += *x;
            }
        }
        assert_eq!(sum, vec![PLUS, ZERO, ZERO]);
    }

    #[test]
    fn test_msp_or() {
        let msp = AbePolicy::new("A or B or C", PolicyLanguage::HumanPolicy).unwrap();
        assert_eq!(msp.c, 1);
        assert_eq!(msp.m, vec![vec![PLUS], vec![PLUS], vec![PLUS]]);
        assert_eq!(msp.row(&NodeLabel::new("B", 1)), Some(&[PLUS][..]));
        assert_eq!(msp.row(&NodeLabel::new("B", 0)), None);
    }

    #[test]
    fn test_msp_row_without_entry() {
        let msp = AbePolicy {
            m: vec![vec![PLUS]],
            pi: vec![NodeLabel::new("A", 0), NodeLabel::new("B", 1)],
            c: 1,
        };
        assert_eq!(msp.row(&NodeLabel::new("A", 0)), Some(&[PLUS][..]));
        assert_eq!(msp.row(&NodeLabel::new("B", 1)), None);
    }

    #[test]
    fn test_msp_single_attribute() {
        let msp = AbePolicy::new(r#""A""#, PolicyLanguage::HumanPolicy).unwrap();
        assert_eq!(msp.to_string(), r#"{m: [(1)], pi: ["A_0"], c: 1}"#);
    }
}
