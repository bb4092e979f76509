use rabe_bn::Fr;
use rand::{CryptoRng, Rng, RngCore};
use crate::{
    error::McpAbeError,
    utils::{
        tools::{contains, i8_to_fr},
        policy::{NodeLabel, pest::{PolicyValue, PolicyType}}
    }
};

/// Samples a sharing vector of length `width` whose first entry is `secret`.
/// All other entries are uniform in Fr.
pub fn gen_sharing_vector<R: RngCore + CryptoRng>(secret: Fr, width: usize, rng: &mut R) -> Vec<Fr> {
    let mut vector = Vec::with_capacity(width.max(1));
    vector.push(secret);
    for _i in 1..width {
        vector.push(rng.gen());
    }
    vector
}

/// Computes the share of one span program row, i.e. the inner product of `row` and `vector`.
pub fn calc_share(row: &[i8], vector: &[Fr]) -> Result<Fr, McpAbeError> {
    if row.len() != vector.len() {
        return Err(McpAbeError::new(&format!(
            "row of width {} does not match sharing vector of width {}",
            row.len(),
            vector.len()
        )));
    }
    let mut share = Fr::zero();
    for (coeff, value) in row.iter().zip(vector) {
        match *coeff {
            0 => {},
            1 => share = share + *value,
            -1 => share = share - *value,
            c => share = share + (i8_to_fr(c)? * *value),
        }
    }
    Ok(share)
}

/// Prunes a policy tree against a set of attributes.
///
/// Returns whether the attributes satisfy the policy and, if so, the leaves (labelled
/// with their occurrence index in depth-first order) whose rows reconstruct the secret.
/// `leaf` counts the leaves visited so far and is advanced over every leaf of the tree,
/// including the leaves of subtrees that are not part of the result.
pub fn calc_pruned(
    attr: &[String],
    json: &PolicyValue,
    parent: Option<PolicyType>,
    leaf: &mut usize,
) -> Result<(bool, Vec<NodeLabel>), McpAbeError> {
    match json {
        PolicyValue::Object(obj) => calc_pruned(attr, obj.1.as_ref(), Some(obj.0), leaf),
        PolicyValue::Array(children) => {
            if children.is_empty() {
                return Err(McpAbeError::new("Error in calc_pruned: gate without children."));
            }
            match parent {
                Some(PolicyType::And) => {
                    let mut matched = true;
                    let mut list: Vec<NodeLabel> = Vec::new();
                    for child in children {
                        let (found, mut child_list) = calc_pruned(attr, child, None, leaf)?;
                        matched = matched && found;
                        list.append(&mut child_list);
                    }
                    if !matched {
                        list.clear();
                    }
                    Ok((matched, list))
                },
                Some(PolicyType::Or) => {
                    // smallest satisfied child, the first one on ties
                    let mut best: Option<Vec<NodeLabel>> = None;
                    for child in children {
                        let (found, child_list) = calc_pruned(attr, child, None, leaf)?;
                        if found && best.as_ref().map_or(true, |b| child_list.len() < b.len()) {
                            best = Some(child_list);
                        }
                    }
                    match best {
                        Some(list) => Ok((true, list)),
                        None => Ok((false, Vec::new())),
                    }
                },
                None => Err(McpAbeError::new("Error in calc_pruned: unknown array type!")),
            }
        },
        PolicyValue::String(name) => {
            let index = *leaf;
            *leaf += 1;
            if contains(attr, name) {
                Ok((true, vec![NodeLabel::new(name, index)]))
            } else {
                Ok((false, Vec::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use crate::utils::policy::{
        msp::AbePolicy,
        pest::{parse, PolicyLanguage}
    };

    fn pruned(attributes: &[&str], policy: &str) -> (bool, Vec<NodeLabel>) {
        let attributes: Vec<String> = attributes.iter().map(|a| a.to_string()).collect();
        let pol = parse(policy, PolicyLanguage::JsonPolicy).unwrap();
        calc_pruned(&attributes, &pol, None, &mut 0).unwrap()
    }

    #[test]
    fn test_sharing_vector() {
        let mut rng = StdRng::seed_from_u64(7);
        let secret: Fr = rng.gen();
        let v = gen_sharing_vector(secret, 4, &mut rng);
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], secret);
        let w = gen_sharing_vector(Fr::zero(), 4, &mut rng);
        assert_eq!(w[0], Fr::zero());
        assert_ne!(w[1], Fr::zero());
    }

    #[test]
    fn test_calc_share() {
        let mut rng = StdRng::seed_from_u64(8);
        let v = gen_sharing_vector(rng.gen(), 3, &mut rng);
        assert_eq!(calc_share(&[1, 0, 0], &v).unwrap(), v[0]);
        assert_eq!(calc_share(&[0, -1, 1], &v).unwrap(), v[2] - v[1]);
        assert_eq!(calc_share(&[2, 0, 0], &v).unwrap(), v[0] + v[0]);
        assert!(calc_share(&[1, 0], &v).is_err());
    }

    #[test]
    fn test_pruning() {
        let pol1 = r#"{"name": "or", "children": [{"name": "and", "children": [{"name": "1"}, {"name": "2"}]}, {"name": "and", "children": [{"name": "3"}, {"name": "4"}]}]}"#;
        let pol2 = r#"{"name": "or", "children": [{"name": "3"}, {"name": "and", "children": [{"name": "4"}, {"name": "5"}]}]}"#;
        let pol3 = r#"{"name": "or", "children": [{"name": "and", "children": [{"name": "1"}, {"name": "4"}]}, {"name": "and", "children": [{"name": "3"}, {"name": "1"}]}]}"#;

        let (match1, list1) = pruned(&["3", "4"], pol1);
        assert!(match1);
        assert_eq!(list1, vec![NodeLabel::new("3", 2), NodeLabel::new("4", 3)]);

        let (match2, list2) = pruned(&["3", "4"], pol2);
        assert!(match2);
        assert_eq!(list2, vec![NodeLabel::new("3", 0)]);

        let (match3, list3) = pruned(&["3", "4"], pol3);
        assert!(!match3);
        assert!(list3.is_empty());
    }

    #[test]
    fn test_pruning_repeated_attribute() {
        let policy = r#"{"name": "and", "children": [{"name": "or", "children": [{"name": "A"}, {"name": "B"}]}, {"name": "or", "children": [{"name": "C"}, {"name": "A"}]}]}"#;
        let (found, list) = pruned(&["A"], policy);
        assert!(found);
        assert_eq!(list, vec![NodeLabel::new("A", 0), NodeLabel::new("A", 3)]);
    }

    #[test]
    fn test_pruning_prefers_smallest_branch() {
        let attributes: Vec<String> = ["A", "B", "C", "D"].iter().map(|a| a.to_string()).collect();
        let pol = parse("(A and B and C) or D", PolicyLanguage::HumanPolicy).unwrap();
        let (found, list) = calc_pruned(&attributes, &pol, None, &mut 0).unwrap();
        assert!(found);
        assert_eq!(list, vec![NodeLabel::new("D", 3)]);

        let pol = parse("(A and B) or (C and D) or (A and D)", PolicyLanguage::HumanPolicy).unwrap();
        let (found, list) = calc_pruned(&attributes, &pol, None, &mut 0).unwrap();
        assert!(found);
        assert_eq!(list, vec![NodeLabel::new("A", 0), NodeLabel::new("B", 1)]);

        let pol = parse("D and ((A and B and C) or (B or D))", PolicyLanguage::HumanPolicy).unwrap();
        let (found, list) = calc_pruned(&attributes, &pol, None, &mut 0).unwrap();
        assert!(found);
        assert_eq!(list, vec![NodeLabel::new("D", 0), NodeLabel::new("B", 4)]);
    }

    #[test]
    fn test_pruned_rows_reconstruct_secret() {
        let mut rng = StdRng::seed_from_u64(9);
        let policy = r#"{"name": "and", "children": [{"name": "A"}, {"name": "or", "children": [{"name": "D"}, {"name": "and", "children": [{"name": "B"}, {"name": "C"}]}]}]}"#;
        let pol = parse(policy, PolicyLanguage::JsonPolicy).unwrap();
        let msp = AbePolicy::from_policy(&pol).unwrap();
        let secret: Fr = rng.gen();
        let v = gen_sharing_vector(secret, msp.c, &mut rng);
        let w = gen_sharing_vector(Fr::zero(), msp.c, &mut rng);
        for attributes in [vec!["A", "D"], vec!["A", "B", "C"]] {
            let attributes: Vec<String> = attributes.iter().map(|a| a.to_string()).collect();
            let (found, list) = calc_pruned(&attributes, &pol, None, &mut 0).unwrap();
            assert!(found);
            let mut lambda = Fr::zero();
            let mut omega = Fr::zero();
            for label in list {
                let row = msp.row(&label).unwrap();
                lambda = lambda + calc_share(row, &v).unwrap();
                omega = omega + calc_share(row, &w).unwrap();
            }
            assert_eq!(lambda, secret);
            assert_eq!(omega, Fr::zero());
        }
    }
}
