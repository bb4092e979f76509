use crate::{
    error::McpAbeError,
    utils::policy::pest::{PolicyValue, PolicyType}
};
use pest::iterators::Pair;

#[derive(Parser)]
#[grammar = "human.policy.pest"]
pub(crate) struct HumanPolicyParser;

fn children<'a>(pair: Pair<'a, Rule>, keyword: Rule) -> Result<PolicyValue<'a>, McpAbeError> {
    let vec = pair
        .into_inner()
        .filter(|child| child.as_rule() != keyword)
        .map(parse)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PolicyValue::Array(vec))
}

pub(crate) fn parse(pair: Pair<'_, Rule>) -> Result<PolicyValue<'_>, McpAbeError> {
    match pair.as_rule() {
        Rule::string => match pair.into_inner().next() {
            Some(inner) => Ok(PolicyValue::String(inner.as_str())),
            None => Err(McpAbeError::new("human policy: empty string")),
        },
        Rule::identifier => Ok(PolicyValue::String(pair.as_str())),
        Rule::and => Ok(PolicyValue::Object((PolicyType::And, Box::new(children(pair, Rule::AND)?)))),
        Rule::or => Ok(PolicyValue::Object((PolicyType::Or, Box::new(children(pair, Rule::OR)?)))),
        rule => Err(McpAbeError::new(&format!("human policy: unexpected token {:?}", rule))),
    }
}
