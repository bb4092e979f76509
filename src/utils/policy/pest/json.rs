use crate::{
    error::McpAbeError,
    utils::policy::pest::{PolicyValue, PolicyType}
};
use pest::iterators::Pair;

#[derive(Parser)]
#[grammar = "json.policy.pest"]
pub(crate) struct JSONPolicyParser;

pub(crate) fn parse(pair: Pair<'_, Rule>) -> Result<PolicyValue<'_>, McpAbeError> {
    match pair.as_rule() {
        Rule::string => match pair.into_inner().next() {
            Some(inner) => Ok(PolicyValue::String(inner.as_str())),
            None => Err(McpAbeError::new("json policy: empty string")),
        },
        Rule::and => {
            let vec = pair.into_inner().map(parse).collect::<Result<Vec<_>, _>>()?;
            Ok(PolicyValue::Object((PolicyType::And, Box::new(PolicyValue::Array(vec)))))
        },
        Rule::or => {
            let vec = pair.into_inner().map(parse).collect::<Result<Vec<_>, _>>()?;
            Ok(PolicyValue::Object((PolicyType::Or, Box::new(PolicyValue::Array(vec)))))
        },
        rule => Err(McpAbeError::new(&format!("json policy: unexpected token {:?}", rule))),
    }
}
