use crate::{error::*, value::data::Value};
use percent_encoding::percent_decode_str;
use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "de/query.pest"]
struct QueryParser;

/// (mapping key or `None` for `[]`)
type Segment = Option<String>;

impl Value {
    /// Reads a PHP style query string back into data. Every leaf is a string
    /// scalar; a lone bare token gives a scalar and several give a sequence.
    pub fn from_url_query_string(query: &str) -> Result<Self> {
        let ast = QueryParser::parse(Rule::query, query)
            .map_err(Error::parsing)?
            .next()
            .ok_or_else(|| Error::Parsing("empty query".to_owned()))?;
        let mut result = Value::Absent;
        let mut bare = vec![];
        for pair in ast.into_inner() {
            if pair.as_rule() != Rule::pair {
                continue;
            }
            let (name, path, text) = parse_pair(pair)?;
            match (path.is_empty(), text) {
                (true, None) if name.is_empty() => {}
                (true, None) => bare.push(Value::from(name)),
                (_, text) => insert(&mut result, name, &path, text.into())?,
            }
        }
        match (result.is_absent(), bare.len()) {
            (_, 0) => Ok(result),
            (true, 1) => Ok(bare.remove(0)),
            (true, _) => Ok(Value::Sequence(bare)),
            (false, _) => Err(Error::Parsing(
                "query mixes bare tokens with keyed pairs".to_owned(),
            )),
        }
    }

    pub fn safe_from_url_query_string(query: &str) -> Self {
        Self::from_url_query_string(query).unwrap_or_else(crate::de::json::absorb)
    }
}

fn url_decode(text: &str) -> Result<String> {
    let text = text.replace('+', " ");
    percent_decode_str(&text)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(Error::parsing)
}

fn parse_pair(pair: Pair<Rule>) -> Result<(String, Vec<Segment>, Option<String>)> {
    let mut name = String::new();
    let mut path = vec![];
    let mut text = None;
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::name => name = url_decode(item.as_str())?,
            Rule::subscript => {
                let segment = item.into_inner().next().map(|v| v.as_str()).unwrap_or("");
                path.push(match segment {
                    "" => None,
                    segment => Some(url_decode(segment)?),
                });
            }
            Rule::text => text = Some(url_decode(item.as_str())?),
            _ => {}
        }
    }
    Ok((name, path, text))
}

fn insert(target: &mut Value, key: String, path: &[Segment], leaf: Value) -> Result<()> {
    let slot = target.mapping_mut()?.entry(key).or_default();
    descend(slot, path, leaf)
}

fn descend(slot: &mut Value, path: &[Segment], leaf: Value) -> Result<()> {
    match path.split_first() {
        None => {
            *slot = leaf;
            Ok(())
        }
        Some((Some(key), rest)) => {
            let next = slot.mapping_mut()?.entry(key.to_owned()).or_default();
            descend(next, rest, leaf)
        }
        Some((None, rest)) => {
            let list = slot.sequence_mut()?;
            let index = list.len();
            list.push(Value::Absent);
            descend(&mut list[index], rest, leaf)
        }
    }
}
