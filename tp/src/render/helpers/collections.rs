//! Defaults, inspection, list and mapping helpers

use serde_json::{Map, Value};

use super::{HelperError, HelperRegistry, at_least, exact, is_empty, list, map, text};

pub(super) fn register(registry: &mut HelperRegistry) {
    registry
        .register("default", default)
        .register("empty", empty)
        .register("coalesce", coalesce)
        .register("ternary", ternary)
        .register("toJson", to_json)
        .register("toPrettyJson", to_pretty_json)
        .register("hasKey", has_key)
        .register("keys", keys)
        .register("list", make_list)
        .register("dict", dict)
        .register("first", first)
        .register("last", last)
        .register("has", has);
}

/// `default fallback value`: the value unless it is empty
fn default(args: &[Value]) -> Result<Value, HelperError> {
    match args {
        [fallback] => Ok(fallback.clone()),
        [fallback, given] if is_empty(given) => Ok(fallback.clone()),
        [_, given] => Ok(given.clone()),
        _ => Err(HelperError::Arity {
            expected: "1 or 2".to_string(),
            got: args.len(),
        }),
    }
}

fn empty(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(Value::Bool(is_empty(&args[0])))
}

/// First non-empty argument, or null
fn coalesce(args: &[Value]) -> Result<Value, HelperError> {
    Ok(args.iter().find(|v| !is_empty(v)).cloned().unwrap_or(Value::Null))
}

/// `ternary a b condition`
fn ternary(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 3)?;
    let chosen = if is_empty(&args[2]) { &args[1] } else { &args[0] };
    Ok(chosen.clone())
}

fn to_json(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(Value::String(args[0].to_string()))
}

fn to_pretty_json(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    serde_json::to_string_pretty(&args[0])
        .map(Value::String)
        .map_err(|e| HelperError::Invalid(e.to_string()))
}

/// `hasKey mapping key`: does the mapping contain the key
fn has_key(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let mapping = map(args, 0)?;
    Ok(Value::Bool(mapping.contains_key(&text(args, 1)?)))
}

/// Sorted keys of one or more mappings
fn keys(args: &[Value]) -> Result<Value, HelperError> {
    at_least(args, 1)?;
    let mut names = Vec::new();
    for index in 0..args.len() {
        names.extend(map(args, index)?.keys().cloned());
    }
    names.sort();
    Ok(Value::Array(names.into_iter().map(Value::String).collect()))
}

fn make_list(args: &[Value]) -> Result<Value, HelperError> {
    Ok(Value::Array(args.to_vec()))
}

/// `dict k1 v1 k2 v2 ...`
fn dict(args: &[Value]) -> Result<Value, HelperError> {
    if args.len() % 2 != 0 {
        return Err(HelperError::Invalid(format!(
            "dict expects key/value pairs, got {} arguments",
            args.len()
        )));
    }
    let mut mapping = Map::new();
    for index in (0..args.len()).step_by(2) {
        mapping.insert(text(args, index)?, args[index + 1].clone());
    }
    Ok(Value::Object(mapping))
}

fn first(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(list(args, 0)?.first().cloned().unwrap_or(Value::Null))
}

fn last(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(list(args, 0)?.last().cloned().unwrap_or(Value::Null))
}

/// `has needle list`
fn has(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    Ok(Value::Bool(list(args, 1)?.contains(&args[0])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default() {
        assert_eq!(default(&[json!("foo"), json!("")]).unwrap(), json!("foo"));
        assert_eq!(default(&[json!("foo"), json!("bar")]).unwrap(), json!("bar"));
        assert_eq!(default(&[json!(8080), json!(null)]).unwrap(), json!(8080));
        assert_eq!(default(&[json!("only")]).unwrap(), json!("only"));
        assert!(default(&[]).is_err());
    }

    #[test]
    fn test_coalesce_and_ternary() {
        assert_eq!(coalesce(&[json!(null), json!(""), json!("x")]).unwrap(), json!("x"));
        assert_eq!(coalesce(&[]).unwrap(), json!(null));
        assert_eq!(ternary(&[json!("yes"), json!("no"), json!(true)]).unwrap(), json!("yes"));
        assert_eq!(ternary(&[json!("yes"), json!("no"), json!(false)]).unwrap(), json!("no"));
    }

    #[test]
    fn test_has_key() {
        let mapping = json!({"key": "value"});
        assert_eq!(has_key(&[mapping.clone(), json!("key")]).unwrap(), json!(true));
        assert_eq!(has_key(&[mapping, json!("other_key")]).unwrap(), json!(false));
    }

    #[test]
    fn test_has_key_requires_mapping() {
        let err = has_key(&[json!(["key"]), json!("key")]).unwrap_err();
        assert!(matches!(err, HelperError::Type { index: 0, .. }));
    }

    #[test]
    fn test_keys_sorted_across_mappings() {
        let result = keys(&[json!({"b": 1, "a": 2}), json!({"c": 3})]).unwrap();
        assert_eq!(result, json!(["a", "b", "c"]));
    }

    #[test]
    fn test_dict_and_list() {
        assert_eq!(dict(&[json!("a"), json!(1), json!("b"), json!([2])]).unwrap(), json!({"a": 1, "b": [2]}));
        assert!(dict(&[json!("a")]).is_err());
        assert_eq!(make_list(&[json!(1), json!("two")]).unwrap(), json!([1, "two"]));
    }

    #[test]
    fn test_first_last_has() {
        let items = json!(["a", "b", "c"]);
        assert_eq!(first(&[items.clone()]).unwrap(), json!("a"));
        assert_eq!(last(&[items.clone()]).unwrap(), json!("c"));
        assert_eq!(first(&[json!([])]).unwrap(), json!(null));
        assert_eq!(has(&[json!("b"), items]).unwrap(), json!(true));
    }

    #[test]
    fn test_to_json() {
        assert_eq!(to_json(&[json!({"a": [1, 2]})]).unwrap(), json!(r#"{"a":[1,2]}"#));
        assert_eq!(to_pretty_json(&[json!([1])]).unwrap(), json!("[\n  1\n]"));
    }
}
