//! String helpers
//!
//! Argument order follows the sprig convention: the subject string comes last
//! (`trimPrefix "v" version`, `replace "-" "_" name`).

use serde_json::Value;

use super::{HelperError, HelperRegistry, at_least, exact, int, list, text};

pub(super) fn register(registry: &mut HelperRegistry) {
    registry
        .register("trim", trim)
        .register("trimAll", trim_all)
        .register("trimPrefix", trim_prefix)
        .register("trimSuffix", trim_suffix)
        .register("upper", upper)
        .register("lower", lower)
        .register("title", title)
        .register("repeat", repeat)
        .register("replace", replace)
        .register("contains", contains)
        .register("hasPrefix", has_prefix)
        .register("hasSuffix", has_suffix)
        .register("quote", quote)
        .register("squote", squote)
        .register("nospace", nospace)
        .register("trunc", trunc)
        .register("indent", indent)
        .register("nindent", nindent)
        .register("splitList", split_list)
        .register("join", join)
        .register("toString", to_string);
}

fn trim(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(Value::String(text(args, 0)?.trim().to_string()))
}

fn trim_all(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let cutset = text(args, 0)?;
    let s = text(args, 1)?;
    Ok(Value::String(s.trim_matches(|c: char| cutset.contains(c)).to_string()))
}

fn trim_prefix(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let prefix = text(args, 0)?;
    let s = text(args, 1)?;
    Ok(Value::String(s.strip_prefix(prefix.as_str()).unwrap_or(s.as_str()).to_string()))
}

fn trim_suffix(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let suffix = text(args, 0)?;
    let s = text(args, 1)?;
    Ok(Value::String(s.strip_suffix(suffix.as_str()).unwrap_or(s.as_str()).to_string()))
}

fn upper(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(Value::String(text(args, 0)?.to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(Value::String(text(args, 0)?.to_lowercase()))
}

/// Uppercase the first letter of every whitespace separated word
fn title(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    let s = text(args, 0)?;
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    Ok(Value::String(out))
}

fn repeat(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let count = int(args, 0)?;
    let count = usize::try_from(count).map_err(|_| HelperError::Invalid(format!("negative repeat count {count}")))?;
    Ok(Value::String(text(args, 1)?.repeat(count)))
}

fn replace(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 3)?;
    let old = text(args, 0)?;
    let new = text(args, 1)?;
    Ok(Value::String(text(args, 2)?.replace(old.as_str(), &new)))
}

fn contains(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    Ok(Value::Bool(text(args, 1)?.contains(text(args, 0)?.as_str())))
}

fn has_prefix(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    Ok(Value::Bool(text(args, 1)?.starts_with(text(args, 0)?.as_str())))
}

fn has_suffix(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    Ok(Value::Bool(text(args, 1)?.ends_with(text(args, 0)?.as_str())))
}

/// Double-quote each argument and join with spaces
fn quote(args: &[Value]) -> Result<Value, HelperError> {
    at_least(args, 1)?;
    let quoted = (0..args.len())
        .map(|i| text(args, i).map(|s| format!("{s:?}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(quoted.join(" ")))
}

fn squote(args: &[Value]) -> Result<Value, HelperError> {
    at_least(args, 1)?;
    let quoted = (0..args.len())
        .map(|i| text(args, i).map(|s| format!("'{s}'")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(quoted.join(" ")))
}

fn nospace(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    Ok(Value::String(text(args, 0)?.chars().filter(|c| !c.is_whitespace()).collect()))
}

/// Keep the first `n` characters, or the last `-n` when negative
fn trunc(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let n = int(args, 0)?;
    let s = text(args, 1)?;
    let len = s.chars().count();
    let keep = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX).min(len);
    let out: String = if n >= 0 {
        s.chars().take(keep).collect()
    } else {
        s.chars().skip(len - keep).collect()
    };
    Ok(Value::String(out))
}

fn indent_lines(args: &[Value]) -> Result<String, HelperError> {
    exact(args, 2)?;
    let width = int(args, 0)?;
    let width = usize::try_from(width).map_err(|_| HelperError::Invalid(format!("negative indent {width}")))?;
    let pad = " ".repeat(width);
    let s = text(args, 1)?;
    Ok(s.split('\n').map(|line| format!("{pad}{line}")).collect::<Vec<_>>().join("\n"))
}

fn indent(args: &[Value]) -> Result<Value, HelperError> {
    indent_lines(args).map(Value::String)
}

/// Like `indent`, with a leading newline so blocks can start on their own line
fn nindent(args: &[Value]) -> Result<Value, HelperError> {
    indent_lines(args).map(|s| Value::String(format!("\n{s}")))
}

fn split_list(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let sep = text(args, 0)?;
    let s = text(args, 1)?;
    if sep.is_empty() {
        return Ok(Value::Array(s.chars().map(|c| Value::String(c.to_string())).collect()));
    }
    Ok(Value::Array(s.split(sep.as_str()).map(|part| Value::String(part.to_string())).collect()))
}

fn join(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let sep = text(args, 0)?;
    let items = list(args, 1)?;
    let parts = (0..items.len())
        .map(|i| text(items, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(parts.join(sep.as_str())))
}

fn to_string(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    match &args[0] {
        Value::Array(_) | Value::Object(_) => Ok(Value::String(args[0].to_string())),
        _ => text(args, 0).map(Value::String),
    }
}
