//! Integer arithmetic helpers

use serde_json::Value;

use super::{HelperError, HelperRegistry, at_least, exact, int};

pub(super) fn register(registry: &mut HelperRegistry) {
    registry
        .register("add", add)
        .register("add1", add1)
        .register("sub", sub)
        .register("mul", mul)
        .register("div", div)
        .register("mod", modulo)
        .register("max", max)
        .register("min", min);
}

fn overflow(op: &str) -> HelperError {
    HelperError::Invalid(format!("integer overflow in {op}"))
}

fn ints(args: &[Value]) -> Result<Vec<i64>, HelperError> {
    (0..args.len()).map(|i| int(args, i)).collect()
}

fn fold(args: &[Value], op: &str, f: fn(i64, i64) -> Option<i64>) -> Result<Value, HelperError> {
    at_least(args, 1)?;
    let values = ints(args)?;
    let mut acc = values[0];
    for value in &values[1..] {
        acc = f(acc, *value).ok_or_else(|| overflow(op))?;
    }
    Ok(Value::from(acc))
}

fn add(args: &[Value]) -> Result<Value, HelperError> {
    fold(args, "add", i64::checked_add)
}

fn add1(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    int(args, 0)?.checked_add(1).map(Value::from).ok_or_else(|| overflow("add1"))
}

fn sub(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    fold(args, "sub", i64::checked_sub)
}

fn mul(args: &[Value]) -> Result<Value, HelperError> {
    fold(args, "mul", i64::checked_mul)
}

fn div(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    if int(args, 1)? == 0 {
        return Err(HelperError::Invalid("division by zero".to_string()));
    }
    fold(args, "div", i64::checked_div)
}

fn modulo(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    if int(args, 1)? == 0 {
        return Err(HelperError::Invalid("division by zero".to_string()));
    }
    fold(args, "mod", i64::checked_rem)
}

fn max(args: &[Value]) -> Result<Value, HelperError> {
    fold(args, "max", |a, b| Some(a.max(b)))
}

fn min(args: &[Value]) -> Result<Value, HelperError> {
    fold(args, "min", |a, b| Some(a.min(b)))
}
