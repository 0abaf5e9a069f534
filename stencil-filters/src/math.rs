//! Integer modulo filters

use liquid_core::{
    Display_filter, Expression, Filter, FilterParameters, FilterReflection, FromFilterParameters,
    ParseFilter, Result, Runtime, Value, ValueView,
};

/// Message reported when the divisor of a modulo filter is zero.
pub const DIVIDE_BY_ZERO: &str = "number can't be divided by zero at modulo operation";

/// Returns `dividend % divisor`, refusing a zero divisor.
///
/// `i64::MIN % -1` yields 0 rather than overflowing.
pub fn modulo(dividend: i64, divisor: i64) -> std::result::Result<i64, &'static str> {
    if divisor == 0 {
        return Err(DIVIDE_BY_ZERO);
    }
    Ok(dividend.wrapping_rem(divisor))
}

#[derive(Debug, FilterParameters)]
struct ModArgs {
    #[parameter(description = "The divisor.")]
    divisor: Expression,
}

/// `{{ a | mod: b }}` evaluates to `a % b`.
#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "mod",
    description = "Returns the remainder of dividing the input by the argument.",
    parameters(ModArgs),
    parsed(ModFilter)
)]
pub struct Mod;

#[derive(Debug, FromFilterParameters, Display_filter)]
#[name = "mod"]
struct ModFilter {
    #[parameters]
    args: ModArgs,
}

impl Filter for ModFilter {
    fn evaluate(&self, input: &dyn ValueView, runtime: &dyn Runtime) -> Result<Value> {
        let args = self.args.evaluate(runtime)?;
        let (dividend, divisor) = integer_operands(input, &args.divisor)?;
        let remainder = modulo(dividend, divisor).map_err(liquid_core::Error::with_msg)?;
        Ok(Value::scalar(remainder))
    }
}

/// `{{ a | mod_bool: b }}` evaluates to `true` when `b` divides `a`.
#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "mod_bool",
    description = "Returns true when the input is evenly divisible by the argument.",
    parameters(ModArgs),
    parsed(ModBoolFilter)
)]
pub struct ModBool;

#[derive(Debug, FromFilterParameters, Display_filter)]
#[name = "mod_bool"]
struct ModBoolFilter {
    #[parameters]
    args: ModArgs,
}

impl Filter for ModBoolFilter {
    fn evaluate(&self, input: &dyn ValueView, runtime: &dyn Runtime) -> Result<Value> {
        let args = self.args.evaluate(runtime)?;
        let (dividend, divisor) = integer_operands(input, &args.divisor)?;
        let remainder = modulo(dividend, divisor).map_err(liquid_core::Error::with_msg)?;
        Ok(Value::scalar(remainder == 0))
    }
}

fn integer_operands(input: &dyn ValueView, divisor: &dyn ValueView) -> Result<(i64, i64)> {
    let dividend = input
        .as_scalar()
        .and_then(|s| s.to_integer())
        .ok_or_else(|| liquid_core::Error::with_msg("Invalid input: integer expected"))?;
    let divisor = divisor
        .as_scalar()
        .and_then(|s| s.to_integer())
        .ok_or_else(|| liquid_core::Error::with_msg("Invalid argument divisor: integer expected"))?;
    Ok((dividend, divisor))
}
