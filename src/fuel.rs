//! Fuel equivalence based on burn values

use crate::catalog::Catalog;
use crate::error::QueryError;

/// How much `to` burns as long as `amount` of `from`.
///
/// Burn values are the number of items one unit of fuel smelts, so with
/// Coal at 8 and Planks at 1.5, 0.125 Coal is worth 0.667 Planks.
pub fn convert_fuel(
    catalog: &Catalog,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<f64, QueryError> {
    if amount.is_nan() || amount < 0.0 {
        return Err(QueryError::InvalidCraftCount(amount));
    }

    let from_burn = catalog
        .fuel_value(from)
        .ok_or_else(|| QueryError::UnknownFuel(from.to_string()))?;
    let to_burn = catalog
        .fuel_value(to)
        .ok_or_else(|| QueryError::UnknownFuel(to.to_string()))?;
    if to_burn == 0.0 {
        return Err(QueryError::ZeroBurnValue(to.to_string()));
    }

    Ok(amount * (from_burn / to_burn))
}

pub fn describe_fuel_conversion(
    catalog: &Catalog,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<String, QueryError> {
    let converted = convert_fuel(catalog, from, to, amount)?;
    Ok(format!(
        "{} {} ≈ {:.3} {}",
        amount,
        from.to_lowercase(),
        converted,
        to.to_lowercase()
    ))
}
