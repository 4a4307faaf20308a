//! Token amount formatting helpers.

use ethers::contract::Contract;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use ethers::utils::format_units;

use crate::errors::DevNodeError;

/// Format a raw token amount as a decimal string using the token's own
/// `decimals()` metadata.
///
/// `1500000000000000000` for an 18-decimal token formats as `"1.5"`. Fails
/// if the contract does not expose a `decimals()` accessor.
pub async fn format_value<M: Middleware>(
    token: &Contract<M>,
    value: U256,
) -> Result<String, DevNodeError> {
    let decimals = token_decimals(token).await?;
    format_units_trimmed(value, decimals as u32)
}

/// Format an account's current token balance as a decimal string.
///
/// Equivalent to [`format_value`] applied to `balanceOf(account)`.
pub async fn format_balance<M: Middleware>(
    token: &Contract<M>,
    account: Address,
) -> Result<String, DevNodeError> {
    let balance: U256 = token
        .method::<_, U256>("balanceOf", account)
        .map_err(|e| DevNodeError::ContractCall(e.to_string()))?
        .call()
        .await
        .map_err(|e| DevNodeError::ContractCall(e.to_string()))?;
    format_value(token, balance).await
}

/// Format a raw amount with the given number of decimals, trimming trailing
/// fractional zeros but keeping at least one fractional digit.
pub fn format_units_trimmed(value: U256, decimals: u32) -> Result<String, DevNodeError> {
    let formatted =
        format_units(value, decimals).map_err(|e| DevNodeError::FormatValue(e.to_string()))?;
    Ok(trim_fractional_zeros(&formatted))
}

async fn token_decimals<M: Middleware>(token: &Contract<M>) -> Result<u8, DevNodeError> {
    token
        .method::<_, u8>("decimals", ())
        .map_err(|e| DevNodeError::ContractCall(e.to_string()))?
        .call()
        .await
        .map_err(|e| DevNodeError::ContractCall(e.to_string()))
}

fn trim_fractional_zeros(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", integer)
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => formatted.to_string(),
    }
}
