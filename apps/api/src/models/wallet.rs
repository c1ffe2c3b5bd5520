use crate::errors::AppError;

/// Validates a `0x`-prefixed 20-byte hex address and returns it lower-cased.
pub fn normalize_wallet_address(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| AppError::Validation("wallet_address must start with 0x".to_string()))?;

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation(
            "wallet_address must be 0x followed by 40 hex digits".to_string(),
        ));
    }

    Ok(format!("0x{}", hex.to_ascii_lowercase()))
}
