use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid Ethereum address format: {0}")]
    InvalidEthereumAddress(String),
}

/// Checks for `0x` followed by exactly 40 hex digits. Surrounding whitespace
/// is ignored; the trimmed address is returned.
pub fn validate_eth_address(address: &str) -> Result<&str, ValidationError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    let digits = match address.strip_prefix("0x") {
        Some(digits) => digits,
        None => return Err(ValidationError::InvalidEthereumAddress(address.to_string())),
    };

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidEthereumAddress(address.to_string()));
    }

    Ok(address)
}

/// `includeInternal` is on for `1` or `true`, off for anything else.
pub fn parse_include_internal(flag: Option<&str>) -> bool {
    match flag.map(str::trim) {
        Some("1") => true,
        Some(value) => value.eq_ignore_ascii_case("true"),
        None => false,
    }
}
