//! Value parsers for CLI arguments that clap cannot check on its own.

use std::path::PathBuf;

pub const MAX_ROLLBACK_STEPS: usize = 100;

pub fn validate_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("port must be a number between 1 and 65535, got '{}'", value)),
        Ok(port) => Ok(port),
    }
}

/// The configuration file must exist and be a regular file.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(format!("configuration file '{}' does not exist or is not a file", value));
    }
    Ok(path)
}

pub fn validate_rollback_steps(value: &str) -> Result<usize, String> {
    let steps: usize = value
        .parse()
        .map_err(|_| format!("rollback steps must be a positive number, got '{}'", value))?;

    if !(1..=MAX_ROLLBACK_STEPS).contains(&steps) {
        return Err(format!("rollback steps must be between 1 and {}", MAX_ROLLBACK_STEPS));
    }
    Ok(steps)
}

/// Accepts hostnames and IP literals; rejects blanks and embedded spaces.
pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(format!("invalid host address '{}'", value));
    }
    if host.len() > 253 {
        return Err("host address is longer than 253 characters".to_string());
    }
    if host.chars().all(|c| c.is_ascii_digit() || c == '.')
        && host.parse::<std::net::Ipv4Addr>().is_err()
    {
        return Err(format!("invalid IPv4 address '{}'", value));
    }
    Ok(host.to_string())
}
