//! Environment variable parsing helpers.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is
/// unset. A value that is present but does not parse is an error.
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_or() {
        let result: u32 = parse_env_or("DB_POOL_NONEXISTENT_VAR", 42).unwrap();
        assert_eq!(result, 42);

        std::env::set_var("DB_POOL_TEST_PORT", " 8080 ");
        let result: u16 = parse_env_or("DB_POOL_TEST_PORT", 3000).unwrap();
        assert_eq!(result, 8080);

        std::env::set_var("DB_POOL_TEST_PORT", "not-a-port");
        let err = parse_env_or::<u16>("DB_POOL_TEST_PORT", 3000).unwrap_err();
        assert!(err.contains("DB_POOL_TEST_PORT"));
        assert!(err.contains("not-a-port"));
        std::env::remove_var("DB_POOL_TEST_PORT");
    }
}
