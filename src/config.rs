use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_host: String,
    pub http_port: u16,
    pub log_level: String,
    pub gazetteer_path: String,
    pub escape_xml_values: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            bind_host: env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_or_default("HTTP_PORT", 8000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            gazetteer_path: env::var("GAZETTEER_PATH")
                .unwrap_or_else(|_| "data/districts.json".to_string()),
            escape_xml_values: parse_or_default("ESCAPE_XML_VALUES", false)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
