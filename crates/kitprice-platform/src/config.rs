use anyhow::{Context, Result};
use kitprice_core::DEFAULT_ROW_COUNT;

pub const DEFAULT_MAX_ROWS: usize = 500;
pub const DEFAULT_MAX_WORKSHEETS: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub http_addr: String,
    /// Blank rows seeded into a new or reset worksheet.
    pub default_rows: usize,
    /// Upper bound on rows per worksheet and items per stateless request.
    pub max_rows: usize,
    /// Upper bound on worksheets held at once.
    pub max_worksheets: usize,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(default_http_addr: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());
        let default_rows = parse_count(&lookup, "KITPRICE_DEFAULT_ROWS", DEFAULT_ROW_COUNT)?;
        let max_rows = parse_count(&lookup, "KITPRICE_MAX_ROWS", DEFAULT_MAX_ROWS)?;
        let max_worksheets =
            parse_count(&lookup, "KITPRICE_MAX_WORKSHEETS", DEFAULT_MAX_WORKSHEETS)?;

        if max_rows < default_rows {
            anyhow::bail!(
                "KITPRICE_MAX_ROWS ({max_rows}) must not be below KITPRICE_DEFAULT_ROWS ({default_rows})"
            );
        }
        if max_worksheets == 0 {
            anyhow::bail!("KITPRICE_MAX_WORKSHEETS must be at least 1");
        }

        Ok(Self {
            http_addr,
            default_rows,
            max_rows,
            max_worksheets,
        })
    }
}

fn parse_count<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        None => Ok(default),
    }
}
