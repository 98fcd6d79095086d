use crate::auth::PasswordHashing;
use crate::cli::utils::output_lines;
use crate::cli::OutputFormat;
use crate::config::config;

/// Same parameters the server would use, so the hash can be pasted into a dump
pub async fn handle(password: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let hashing = PasswordHashing::from_config(&config().security)?;
    let hash = hashing.hash_blocking(password).await?;
    output_lines(output_format, "hash", &[hash])
}
