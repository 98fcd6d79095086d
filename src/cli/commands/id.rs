use uuid::Uuid;

use crate::cli::utils::output_lines;
use crate::cli::OutputFormat;

/// Hyphenated by default; `strip` drops the hyphens
pub fn generate(count: usize, strip: bool) -> Vec<String> {
    (0..count)
        .map(|_| {
            let id = Uuid::new_v4();
            if strip {
                id.simple().to_string()
            } else {
                id.hyphenated().to_string()
            }
        })
        .collect()
}

pub fn handle(count: usize, strip: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    output_lines(output_format, "ids", &generate(count, strip))
}
