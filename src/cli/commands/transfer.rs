use anyhow::{anyhow, Context};
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use url::Url;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Debug, Clone, Args)]
pub struct Remote {
    #[arg(long, default_value = "http://localhost:8080", help = "Server base URL")]
    pub server: String,
    #[arg(long, help = "Administrator name")]
    pub name: String,
    #[arg(long, help = "Administrator password")]
    pub password: String,
}

impl Remote {
    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        let base = Url::parse(&self.server).with_context(|| format!("invalid server URL: {}", self.server))?;
        Ok(base.join(path)?)
    }

    fn requester(&self) -> Value {
        json!({ "name": self.name, "password": self.password })
    }

    /// POSTs `body` and unwraps the success envelope
    async fn post(&self, path: &str, body: Value) -> anyhow::Result<Value> {
        let url = self.endpoint(path)?;
        let response = reqwest::Client::new()
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        let envelope: Value = response.json().await.context("server did not return JSON")?;
        unwrap_envelope(status.as_u16(), envelope)
    }
}

fn unwrap_envelope(status: u16, envelope: Value) -> anyhow::Result<Value> {
    if envelope["success"].as_bool() == Some(true) {
        return Ok(envelope["data"].clone());
    }
    let message = envelope["message"].as_str().unwrap_or("unknown error");
    let code = envelope["error"].as_str().unwrap_or("ERROR");
    match envelope.get("field_errors") {
        Some(details) => Err(anyhow!("{} {}: {} ({})", status, code, message, details)),
        None => Err(anyhow!("{} {}: {}", status, code, message)),
    }
}

pub async fn export(remote: Remote, output: Option<PathBuf>, output_format: OutputFormat) -> anyhow::Result<()> {
    let dump = remote.post("export", json!({ "requester": remote.requester() })).await?;
    let text = serde_json::to_string_pretty(&dump)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, text)
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;
            output_success(output_format, &format!("Dump written to {}", path.display()), None)
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

pub async fn import(remote: Remote, input: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("cannot read {}", input.display()))?;
    let mut body: Value = serde_json::from_str(&text).context("dump is not valid JSON")?;
    let object = body.as_object_mut().ok_or_else(|| anyhow!("dump must be a JSON object"))?;
    object.insert("requester".to_string(), remote.requester());

    let report = remote.post("import", body).await?;
    output_success(output_format, "Import complete", Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(server: &str) -> Remote {
        Remote {
            server: server.to_string(),
            name: "Administrator".to_string(),
            password: "password0".to_string(),
        }
    }

    #[test]
    fn endpoints_join_onto_base_url() {
        assert_eq!(
            remote("http://localhost:8080").endpoint("export").unwrap().as_str(),
            "http://localhost:8080/export"
        );
        assert!(remote("not a url").endpoint("export").is_err());
    }

    #[test]
    fn envelope_errors_surface_the_server_message() {
        let ok = unwrap_envelope(200, json!({"success": true, "data": {"users": []}})).unwrap();
        assert_eq!(ok, json!({"users": []}));

        let err = unwrap_envelope(403, json!({"success": false, "error": "FORBIDDEN", "message": "administrator required"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "403 FORBIDDEN: administrator required");
    }
}
