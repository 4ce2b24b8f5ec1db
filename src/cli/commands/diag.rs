//! Diagnostic commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::api::{ApiClient, OperationKind};
use crate::cli::output::{OutputFormat, print_formatted, print_status};

#[derive(Subcommand, Debug)]
pub enum DiagCommands {
    /// Check that the backend is reachable
    Ping,

    /// List the endpoints each operation calls
    Endpoints,
}

#[derive(Serialize)]
struct PingResult {
    base_url: String,
    reachable: bool,
    message: Option<String>,
}

#[derive(Serialize)]
struct EndpointInfo {
    operation: OperationKind,
    method: &'static str,
    url: String,
    input: &'static str,
}

pub async fn run(command: DiagCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match command {
        DiagCommands::Ping => ping(client, format).await,
        DiagCommands::Endpoints => {
            endpoints(client, format);
            Ok(())
        }
    }
}

async fn ping(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response = client.ping().await;

    let result = PingResult {
        base_url: client.base_url().to_string(),
        reachable: response.is_ok(),
        message: match &response {
            Ok(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .or_else(|| Some(value.to_string())),
            Err(e) => Some(format!("{:#}", e)),
        },
    };

    match format {
        OutputFormat::Json => print_formatted(&result, format, |_| String::new()),
        OutputFormat::Text => {
            let detail = result.message.as_deref().unwrap_or_default();
            print_status(result.reachable, &format!("{} {}", result.base_url, detail));
        }
    }

    response.map(|_| ())
}

/// Body or query shape each operation sends
fn input_shape(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Write | OperationKind::Workflow => "{prompt}",
        OperationKind::Review => "{text}",
        OperationKind::Design => "{context}",
        OperationKind::GenerateBook => "?title=&topic=",
    }
}

fn endpoints(client: &ApiClient, format: OutputFormat) {
    let list: Vec<EndpointInfo> = OperationKind::all()
        .iter()
        .map(|kind| EndpointInfo {
            operation: *kind,
            method: "POST",
            url: format!("{}{}", client.base_url(), kind.endpoint()),
            input: input_shape(*kind),
        })
        .collect();

    print_formatted(&list, format, |list| {
        list.iter()
            .map(|e| format!("{:<15} {} {} {}", e.operation.name(), e.method, e.url, e.input))
            .collect::<Vec<_>>()
            .join("\n")
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn test_input_shape_matches_body_fields() {
        assert_eq!(input_shape(OperationKind::Review), "{text}");
        assert_eq!(input_shape(OperationKind::Design), "{context}");
        assert_eq!(input_shape(OperationKind::GenerateBook), "?title=&topic=");
    }

    #[tokio::test]
    async fn test_endpoints_needs_no_backend() {
        let client = ApiClient::new(&BackendConfig::default()).unwrap();
        run(DiagCommands::Endpoints, &client, OutputFormat::Json)
            .await
            .unwrap();
    }
}
