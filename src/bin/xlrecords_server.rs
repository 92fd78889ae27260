//! xlrecords API Server binary
//!
//! HTTP REST API for spreadsheet <-> record conversion.

use clap::Parser;
use royalbit_xlrecords::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "xlrecords-server")]
#[command(version)]
#[command(author = "RoyalBit Inc. <admin@royalbit.ca>")]
#[command(about = "xlrecords API Server - HTTP API for spreadsheet <-> record conversion")]
#[command(long_about = r#"
xlrecords API Server

Endpoints:
  - POST /api/v1/read      - Read workbooks (first sheet each) into records
  - POST /api/v1/generate  - JSON array of objects -> .xlsx download

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  xlrecords-server                           # Start on localhost:8080
  xlrecords-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/read \
    -H "Content-Type: application/json" \
    -d '{"file_paths": ["q1.xlsx", "q2.xlsx"]}'

  curl -X POST "http://localhost:8080/api/v1/generate?sheet_name=Orders&on_missing_key=blank" \
    -d '[{"id":"1","item":"pen"}]' -o orders.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "XLRECORDS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "XLRECORDS_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
