//! Sheetbridge server binary
//!
//! HTTP service converting tabular data between file form and JSON form.

use clap::Parser;
use sheetbridge::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "sheetbridge")]
#[command(version)]
#[command(about = "Sheetbridge - HTTP bridge between spreadsheet files and JSON records")]
#[command(long_about = r#"
Sheetbridge API Server

Converts tabular data between file form and JSON form:
  - POST /api/data     - Upload a .csv/.xlsx/.xls file, get its rows as JSON
  - POST /export-data  - Send JSON records, download a formatted .xlsx

Additional endpoints:
  - GET  /health       - Health check
  - GET  /version      - Server version info
  - GET  /             - API documentation

Example usage:
  sheetbridge                           # Start on localhost:8080
  sheetbridge --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/data \
    -F "dataset_file=@submissions.csv"

  curl -X POST http://localhost:8080/export-data \
    -H "Content-Type: application/json" \
    -d '{"data": [{"first-name": "Ann", "last-name": "Lee"}]}' \
    -o parent_submissions.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETBRIDGE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SHEETBRIDGE_PORT")]
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
