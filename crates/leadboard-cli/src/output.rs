use serde::Serialize;

use leadboard_domain::{BoardView, Lead, LeadStatus};

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ColumnSummary {
    pub status: LeadStatus,
    pub count: usize,
    pub leads: Vec<Lead>,
}

#[derive(Serialize)]
pub struct BoardSummary {
    pub total: usize,
    pub columns: Vec<ColumnSummary>,
}

impl BoardSummary {
    pub fn from_view(view: &BoardView) -> Self {
        Self {
            total: view.len(),
            columns: LeadStatus::ALL
                .into_iter()
                .map(|status| ColumnSummary {
                    status,
                    count: view.column(status).len(),
                    leads: view.column(status).to_vec(),
                })
                .collect(),
        }
    }
}

pub fn output_success<T: Serialize>(data: T) {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string(&response).unwrap());
}

/// Outputs an error response to stderr and terminates the process.
pub fn output_error(message: &str) -> ! {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
    };
    eprintln!("{}", serde_json::to_string(&response).unwrap());
    std::process::exit(1);
}
