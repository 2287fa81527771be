use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub api_key_configured: bool,
    pub message: &'static str,
}

impl HealthResponse {
    pub fn new(api_key_configured: bool) -> Self {
        Self {
            status: "healthy",
            api_key_configured,
            message: if api_key_configured {
                "API is running"
            } else {
                "API key not configured"
            },
        }
    }
}
