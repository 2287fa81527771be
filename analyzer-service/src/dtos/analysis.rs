use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: String,
    pub has_charts: bool,
    pub filename: String,
}

impl AnalysisResponse {
    pub fn new(analysis: String, has_charts: bool, filename: String) -> Self {
        Self {
            success: true,
            analysis,
            has_charts,
            filename,
        }
    }
}
