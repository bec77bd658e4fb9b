//! JSON renderer. Field order follows the model's struct layout.

use crate::{ReportError, ReportModel};

pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string(model).map_err(|e| ReportError::Serialize(e.to_string()))
}
