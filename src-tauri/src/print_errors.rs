#[derive(Debug, thiserror::Error)]
pub(crate) enum PrintError {
    #[error("failed to open print surface '{label}': {reason}")]
    SurfaceUnavailable { label: String, reason: String },

    #[error("template '{template}' is missing")]
    TemplateMissing { template: String },

    #[error("failed to load template '{template}': {reason}")]
    LoadFailed { template: String, reason: String },

    #[error("print surface '{label}' closed before '{template}' finished loading")]
    SurfaceTerminated { label: String, template: String },

    #[error("failed to show print surface '{label}': {reason}")]
    ShowFailed { label: String, reason: String },

    #[error("failed to deliver document to print surface '{label}': {reason}")]
    DeliveryFailed { label: String, reason: String },

    #[error("print dialog failed on surface '{label}': {reason}")]
    PrintFailed { label: String, reason: String },

    #[error("failed to release print surface '{label}': {reason}")]
    ReleaseFailed { label: String, reason: String },
}

impl PrintError {
    pub(crate) fn error_code(&self) -> &'static str {
        match self {
            PrintError::SurfaceUnavailable { .. } => "PRINT_SURFACE_UNAVAILABLE",
            PrintError::TemplateMissing { .. } => "PRINT_TEMPLATE_MISSING",
            PrintError::LoadFailed { .. } => "PRINT_TEMPLATE_LOAD_FAILED",
            PrintError::SurfaceTerminated { .. } => "PRINT_SURFACE_TERMINATED",
            PrintError::ShowFailed { .. } => "PRINT_SURFACE_SHOW_FAILED",
            PrintError::DeliveryFailed { .. } => "PRINT_DELIVERY_FAILED",
            PrintError::PrintFailed { .. } => "PRINT_DIALOG_FAILED",
            PrintError::ReleaseFailed { .. } => "PRINT_SURFACE_RELEASE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_missing_message_names_the_template() {
        let error = PrintError::TemplateMissing {
            template: "assets/stock.html".to_string(),
        };
        assert_eq!(error.to_string(), "template 'assets/stock.html' is missing");
        assert_eq!(error.error_code(), "PRINT_TEMPLATE_MISSING");
    }
}
