use serde_json::Value;

use crate::PRINT_WINDOW_LABEL_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum DocumentKind {
    Invoice,
    Statement,
    Stock,
}

impl DocumentKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Statement => "statement",
            DocumentKind::Stock => "stock",
        }
    }

    pub(crate) fn request_name(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "print-invoice",
            DocumentKind::Statement => "print-statement",
            DocumentKind::Stock => "print-stock",
        }
    }

    pub(crate) fn template(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "assets/print.html",
            DocumentKind::Statement => "assets/printStatement.html",
            DocumentKind::Stock => "assets/stock.html",
        }
    }
}

/// One print request; owns its payload until the surface is released.
#[derive(Debug)]
pub(crate) struct PrintJob {
    id: u64,
    kind: DocumentKind,
    payload: Value,
}

impl PrintJob {
    pub(crate) fn new(id: u64, kind: DocumentKind, payload: Value) -> Self {
        Self { id, kind, payload }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub(crate) fn template(&self) -> &'static str {
        self.kind.template()
    }

    pub(crate) fn payload(&self) -> &Value {
        &self.payload
    }

    pub(crate) fn surface_label(&self) -> String {
        format!("{PRINT_WINDOW_LABEL_PREFIX}{}", self.id)
    }

    pub(crate) fn report(&self) -> PrintJobReport {
        PrintJobReport {
            job_id: self.id,
            document_type: self.kind,
            template: self.template(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrintJobReport {
    pub(crate) job_id: u64,
    pub(crate) document_type: DocumentKind,
    pub(crate) template: &'static str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_names_map_to_fixed_templates() {
        let mapped: Vec<_> = [
            DocumentKind::Invoice,
            DocumentKind::Statement,
            DocumentKind::Stock,
        ]
        .into_iter()
        .map(|kind| (kind.request_name(), kind.template()))
        .collect();
        assert_eq!(
            mapped,
            vec![
                ("print-invoice", "assets/print.html"),
                ("print-statement", "assets/printStatement.html"),
                ("print-stock", "assets/stock.html"),
            ]
        );
    }

    #[test]
    fn print_job_keeps_payload_untouched() {
        let payload = json!({ "items": 3, "total": 42.0 });
        let job = PrintJob::new(7, DocumentKind::Invoice, payload.clone());
        assert_eq!(job.payload(), &payload);
        assert_eq!(job.surface_label(), "print-7");
    }

    #[test]
    fn report_serializes_for_the_ui() {
        let job = PrintJob::new(3, DocumentKind::Stock, json!({}));
        let value = serde_json::to_value(job.report()).expect("serialize report");
        assert_eq!(
            value,
            json!({ "jobId": 3, "documentType": "stock", "template": "assets/stock.html" })
        );
    }
}
