use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::{
    logging::LogLevel,
    print_errors::PrintError,
    print_job::{DocumentKind, PrintJob, PrintJobReport},
    shell_config::{PrintOptions, WindowConfig},
    PRINT_DOCUMENT_EVENT,
};

/// Resolves once the template page reports it can render a payload, or with
/// the reason it never will.
pub(crate) type LoadSignal = oneshot::Receiver<Result<(), PrintError>>;

/// Resolves when the print dialog opened by the page has closed.
pub(crate) type PrintSignal = oneshot::Receiver<Result<(), PrintError>>;

/// Hidden window a single print job renders into.
pub(crate) trait RenderSurface: Send + Sync {
    fn label(&self) -> &str;
    fn load(&self, template: &str) -> Result<LoadSignal, PrintError>;
    fn show(&self) -> Result<(), PrintError>;
    fn deliver(&self, event: &str, payload: &Value) -> Result<(), PrintError>;
    fn print(&self, options: &PrintOptions) -> Result<PrintSignal, PrintError>;
    fn release(&self) -> Result<(), PrintError>;
    fn is_destroyed(&self) -> bool;
}

pub(crate) trait SurfaceFactory: Send + Sync {
    type Surface: RenderSurface;

    fn acquire(&self, label: &str, config: &WindowConfig) -> Result<Self::Surface, PrintError>;
}

/// Releases the surface exactly once, on whichever exit path comes first.
struct SurfaceLease<'a, S, L>
where
    S: RenderSurface,
    L: Fn(LogLevel, &str),
{
    surface: S,
    released: bool,
    log: &'a L,
}

impl<'a, S, L> SurfaceLease<'a, S, L>
where
    S: RenderSurface,
    L: Fn(LogLevel, &str),
{
    fn new(surface: S, log: &'a L) -> Self {
        Self {
            surface,
            released: false,
            log,
        }
    }

    fn surface(&self) -> &S {
        &self.surface
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if self.surface.is_destroyed() {
            (self.log)(
                LogLevel::Debug,
                &format!("print surface {} already destroyed", self.surface.label()),
            );
            return;
        }
        if let Err(error) = self.surface.release() {
            (self.log)(LogLevel::Error, &error.to_string());
        }
    }
}

impl<S, L> Drop for SurfaceLease<'_, S, L>
where
    S: RenderSurface,
    L: Fn(LogLevel, &str),
{
    fn drop(&mut self) {
        self.release();
    }
}

/// A dropped sender means the surface went away with the step still pending.
async fn await_surface<S: RenderSurface>(
    surface: &S,
    job: &PrintJob,
    signal: oneshot::Receiver<Result<(), PrintError>>,
) -> Result<(), PrintError> {
    signal.await.unwrap_or_else(|_| {
        Err(PrintError::SurfaceTerminated {
            label: surface.label().to_string(),
            template: job.template().to_string(),
        })
    })
}

async fn run_print_steps<S: RenderSurface>(
    surface: &S,
    job: &PrintJob,
    options: &PrintOptions,
) -> Result<(), PrintError> {
    let loaded = surface.load(job.template())?;
    await_surface(surface, job, loaded).await?;

    surface.show()?;
    surface.deliver(PRINT_DOCUMENT_EVENT, job.payload())?;
    let printed = surface.print(options)?;
    await_surface(surface, job, printed).await
}

pub(crate) struct PrintOrchestrator<F> {
    factory: F,
    window: WindowConfig,
    options: PrintOptions,
    next_job_id: AtomicU64,
}

impl<F: SurfaceFactory> PrintOrchestrator<F> {
    pub(crate) fn new(factory: F, window: WindowConfig, options: PrintOptions) -> Self {
        Self {
            factory,
            window,
            options,
            next_job_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn factory(&self) -> &F {
        &self.factory
    }

    /// Runs load → show → deliver → print on a private hidden surface and
    /// releases it once the print dialog has closed. Failures are logged with
    /// the template name.
    pub(crate) async fn submit<L>(
        &self,
        kind: DocumentKind,
        payload: Value,
        log: L,
    ) -> Result<PrintJobReport, PrintError>
    where
        L: Fn(LogLevel, &str) + Send + Sync,
    {
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed) + 1;
        let job = PrintJob::new(job_id, kind, payload);
        log(
            LogLevel::Info,
            &format!(
                "print job {} started: document={} template={}",
                job.id(),
                job.kind().as_str(),
                job.template()
            ),
        );

        let surface = match self.factory.acquire(&job.surface_label(), &self.window) {
            Ok(surface) => surface,
            Err(error) => {
                log_job_failure(&log, &job, &error);
                return Err(error);
            }
        };

        let mut lease = SurfaceLease::new(surface, &log);
        let outcome = run_print_steps(lease.surface(), &job, &self.options).await;
        if let Err(error) = &outcome {
            log_job_failure(&log, &job, error);
        }
        lease.release();

        outcome.map(|()| {
            log(
                LogLevel::Info,
                &format!("print job {} finished: {}", job.id(), job.template()),
            );
            job.report()
        })
    }
}

fn log_job_failure<L>(log: &L, job: &PrintJob, error: &PrintError)
where
    L: Fn(LogLevel, &str),
{
    log(
        LogLevel::Error,
        &format!(
            "failed to print {} (job {}, {}): {}",
            job.template(),
            job.id(),
            error.error_code(),
            error
        ),
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::print_test_support::{
        capture, orchestrator, CapturedLogs, FakeFactory, LoadBehavior, PrintBehavior,
    };

    #[test]
    fn invoice_job_runs_every_step_in_order() {
        let factory = FakeFactory::new(|_| LoadBehavior::Immediate);
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        let report = tauri::async_runtime::block_on(desk.submit(
            DocumentKind::Invoice,
            json!({ "items": 3, "total": 42.00 }),
            capture(&logs),
        ))
        .expect("invoice prints");

        assert_eq!(report.template, "assets/print.html");
        assert_eq!(
            recorder.events(),
            vec![
                "acquire:print-1:706.95553x1000:false".to_string(),
                "load:print-1:assets/print.html".to_string(),
                "show:print-1".to_string(),
                r#"deliver:print-1:printDocument:{"items":3,"total":42.0}"#.to_string(),
                r#"print:print-1:{"silent":false,"marginsMode":0}"#.to_string(),
                "printed:print-1".to_string(),
                "release:print-1".to_string(),
            ]
        );
    }

    #[test]
    fn surface_outlives_a_slow_print_dialog() {
        let mut factory = FakeFactory::new(|_| LoadBehavior::Immediate);
        factory.print = PrintBehavior::Completes(Duration::from_millis(40));
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        tauri::async_runtime::block_on(desk.submit(
            DocumentKind::Statement,
            json!({ "entries": [] }),
            capture(&logs),
        ))
        .expect("statement prints");

        let events = recorder.events();
        let printed = events.iter().position(|event| event == "printed:print-1");
        let released = events.iter().position(|event| event == "release:print-1");
        assert!(printed.is_some());
        assert!(printed < released, "released before the dialog closed: {events:?}");
    }

    #[test]
    fn every_document_kind_creates_and_releases_one_surface() {
        for kind in [
            DocumentKind::Invoice,
            DocumentKind::Statement,
            DocumentKind::Stock,
        ] {
            let factory = FakeFactory::new(|_| LoadBehavior::Immediate);
            let recorder = factory.recorder.clone();
            let desk = orchestrator(factory);
            let logs = CapturedLogs::default();

            tauri::async_runtime::block_on(desk.submit(kind, json!({ "ref": 1 }), capture(&logs)))
                .expect("job succeeds");

            assert_eq!(recorder.count("acquire:"), 1, "{kind:?}");
            assert_eq!(recorder.count("release:"), 1, "{kind:?}");
            assert_eq!(
                recorder.count(&format!("load:print-1:{}", kind.template())),
                1
            );
        }
    }

    #[test]
    fn print_failure_still_releases_once() {
        let mut factory = FakeFactory::new(|_| LoadBehavior::Immediate);
        factory.print = PrintBehavior::Fails;
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        let error = tauri::async_runtime::block_on(desk.submit(
            DocumentKind::Statement,
            json!({}),
            capture(&logs),
        ))
        .expect_err("print fails");

        assert_eq!(error.error_code(), "PRINT_DIALOG_FAILED");
        assert_eq!(recorder.count("acquire:"), 1);
        assert_eq!(recorder.count("release:"), 1);
    }

    #[test]
    fn surface_closed_during_print_dialog_fails_the_job() {
        let mut factory = FakeFactory::new(|_| LoadBehavior::Immediate);
        factory.print = PrintBehavior::Terminated;
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        let error = tauri::async_runtime::block_on(desk.submit(
            DocumentKind::Invoice,
            json!({}),
            capture(&logs),
        ))
        .expect_err("surface went away");

        assert!(matches!(error, PrintError::SurfaceTerminated { .. }));
        assert_eq!(recorder.count("release:"), 0);
    }

    #[test]
    fn missing_stock_template_skips_delivery_and_print() {
        let factory = FakeFactory::new(|template| {
            if template.ends_with("stock.html") {
                LoadBehavior::Missing
            } else {
                LoadBehavior::Immediate
            }
        });
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        let error = tauri::async_runtime::block_on(desk.submit(
            DocumentKind::Stock,
            json!({ "products": [] }),
            capture(&logs),
        ))
        .expect_err("stock template is missing");

        assert!(matches!(error, PrintError::TemplateMissing { .. }));
        assert_eq!(recorder.count("deliver:"), 0);
        assert_eq!(recorder.count("print:"), 0);
        assert_eq!(recorder.count("show:"), 0);
        assert_eq!(recorder.count("release:"), 1);

        let logs = logs.lock().unwrap();
        assert!(logs
            .iter()
            .any(|(level, message)| *level == LogLevel::Error && message.contains("stock.html")));
    }

    #[test]
    fn surface_destroyed_while_loading_is_not_released_twice() {
        let factory = FakeFactory::new(|_| LoadBehavior::Terminated);
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        let error = tauri::async_runtime::block_on(desk.submit(
            DocumentKind::Invoice,
            json!({}),
            capture(&logs),
        ))
        .expect_err("surface terminated");

        assert!(matches!(error, PrintError::SurfaceTerminated { .. }));
        assert_eq!(recorder.count("release:"), 0);
        assert_eq!(recorder.count("print:"), 0);
    }

    #[test]
    fn concurrent_jobs_complete_independently() {
        let factory = FakeFactory::new(|template| {
            if template.ends_with("stock.html") {
                LoadBehavior::Missing
            } else {
                LoadBehavior::Delayed(Duration::from_millis(30))
            }
        });
        let recorder = factory.recorder.clone();
        let desk = orchestrator(factory);
        let logs = CapturedLogs::default();

        let (invoice, stock) = tauri::async_runtime::block_on(async {
            tokio::join!(
                desk.submit(DocumentKind::Invoice, json!({ "total": 10 }), capture(&logs)),
                desk.submit(DocumentKind::Stock, json!({ "total": 20 }), capture(&logs)),
            )
        });

        assert!(invoice.is_ok());
        assert!(matches!(stock, Err(PrintError::TemplateMissing { .. })));

        let invoice_label = recorder.label_for_template("assets/print.html");
        let stock_label = recorder.label_for_template("assets/stock.html");
        assert_ne!(invoice_label, stock_label);

        let events = recorder.events();
        assert!(events.contains(&format!(r#"deliver:{invoice_label}:printDocument:{{"total":10}}"#)));
        assert!(!events.iter().any(|event| event.starts_with(&format!("deliver:{stock_label}"))));
        assert_eq!(recorder.count(&format!("release:{invoice_label}")), 1);
        assert_eq!(recorder.count(&format!("release:{stock_label}")), 1);
    }
}
