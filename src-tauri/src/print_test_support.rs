//! Recording fakes for the print pipeline.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::{
    logging::LogLevel,
    print_errors::PrintError,
    print_orchestrator::{LoadSignal, PrintOrchestrator, PrintSignal, RenderSurface, SurfaceFactory},
    shell_config::{PrintOptions, WindowConfig, PRINT_OPTIONS, PRINT_WINDOW_CONFIG},
};

#[derive(Default)]
pub(crate) struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    pub(crate) fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }

    pub(crate) fn label_for_template(&self, template: &str) -> String {
        self.events()
            .iter()
            .find_map(|event| {
                let rest = event.strip_prefix("load:")?;
                let (label, loaded) = rest.split_once(':')?;
                (loaded == template).then(|| label.to_string())
            })
            .expect("template was loaded")
    }
}

#[derive(Clone, Copy)]
pub(crate) enum LoadBehavior {
    Immediate,
    Delayed(Duration),
    Missing,
    Terminated,
}

#[derive(Clone, Copy)]
pub(crate) enum PrintBehavior {
    /// Dialog closes after the given delay.
    Completes(Duration),
    /// Page reports the dialog failed.
    Fails,
    /// Window destroyed while the dialog is open.
    Terminated,
}

pub(crate) struct FakeFactory {
    pub(crate) recorder: Arc<Recorder>,
    pub(crate) load_for: fn(&str) -> LoadBehavior,
    pub(crate) print: PrintBehavior,
}

impl FakeFactory {
    pub(crate) fn new(load_for: fn(&str) -> LoadBehavior) -> Self {
        Self {
            recorder: Arc::default(),
            load_for,
            print: PrintBehavior::Completes(Duration::ZERO),
        }
    }
}

pub(crate) struct FakeSurface {
    label: String,
    recorder: Arc<Recorder>,
    load_for: fn(&str) -> LoadBehavior,
    print: PrintBehavior,
    destroyed: Arc<AtomicBool>,
}

impl SurfaceFactory for FakeFactory {
    type Surface = FakeSurface;

    fn acquire(&self, label: &str, config: &WindowConfig) -> Result<FakeSurface, PrintError> {
        self.recorder.push(format!(
            "acquire:{label}:{}x{}:{}",
            config.width, config.height, config.visible
        ));
        Ok(FakeSurface {
            label: label.to_string(),
            recorder: self.recorder.clone(),
            load_for: self.load_for,
            print: self.print,
            destroyed: Arc::default(),
        })
    }
}

impl RenderSurface for FakeSurface {
    fn label(&self) -> &str {
        &self.label
    }

    fn load(&self, template: &str) -> Result<LoadSignal, PrintError> {
        self.recorder.push(format!("load:{}:{template}", self.label));
        let (sender, receiver) = oneshot::channel();
        match (self.load_for)(template) {
            LoadBehavior::Immediate => {
                let _ = sender.send(Ok(()));
            }
            LoadBehavior::Delayed(delay) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    let _ = sender.send(Ok(()));
                });
            }
            LoadBehavior::Missing => {
                return Err(PrintError::TemplateMissing {
                    template: template.to_string(),
                });
            }
            LoadBehavior::Terminated => {
                self.destroyed.store(true, Ordering::SeqCst);
                drop(sender);
            }
        }
        Ok(receiver)
    }

    fn show(&self) -> Result<(), PrintError> {
        self.recorder.push(format!("show:{}", self.label));
        Ok(())
    }

    fn deliver(&self, event: &str, payload: &Value) -> Result<(), PrintError> {
        self.recorder
            .push(format!("deliver:{}:{event}:{payload}", self.label));
        Ok(())
    }

    fn print(&self, options: &PrintOptions) -> Result<PrintSignal, PrintError> {
        let options = serde_json::to_string(options).unwrap();
        self.recorder.push(format!("print:{}:{options}", self.label));
        let (sender, receiver) = oneshot::channel();
        match self.print {
            PrintBehavior::Completes(delay) => {
                let recorder = self.recorder.clone();
                let label = self.label.clone();
                thread::spawn(move || {
                    thread::sleep(delay);
                    recorder.push(format!("printed:{label}"));
                    let _ = sender.send(Ok(()));
                });
            }
            PrintBehavior::Fails => {
                let _ = sender.send(Err(PrintError::PrintFailed {
                    label: self.label.clone(),
                    reason: "dialog cancelled".to_string(),
                }));
            }
            PrintBehavior::Terminated => {
                self.destroyed.store(true, Ordering::SeqCst);
                drop(sender);
            }
        }
        Ok(receiver)
    }

    fn release(&self) -> Result<(), PrintError> {
        self.recorder.push(format!("release:{}", self.label));
        self.destroyed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

pub(crate) type CapturedLogs = Mutex<Vec<(LogLevel, String)>>;

pub(crate) fn capture(logs: &CapturedLogs) -> impl Fn(LogLevel, &str) + Send + Sync + '_ {
    move |level, message| logs.lock().unwrap().push((level, message.to_string()))
}

pub(crate) fn orchestrator(factory: FakeFactory) -> PrintOrchestrator<FakeFactory> {
    PrintOrchestrator::new(factory, PRINT_WINDOW_CONFIG, PRINT_OPTIONS)
}
