use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use pesmin::core::io::trace::TraceRecord;
use pesmin::engine::progress::{Progress, ProgressCallback};
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;
use tracing_subscriber::fmt::MakeWriter;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

/// Owns the terminal while a command runs: one bar per phase, log lines printed above it.
pub struct UiManager {
    multi: MultiProgress,
    phase: Option<PhaseBar>,
    events: mpsc::Receiver<UiEvent>,
    shutdown: watch::Receiver<bool>,
    anchor: ProgressBar,
}

struct PhaseBar {
    bar: ProgressBar,
    label: &'static str,
    last_checkpoint: Option<TraceRecord>,
}

impl PhaseBar {
    fn status_line(&self) -> String {
        match &self.last_checkpoint {
            Some(record) => format!(
                "{} (iter {}, E = {:.6}, Δ/n = {:.3e})",
                self.label, record.iteration, record.energy, record.mean_displacement
            ),
            None => self.label.to_string(),
        }
    }
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_sender, shutdown) = watch::channel(false);
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        let anchor = multi.add(ProgressBar::hidden());
        let manager = Self {
            multi,
            phase: None,
            events,
            shutdown,
            anchor,
        };
        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.events.recv() => self.handle_event(event),
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
        if let Some(phase) = self.phase.take() {
            phase.bar.finish_and_clear();
        }
        self.anchor.finish_and_clear();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => self.print(line),
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => self.start_phase(name),
            Progress::PhaseFinish => self.finish_phase(),
            Progress::TaskStart { total } => {
                if let Some(phase) = &self.phase {
                    phase.bar.disable_steady_tick();
                    phase.bar.set_style(Self::bar_style());
                    phase.bar.set_length(total);
                    phase.bar.set_position(0);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(phase) = &self.phase {
                    phase.bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(phase) = &self.phase {
                    phase.bar.finish();
                }
            }
            Progress::Checkpoint(record) => {
                if let Some(phase) = &mut self.phase {
                    phase.last_checkpoint = Some(record);
                    phase.bar.set_message(phase.status_line());
                }
            }
            Progress::Message(msg) => self.print(format!("  {}", msg)),
        }
    }

    fn start_phase(&mut self, label: &'static str) {
        if let Some(previous) = self.phase.take() {
            previous.bar.finish_and_clear();
        }
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.set_message(label);
        bar.enable_steady_tick(Duration::from_millis(80));
        self.phase = Some(PhaseBar {
            bar,
            label,
            last_checkpoint: None,
        });
    }

    fn finish_phase(&mut self) {
        if let Some(phase) = self.phase.take() {
            phase.bar.finish_and_clear();
            self.print(format!("✓ {}", phase.status_line()));
        }
    }

    fn print(&self, line: String) {
        self.multi.println(line).ok();
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<60} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Invalid template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("━╸ ")
    }
}

/// Forwards engine progress events to the UI task.
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Failed to send progress update to UI channel: {}", e);
            }
        })
    }
}

/// `tracing` writer that hands each formatted line to the UI task.
///
/// Falls back to stderr once the UI task has stopped or its queue is full.
#[derive(Clone)]
pub struct UiLogWriter {
    sender: mpsc::Sender<UiEvent>,
}

impl UiLogWriter {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }
}

impl Write for UiLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf).trim_end().to_string();
        if self.sender.try_send(UiEvent::Log(line)).is_err() {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for UiLogWriter {
    type Writer = UiLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
