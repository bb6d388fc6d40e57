//! Headless replay of a touch script against a recording target
//!
//! Steps run back to back. Time only passes inside `wait` steps, where
//! refresh completions and the end of any running transition are
//! delivered in the order they fall due.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use pulldown_core::{
    refresh_fn, BannerPose, Error, PullConfig, PullController, PullState, RecordingTarget,
    RefreshCompletion, TouchEvent, VisualCommand,
};

/// A touch script, as read from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// How long the scripted refresh takes
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Pull settings for this run; defaults when absent
    #[serde(default)]
    pub pull: Option<PullConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Start { y: f64 },
    Move { y: f64 },
    End { y: f64 },
    Cancel { y: f64 },
    /// Set the page scroll position seen by later steps
    Scroll { top: f64 },
    Wait { ms: u64 },
}

fn default_refresh_ms() -> u64 {
    1000
}

impl Script {
    pub fn from_toml(content: &str) -> pulldown_core::Result<Self> {
        let script: Self =
            toml::from_str(content).map_err(|e| Error::Script(e.message().to_string()))?;
        if let Some(pull) = &script.pull {
            pull.validate()?;
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> pulldown_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// One line of the simulation trace
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    pub event: String,
    /// Set when a touch event had its default action suppressed
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default_prevented: bool,
    pub state: PullState,
    /// Visual commands issued while handling the event
    pub visuals: Vec<String>,
}

struct Simulation {
    controller: PullController<RecordingTarget>,
    completions: mpsc::UnboundedReceiver<RefreshCompletion>,
    scroll_top: f64,
    seen_commands: usize,
    transition_end: Option<Instant>,
    started: Instant,
    trace: Vec<TraceEntry>,
}

impl Simulation {
    fn new(script: &Script) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let refresh = Duration::from_millis(script.refresh_ms);
        let handler = refresh_fn(move || tokio::time::sleep(refresh));
        let config = script.pull.clone().unwrap_or_default();
        let controller =
            PullController::new(config, RecordingTarget::new()).with_refresh_handler(handler, tx);

        Self {
            controller,
            completions: rx,
            scroll_top: 0.0,
            seen_commands: 0,
            transition_end: None,
            started: Instant::now(),
            trace: Vec::new(),
        }
    }

    /// Collect commands issued since the last record and note when the
    /// latest transition will end
    fn record(&mut self, event: String, default_prevented: bool) {
        let now = Instant::now();
        let commands = &self.controller.target().commands()[self.seen_commands..];
        let mut visuals = Vec::with_capacity(commands.len());
        for command in commands {
            match command {
                VisualCommand::Instant(pose) => {
                    self.transition_end = None;
                    visuals.push(format!("set {}", describe(pose)));
                }
                VisualCommand::Animated { pose, duration } => {
                    self.transition_end = Some(now + *duration);
                    visuals.push(format!(
                        "animate {} over {}ms",
                        describe(pose),
                        duration.as_millis()
                    ));
                }
            }
        }
        self.seen_commands += commands.len();

        self.trace.push(TraceEntry {
            at_ms: now.duration_since(self.started).as_millis() as u64,
            event,
            default_prevented,
            state: self.controller.state(),
            visuals,
        });
    }

    fn touch(&mut self, mut event: TouchEvent, label: String) {
        let page = self.scroll_top;
        self.controller.handle_touch(&mut event, &page);
        self.record(label, event.default_prevented());
    }

    async fn wait(&mut self, ms: u64) {
        let deadline = Instant::now() + Duration::from_millis(ms);
        loop {
            let wake = match self.transition_end {
                Some(end) if end <= deadline => end,
                _ => deadline,
            };
            tokio::select! {
                biased;
                Some(completion) = self.completions.recv() => {
                    debug!(ticket = completion.ticket.id(), "Delivering refresh completion");
                    self.controller.on_refresh_complete(completion);
                    self.record(format!("refresh done ({:?})", completion.outcome), false);
                }
                _ = tokio::time::sleep_until(wake) => {
                    if self.transition_end.is_some_and(|end| end <= Instant::now()) {
                        self.transition_end = None;
                        self.controller.on_transition_end();
                        self.record("transition end".to_string(), false);
                    }
                    if Instant::now() >= deadline {
                        return;
                    }
                }
            }
        }
    }
}

fn describe(pose: &BannerPose) -> String {
    if *pose == BannerPose::REST {
        "rest".to_string()
    } else {
        format!(
            "offset={:.1} scale={:.3} indicator={:.1}",
            pose.content_offset, pose.banner_scale, pose.indicator_offset
        )
    }
}

/// Replay a script and return its trace
pub async fn simulate(script: &Script) -> Vec<TraceEntry> {
    let mut sim = Simulation::new(script);

    for step in &script.steps {
        match *step {
            Step::Start { y } => sim.touch(TouchEvent::start(y), format!("touch start y={}", y)),
            Step::Move { y } => sim.touch(TouchEvent::moved(y), format!("touch move y={}", y)),
            Step::End { y } => sim.touch(TouchEvent::end(y), format!("touch end y={}", y)),
            Step::Cancel { y } => sim.touch(TouchEvent::cancel(y), format!("touch cancel y={}", y)),
            Step::Scroll { top } => {
                sim.scroll_top = top;
                sim.record(format!("scroll top={}", top), false);
            }
            Step::Wait { ms } => sim.wait(ms).await,
        }
    }

    sim.trace
}

fn format_entry(entry: &TraceEntry) -> String {
    let state = &entry.state;
    let mut line = format!(
        "{:>6}ms  {:<28} {:?} offset={:.1}",
        entry.at_ms, entry.event, state.phase, state.offset
    );
    if entry.default_prevented {
        line.push_str(" [prevented]");
    }
    for visual in &entry.visuals {
        line.push_str("\n          -> ");
        line.push_str(visual);
    }
    line
}

pub async fn run(path: &Path, json: bool) -> Result<()> {
    let script = Script::load(path)?;
    let trace = simulate(&script).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
    } else {
        for entry in &trace {
            println!("{}", format_entry(entry));
        }
    }

    Ok(())
}
