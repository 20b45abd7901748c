//! Simulate command implementation
//!
//! Mounts a real engine on an in-memory channel and replays a script of
//! host, user and navigation events, reporting the selection and channel
//! writes after each one.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use demo_core::{
    EngineOptions, MemoryChannel, MemoryPreferences, PreferenceStore, SelectionSnapshot, SyncEngine,
};
use demo_meta::{Collection, ViewerConfig};
use serde::Serialize;

use crate::cli::Step;
use crate::error::Result;

/// Upper bound on reactive cycles per step
const MAX_CYCLES: usize = 16;

/// Selection after one step of the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub selection: SelectionSnapshot,
    /// Channel writes the engine issued during the step
    pub writes: Vec<Option<String>>,
    /// Variants the engine asked the host to activate during the step
    pub switch_requests: Vec<String>,
}

/// Scripted host around one engine.
pub struct Simulation {
    engine: SyncEngine,
    channel: MemoryChannel,
    requests: Rc<RefCell<Vec<String>>>,
    answered: usize,
    manual_switch: bool,
}

impl Simulation {
    /// Mount an engine on a channel holding `hash`.
    pub fn mount(
        collection: Collection,
        mut options: EngineOptions,
        hash: Option<&str>,
        stored: Option<&str>,
        manual_switch: bool,
    ) -> Self {
        if let Some(stored) = stored {
            let scope = options
                .preference_scope
                .clone()
                .unwrap_or_else(|| collection.preference_scope());
            let preferences = MemoryPreferences::new();
            preferences.set(&scope, stored);
            options = options.with_preferences(Rc::new(preferences));
        }

        let requests = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&requests);
        let options = options.on_variant_switch(move |variant: &str| {
            log.borrow_mut().push(variant.to_string());
        });

        let channel = MemoryChannel::new(hash.filter(|hash| !hash.is_empty()));
        let engine = SyncEngine::mount(collection, Rc::new(channel.clone()), options);

        Self {
            engine,
            channel,
            requests,
            answered: 0,
            manual_switch,
        }
    }

    /// Report for the mount itself, settling any writes it caused.
    pub fn mount_report(&mut self) -> StepReport {
        self.record("mount".to_string(), 0)
    }

    /// Apply one step and run cycles until the channel settles.
    pub fn apply(&mut self, step: &Step) -> StepReport {
        let first_request = self.requests.borrow().len();
        self.channel.clear_writes();

        match step {
            Step::Navigate(value) => self.channel.navigate(Some(value.as_str()).filter(|v| !v.is_empty())),
            Step::Clear => self.channel.navigate(None),
            Step::SelectFile(name) => self.engine.select_file(name),
            Step::SelectVariant(name) => self.engine.select_variant(name),
            Step::Activate(name) => {
                // An explicit activation answers every outstanding request
                self.answered = self.requests.borrow().len();
                self.engine.activate_variant(name);
            }
        }

        self.record(step.to_string(), first_request)
    }

    fn record(&mut self, step: String, first_request: usize) -> StepReport {
        self.settle();
        StepReport {
            step,
            selection: self.engine.snapshot(),
            writes: self.channel.writes(),
            switch_requests: self.requests.borrow()[first_request..].to_vec(),
        }
    }

    fn settle(&mut self) {
        for _ in 0..MAX_CYCLES {
            let polled = self.engine.poll();
            let switched = !self.manual_switch && self.answer_requests();
            if !polled && !switched {
                return;
            }
        }
        tracing::warn!(cycles = MAX_CYCLES, "Channel did not settle");
    }

    /// Activate every requested variant not answered yet.
    fn answer_requests(&mut self) -> bool {
        let pending: Vec<String> = self.requests.borrow()[self.answered..].to_vec();
        self.answered += pending.len();
        for variant in &pending {
            tracing::debug!(%variant, "Host activating requested variant");
            self.engine.activate_variant(variant);
        }
        !pending.is_empty()
    }
}

/// Replay `steps`, returning one report for the mount and one per step.
pub fn simulate(
    collection: Collection,
    options: EngineOptions,
    hash: Option<&str>,
    stored: Option<&str>,
    manual_switch: bool,
    steps: &[Step],
) -> Vec<StepReport> {
    let mut simulation = Simulation::mount(collection, options, hash, stored, manual_switch);
    let mut reports = vec![simulation.mount_report()];
    reports.extend(steps.iter().map(|step| simulation.apply(step)));
    reports
}

/// Run the simulate command
pub fn run_simulate(
    config_path: &Path,
    hash: Option<&str>,
    stored: Option<&str>,
    manual_switch: bool,
    json: bool,
    steps: &[Step],
) -> Result<()> {
    let config = ViewerConfig::load(config_path)?;
    let collection = config.collection()?;
    let options = EngineOptions::from_config(&config)?;
    let hash = hash.map(|hash| hash.strip_prefix('#').unwrap_or(hash));

    let reports = simulate(collection, options, hash, stored, manual_switch, steps);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("{} {}", "Retention".dimmed(), config.viewer.retention.to_string().cyan());
    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &StepReport) {
    let selection = &report.selection;
    println!();
    println!("{} {}", "●".cyan(), report.step.bold());

    let display = if selection.display_file == selection.file {
        String::new()
    } else {
        format!(" as {}", selection.display_file)
    };
    println!(
        "    {}: {}{} ({})",
        "selection".dimmed(),
        format!("{}/{}", selection.variant, selection.file).green(),
        display,
        selection.origin
    );
    println!("    {}:     {}", "phase".dimmed(), selection.phase);
    println!(
        "    {}:   {}",
        "channel".dimmed(),
        selection.channel.as_deref().unwrap_or("(empty)")
    );

    if report.writes.is_empty() {
        println!("    {}:    {}", "writes".dimmed(), "none".dimmed());
    } else {
        let writes: Vec<&str> = report
            .writes
            .iter()
            .map(|write| write.as_deref().unwrap_or("(clear)"))
            .collect();
        println!("    {}:    {}", "writes".dimmed(), writes.join(", ").yellow());
    }

    if !report.switch_requests.is_empty() {
        println!(
            "    {}: {}",
            "requested".dimmed(),
            report.switch_requests.join(", ").yellow()
        );
    }
}
