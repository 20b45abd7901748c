//! Property-based tests for the synchronization engine
//!
//! Random scripts of navigation, user and host events are replayed against
//! an engine in every retention mode. After each event the host runs cycles
//! until the channel is quiet, then the invariants below are checked.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use demo_core::{Channel, EngineOptions, Listener, MemoryChannel, Subscription, SyncEngine, resolve};
use demo_meta::{Collection, RetentionMode};
use demo_slug::segment_count;
use demo_test_utils::demo_collection;
use proptest::prelude::*;

const MAX_CYCLES: usize = 8;

/// Channel counting writes of the value it already holds.
#[derive(Clone)]
struct AuditedChannel {
    inner: MemoryChannel,
    redundant_writes: Rc<Cell<usize>>,
}

impl Channel for AuditedChannel {
    fn get(&self) -> Option<String> {
        self.inner.get()
    }

    fn set(&self, value: Option<&str>) {
        if self.inner.get().as_deref() == value {
            self.redundant_writes.set(self.redundant_writes.get() + 1);
        }
        self.inner.set(value);
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.inner.subscribe(listener)
    }
}

#[derive(Debug, Clone)]
enum Event {
    Navigate(Option<&'static str>),
    SelectFile(&'static str),
    SelectVariant(&'static str),
    Activate(&'static str),
}

const VALUES: &[&str] = &[
    "demo",
    "demo:component.tsx",
    "demo:styles.css",
    "demo:utils.ts",
    "demo:premium",
    "demo:premium:component.tsx",
    "demo:premium:helper.ts",
    "demo:tailwind:index.tsx",
    "demo:missing.ts",
    "demo:a:b:c",
    "other-demo:component.tsx",
    "",
];
const FILES: &[&str] = &["component.tsx", "styles.css", "utils.ts", "helper.ts", "index.tsx", "nope.ts"];
const VARIANTS: &[&str] = &["Default", "Premium", "Tailwind", "Missing"];

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => prop::option::of(prop::sample::select(VALUES)).prop_map(Event::Navigate),
        2 => prop::sample::select(FILES).prop_map(Event::SelectFile),
        2 => prop::sample::select(VARIANTS).prop_map(Event::SelectVariant),
        1 => prop::sample::select(VARIANTS).prop_map(Event::Activate),
    ]
}

fn mode_strategy() -> impl Strategy<Value = RetentionMode> {
    prop::sample::select(RetentionMode::ALL.to_vec())
}

struct Host {
    engine: SyncEngine,
    channel: MemoryChannel,
    redundant_writes: Rc<Cell<usize>>,
    requests: Rc<RefCell<Vec<String>>>,
    answered: usize,
    auto_switch: bool,
}

impl Host {
    fn mount(mode: RetentionMode, initial: Option<&str>, auto_switch: bool) -> Self {
        let channel = MemoryChannel::new(initial.filter(|value| !value.is_empty()));
        let redundant_writes = Rc::new(Cell::new(0));
        let audited = AuditedChannel {
            inner: channel.clone(),
            redundant_writes: Rc::clone(&redundant_writes),
        };

        let requests = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&requests);
        let options = EngineOptions::new()
            .with_retention(mode)
            .on_variant_switch(move |variant: &str| log.borrow_mut().push(variant.to_string()));

        let engine = SyncEngine::mount(demo_collection(), Rc::new(audited), options);
        Self {
            engine,
            channel,
            redundant_writes,
            requests,
            answered: 0,
            auto_switch,
        }
    }

    fn apply(&mut self, event: &Event) {
        match event {
            Event::Navigate(value) => self.channel.navigate(value.filter(|value| !value.is_empty())),
            Event::SelectFile(name) => self.engine.select_file(name),
            Event::SelectVariant(name) => self.engine.select_variant(name),
            Event::Activate(name) => self.engine.activate_variant(name),
        }
    }

    /// Run cycles until nothing happens. Returns whether it got quiet.
    fn settle(&mut self) -> bool {
        for _ in 0..MAX_CYCLES {
            let polled = self.engine.poll();
            let switched = self.auto_switch && self.answer_requests();
            if !polled && !switched {
                return true;
            }
        }
        false
    }

    fn answer_requests(&mut self) -> bool {
        let pending: Vec<String> = self.requests.borrow()[self.answered..].to_vec();
        self.answered += pending.len();
        for variant in &pending {
            self.engine.activate_variant(variant);
        }
        !pending.is_empty()
    }
}

/// Whether `write` has the shape `mode` is allowed to write.
fn write_fits_mode(mode: RetentionMode, write: Option<&str>, collection: &Collection) -> bool {
    match (mode, write) {
        (RetentionMode::Remove | RetentionMode::RemoveAfterInteraction, None) => true,
        (RetentionMode::Demo, Some(value)) => value == collection.slug(),
        (RetentionMode::RemoveFilename, Some(value)) => collection
            .variant_names()
            .any(|name| collection.variant_slug(name) == value),
        (RetentionMode::Full, Some(value)) => {
            segment_count(value) >= 2 && resolve(value, collection, collection.first_variant()).is_some()
        }
        _ => false,
    }
}

proptest! {
    #[test]
    fn engine_settles_without_redundant_writes(
        mode in mode_strategy(),
        initial in prop::option::of(prop::sample::select(VALUES)),
        auto_switch in any::<bool>(),
        events in prop::collection::vec(event_strategy(), 0..12),
    ) {
        let collection = demo_collection();
        let mut host = Host::mount(mode, initial, auto_switch);
        prop_assert!(host.settle());

        for event in &events {
            host.apply(event);
            prop_assert!(host.settle(), "did not settle after {:?}", event);

            // Selection always names a real file
            let variant = collection.variant(host.engine.selected_variant());
            prop_assert!(variant.is_some_and(|variant| variant.contains_file(host.engine.selected_file())));
        }

        prop_assert_eq!(host.redundant_writes.get(), 0);
        for write in host.channel.writes() {
            prop_assert!(
                write_fits_mode(mode, write.as_deref(), &collection),
                "{} wrote {:?}",
                mode,
                write
            );
        }
    }

    #[test]
    fn non_user_events_never_create_a_value(
        mode in mode_strategy(),
        auto_switch in any::<bool>(),
        activations in prop::collection::vec(prop::sample::select(VARIANTS), 0..6),
    ) {
        let mut host = Host::mount(mode, None, auto_switch);
        host.settle();

        for variant in &activations {
            host.apply(&Event::Activate(*variant));
            host.settle();
            host.apply(&Event::Navigate(None));
            host.settle();
        }

        prop_assert_eq!(host.channel.write_count(), 0);
        prop_assert_eq!(host.channel.get(), None);
    }
}
