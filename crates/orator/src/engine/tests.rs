//! Tests for the narration engine.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use orator_core::{
        change_event_channel, ChangeEvent, CollectingSpeech, OratorError, SpeechBackend,
        StatementKind, StubHost, WidgetValue,
    };

    use crate::engine::{Narrator, PassState, TreeLoader};
    use crate::topic::Topic;
    use crate::tree::{
        CollectionLayouts, ControlDescriptor, ControlKind, ItemLayout, Units, WindowDescriptor,
    };
    use crate::window::Window;

    /// A loader serving canned window descriptors.
    struct StaticLoader {
        windows: HashMap<i32, WindowDescriptor>,
    }

    impl StaticLoader {
        fn new(descriptors: impl IntoIterator<Item = WindowDescriptor>) -> Self {
            Self {
                windows: descriptors
                    .into_iter()
                    .map(|d| (d.window_id(), d))
                    .collect(),
            }
        }
    }

    impl TreeLoader for StaticLoader {
        fn build(&self, window_id: i32) -> orator_core::Result<Window> {
            let descriptor = self
                .windows
                .get(&window_id)
                .cloned()
                .ok_or_else(|| OratorError::Loader(format!("unknown window {window_id}")))?;
            Window::build(descriptor).map_err(|e| OratorError::Loader(e.to_string()))
        }
    }

    /// Route engine logs through the test harness; filter with
    /// `RUST_LOG=orator::engine=trace` when a scenario misbehaves.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn narrator_for(
        descriptors: impl IntoIterator<Item = WindowDescriptor>,
    ) -> (Narrator, Arc<CollectingSpeech>) {
        init_tracing();
        let speech = Arc::new(CollectingSpeech::new());
        let loader = StaticLoader::new(descriptors);
        let narrator = Narrator::new(Box::new(loader), speech.clone() as Arc<dyn SpeechBackend>);
        (narrator, speech)
    }

    fn attached_narrator(descriptor: WindowDescriptor) -> (Narrator, Arc<CollectingSpeech>) {
        let (mut narrator, speech) = narrator_for([descriptor.clone()]);
        narrator.attach_window(Window::build(descriptor).unwrap());
        speech.clear();
        (narrator, speech)
    }

    /// Window 10: a group chaining its second button after whatever is
    /// focused inside it.
    fn settings_window() -> WindowDescriptor {
        WindowDescriptor::new(10).with_root(
            ControlDescriptor::new(ControlKind::Window).with_child(
                ControlDescriptor::new(ControlKind::Group)
                    .with_topic(Topic::new().with_read_next("b2"))
                    .with_child(
                        ControlDescriptor::new(ControlKind::Button)
                            .with_control_id(1)
                            .with_topic(Topic::new().with_alt_label(100)),
                    )
                    .with_child(
                        ControlDescriptor::new(ControlKind::Button)
                            .with_control_id(2)
                            .with_topic(Topic::new().with_name("b2")),
                    ),
            ),
        )
    }

    fn settings_host() -> StubHost {
        let host = StubHost::new();
        host.set_message(100, "Settings");
        host.set_label(2, "Apply");
        host
    }

    #[test]
    fn test_focus_event_is_idempotent() {
        let (mut narrator, _) = attached_narrator(settings_window());
        let host = settings_host();

        let first = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 1 })
            .unwrap();
        assert!(!first.is_empty());

        let second = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 1 })
            .unwrap();
        assert!(second.is_empty());
        assert_eq!(narrator.state(), PassState::Idle);
    }

    #[test]
    fn test_read_next_chain_order() {
        let (mut narrator, _) = attached_narrator(settings_window());
        let host = settings_host();

        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 1 })
            .unwrap();
        let texts: Vec<_> = batch.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Settings", "Apply"]);
        assert!(batch.iter().all(|u| u.kind == StatementKind::Heading));
    }

    #[test]
    fn test_read_next_skips_the_focused_control() {
        // Focusing B2 must not voice "Apply" twice: the group's chain
        // targets the already-visited focus node.
        let (mut narrator, _) = attached_narrator(settings_window());
        let host = settings_host();

        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 2 })
            .unwrap();
        let texts: Vec<_> = batch.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Apply"]);
    }

    #[test]
    fn test_read_next_cycle_terminates() {
        let descriptor = WindowDescriptor::new(11).with_root(
            ControlDescriptor::new(ControlKind::Window)
                .with_child(
                    ControlDescriptor::new(ControlKind::Button)
                        .with_control_id(1)
                        .with_topic(Topic::new().with_name("a").with_read_next("b")),
                )
                .with_child(
                    ControlDescriptor::new(ControlKind::Button)
                        .with_control_id(2)
                        .with_topic(Topic::new().with_name("b").with_read_next("a")),
                ),
        );
        let host = StubHost::new();
        host.set_label(1, "Alpha");
        host.set_label(2, "Beta");

        let (mut narrator, _) = attached_narrator(descriptor);
        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 1 })
            .unwrap();
        let texts: Vec<_> = batch.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_labeled_by_cycle_terminates() {
        let descriptor = WindowDescriptor::new(12).with_root(
            ControlDescriptor::new(ControlKind::Window)
                .with_child(
                    ControlDescriptor::new(ControlKind::Edit)
                        .with_control_id(1)
                        .with_topic(Topic::new().with_name("a").with_labeled_by("b")),
                )
                .with_child(
                    ControlDescriptor::new(ControlKind::Edit)
                        .with_control_id(2)
                        .with_topic(Topic::new().with_name("b").with_labeled_by("a")),
                ),
        );
        let host = StubHost::new();
        host.set_label(2, "Search");

        let (mut narrator, _) = attached_narrator(descriptor);
        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 1 })
            .unwrap();
        // labeled_by borrows the referenced topic's raw label only; the
        // back-reference never re-enters the chain.
        let texts: Vec<_> = batch.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Search"]);
    }

    #[test]
    fn test_heading_precedes_value() {
        let descriptor = WindowDescriptor::new(13).with_root(
            ControlDescriptor::new(ControlKind::Window).with_child(
                ControlDescriptor::new(ControlKind::Spin)
                    .with_control_id(5)
                    .with_topic(Topic::new().with_alt_label(200)),
            ),
        );
        let host = StubHost::new();
        host.set_message(200, "Subtitle delay");
        host.set_value(5, WidgetValue::Text("0.5 seconds".into()));

        let (mut narrator, _) = attached_narrator(descriptor);
        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 5 })
            .unwrap();
        let kinds: Vec<_> = batch.iter().map(|u| u.kind).collect();
        assert_eq!(kinds, vec![StatementKind::Heading, StatementKind::Value]);
        assert!(batch[0].interrupt);
        assert!(!batch[1].interrupt);
    }

    #[test]
    fn test_flows_to_delegates_value() {
        let descriptor = WindowDescriptor::new(14).with_root(
            ControlDescriptor::new(ControlKind::Window)
                .with_child(
                    ControlDescriptor::new(ControlKind::Slider { units: None })
                        .with_control_id(30)
                        .with_topic(Topic::new().with_flows_to("display")),
                )
                .with_child(
                    ControlDescriptor::new(ControlKind::Edit)
                        .with_control_id(31)
                        .with_topic(Topic::new().with_name("display")),
                ),
        );
        let host = StubHost::new();
        host.set_value(30, WidgetValue::Number(50.0));
        host.set_value(31, WidgetValue::Text("42%".into()));

        let (mut narrator, _) = attached_narrator(descriptor);
        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 30 })
            .unwrap();
        let texts: Vec<_> = batch.iter().map(|u| u.text.as_str()).collect();
        // Exactly the target's value; the local number stays silent.
        assert_eq!(texts, vec!["42%"]);
    }

    fn volume_window() -> WindowDescriptor {
        WindowDescriptor::new(15).with_root(
            ControlDescriptor::new(ControlKind::Window)
                .with_child(
                    ControlDescriptor::new(ControlKind::Slider {
                        units: Some(Units::new().with_suffix("%")),
                    })
                    .with_control_id(40)
                    .with_topic(Topic::new().with_alt_label(300)),
                )
                .with_child(ControlDescriptor::new(ControlKind::Button).with_control_id(41)),
        )
    }

    #[test]
    fn test_tick_never_revoices_heading() {
        let (mut narrator, _) = attached_narrator(volume_window());
        let host = StubHost::new();
        host.set_message(300, "Volume");
        host.set_value(40, WidgetValue::Number(10.0));

        let focus = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 40 })
            .unwrap();
        let texts: Vec<_> = focus.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Volume", "10%"]);
        assert!(narrator.session().fast_poll());

        host.set_value(40, WidgetValue::Number(20.0));
        let tick = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        let texts: Vec<_> = tick.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["20%"]);
        assert!(tick.iter().all(|u| u.kind == StatementKind::Value));

        // Unchanged value: the tick narrates nothing.
        let quiet = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_first_tick_value_interrupts_once() {
        let (mut narrator, _) = attached_narrator(volume_window());
        let host = StubHost::new();
        host.set_message(300, "Volume");

        // No value at focus time, so the first voiced value arrives on
        // a later tick and still interrupts.
        narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 40 })
            .unwrap();

        host.set_value(40, WidgetValue::Number(10.0));
        let first = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].interrupt);

        host.set_value(40, WidgetValue::Number(20.0));
        let second = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        assert_eq!(second.len(), 1);
        assert!(!second[0].interrupt);
    }

    #[test]
    fn test_fast_poll_resets_on_focus_change() {
        let (mut narrator, _) = attached_narrator(volume_window());
        let host = StubHost::new();
        host.set_message(300, "Volume");
        host.set_value(40, WidgetValue::Number(10.0));
        host.set_label(41, "Mute");

        narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 40 })
            .unwrap();
        assert!(narrator.session().fast_poll());

        narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 41 })
            .unwrap();
        assert!(!narrator.session().fast_poll());

        host.set_value(40, WidgetValue::Number(90.0));
        let tick = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        assert!(tick.is_empty());
    }

    #[test]
    fn test_invisible_target_contributes_nothing() {
        let descriptor = WindowDescriptor::new(16).with_root(
            ControlDescriptor::new(ControlKind::Window).with_child(
                ControlDescriptor::new(ControlKind::Button)
                    .with_control_id(7)
                    .with_visible_expr("Window.IsActive(osd)")
                    .with_topic(Topic::new().with_alt_label(400)),
            ),
        );
        let host = StubHost::new();
        host.set_message(400, "Bookmarks");

        let (mut narrator, speech) = attached_narrator(descriptor);
        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 7 })
            .unwrap();
        assert!(batch.is_empty());
        assert!(speech.batches().is_empty());
    }

    #[test]
    fn test_hint_trails_and_follows_heading_dedup() {
        let descriptor = WindowDescriptor::new(17).with_root(
            ControlDescriptor::new(ControlKind::Window).with_child(
                ControlDescriptor::new(ControlKind::Spin)
                    .with_control_id(8)
                    .with_topic(
                        Topic::new()
                            .with_alt_label(500)
                            .with_hint("Use left and right to change"),
                    ),
            ),
        );
        let host = StubHost::new();
        host.set_message(500, "Audio stream");
        host.set_value(8, WidgetValue::Text("Track 1".into()));

        let (mut narrator, _) = attached_narrator(descriptor);
        let batch = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 8 })
            .unwrap();
        let kinds: Vec<_> = batch.iter().map(|u| u.kind).collect();
        assert_eq!(
            kinds,
            vec![StatementKind::Heading, StatementKind::Value, StatementKind::Hint]
        );

        // Re-focusing with an unchanged heading suppresses its hint too.
        let repeat = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 8 })
            .unwrap();
        assert!(repeat.is_empty());
    }

    #[test]
    fn test_collection_tick_uses_first_holding_layout() {
        let layouts = CollectionLayouts {
            item_layouts: vec![ItemLayout::new().with_label("ListItem.Label")],
            focused_layouts: vec![
                ItemLayout::new()
                    .with_condition("ListItem.IsFolder")
                    .with_label("ListItem.FolderName"),
            ],
        };
        let descriptor = WindowDescriptor::new(18).with_root(
            ControlDescriptor::new(ControlKind::Window)
                .with_child(ControlDescriptor::new(ControlKind::List(layouts)).with_control_id(60)),
        );
        let host = StubHost::new();
        host.set_value(
            60,
            WidgetValue::Selected {
                index: 0,
                count: 5,
                text: "Track 1".into(),
            },
        );
        host.set_text("ListItem.Label", "Track 1");

        let (mut narrator, _) = attached_narrator(descriptor);
        let focus = narrator
            .handle_event(&host, ChangeEvent::FocusChanged { control_id: 60 })
            .unwrap();
        let texts: Vec<_> = focus.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Track 1", "1 of 5"]);

        // The selection moves; the tick narrates through the layouts.
        host.set_text("ListItem.Label", "Track 2");
        let tick = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        let texts: Vec<_> = tick.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Track 2"]);

        // A folder row switches to the conditional focused layout.
        host.set_visible("ListItem.IsFolder", true);
        host.set_text("ListItem.FolderName", "Albums");
        let tick = narrator.handle_event(&host, ChangeEvent::Tick).unwrap();
        let texts: Vec<_> = tick.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Albums"]);
    }

    #[test]
    fn test_events_without_a_window_are_errors() {
        let (mut narrator, _) = narrator_for(Vec::new());
        let host = StubHost::new();
        assert_eq!(
            narrator.handle_event(&host, ChangeEvent::FocusChanged { control_id: 1 }),
            Err(OratorError::NoWindow)
        );
        assert_eq!(
            narrator.handle_event(&host, ChangeEvent::Tick),
            Err(OratorError::NoWindow)
        );
    }

    #[test]
    fn test_window_change_loads_and_voices_new_window() {
        let second = WindowDescriptor::new(20).with_root(
            ControlDescriptor::new(ControlKind::Window).with_topic(Topic::new().with_alt_label(600)),
        );
        let host = settings_host();
        host.set_message(600, "Music");

        let (mut narrator, _) = narrator_for([settings_window(), second]);
        let batch = narrator
            .handle_event(&host, ChangeEvent::WindowChanged { window_id: 20 })
            .unwrap();
        let texts: Vec<_> = batch.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Music"]);
        assert_eq!(narrator.window().unwrap().window_id(), 20);

        // An unknown window id keeps the current window attached.
        let err = narrator
            .handle_event(&host, ChangeEvent::WindowChanged { window_id: 99 })
            .unwrap_err();
        assert!(matches!(err, OratorError::Loader(_)));
        assert_eq!(narrator.window().unwrap().window_id(), 20);
    }

    #[test]
    fn test_pending_window_change_abandons_in_flight_pass() {
        let second = WindowDescriptor::new(20).with_root(
            ControlDescriptor::new(ControlKind::Window).with_topic(Topic::new().with_alt_label(600)),
        );
        let host = settings_host();
        host.set_message(600, "Music");

        let (mut narrator, speech) = narrator_for([settings_window(), second]);
        let (tx, rx) = change_event_channel(8);
        tx.send(ChangeEvent::WindowChanged { window_id: 10 }).unwrap();
        tx.send(ChangeEvent::FocusChanged { control_id: 1 }).unwrap();
        tx.send(ChangeEvent::WindowChanged { window_id: 20 }).unwrap();
        drop(tx);

        let err = narrator.run(&host, &rx).unwrap_err();
        assert_eq!(err, OratorError::EventQueueClosed);

        // The focus pass for window 10 was resolved but preempted by
        // the pending window change; only window 20 was spoken.
        let spoken = speech.spoken_texts();
        assert_eq!(spoken, vec!["Music"]);
        assert_eq!(narrator.window().unwrap().window_id(), 20);
        assert_eq!(narrator.state(), PassState::Idle);
    }
}
