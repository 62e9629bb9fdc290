#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use mockall::predicate::eq;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    use crate::{
        errors::DeckError,
        picker::*,
        recent::RecentLog,
        state::MemoryStore,
        store::RecordStore,
    };

    fn write_record(dir: &Path, stem: &str, title: &str, tags: &[&str]) {
        let tags = tags
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(", ");
        let text = format!(
            "[author]\nname = \"Ada\"\n\n[prompt]\ntitle = \"{title}\"\ntags = [{tags}]\ncontent = \"Body of {title}.\"\n"
        );
        fs::write(dir.join(format!("{stem}.toml")), text).unwrap();
    }

    struct Fixture {
        _dir:      TempDir,
        store:     RecordStore,
        recent:    RecentLog,
        clipboard: MockClipboard,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let store = RecordStore::new(dir.path());
            Self {
                _dir: dir,
                store,
                recent: RecentLog::new(Box::new(MemoryStore::new())),
                clipboard: MockClipboard::new(),
            }
        }

        fn dir(&self) -> &Path {
            self.store.dir()
        }

        fn ctx(&mut self) -> PickerContext<'_> {
            PickerContext {
                store:        &self.store,
                recent:       &mut self.recent,
                clipboard:    &mut self.clipboard,
                recent_shown: DEFAULT_RECENT_SHOWN,
            }
        }
    }

    fn labels(screen: &PickerScreen) -> Vec<String> {
        screen
            .items
            .iter()
            .map(|item| match item {
                PickerItem::Separator { label } => format!("-- {label}"),
                PickerItem::CreateNew { label, .. } => label.clone(),
                PickerItem::Recent { title, .. } => format!("recent:{title}"),
                PickerItem::Tag { tag, count, .. } => format!("tag:{tag}:{count}"),
                PickerItem::Prompt { title, .. } => format!("prompt:{title}"),
            })
            .collect()
    }

    fn shown(outcome: PickerOutcome) -> PickerScreen {
        match outcome {
            PickerOutcome::Show(screen) => screen,
            other => panic!("expected a screen, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_directory_offers_only_create_new() {
        let mut fx = Fixture::new();
        let mut picker = Picker::new();

        let screen = picker.open(&fx.ctx());

        assert_eq!(
            labels(&screen),
            vec!["-- Create Custom Prompt", "Create New Prompt"]
        );
        assert!(!screen.back);
        assert_eq!(picker.view(), &PickerView::Main);
    }

    #[test]
    fn test_main_view_lists_tags_by_count() {
        let mut fx = Fixture::new();
        write_record(fx.dir(), "a", "Alpha", &["rust", "cli"]);
        write_record(fx.dir(), "b", "Beta", &["Rust"]);

        let screen = Picker::new().open(&fx.ctx());

        assert_eq!(
            labels(&screen),
            vec![
                "-- Create Custom Prompt",
                "Create New Prompt",
                "-- By Tag",
                "tag:rust:2",
                "tag:cli:1",
            ]
        );
        match &screen.items[3] {
            PickerItem::Tag {
                label, description, ..
            } => {
                assert_eq!(label, "Rust");
                assert_eq!(description, "(2)");
            },
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_drill_down_and_back() {
        let mut fx = Fixture::new();
        write_record(fx.dir(), "a", "Alpha", &["code-review"]);
        write_record(fx.dir(), "b", "Beta", &["other"]);
        let mut picker = Picker::new();
        picker.open(&fx.ctx());

        let screen = shown(
            picker
                .handle(
                    PickerAction::ChooseTag {
                        tag: "Code-Review".into(),
                    },
                    &mut fx.ctx(),
                )
                .unwrap(),
        );
        assert_eq!(picker.view(), &PickerView::Category("code-review".into()));
        assert_eq!(screen.title, "Prompts • CodeReview");
        assert!(screen.back);
        assert_eq!(labels(&screen), vec!["prompt:Alpha"]);
        match &screen.items[0] {
            PickerItem::Prompt { detail, slug, .. } => {
                assert_eq!(detail, "Ada • 0.1.0 • CodeReview");
                assert_eq!(slug.as_deref(), Some("a"));
            },
            other => panic!("unexpected item {:?}", other),
        }

        let screen = shown(picker.handle(PickerAction::Back, &mut fx.ctx()).unwrap());
        assert_eq!(picker.view(), &PickerView::Main);
        assert_eq!(screen.title, "Select a Prompt");
    }

    #[test]
    fn test_choose_record_copies_and_records() {
        let mut fx = Fixture::new();
        write_record(fx.dir(), "a", "Alpha", &["x"]);
        fx.clipboard
            .expect_write_text()
            .with(eq("Body of Alpha."))
            .times(1)
            .returning(|_| Ok(()));
        let mut picker = Picker::new();

        let outcome = picker
            .handle(
                PickerAction::ChooseRecord {
                    title: "Alpha".into(),
                    slug:  None,
                },
                &mut fx.ctx(),
            )
            .unwrap();

        assert_eq!(
            outcome,
            PickerOutcome::Copied {
                title:   "Alpha".into(),
                slug:    Some("a".into()),
                content: "Body of Alpha.".into(),
            }
        );
        assert_eq!(picker.view(), &PickerView::Closed);

        let recent = fx.recent.list();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Alpha");
        assert_eq!(recent[0].slug.as_deref(), Some("a"));
    }

    #[test]
    fn test_actions_after_close_are_rejected_until_reopened() {
        let mut fx = Fixture::new();
        let mut picker = Picker::new();

        assert_eq!(
            picker.handle(PickerAction::CreateNew, &mut fx.ctx()).unwrap(),
            PickerOutcome::OpenForm
        );
        assert!(matches!(
            picker.handle(PickerAction::Back, &mut fx.ctx()),
            Err(DeckError::PickerClosed)
        ));

        picker.open(&fx.ctx());
        assert_eq!(picker.view(), &PickerView::Main);
    }

    #[test]
    fn test_unknown_record_is_not_found_and_keeps_state() {
        let mut fx = Fixture::new();
        fx.clipboard.expect_write_text().times(0);
        let mut picker = Picker::new();

        let result = picker.handle(
            PickerAction::ChooseRecord {
                title: "Ghost".into(),
                slug:  Some("ghost".into()),
            },
            &mut fx.ctx(),
        );

        assert!(matches!(result, Err(DeckError::NotFound(t)) if t == "Ghost"));
        assert_eq!(picker.view(), &PickerView::Main);
        assert!(fx.recent.list().is_empty());
    }

    #[test]
    fn test_clipboard_failure_does_not_record() {
        let mut fx = Fixture::new();
        write_record(fx.dir(), "a", "Alpha", &[]);
        fx.clipboard
            .expect_write_text()
            .returning(|_| Err(DeckError::NvimError("no clipboard provider".into())));
        let mut picker = Picker::new();

        let result = picker.handle(
            PickerAction::ChooseRecord {
                title: "Alpha".into(),
                slug:  None,
            },
            &mut fx.ctx(),
        );

        assert!(result.is_err());
        assert!(fx.recent.list().is_empty());
        assert_eq!(picker.view(), &PickerView::Main);
    }

    #[test]
    fn test_recent_section_drops_unresolvable_and_caps_at_five() {
        let mut fx = Fixture::new();
        for i in 0..7 {
            write_record(fx.dir(), &format!("r{i}"), &format!("Title {i}"), &[]);
            fx.recent.record_at(&format!("Title {i}"), None, i).unwrap();
        }
        // Most recent entry points at a record that no longer exists.
        fx.recent.record_at("Deleted", None, 100).unwrap();

        let screen = Picker::new().open(&fx.ctx());

        assert_eq!(
            labels(&screen),
            vec![
                "-- Create Custom Prompt",
                "Create New Prompt",
                "-- Recent",
                "recent:Title 6",
                "recent:Title 5",
                "recent:Title 4",
                "recent:Title 3",
            ]
        );
    }

    #[test]
    fn test_recent_entry_follows_slug_after_retitle() {
        let mut fx = Fixture::new();
        write_record(fx.dir(), "stable", "New Title", &[]);
        fx.recent.record_at("Old Title", Some("stable"), 1).unwrap();

        let screen = Picker::new().open(&fx.ctx());

        assert!(labels(&screen).contains(&"recent:New Title".to_string()));
    }

    #[test]
    fn test_copied_outcome_names_the_chosen_duplicate() {
        let mut fx = Fixture::new();
        write_record(fx.dir(), "first", "Twin", &[]);
        write_record(fx.dir(), "second", "Twin", &[]);
        fx.clipboard.expect_write_text().returning(|_| Ok(()));
        let mut picker = Picker::new();

        let outcome = picker
            .handle(
                PickerAction::ChooseRecord {
                    title: "Twin".into(),
                    slug:  Some("second".into()),
                },
                &mut fx.ctx(),
            )
            .unwrap();

        match outcome {
            PickerOutcome::Copied { slug, .. } => assert_eq!(slug.as_deref(), Some("second")),
            other => panic!("expected Copied, got {:?}", other),
        }
        assert_eq!(fx.recent.list()[0].slug.as_deref(), Some("second"));
    }

    #[test]
    fn test_action_wire_shape() {
        let action: PickerAction =
            serde_json::from_value(json!({"action": "choose_tag", "tag": "rust"})).unwrap();
        assert_eq!(action, PickerAction::ChooseTag { tag: "rust".into() });

        let action: PickerAction =
            serde_json::from_value(json!({"action": "choose_record", "title": "T"})).unwrap();
        assert_eq!(
            action,
            PickerAction::ChooseRecord {
                title: "T".into(),
                slug:  None,
            }
        );

        let value = serde_json::to_value(PickerOutcome::OpenForm).unwrap();
        assert_eq!(value, json!({"outcome": "open_form"}));
    }

    #[test]
    fn test_relative_time() {
        let now = 1_700_000_000_000;
        assert_eq!(relative_time(now - 60_000, now), "just now");
        assert_eq!(relative_time(now - 12 * 60_000, now), "12m");
        assert_eq!(relative_time(now - 5 * 3_600_000, now), "5h");
        assert_eq!(relative_time(now - 3 * 86_400_000, now), "3d");
        // 2023-11-14 minus ten days
        assert_eq!(relative_time(now - 10 * 86_400_000, now), "Nov 4");
        assert_eq!(relative_time(now + 1_000, now), "just now");
    }
}
