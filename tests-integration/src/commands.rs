//! Integration tests for command dispatch and user commands

use nvim_oxi::api::{self, opts::GetCommandsOpts};
use prompt_deck_core as deck;
use serde_json::json;

#[nvim_oxi::test]
fn test_user_commands_registered() {
    deck::nvim::commands::register_user_commands().unwrap();

    let opts = GetCommandsOpts::builder().builtin(false).build();
    let names: Vec<String> = api::get_commands(&opts)
        .unwrap()
        .map(|info| info.name)
        .collect();

    for (name, _, _) in deck::nvim::commands::USER_COMMANDS {
        assert!(names.iter().any(|n| n == name), "missing :{name}");
    }
}

#[nvim_oxi::test]
fn test_registering_twice_is_harmless() {
    deck::nvim::commands::register_user_commands().unwrap();
    deck::nvim::commands::register_user_commands().unwrap();
}

#[nvim_oxi::test]
fn test_list_commands() {
    let commands = deck::commands::list_commands();

    assert!(commands.contains(&"picker.open".to_string()));
    assert!(commands.contains(&"form.submit".to_string()));
    assert!(commands.windows(2).all(|w| w[0] < w[1]));
}

#[nvim_oxi::test]
fn test_call_round_trips_through_objects() {
    let mut args = nvim_oxi::Dictionary::new();
    args.insert("message", "hello");

    let result = deck::ffi::call("ping".into(), nvim_oxi::Object::from(args)).unwrap();
    let value = deck::conversion::object_to_json(result).unwrap();

    assert_eq!(value, json!({"message": "hello", "pong": true}));
}
