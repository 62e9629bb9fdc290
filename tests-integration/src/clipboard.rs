//! Register-backed clipboard

use nvim_oxi::api;
use prompt_deck_core::{nvim::RegisterClipboard, picker::Clipboard};

#[nvim_oxi::test]
fn test_write_text_sets_register() {
    let mut clipboard = RegisterClipboard::new("a");
    clipboard.write_text("first line\nsecond line").unwrap();

    let contents: String = api::call_function("getreg", ("a",)).unwrap();
    assert_eq!(contents, "first line\nsecond line");
}

#[nvim_oxi::test]
fn test_later_writes_replace_earlier() {
    let mut clipboard = RegisterClipboard::new("b");
    clipboard.write_text("old").unwrap();
    clipboard.write_text("new").unwrap();

    let contents: String = api::call_function("getreg", ("b",)).unwrap();
    assert_eq!(contents, "new");
}
