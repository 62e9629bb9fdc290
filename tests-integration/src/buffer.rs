//! Scratch buffers for "Open in Editor"

use nvim_oxi::api::{self, opts::OptionOpts, Buffer};
use prompt_deck_core::{
    nvim::buffer::{open_record, TITLE_VAR},
    store::PromptRecord,
};

#[nvim_oxi::test]
fn test_open_record_shows_content() {
    let record = PromptRecord::new("Review Diff", "Review this diff.\n\nList risky changes.");

    let handle = open_record(&record).unwrap();
    let buf = api::get_current_buf();
    assert_eq!(buf.handle(), handle);

    let lines: Vec<String> = buf
        .get_lines(.., false)
        .unwrap()
        .map(|line| line.to_string_lossy().into_owned())
        .collect();
    assert_eq!(lines, vec!["Review this diff.", "", "List risky changes."]);

    let title: String = buf.get_var(TITLE_VAR).unwrap();
    assert_eq!(title, "Review Diff");
}

#[nvim_oxi::test]
fn test_open_record_is_markdown_scratch() {
    let record = PromptRecord::new("Title", "Body text here.");
    let handle = open_record(&record).unwrap();

    let buf = Buffer::from(handle);
    let opts = OptionOpts::builder().buffer(buf).build();
    let filetype: String = api::get_option_value("filetype", &opts).unwrap();
    let buftype: String = api::get_option_value("buftype", &opts).unwrap();
    assert_eq!(filetype, "markdown");
    assert_eq!(buftype, "nofile");
}
