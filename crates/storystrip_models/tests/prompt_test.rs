//! Tests for the script prompts.

use storystrip_core::{PanelScript, ScriptRequest, ScriptScope};
use storystrip_models::{script_system_prompt, script_user_prompt};

const SUMMARY: &str = "A small coastal town loses its fishing fleet to a storm.";

fn request(scope: ScriptScope, context: Vec<PanelScript>) -> ScriptRequest {
    ScriptRequest::builder()
        .summary(SUMMARY)
        .style_modifier("noir")
        .context(context)
        .scope(scope)
        .build()
        .unwrap()
}

#[test]
fn test_system_prompt_names_style() {
    let prompt = script_system_prompt(&request(ScriptScope::FullStrip, Vec::new()));
    assert!(prompt.contains("noir-style comic strip"));
    assert!(prompt.contains("Do not add commentary or analysis"));
}

#[test]
fn test_full_strip_prompt_lists_four_format_lines() {
    let prompt = script_system_prompt(&request(ScriptScope::FullStrip, Vec::new()));
    for n in 1..=4 {
        assert!(prompt.contains(&format!("{n}. Panel {n}: [Visual description] (Caption: \"...\")")));
    }
    assert!(!prompt.contains("5. Panel 5"));
}

#[test]
fn test_next_panel_prompt_asks_for_one_numbered_panel() {
    let context = vec![
        PanelScript::new("Boats sink", "The storm came."),
        PanelScript::new("Town gathers", "We rebuild."),
    ];
    let prompt = script_system_prompt(&request(ScriptScope::NextPanel, context));
    assert!(prompt.contains("Write only panel 3 of 4"));
    assert!(prompt.contains("3. Panel 3: [Visual description]"));
    assert!(!prompt.contains("1. Panel 1: [Visual description]"));
}

#[test]
fn test_user_prompt_without_context_is_summary() {
    let prompt = script_user_prompt(&request(ScriptScope::NextPanel, Vec::new()));
    assert_eq!(prompt, SUMMARY);
}

#[test]
fn test_user_prompt_lists_accepted_panels_in_order() {
    let context = vec![
        PanelScript::new("Boats sink", "The storm came."),
        PanelScript::new("Town gathers", ""),
    ];
    let prompt = script_user_prompt(&request(ScriptScope::NextPanel, context));

    assert!(prompt.starts_with(SUMMARY));
    let first = prompt
        .find("1. Panel 1: Boats sink (Caption: \"The storm came.\")")
        .unwrap();
    let second = prompt.find("2. Panel 2: Town gathers\n").unwrap();
    assert!(first < second);
}
