use botdesk::commands::{self, extract_all_commands, resolve_activation, Activation};
use serde_json::json;

const BOT_COMMANDS: &str = include_str!("fixtures/commands.js");

#[test]
fn test_bot_commands_file_end_to_end() {
    let commands = extract_all_commands(BOT_COMMANDS);
    let output = serde_json::to_value(&commands).unwrap();

    assert_eq!(
        output,
        json!([
            { "name": "test", "description": "Basic command", "active": true, "options": [] },
            {
                "name": "challenge",
                "description": "Challenge to a match of rock paper scissors",
                "active": false,
                "options": [
                    { "name": "object", "description": "Pick your object", "type": 3, "required": true }
                ]
            },
            {
                "name": "explain",
                "description": "Explains concepts",
                "active": true,
                "options": [
                    { "name": "topic", "description": "The topic you want explained", "type": 3, "required": true }
                ]
            },
            { "name": "chucknorris", "description": "Get a random Chuck Norris joke", "active": true, "options": [] }
        ])
    );
}

#[test]
fn test_single_command_scenario() {
    let text = r#"
const TEST_COMMAND = {
  name: "test",
  description: "Basic command",
};

const ALL_COMMANDS = [
  TEST_COMMAND,
];
"#;
    let output = serde_json::to_value(extract_all_commands(text)).unwrap();
    assert_eq!(
        output,
        json!([{ "name": "test", "description": "Basic command", "active": true, "options": [] }])
    );
}

#[test]
fn test_inline_active_set_and_comment_exclusion() {
    let decls = r#"
const FOO_COMMAND = {
  name: "foo",
  description: "Foo",
};
const BAR_COMMAND = {
  name: "bar",
  description: "Bar",
};
"#;
    let both = format!("{}const ALL_COMMANDS = [FOO_COMMAND, BAR_COMMAND];\n", decls);
    let active: Vec<_> = extract_all_commands(&both).iter().map(|c| c.active).collect();
    assert_eq!(active, [true, true]);

    let bar_disabled = format!("{}const ALL_COMMANDS = [\n  FOO_COMMAND,\n  // BAR_COMMAND\n];\n", decls);
    let active: Vec<_> = extract_all_commands(&bar_disabled).iter().map(|c| c.active).collect();
    assert_eq!(active, [true, false]);
    assert_eq!(resolve_activation(&bar_disabled, "BAR_COMMAND"), Activation::Excluded);

    let active: Vec<_> = extract_all_commands(decls).iter().map(|c| c.active).collect();
    assert_eq!(active, [false, false]);
}

#[test]
fn test_malformed_blocks_do_not_stop_extraction() {
    let text = r#"
const NAMELESS_COMMAND = {
  description: "No name here",
};
const GOOD_COMMAND = {
  name: "good",
  description: "Still extracted",
  options: [
    {
      name: "half",
    },
    {
      name: "whole",
      description: "Defaults apply",
    }
  ],
};
const RUNAWAY_COMMAND = {
  name: "runaway",
  description: "Never closed",
  options: [
    {
"#;
    let commands = extract_all_commands(text);
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name, "good");
    assert_eq!(commands[0].options.len(), 1);
    assert_eq!(commands[0].options[0].name, "whole");
    assert_eq!(commands[0].options[0].kind, 3);
    assert!(!commands[0].options[0].required);
}

#[test]
fn test_load_commands_reads_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("commands.js");
    std::fs::write(&path, BOT_COMMANDS)?;

    let from_disk = commands::load_commands(&path)?;
    assert_eq!(from_disk, extract_all_commands(BOT_COMMANDS));
    Ok(())
}

#[test]
fn test_es_module_file_with_apostrophes() {
    let text = r#"
export const STATUS_COMMAND = {
  name: "status",
  description: "Show the bot's status",
  options: [
    {
      name: 'verbose',
      description: 'Include "debug" details',
      type: 5,
    }
  ],
};

export const ALL_COMMANDS = [
  STATUS_COMMAND,
];
"#;
    let output = serde_json::to_value(extract_all_commands(text)).unwrap();
    assert_eq!(
        output,
        json!([{
            "name": "status",
            "description": "Show the bot's status",
            "active": true,
            "options": [
                { "name": "verbose", "description": "Include \"debug\" details", "type": 5, "required": false }
            ]
        }])
    );
}
