use super::*;

#[test]
fn plain_text_is_sent_trimmed() {
    assert_eq!(
        parse_command("  What is 2+2?  "),
        PromptCommand::Send("What is 2+2?".to_string())
    );
    assert_eq!(parse_command("   "), PromptCommand::Empty);
}

#[test]
fn ratings_take_a_message_number() {
    assert_eq!(
        parse_command("/up 2"),
        PromptCommand::Rate {
            index: 2,
            positive: true
        }
    );
    assert_eq!(
        parse_command("/down 4"),
        PromptCommand::Rate {
            index: 4,
            positive: false
        }
    );
    assert!(matches!(parse_command("/up"), PromptCommand::Invalid(_)));
    assert!(matches!(parse_command("/down two"), PromptCommand::Invalid(_)));
    assert!(matches!(parse_command("/up 2 3"), PromptCommand::Invalid(_)));
}

#[test]
fn keyword_commands() {
    assert_eq!(parse_command("/export"), PromptCommand::Export);
    assert_eq!(parse_command("/history"), PromptCommand::History);
    assert_eq!(parse_command("/show"), PromptCommand::Show);
    assert_eq!(parse_command("/exit"), PromptCommand::Quit);
    assert!(matches!(parse_command("/export now"), PromptCommand::Invalid(_)));
    assert!(matches!(parse_command("/dance"), PromptCommand::Invalid(_)));
}
