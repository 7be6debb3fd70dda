use crate::session::*;

#[test]
fn test_input_exit_case_insensitive() {
    assert_eq!(Input::parse("exit"), Input::Exit);
    assert_eq!(Input::parse("EXIT"), Input::Exit);
    assert_eq!(Input::parse("  Exit \n"), Input::Exit);
}

#[test]
fn test_input_empty() {
    assert_eq!(Input::parse(""), Input::Empty);
    assert_eq!(Input::parse("   \t"), Input::Empty);
}

#[test]
fn test_input_query_trimmed() {
    assert_eq!(Input::parse("  who is rank 1? "), Input::Query("who is rank 1?".into()));
    // Only the bare token ends the session.
    assert_eq!(Input::parse("exit now"), Input::Query("exit now".into()));
}

#[test]
fn test_report_render() {
    assert_eq!(Report::Answer("A".into()).render(), "\nAI Response:\nA\n");
    assert_eq!(Report::Error("An error occurred: boom".into()).render(), "An error occurred: boom\n");
}

#[test]
fn test_phase_display() {
    assert_eq!(SessionPhase::AwaitingInput.to_string(), "awaiting_input");
    assert_eq!(SessionPhase::Terminated.to_string(), "terminated");
}
