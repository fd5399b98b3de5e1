use std::io::Write;
use std::sync::{Arc, Mutex};

use carecall_agent::SpeechSession;
use carecall_types::{PersonaKind, PreviousHistory};
use carecall_worker::config::Config;
use carecall_worker::console::{drive, ConsoleSpeech};
use tempfile::TempDir;
use tokio::io::BufReader;

#[derive(Clone, Default)]
struct Transcript(Arc<Mutex<Vec<u8>>>);

impl Transcript {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Transcript {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.path().join("data");
    config.storage.prompts_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../prompts").into();
    config
}

fn console() -> (Transcript, Arc<dyn SpeechSession>) {
    let transcript = Transcript::default();
    let speech: Arc<dyn SpeechSession> = Arc::new(ConsoleSpeech::new(transcript.clone()));
    (transcript, speech)
}

#[tokio::test]
async fn scripted_call_logs_request_and_saves_history() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let (transcript, speech) = console();
    let mut session = carecall_worker::open_session(&config, speech, None);

    let script = "\
My name is Ben
/verify_identity Ben
/agent How are you feeling today?
The hot water is broken

/register_request no hot water
/end_call
this line is never read
";
    drive(&mut session, BufReader::new(script.as_bytes()))
        .await
        .unwrap();

    assert!(session.is_ended());
    assert_eq!(session.active(), PersonaKind::CheckIn);

    let mut rows = Vec::new();
    let count = carecall_worker::list_requests(&config, &mut rows).unwrap();
    assert_eq!(count, 1);
    assert!(String::from_utf8(rows).unwrap().ends_with("\tno hot water\n"));

    let PreviousHistory::Record(record) = carecall_worker::stores(&config).history.load_previous()
    else {
        panic!("history not saved");
    };
    let contents: Vec<&str> = record
        .last_messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert!(contents.contains(&"The hot water is broken"));
    assert!(!contents.contains(&"this line is never read"));

    let text = transcript.text();
    assert!(text.contains("agent: Confirmed. We'd like to ask you about your health."));
    assert!(text.contains("agent: End the call. Have a good day."));
    assert!(text.contains("[model turn; tools: verify_identity]"));
}

#[tokio::test]
async fn offline_transfer_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    config.telephony.outbound_trunk_id = Some("ST_outbound".to_string());
    let (transcript, speech) = console();
    let mut session = carecall_worker::open_session(&config, speech.clone(), None);

    let script = "/verify_identity Ben\n/transfer_call_to_human\n/quit\n";
    drive(&mut session, BufReader::new(script.as_bytes()))
        .await
        .unwrap();

    assert!(!session.is_ended());
    assert!(speech.audio_enabled());
    assert!(transcript
        .text()
        .contains("agent: I can't transfer the call right now."));
}

#[tokio::test]
async fn rejected_caller_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let (transcript, speech) = console();
    let mut session = carecall_worker::open_session(&config, speech, None);

    let script = "/verify_identity {\"name\": \"Bob\"}\n/verify_identity Ben\n";
    drive(&mut session, BufReader::new(script.as_bytes()))
        .await
        .unwrap();

    assert!(session.is_ended());
    assert_eq!(session.active(), PersonaKind::Intake);
    let text = transcript.text();
    assert!(text.contains("failed to verify your identity"));
    assert!(!text.contains("Confirmed."));
}

#[tokio::test]
async fn malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let (_transcript, speech) = console();
    let mut session = carecall_worker::open_session(&config, speech, None);

    let script = "/verify_identity {not json\n/end_call\n/verify_identity Ben\n";
    drive(&mut session, BufReader::new(script.as_bytes()))
        .await
        .unwrap();

    // `end_call` is not an intake tool, so only the last line counts.
    assert_eq!(session.active(), PersonaKind::CheckIn);
    assert!(!session.is_ended());
}

#[test]
fn room_mode_requires_livekit_url() {
    let config = Config::default();
    assert!(carecall_worker::connect_room(&config, "cli-call-+15550001111").is_err());
}
