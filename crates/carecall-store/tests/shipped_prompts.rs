use carecall_store::PromptLoader;
use carecall_types::PersonaKind;
use std::path::PathBuf;

fn prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../prompts")
}

#[test]
fn every_persona_has_shipped_instructions() {
    let loader = PromptLoader::new(prompts_dir());
    for persona in PersonaKind::ALL {
        let instructions = loader
            .load(persona.prompt_file())
            .unwrap_or_else(|e| panic!("prompt for {persona} should load: {e}"));
        assert!(
            !instructions.trim().is_empty(),
            "prompt for {persona} should not be empty"
        );
    }
}

#[test]
fn intake_prompt_mentions_identity_tool() {
    let loader = PromptLoader::new(prompts_dir());
    let instructions = loader.load(PersonaKind::Intake.prompt_file()).unwrap();
    assert!(instructions.contains("verify_identity"));
}

#[test]
fn check_in_prompt_mentions_all_tools() {
    let loader = PromptLoader::new(prompts_dir());
    let instructions = loader.load(PersonaKind::CheckIn.prompt_file()).unwrap();
    for tool in ["register_request", "transfer_call_to_human", "end_call"] {
        assert!(instructions.contains(tool), "missing {tool}");
    }
}
