use crate::cmd::{load_config, print_record, runtime, DrawArgs};
use crate::output::print_json;
use remix_core::credentials::{CompletionCredentials, StoreCredentials};
use remix_core::pipeline::Remixer;
use remix_core::script::ScriptOutcome;
use std::path::Path;

pub fn run(root: &Path, args: DrawArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let request = args.request(&config)?;
    let store = StoreCredentials::from_env()?;
    let completion = CompletionCredentials::from_env()?;
    let remixer = Remixer::from_config(&config, store, completion)?;

    let mut rng = args.rng();
    let remix = runtime()?.block_on(remixer.remix(&request, &mut rng))?;

    if json {
        print_json(&remix)?;
    } else {
        print_record(&remix.record);
        println!();
        if let ScriptOutcome::Written { text } = &remix.script {
            println!("{text}");
        }
    }

    match remix.script {
        ScriptOutcome::Written { .. } => Ok(()),
        ScriptOutcome::Failed { message } => {
            anyhow::bail!("script generation failed (retry to draw again): {message}")
        }
    }
}
