use crate::cmd::{load_config, print_record, runtime, DrawArgs};
use crate::output::print_json;
use remix_core::credentials::StoreCredentials;
use remix_core::pipeline::Remixer;
use std::path::Path;

/// Dry run: draw and compose, but never call the completion endpoint.
pub fn run(root: &Path, args: DrawArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let request = args.request(&config)?;
    let remixer = Remixer::without_completion(&config, StoreCredentials::from_env()?)?;

    let mut rng = args.rng();
    let preview = runtime()?.block_on(remixer.preview(&request, &mut rng))?;

    if json {
        print_json(&preview)?;
    } else {
        print_record(&preview.record);
        println!();
        println!("{}", preview.prompt);
    }
    Ok(())
}
