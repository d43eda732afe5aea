use crate::cmd::{load_config, runtime};
use crate::output::{print_json, print_table};
use remix_core::credentials::StoreCredentials;
use remix_core::pipeline::Remixer;
use remix_core::selector::{self, DifficultyFilter};
use std::path::Path;

pub fn run(root: &Path, difficulty: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let remixer = Remixer::without_completion(&config, StoreCredentials::from_env()?)?;
    let table = runtime()?.block_on(remixer.table())?;

    let filter = difficulty.map(DifficultyFilter::parse).unwrap_or_default();
    let records = selector::filter_records(&table, &filter);

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        if table.is_empty() {
            println!("The action table is empty.");
        } else {
            println!("No actions with difficulty '{filter}'.");
        }
        return Ok(());
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                r.difficulty.clone(),
                r.props.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "ACTION", "DIFFICULTY", "PROPS"], rows);
    println!();
    println!(
        "{} of {} actions (tiers: {})",
        records.len(),
        table.len(),
        selector::tiers(&table).join(", ")
    );
    Ok(())
}
