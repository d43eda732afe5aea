pub mod actions;
pub mod config;
pub mod generate;
pub mod prompt;
pub mod ui;

use anyhow::Context;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use remix_core::config::Config;
use remix_core::pipeline::RemixRequest;
use remix_core::prompt::Style;
use remix_core::record::ActionRecord;
use remix_core::selector::DifficultyFilter;
use std::path::Path;

/// Inputs shared by `generate` and `prompt`.
#[derive(Args, Debug)]
pub struct DrawArgs {
    /// Topic or mood to remix (default: prompt.default_topic from config)
    #[arg(long, short = 't')]
    pub topic: Option<String>,

    /// Style id or label: surprise_me, absurd, bleak, violent, romantic
    #[arg(long, short = 's')]
    pub style: Option<String>,

    /// Difficulty tier to draw from, e.g. "Low" ("All" for every row)
    #[arg(long, short = 'd')]
    pub difficulty: Option<String>,

    /// Seed for the draw; the same seed and table give the same record
    #[arg(long)]
    pub seed: Option<u64>,
}

impl DrawArgs {
    pub fn request(&self, config: &Config) -> anyhow::Result<RemixRequest> {
        let style = match self.style.as_deref() {
            Some(s) => s.parse::<Style>()?,
            None => Style::default(),
        };
        let topic = self
            .topic
            .clone()
            .unwrap_or_else(|| config.prompt.default_topic.clone());
        let difficulty = self
            .difficulty
            .as_deref()
            .map(DifficultyFilter::parse)
            .unwrap_or_default();
        Ok(RemixRequest::new(topic)
            .with_style(style)
            .with_difficulty(difficulty))
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load config")
}

pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}

pub fn print_record(record: &ActionRecord) {
    println!("Action:     {}", record.name);
    println!("Difficulty: {}", record.difficulty);
    println!("Visual:     {}", record.visual_description);
    println!("Props:      {}", record.props);
    println!("Origin:     {}", record.origin_url);
}
