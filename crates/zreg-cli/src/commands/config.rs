use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use zreg_core::pipeline::config::PipelineConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Directory to put in the template
    #[arg(long, default_value = "/path/to/stacks")]
    pub dir: PathBuf,

    /// File stem to put in the template
    #[arg(long, default_value = "stack_stem")]
    pub stem: String,

    /// Number of channels to put in the template
    #[arg(long, default_value = "1")]
    pub channels: usize,

    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Emit a complete PipelineConfig with every default filled in, as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let template = PipelineConfig {
        channels: args.channels,
        ..PipelineConfig::new(&args.dir, args.stem.as_str())
    };
    let rendered = toml::to_string_pretty(&template).context("Failed to render config")?;

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Config template saved to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
