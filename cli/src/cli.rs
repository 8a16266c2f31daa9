use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};

use civit_fetch::{
    parse_manifest, FetchConfig, ModelRequest, DEFAULT_CHUNK_SIZE, DEFAULT_MODELS_ROOT,
};

use crate::error::Error;

/// How download progress is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgressMode {
    /// Progress bar on stderr
    Bar,
    /// One JSON event per line on stdout
    Json,
    /// No progress output
    #[value(name = "none")]
    Quiet,
}

#[derive(Debug, Parser)]
#[command(
    name = "civit-fetch",
    version,
    about = "Download a model file into its ComfyUI models folder, skipping files already present"
)]
pub struct Cli {
    /// Download link; the API token is appended as `token=`
    #[arg(requires_all = ["model_name", "model_type"], conflicts_with = "manifest")]
    pub link: Option<String>,

    /// File name to save the model as
    pub model_name: Option<String>,

    /// Category: checkpoints, controlnet, loras, upscale_models, unet or vae
    pub model_type: Option<String>,

    /// JSON array of {link, model_name, model_type} records or [link, model_name, model_type] triples
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// API token appended to every download link
    #[arg(long, env = "CIVIT_KEY", hide_env_values = true, default_value = "")]
    pub token: String,

    /// Directory holding the per-category model folders
    #[arg(long, env = "COMFYUI_MODELS_DIR", value_name = "DIR", default_value = DEFAULT_MODELS_ROOT)]
    pub models_dir: PathBuf,

    /// Bytes per streamed chunk
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Abort a download that takes longer than this
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = ProgressMode::Bar)]
    pub progress: ProgressMode,

    /// Print the model categories and their directories, then exit
    #[arg(long)]
    pub list_types: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_models_root(&self.models_dir)
            .with_token(self.token.clone())
            .with_chunk_size(self.chunk_size)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    /// Requests named on the command line or in the manifest.
    pub fn requests(&self) -> Result<Vec<ModelRequest>, Error> {
        if let Some(path) = &self.manifest {
            let json = std::fs::read_to_string(path).map_err(|source| Error::Manifest {
                path: path.clone(),
                source,
            })?;
            return Ok(parse_manifest(&json)?);
        }

        match (&self.link, &self.model_name, &self.model_type) {
            (Some(link), Some(model_name), Some(model_type)) => {
                Ok(vec![ModelRequest::from_triple((
                    link.clone(),
                    model_name.clone(),
                    model_type.clone(),
                ))?])
            }
            _ => Err(Error::Usage(
                "Provide LINK MODEL_NAME MODEL_TYPE or --manifest <FILE>".to_string(),
            )),
        }
    }
}
