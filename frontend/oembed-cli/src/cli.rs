use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "oembed", about = "Resolve media URLs to oEmbed data")]
pub struct Cli {
    /// TOML config file; built-in defaults are used when omitted.
    #[arg(long, env = "OEMBED_CONFIG")]
    pub config: Option<String>,

    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch embed data for one or more URLs.
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Extra request parameter, e.g. --param maxwidth=640
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
    /// Show which endpoint would serve a URL.
    Match { url: String },
    /// List registered patterns, highest precedence first.
    Providers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("parameter name cannot be empty in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
