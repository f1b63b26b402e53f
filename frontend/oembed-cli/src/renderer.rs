use oembed_core::{EmbedResult, Error};

use crate::cli::OutputFormat;

pub struct Renderer {
    output_format: OutputFormat,
}

impl Renderer {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    pub fn render_result(&self, url: &str, result: &EmbedResult) {
        match self.output_format {
            OutputFormat::Text => println!("{}", render_text(url, result)),
            OutputFormat::Json => println!("{}", json_result(url, result)),
        }
    }

    pub fn render_error(&self, url: &str, error: &Error) {
        match self.output_format {
            OutputFormat::Text => eprintln!("[error] {url}: {error}"),
            OutputFormat::Json => println!("{}", json_error(url, error)),
        }
    }
}

fn json_result(url: &str, result: &EmbedResult) -> String {
    pretty(&serde_json::json!({ "url": url, "ok": true, "data": result }))
}

fn json_error(url: &str, error: &Error) -> String {
    pretty(&serde_json::json!({ "url": url, "ok": false, "error": error.to_string() }))
}

fn pretty(envelope: &serde_json::Value) -> String {
    serde_json::to_string_pretty(envelope).unwrap_or_else(|_| envelope.to_string())
}

fn render_text(url: &str, result: &EmbedResult) -> String {
    let mut lines = vec![url.to_owned()];
    lines.push(format!("  title: {}", result.title().unwrap_or("<untitled>")));
    if let Some(kind) = result.embed_type() {
        lines.push(format!("  type: {kind}"));
    }
    if let Some(provider) = result.provider_name() {
        lines.push(format!("  provider: {provider}"));
    }
    if let Some(thumbnail) = result.thumbnail_url() {
        lines.push(format!("  thumbnail: {thumbnail}"));
    }
    lines.join("\n")
}
