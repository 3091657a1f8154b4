//! protoc-gen-struct-transformer - protoc plugin entry point
//!
//! protoc runs the binary with a `CodeGeneratorRequest` on stdin and reads the
//! `CodeGeneratorResponse` from stdout:
//!
//! ```text
//! protoc --struct-transformer_out=src --struct-transformer_opt=helper_package=crate::helpers product.proto
//! ```

use anyhow::Context;
use clap::Parser;
use prost::Message;
use protoc_gen_struct_transformer::logging::init_logging;
use protoc_gen_struct_transformer::{GeneratorConfig, OPTIONS_PROTO, error_response, respond};
use std::io::{Read, Write};
use std::path::PathBuf;
use struct_transformer::CodeGeneratorRequest;

#[derive(Parser)]
#[command(name = "protoc-gen-struct-transformer")]
#[command(author, version, about = "protoc plugin generating prost/native struct transformers", long_about = None)]
struct Cli {
    /// Read the encoded request from a file instead of stdin
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Print the options.proto extension declarations and exit
    #[arg(long)]
    dump_options: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.dump_options {
        print!("{OPTIONS_PROTO}");
        return Ok(());
    }

    let input = match &cli.request {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read request: {path:?}"))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let request = CodeGeneratorRequest::decode(input.as_slice())
        .context("Failed to decode CodeGeneratorRequest; run this binary through protoc")?;

    let response = match GeneratorConfig::from_parameter(request.parameter()) {
        Ok(config) => {
            init_logging(config.debug);
            tracing::debug!(files = request.file_to_generate.len(), "received request");
            respond(&request, &config)
        }
        Err(e) => {
            init_logging(false);
            tracing::error!("{e:#}");
            error_response(format!("{e:#}"))
        }
    };

    std::io::stdout()
        .write_all(&response.encode_to_vec())
        .context("Failed to write response")?;

    Ok(())
}
