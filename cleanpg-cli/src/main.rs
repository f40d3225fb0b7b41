//! `cleanpg`: fetch a page, strip it down to readable HTML, write it out.

mod args;
mod fetch;
mod logging;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use crate::args::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return args::report_parse_error(&err),
    };

    let _log = match logging::init(&cli.log_file, cli.verbose) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("cleanpg: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("cleanpg: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    cli.validate()?;

    // Open the destination before fetching so a bad path fails fast
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open [{}]", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let url = fetch::normalize_url(&cli.url);
    info!("reading data from URL={url}");
    let source = fetch::read_html(&url).with_context(|| format!("cannot read [{url}]"))?;

    if let Some(path) = &cli.save {
        info!("saving a copy of the source document to {}", path.display());
        std::fs::write(path, &source)
            .with_context(|| format!("could not write save file [{}]", path.display()))?;
    }

    let options = cli.render_options();
    if options.canonical_mode {
        info!("processing body elements after first <h1> tag");
    }
    if !options.inject_style {
        info!("skipping automatic tag-level style embedding");
    }
    if !options.render_links {
        info!("not rendering links");
    }

    let clean = cleanpg::clean_html(&source, &options)
        .with_context(|| format!("could not clean [{url}]"))?;

    out.write_all(clean.as_bytes())
        .and_then(|()| out.flush())
        .context("could not write output")?;

    info!("created a clean version of {url}");
    Ok(())
}
