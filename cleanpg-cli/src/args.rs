use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::bail;
use clap::Parser;
use clap::error::ErrorKind;
use cleanpg::RenderOptions;

/// Fetch a web page and re-render it as clean, readable HTML.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// The URL of the page to clean.
    pub url: String,
    /// Print extra debugging information on standard error.
    #[arg(short, long)]
    pub verbose: bool,
    /// HTML file to render to [default: stdout].
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Save a copy of the source HTML document.
    #[arg(short, long)]
    pub save: Option<PathBuf>,
    /// Render body elements only from the first h1 tag on.
    #[arg(short = 'p', long)]
    pub posth1: bool,
    /// Do not automatically render tag-level embedded styles.
    #[arg(short, long)]
    pub nostyle: bool,
    /// Do not render links.
    #[arg(short = 'l', long)]
    pub nolinks: bool,
    /// Log file, truncated on every run and removed when nothing was logged.
    #[arg(long, default_value = "log.txt")]
    pub log_file: PathBuf,
}

impl Cli {
    /// Render options selected by the flags.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new()
            .canonical_mode(self.posth1)
            .inject_style(!self.nostyle)
            .render_links(!self.nolinks)
    }

    /// Reject output paths that don't end in `.html`.
    pub fn validate(&self) -> anyhow::Result<()> {
        for path in [&self.output, &self.save].into_iter().flatten() {
            check_html_extension(path)?;
        }
        Ok(())
    }
}

/// Print a command line parse failure and return the process exit status.
pub fn report_parse_error(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    ExitCode::from(parse_error_status(err))
}

/// `--help` and `--version` succeed; every usage error, a missing URL
/// included, exits with 1.
fn parse_error_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn check_html_extension(path: &Path) -> anyhow::Result<()> {
    if path.extension().is_none_or(|ext| ext != "html") {
        bail!("file [{}] must have .html extension", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cleanpg").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults() {
        let cli = parse(&["https://example.com"]);
        assert_eq!(cli.url, "https://example.com");
        assert!(!cli.verbose);
        assert_eq!(cli.output, None);
        assert_eq!(cli.log_file, PathBuf::from("log.txt"));
        assert_eq!(cli.render_options(), RenderOptions::default());
    }

    #[test]
    fn short_flags_map_to_options() {
        let cli = parse(&["-p", "-n", "-l", "-v", "example.com"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.render_options(),
            RenderOptions::new()
                .canonical_mode(true)
                .inject_style(false)
                .render_links(false)
        );
    }

    #[test]
    fn long_flags() {
        let cli = parse(&[
            "--posth1",
            "--nostyle",
            "--nolinks",
            "--output",
            "clean.html",
            "--save",
            "source.html",
            "--log-file",
            "run.log",
            "example.com",
        ]);
        assert!(cli.posth1 && cli.nostyle && cli.nolinks);
        assert_eq!(cli.output, Some(PathBuf::from("clean.html")));
        assert_eq!(cli.save, Some(PathBuf::from("source.html")));
        assert_eq!(cli.log_file, PathBuf::from("run.log"));
        cli.validate().expect(".html paths are accepted");
    }

    fn parse_status(args: &[&str]) -> u8 {
        let err = Cli::try_parse_from(std::iter::once("cleanpg").chain(args.iter().copied()))
            .expect_err("arguments should be rejected");
        parse_error_status(&err)
    }

    #[test]
    fn missing_url_exits_with_one() {
        assert_eq!(parse_status(&[]), 1);
        assert_eq!(parse_status(&["-p"]), 1);
    }

    #[test]
    fn unknown_flag_exits_with_one() {
        assert_eq!(parse_status(&["--bogus", "example.com"]), 1);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        assert_eq!(parse_status(&["--help"]), 0);
        assert_eq!(parse_status(&["--version"]), 0);
    }

    #[test]
    fn output_must_be_html() {
        let cli = parse(&["-o", "clean.txt", "example.com"]);
        let err = cli.validate().unwrap_err();
        assert_eq!(err.to_string(), "file [clean.txt] must have .html extension");
    }

    #[test]
    fn save_must_be_html() {
        let cli = parse(&["-s", "source", "example.com"]);
        assert!(cli.validate().is_err());
    }
}
