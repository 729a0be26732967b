//! `kcdextract` command-line entry point

fn main() -> anyhow::Result<()> {
    kcdextract::cli::run_cli()
}
