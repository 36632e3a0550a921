//! `TexConverter` CLI binary

fn main() -> anyhow::Result<()> {
    texconverter::cli::run_cli()
}
