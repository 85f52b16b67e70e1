fn main() -> anyhow::Result<()> {
    xlinkit::cli::run_cli()
}
