fn main() -> anyhow::Result<()> {
    anki_scroll_cli::run()
}
