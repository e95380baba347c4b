fn main() -> anyhow::Result<()> {
    alifba_lib::run()
}
