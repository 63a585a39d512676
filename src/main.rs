fn main() -> anyhow::Result<()> {
    speedread_lib::run()
}
