use anyhow::Result;

fn main() -> Result<()> {
    sacred_cli::main_entry()
}
