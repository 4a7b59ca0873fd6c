mod command;
mod plot;
mod report;
#[cfg(test)]
mod testing;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
