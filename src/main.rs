pub mod attr_scan;
pub mod cli;
pub mod convert;
pub mod doc;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod stats;
pub mod validate;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
