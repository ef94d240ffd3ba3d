use clap::Parser;
use sweep_engine::Options;


#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON file with the sources to sweep
    #[arg(short, long, value_name = "FILE")]
    pub input: String,

    /// Reject inverted or out of order spans
    #[arg(long)]
    pub validate: bool,

    /// Sort every source before sweeping it
    #[arg(long)]
    pub sort: bool,

    /// Merge groups of a source that are one step apart
    #[arg(long)]
    pub consolidate: bool,

    /// Feed each source from its own producer thread
    #[arg(long)]
    pub threaded: bool
}


impl Cli {
    /// Flags given on the command line win over the input file.
    pub fn options(&self, file: Options) -> Options {
        file.with_validate(file.validate || self.validate)
            .with_sort(file.sort || self.sort)
            .with_consolidate(file.consolidate || self.consolidate)
    }
}
