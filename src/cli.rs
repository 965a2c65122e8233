use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "teleshelf")]
#[command(author, version, about = "Telegram bot serving a folder tree of shared files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot
    Run,

    /// Print registry statistics and exit
    Stats,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
