pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "Gestor de tareas desde CLI y Web")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Muestra logs detallados")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Inicia el servidor web")]
    Serve,

    #[command(about = "Lista todas las tareas")]
    List(commands::list::ListArgs),

    #[command(about = "Muestra una tarea sin guardarla")]
    Add(commands::add::AddArgs),

    #[command(about = "Gestión de usuarios")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => commands::serve::handle(cli.verbose).await,
        Commands::List(args) => commands::list::handle(args, cli.verbose).await,
        Commands::Add(args) => commands::add::handle(args),
        Commands::User { cmd } => commands::user::handle(cmd),
    }
}
