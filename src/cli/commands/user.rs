use clap::Subcommand;

/// Placeholders for account management from the command line. Accounts are
/// created through the web UI or `/api/register`.
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    #[command(about = "Añade un usuario")]
    Add {
        #[arg(short = 't', long, alias = "nombre", default_value = "", help = "Nombre del usuario")]
        name: String,

        #[arg(long, alias = "atareado", default_value = "", help = "Tareas pendientes (true/false)")]
        busy: String,
    },

    #[command(about = "Elimina un usuario")]
    Delete {
        #[arg(short = 't', long, alias = "nombre", default_value = "", help = "Nombre del usuario")]
        name: String,
    },
}

pub fn handle(cmd: UserCommands) -> anyhow::Result<()> {
    println!("{}", describe(&cmd));
    Ok(())
}

fn describe(cmd: &UserCommands) -> String {
    match cmd {
        UserCommands::Add { name, busy } => format!("Nombre: {} Tareas pendientes: {}", name, busy),
        UserCommands::Delete { name } => format!("El usuario \"{}\" ha sido eliminado", name),
    }
}
