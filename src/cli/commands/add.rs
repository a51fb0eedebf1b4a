use clap::Args;

/// Echoes the task it would create; nothing is written to the store.
#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(short, long, default_value = "", help = "Título de la tarea")]
    pub title: String,

    #[arg(long, default_value = "", help = "Tarea acabada (true/false)")]
    pub finish: String,
}

pub fn handle(args: AddArgs) -> anyhow::Result<()> {
    println!("{}", describe(&args));
    Ok(())
}

fn describe(args: &AddArgs) -> String {
    format!("Título: {} Tarea acabada: {}", args.title, args.finish)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_title_and_finish() {
        let args = AddArgs {
            title: "Tarea de prueba".to_string(),
            finish: "false".to_string(),
        };
        assert_eq!(describe(&args), "Título: Tarea de prueba Tarea acabada: false");
    }
}
