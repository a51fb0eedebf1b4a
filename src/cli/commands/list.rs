use clap::{Args, ValueEnum};
use tracing::debug;

use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;
use crate::database::{Database, StatusFilter, TaskQuery, TaskSort};

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, help = "Formato de salida")]
    pub output: OutputFormat,

    #[arg(long, conflicts_with = "pending_only", help = "Mostrar solo tareas completadas")]
    pub done_only: bool,

    #[arg(long, help = "Mostrar solo tareas pendientes")]
    pub pending_only: bool,

    #[arg(long, value_enum, default_value_t = SortKey::Id, help = "Ordenar por")]
    pub sort: SortKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Id,
    Title,
    Status,
}

impl From<SortKey> for TaskSort {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Id => TaskSort::Id,
            SortKey::Title => TaskSort::Title,
            SortKey::Status => TaskSort::Status,
        }
    }
}

impl ListArgs {
    pub fn query(&self) -> TaskQuery {
        let status = if self.done_only {
            StatusFilter::Done
        } else if self.pending_only {
            StatusFilter::Pending
        } else {
            StatusFilter::All
        };

        TaskQuery {
            status,
            sort: self.sort.into(),
        }
    }
}

pub async fn handle(args: ListArgs, verbose: bool) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    if verbose {
        debug!("Connecting to {} to list tasks", config.database.url);
    }

    let db = Database::connect(&config.database).await?;
    db.ensure_schema().await?;

    let query = args.query();
    debug!("Listing tasks with {:?}", query);
    let tasks = db.tasks().list(query).await?;
    db.close().await;

    let rendered = utils::render_tasks(args.output, &tasks)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }

    if verbose {
        debug!("{} tasks listed", tasks.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<ListArgs, clap::Error> {
        let mut argv = vec!["todo", "list"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv)?.command {
            Commands::List(list) => Ok(list),
            other => panic!("parsed {:?}", other),
        }
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.output, OutputFormat::Text);
        assert_eq!(args.sort, SortKey::Id);

        let query = args.query();
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.sort, TaskSort::Id);
    }

    #[test]
    fn filters_and_sort() {
        let query = parse(&["--done-only", "--sort", "title"]).unwrap().query();
        assert_eq!(query.status, StatusFilter::Done);
        assert_eq!(query.sort, TaskSort::Title);

        let query = parse(&["--pending-only", "--sort", "status"]).unwrap().query();
        assert_eq!(query.status, StatusFilter::Pending);
        assert_eq!(query.sort, TaskSort::Status);
    }

    #[test]
    fn output_accepts_short_flag() {
        assert_eq!(parse(&["-o", "json"]).unwrap().output, OutputFormat::Json);
    }

    #[test]
    fn done_only_conflicts_with_pending_only() {
        let err = parse(&["--done-only", "--pending-only"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let err = parse(&["--sort", "priority"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
