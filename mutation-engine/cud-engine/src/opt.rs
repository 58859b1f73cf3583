use crate::LogFormat;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt, Clone)]
#[structopt(name = "cud-engine")]
/// Generated GraphQL CRUD mutations over an in-memory store
pub struct EngineOpt {
    /// Path to the datamodel (JSON).
    #[structopt(short = "d", long, parse(from_os_str))]
    pub datamodel: PathBuf,

    /// Path to the engine configuration. Files ending in `.json` are read as JSON,
    /// everything else as TOML.
    #[structopt(short = "c", long, parse(from_os_str))]
    pub config: PathBuf,

    /// Format of the log lines written to stderr: `text` or `json`.
    #[structopt(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Log level of the engine crates, e.g. `debug`.
    #[structopt(long, env = "CUD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[structopt(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, StructOpt, Clone)]
pub enum Subcommand {
    /// Prints the GraphQL schema (SDL).
    Render,
    /// Runs a GraphQL document and prints the JSON response.
    Execute(ExecuteOpts),
}

#[derive(Debug, StructOpt, Clone)]
pub struct ExecuteOpts {
    /// The GraphQL document.
    #[structopt(short = "q", long)]
    pub query: String,

    /// Variables of the document, as a JSON object.
    #[structopt(long)]
    pub variables: Option<String>,

    /// Operation to run when the document contains several.
    #[structopt(long)]
    pub operation_name: Option<String>,

    /// JSON file with the records the store starts with, keyed by model.
    #[structopt(long, parse(from_os_str))]
    pub seed: Option<PathBuf>,

    /// Id of the user running the request. Anonymous if not set.
    #[structopt(long)]
    pub user: Option<String>,

    /// Permission of the user. Can be given several times.
    #[structopt(long = "permission")]
    pub permissions: Vec<String>,

    /// Marks the user as a superuser.
    #[structopt(long)]
    pub superuser: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn execute_options() {
        let opt = EngineOpt::from_iter_safe([
            "cud-engine",
            "--datamodel",
            "models.json",
            "--config",
            "engine.toml",
            "--log-format",
            "json",
            "--log-level",
            "debug",
            "execute",
            "--query",
            "mutation { deleteCat(id: \"1\") { found } }",
            "--user",
            "7",
            "--permission",
            "cats.delete_cat",
            "--permission",
            "cats.view_cat",
        ])
        .unwrap();

        assert_eq!(opt.log_format, LogFormat::Json);
        assert_eq!(opt.log_level, "debug");

        match opt.subcommand {
            Subcommand::Execute(execute) => {
                assert_eq!(execute.user.as_deref(), Some("7"));
                assert_eq!(execute.permissions, vec!["cats.delete_cat", "cats.view_cat"]);
                assert!(!execute.superuser);
            }
            other => panic!("expected execute, got {other:?}"),
        }
    }

    #[test]
    fn unknown_log_formats_are_rejected() {
        let result = EngineOpt::from_iter_safe([
            "cud-engine",
            "-d",
            "models.json",
            "-c",
            "engine.toml",
            "--log-format",
            "xml",
            "render",
        ]);

        assert!(result.is_err());
    }
}
