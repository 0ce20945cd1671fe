use anyhow::{bail, Context, Result};
use huddle_client::{Auth, QueryClient, QueryError, QueryOptions, StaticSession};
use huddle_config::{DatabaseConfig, ENV_DB_PASS, ENV_DB_USER};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

/// Execute the query subcommand
pub async fn execute(
    config: &DatabaseConfig,
    sql: Option<String>,
    file: Option<PathBuf>,
    complete: bool,
    token: Option<String>,
    compact: bool,
) -> Result<()> {
    let text = read_query(sql, file, std::io::stdin())?;
    let value = run(config, &text, QueryOptions { complete }, token.as_deref()).await?;

    let output = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", output);
    Ok(())
}

/// Run query text as either the given user token or the service account
pub async fn run(
    config: &DatabaseConfig,
    sql: &str,
    options: QueryOptions,
    token: Option<&str>,
) -> Result<Value> {
    let client = QueryClient::new(config)?;

    let result = match token {
        Some(token) => {
            debug!("Running query with session token");
            let session = StaticSession::new(token);
            client.query(sql, options, Auth::Session(&session)).await
        }
        None => {
            let service = config.service.as_ref().with_context(|| {
                format!(
                    "{}; set {} and {} or pass --token",
                    QueryError::MissingCredentials,
                    ENV_DB_USER,
                    ENV_DB_PASS
                )
            })?;
            debug!("Running query as service user {}", service.username);
            client.query(sql, options, Auth::Service(service)).await
        }
    };

    result.with_context(|| format!("Query against {} failed", client.endpoint()))
}

/// Query text from the argument, a file, or the given reader
fn read_query<R: Read>(sql: Option<String>, file: Option<PathBuf>, mut input: R) -> Result<String> {
    let text = match (sql, file) {
        (Some(sql), _) => sql,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read query file {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            input
                .read_to_string(&mut buf)
                .context("Failed to read query from stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        bail!("No query given");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_argument_wins() {
        let text = read_query(Some("RETURN 1".to_string()), None, Cursor::new("RETURN 2")).unwrap();
        assert_eq!(text, "RETURN 1");
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.surql");
        std::fs::write(&path, "SELECT * FROM channel;\n").unwrap();

        let text = read_query(None, Some(path), Cursor::new("")).unwrap();
        assert_eq!(text, "SELECT * FROM channel;\n");
    }

    #[test]
    fn test_falls_back_to_reader() {
        let text = read_query(None, None, Cursor::new("INFO FOR DB")).unwrap();
        assert_eq!(text, "INFO FOR DB");
    }

    #[test]
    fn test_blank_query_is_rejected() {
        assert!(read_query(None, None, Cursor::new("  \n")).is_err());
    }

    #[tokio::test]
    async fn test_run_without_service_account_explains() {
        let config = DatabaseConfig::default();
        let err = run(&config, "RETURN 1", QueryOptions::default(), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains(ENV_DB_USER));
    }
}
