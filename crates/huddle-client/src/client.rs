//! HTTP client for the SurrealDB `/sql` endpoint

use huddle_config::{DatabaseConfig, ServiceCredentials};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{QueryError, Result};
use crate::session::Session;

/// Who is executing the query
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    /// Trusted server context, sent as HTTP Basic auth
    Service(&'a ServiceCredentials),
    /// End-user context, sent as a bearer token
    Session(&'a dyn Session),
}

impl std::fmt::Debug for Auth<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(creds) => f.debug_tuple("Service").field(creds).finish(),
            Self::Session(_) => f.write_str("Session(..)"),
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Return every statement's result instead of only the last one
    pub complete: bool,
}

impl QueryOptions {
    pub fn complete() -> Self {
        Self { complete: true }
    }
}

/// One entry of the response array, one per executed statement
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatementResult {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    information: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

enum Credential {
    Basic { username: String, password: String },
    Bearer(String),
}

impl Credential {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Bearer(token) => request.bearer_auth(token),
        }
    }
}

/// Executes query text against the configured endpoint
#[derive(Clone)]
pub struct QueryClient {
    client: Client,
    url: String,
    namespace: String,
    database: String,
}

impl QueryClient {
    /// Build a client from database configuration
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(QueryError::Request)?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing reqwest client, sharing its connection pool
    pub fn with_client(client: Client, config: &DatabaseConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            namespace: config.namespace.clone(),
            database: config.database.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    /// Execute query text and return the selected result
    ///
    /// With `options.complete` the value is an array holding every
    /// statement's result; otherwise it is the last statement's result, or
    /// `null` when the response is empty.
    ///
    /// In session context a 403 triggers one [`Session::refresh`]; the query
    /// is retried only when that yields a different token.
    ///
    /// # Example
    /// ```no_run
    /// # use huddle_client::{Auth, QueryClient, QueryOptions, StaticSession};
    /// # use huddle_config::DatabaseConfig;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = QueryClient::new(&DatabaseConfig::default())?;
    /// let session = StaticSession::new("eyJhbGciOi...");
    /// let rows = client
    ///     .query("SELECT * FROM channel", QueryOptions::default(), Auth::Session(&session))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn query(&self, sql: &str, options: QueryOptions, auth: Auth<'_>) -> Result<Value> {
        let sql = sql.trim();
        let results = match auth {
            Auth::Service(creds) => {
                if !creds.is_complete() {
                    return Err(QueryError::MissingCredentials);
                }
                let credential = Credential::Basic {
                    username: creds.username.clone(),
                    password: creds.password.clone(),
                };
                self.execute(sql, &credential, 1).await?
            }
            Auth::Session(session) => self.execute_with_session(sql, session).await?,
        };
        Ok(select_result(results, options))
    }

    /// Execute and decode the selected result into `T`
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        options: QueryOptions,
        auth: Auth<'_>,
    ) -> Result<T> {
        let value = self.query(sql, options, auth).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn execute_with_session(
        &self,
        sql: &str,
        session: &dyn Session,
    ) -> Result<Vec<StatementResult>> {
        let token = session
            .token()
            .filter(|t| !t.is_empty())
            .ok_or(QueryError::MissingToken)?;

        match self.execute(sql, &Credential::Bearer(token.clone()), 1).await {
            Err(QueryError::Http { status: 403, .. }) => {
                warn!("Session token rejected, refreshing");
                match session.refresh().await {
                    Some(fresh) if !fresh.is_empty() && fresh != token => {
                        self.execute(sql, &Credential::Bearer(fresh), 2).await
                    }
                    _ => {
                        warn!("Refresh produced no new token");
                        Err(QueryError::Unauthorized)
                    }
                }
            }
            other => other,
        }
    }

    async fn execute(
        &self,
        sql: &str,
        credential: &Credential,
        attempt: u8,
    ) -> Result<Vec<StatementResult>> {
        debug!("Posting query to {} (attempt {})", self.url, attempt);

        let request = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .header("NS", &self.namespace)
            .header("DB", &self.database)
            .header("surreal-ns", &self.namespace)
            .header("surreal-db", &self.database)
            .body(sql.to_string());
        let response = credential.apply(request).send().await?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> Result<Vec<StatementResult>> {
        let status = response.status();

        if status.is_success() {
            let results: Vec<StatementResult> = response.json().await.map_err(|e| {
                warn!("Failed to parse query response: {}", e);
                QueryError::InvalidResponse(format!("expected an array of results: {}", e))
            })?;
            for (index, result) in results.iter().enumerate() {
                if result.status.as_deref() == Some("ERR") {
                    warn!("Statement {} failed: {}", index, result.result);
                }
            }
            Ok(results)
        } else {
            let status_code = status.as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            debug!("Query failed with HTTP {}: {}", status_code, message);
            Err(QueryError::Http {
                status: status_code,
                message,
            })
        }
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed
            .information
            .or(parsed.description)
            .or(parsed.details)
        {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body.to_string()
    }
}

fn select_result(results: Vec<StatementResult>, options: QueryOptions) -> Value {
    if options.complete {
        Value::Array(results.into_iter().map(|r| r.result).collect())
    } else {
        results
            .into_iter()
            .next_back()
            .map(|r| r.result)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(values: &[Value]) -> Vec<StatementResult> {
        values
            .iter()
            .map(|v| StatementResult {
                result: v.clone(),
                status: Some("OK".to_string()),
                time: None,
            })
            .collect()
    }

    #[test]
    fn test_select_last_result() {
        let picked = select_result(results(&[json!(1), json!(2)]), QueryOptions::default());
        assert_eq!(picked, json!(2));
    }

    #[test]
    fn test_select_complete() {
        let picked = select_result(results(&[json!(1), json!(2)]), QueryOptions::complete());
        assert_eq!(picked, json!([1, 2]));
    }

    #[test]
    fn test_select_empty_is_null() {
        assert_eq!(select_result(vec![], QueryOptions::default()), Value::Null);
        assert_eq!(select_result(vec![], QueryOptions::complete()), json!([]));
    }

    #[test]
    fn test_error_message_prefers_information() {
        let body = r#"{"code":400,"details":"Request problems detected","information":"Parse error"}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "Parse error");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }

    #[test]
    fn test_statement_result_tolerates_missing_fields() {
        let parsed: StatementResult = serde_json::from_value(json!({ "result": [1] })).unwrap();
        assert_eq!(parsed.result, json!([1]));
        assert_eq!(parsed.status, None);
    }
}
