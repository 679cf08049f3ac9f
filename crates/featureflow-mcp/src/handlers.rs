//! MCP Tool Handlers
//!
//! Routes a tool call to its [`Operation`], shapes the outbound
//! [`ApiRequest`], sends it, and renders the outcome as text.
//!
//! Optional fields follow a sparse forwarding rule: a key is only placed in
//! the query or body when the caller supplied it. Booleans are forwarded on
//! presence, so an explicit `false` always reaches the API. Optional string
//! filters and patch fields are skipped when empty. Identifier arguments
//! (ids, keys, unified keys) are inserted into the path verbatim.

use featureflow_api::{ApiClient, ApiRequest, Params};
use serde_json::Value;

use crate::arguments::Arguments;
use crate::tools::find_tool;
use crate::{Error, Result};

/// Every operation the server can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListProjects,
    GetProject,
    CreateProject,
    UpdateProject,
    DeleteProject,
    ListFeatures,
    GetFeature,
    CreateFeature,
    UpdateFeature,
    CloneFeature,
    ArchiveFeature,
    DeleteFeature,
    GetFeatureControl,
    UpdateFeatureControl,
    ListEnvironments,
    GetEnvironment,
    CreateEnvironment,
    UpdateEnvironment,
    DeleteEnvironment,
    ListTargets,
    GetTarget,
    ListApiKeys,
}

impl Operation {
    pub const ALL: [Operation; 22] = [
        Operation::ListProjects,
        Operation::GetProject,
        Operation::CreateProject,
        Operation::UpdateProject,
        Operation::DeleteProject,
        Operation::ListFeatures,
        Operation::GetFeature,
        Operation::CreateFeature,
        Operation::UpdateFeature,
        Operation::CloneFeature,
        Operation::ArchiveFeature,
        Operation::DeleteFeature,
        Operation::GetFeatureControl,
        Operation::UpdateFeatureControl,
        Operation::ListEnvironments,
        Operation::GetEnvironment,
        Operation::CreateEnvironment,
        Operation::UpdateEnvironment,
        Operation::DeleteEnvironment,
        Operation::ListTargets,
        Operation::GetTarget,
        Operation::ListApiKeys,
    ];

    /// Tool name as listed in the registry
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListProjects => "list_projects",
            Operation::GetProject => "get_project",
            Operation::CreateProject => "create_project",
            Operation::UpdateProject => "update_project",
            Operation::DeleteProject => "delete_project",
            Operation::ListFeatures => "list_features",
            Operation::GetFeature => "get_feature",
            Operation::CreateFeature => "create_feature",
            Operation::UpdateFeature => "update_feature",
            Operation::CloneFeature => "clone_feature",
            Operation::ArchiveFeature => "archive_feature",
            Operation::DeleteFeature => "delete_feature",
            Operation::GetFeatureControl => "get_feature_control",
            Operation::UpdateFeatureControl => "update_feature_control",
            Operation::ListEnvironments => "list_environments",
            Operation::GetEnvironment => "get_environment",
            Operation::CreateEnvironment => "create_environment",
            Operation::UpdateEnvironment => "update_environment",
            Operation::DeleteEnvironment => "delete_environment",
            Operation::ListTargets => "list_targets",
            Operation::GetTarget => "get_target",
            Operation::ListApiKeys => "list_api_keys",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Shape the outbound request for this operation.
    pub fn build_request(&self, args: &Arguments) -> Result<ApiRequest> {
        let request = match self {
            // Projects
            Operation::ListProjects => ApiRequest::get("/v1/projects")
                .query(Params::new().with_opt("query", args.non_empty("query"))),
            Operation::GetProject => {
                ApiRequest::get(format!("/v1/projects/{}", args.require_str("idOrKey")?))
            }
            Operation::CreateProject => ApiRequest::post("/v1/projects").body(
                Params::new()
                    .with("key", args.require_str("key")?)
                    .with("name", args.require_str("name")?),
            ),
            Operation::UpdateProject => {
                ApiRequest::put(format!("/v1/projects/{}", args.require_str("idOrKey")?))
                    .body(Params::new().with("name", args.require_str("name")?))
            }
            Operation::DeleteProject => {
                ApiRequest::delete(format!("/v1/projects/{}", args.require_str("idOrKey")?))
            }

            // Features
            Operation::ListFeatures => ApiRequest::get("/v1/features").query(
                Params::new()
                    .with_opt("projectKey", args.non_empty("projectKey"))
                    .with_opt("query", args.non_empty("query"))
                    .with_opt("filter", args.non_empty("filter"))
                    .with_opt("archived", args.bool("archived")),
            ),
            Operation::GetFeature => ApiRequest::get(feature_path(args)?),
            Operation::CreateFeature => ApiRequest::post("/v1/features").body(
                Params::new()
                    .with("projectKey", args.require_str("projectKey")?)
                    .with("key", args.require_str("key")?)
                    .with("name", args.require_str("name")?)
                    .with_opt("description", args.str("description")),
            ),
            Operation::UpdateFeature => ApiRequest::put(feature_path(args)?).body(
                Params::new()
                    .with_opt("name", args.non_empty("name"))
                    // An empty description clears it, so presence is enough.
                    .with_opt("description", args.str("description")),
            ),
            Operation::CloneFeature => {
                ApiRequest::post(format!("{}/clone", feature_path(args)?)).body(
                    Params::new()
                        .with("newKey", args.require_str("newKey")?)
                        .with("name", args.require_str("name")?),
                )
            }
            Operation::ArchiveFeature => ApiRequest::put(format!(
                "{}/archived/{}",
                feature_path(args)?,
                args.require_bool("archived")?
            )),
            Operation::DeleteFeature => ApiRequest::delete(feature_path(args)?),

            // Feature Controls
            Operation::GetFeatureControl => ApiRequest::get(control_path(args)?),
            Operation::UpdateFeatureControl => ApiRequest::put(control_path(args)?).body(
                Params::new()
                    .with_opt("enabled", args.bool("enabled"))
                    .with_opt("offVariantKey", args.non_empty("offVariantKey")),
            ),

            // Environments
            Operation::ListEnvironments => ApiRequest::get("/v1/environments")
                .query(Params::new().with_opt("projectKey", args.non_empty("projectKey"))),
            Operation::GetEnvironment => ApiRequest::get(environment_path(args)?),
            Operation::CreateEnvironment => ApiRequest::post("/v1/environments").body(
                Params::new()
                    .with("projectKey", args.require_str("projectKey")?)
                    .with("key", args.require_str("key")?)
                    .with("name", args.require_str("name")?)
                    .with_opt("color", args.str("color"))
                    .with_opt("production", args.bool("production"))
                    .with_opt("cloneEnvironmentKey", args.str("cloneEnvironmentKey")),
            ),
            Operation::UpdateEnvironment => ApiRequest::put(environment_path(args)?).body(
                Params::new()
                    .with_opt("name", args.non_empty("name"))
                    .with_opt("color", args.non_empty("color"))
                    .with_opt("url", args.non_empty("url"))
                    .with_opt("production", args.bool("production")),
            ),
            Operation::DeleteEnvironment => ApiRequest::delete(environment_path(args)?),

            // Targets
            Operation::ListTargets => ApiRequest::get("/v1/targets")
                .query(Params::new().with("projectKey", args.require_str("projectKey")?)),
            Operation::GetTarget => {
                ApiRequest::get(format!("/v1/targets/{}", args.require_str("targetKey")?))
                    .query(Params::new().with("projectKey", args.require_str("projectKey")?))
            }

            // API Keys
            Operation::ListApiKeys => ApiRequest::get("/v1/api-keys").query(
                Params::new()
                    .with("environmentKey", args.require_str("environmentKey")?)
                    .with_opt("type", args.non_empty("type")),
            ),
        };
        Ok(request)
    }

    /// Confirmation text for delete operations, which have no meaningful payload.
    pub fn confirmation(&self, args: &Arguments) -> Result<Option<String>> {
        let (resource, key) = match self {
            Operation::DeleteProject => ("Project", "idOrKey"),
            Operation::DeleteFeature => ("Feature", "idOrUnifiedKey"),
            Operation::DeleteEnvironment => ("Environment", "idOrUnifiedKey"),
            _ => return Ok(None),
        };
        Ok(Some(format!(
            "{} '{}' deleted successfully.",
            resource,
            args.require_str(key)?
        )))
    }
}

fn feature_path(args: &Arguments) -> Result<String> {
    Ok(format!("/v1/features/{}", args.require_str("idOrUnifiedKey")?))
}

fn control_path(args: &Arguments) -> Result<String> {
    Ok(format!(
        "{}/controls/{}",
        feature_path(args)?,
        args.require_str("environmentKey")?
    ))
}

fn environment_path(args: &Arguments) -> Result<String> {
    Ok(format!(
        "/v1/environments/{}",
        args.require_str("idOrUnifiedKey")?
    ))
}

/// Handle a tool call by dispatching to the appropriate operation.
///
/// Never fails: unknown tools yield `Unknown tool: <name>` and every error
/// is rendered through [`format_error`].
pub async fn handle_tool_call(client: &ApiClient, tool_name: &str, arguments: Value) -> String {
    let Some(operation) = Operation::from_name(tool_name) else {
        tracing::info!(tool = tool_name, "Unknown tool requested");
        return format!("Unknown tool: {tool_name}");
    };

    match execute(client, operation, arguments).await {
        Ok(text) => {
            tracing::debug!(tool = tool_name, "Tool call succeeded");
            text
        }
        Err(e) => {
            tracing::warn!(tool = tool_name, error = %e, "Tool call failed");
            format_error(&e)
        }
    }
}

async fn execute(client: &ApiClient, operation: Operation, arguments: Value) -> Result<String> {
    let args = Arguments::from_value(arguments)?;
    if let Some(tool) = find_tool(operation.name()) {
        args.validate(tool)?;
    }

    let request = operation.build_request(&args)?;
    tracing::info!(tool = operation.name(), method = %request.method, path = %request.path, "Calling Featureflow API");
    let payload = client.send(&request).await?;

    if let Some(message) = operation.confirmation(&args)? {
        return Ok(message);
    }
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Render an error as the single-line text returned to the client.
///
/// - API error with a message or title: `Error (<status>): <message>`
/// - transport failure: `Error: <cause chain>`
/// - anything else: `Error: <description>`
pub fn format_error(err: &Error) -> String {
    match err {
        Error::Api(featureflow_api::Error::Api { status, message }) => {
            format!("Error ({status}): {}", single_line(message))
        }
        Error::Api(featureflow_api::Error::Transport(e)) => {
            format!("Error: {}", single_line(&error_chain(e)))
        }
        other => format!("Error: {}", single_line(&other.to_string())),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
