//! MCP tool registry
//!
//! The registry is a static, ordered table of [`ToolDescriptor`]s. Each
//! descriptor's parameter schema is plain data; the JSON Schema exposed over
//! `tools/list` is derived from it, and the same data drives argument
//! validation before any request is sent.
//!
//! # Tool Categories
//!
//! ## Projects
//! - `list_projects`, `get_project`, `create_project`, `update_project`, `delete_project`
//!
//! ## Features
//! - `list_features`, `get_feature`, `create_feature`, `update_feature`,
//!   `clone_feature`, `archive_feature`, `delete_feature`
//!
//! ## Feature Controls
//! - `get_feature_control`, `update_feature_control`
//!
//! ## Environments
//! - `list_environments`, `get_environment`, `create_environment`,
//!   `update_environment`, `delete_environment`
//!
//! ## Targets
//! - `list_targets`, `get_target`
//!
//! ## API Keys
//! - `list_api_keys`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Value type accepted by a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// Declaration of a single tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
    /// Enumerated values; empty means unconstrained
    pub allowed_values: &'static [&'static str],
}

impl ParamSpec {
    /// Mark the parameter as required.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Restrict the parameter to a fixed set of values.
    pub const fn one_of(self, values: &'static [&'static str]) -> Self {
        Self {
            allowed_values: values,
            ..self
        }
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.kind.as_str()));
        if !self.allowed_values.is_empty() {
            schema.insert("enum".to_string(), json!(self.allowed_values));
        }
        schema.insert("description".to_string(), json!(self.description));
        Value::Object(schema)
    }
}

const fn string(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        required: false,
        description,
        allowed_values: &[],
    }
}

const fn boolean(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Boolean,
        required: false,
        description,
        allowed_values: &[],
    }
}

/// Static description of one callable operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolDescriptor {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameters the caller must supply.
    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }

    /// JSON Schema for the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));

        let required: Vec<&str> = self.required_params().map(|p| p.name).collect();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }
        Value::Object(schema)
    }

    /// Wire representation for `tools/list`.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Result from a tool invocation
///
/// Always a single text block. Failures are reported inside the text, not
/// through a separate error flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
        }
    }
}

const FEATURE_FILTERS: &[&str] = &["maintaining", "bookmarked", "recent"];
const API_KEY_TYPES: &[&str] = &["server_environment", "client_environment"];

/// All available tools, in display order.
pub static TOOLS: &[ToolDescriptor] = &[
    // Projects
    ToolDescriptor {
        name: "list_projects",
        description: "List all projects in the organization. Optionally filter by a search query that matches project name or key.",
        params: &[string(
            "query",
            "Optional search query to filter projects by name or key",
        )],
    },
    ToolDescriptor {
        name: "get_project",
        description: "Get detailed information about a specific project by its ID or key.",
        params: &[string("idOrKey", "The project ID or key").required()],
    },
    ToolDescriptor {
        name: "create_project",
        description: "Create a new project in the organization.",
        params: &[
            string(
                "key",
                "Unique project key (lowercase, no spaces, use hyphens)",
            )
            .required(),
            string("name", "Display name for the project").required(),
        ],
    },
    ToolDescriptor {
        name: "update_project",
        description: "Update an existing project's name.",
        params: &[
            string("idOrKey", "The project ID or key to update").required(),
            string("name", "New display name for the project").required(),
        ],
    },
    ToolDescriptor {
        name: "delete_project",
        description: "Delete a project. This will also delete all features and environments in the project.",
        params: &[string("idOrKey", "The project ID or key to delete").required()],
    },
    // Features
    ToolDescriptor {
        name: "list_features",
        description: "List all features. Can filter by project key, search query, or predefined filters (maintaining, bookmarked, recent).",
        params: &[
            string("projectKey", "Project key to filter features"),
            string("query", "Search query to match feature key or name"),
            string("filter", "Predefined filter type").one_of(FEATURE_FILTERS),
            boolean("archived", "Include archived features (default: false)"),
        ],
    },
    ToolDescriptor {
        name: "get_feature",
        description: "Get detailed information about a specific feature by ID or unified key (projectKey:featureKey).",
        params: &[string(
            "idOrUnifiedKey",
            "Feature ID or unified key (e.g., 'myproject:my-feature')",
        )
        .required()],
    },
    ToolDescriptor {
        name: "create_feature",
        description: "Create a new feature flag in a project.",
        params: &[
            string(
                "projectKey",
                "The project key where the feature will be created",
            )
            .required(),
            string(
                "key",
                "Unique feature key within the project (lowercase, no spaces)",
            )
            .required(),
            string("name", "Display name for the feature").required(),
            string("description", "Optional description of the feature"),
        ],
    },
    ToolDescriptor {
        name: "update_feature",
        description: "Update an existing feature's properties like name, description, or variants.",
        params: &[
            string("idOrUnifiedKey", "Feature ID or unified key").required(),
            string("name", "New display name for the feature"),
            string("description", "New description for the feature"),
        ],
    },
    ToolDescriptor {
        name: "clone_feature",
        description: "Clone an existing feature with a new key and name.",
        params: &[
            string(
                "idOrUnifiedKey",
                "Feature ID or unified key of the source feature to clone",
            )
            .required(),
            string("newKey", "Key for the cloned feature").required(),
            string("name", "Name for the cloned feature").required(),
        ],
    },
    ToolDescriptor {
        name: "archive_feature",
        description: "Archive or unarchive a feature flag.",
        params: &[
            string("idOrUnifiedKey", "Feature ID or unified key").required(),
            boolean("archived", "Set to true to archive, false to unarchive").required(),
        ],
    },
    ToolDescriptor {
        name: "delete_feature",
        description: "Delete a feature flag. Requires production editor or admin permissions.",
        params: &[string("idOrUnifiedKey", "Feature ID or unified key to delete").required()],
    },
    // Feature Controls
    ToolDescriptor {
        name: "get_feature_control",
        description: "Get the feature control configuration for a specific feature and environment. Shows enabled state, rules, and variant assignments.",
        params: &[
            string("idOrUnifiedKey", "Feature ID or unified key").required(),
            string(
                "environmentKey",
                "Environment key (e.g., 'development', 'production')",
            )
            .required(),
        ],
    },
    ToolDescriptor {
        name: "update_feature_control",
        description: "Update feature control settings for a specific environment. Can enable/disable the feature, change the off variant, and modify rules.",
        params: &[
            string("idOrUnifiedKey", "Feature ID or unified key").required(),
            string("environmentKey", "Environment key").required(),
            boolean(
                "enabled",
                "Whether the feature is enabled in this environment",
            ),
            string(
                "offVariantKey",
                "The variant to serve when the feature is disabled",
            ),
        ],
    },
    // Environments
    ToolDescriptor {
        name: "list_environments",
        description: "List all environments for a project or the entire organization.",
        params: &[string(
            "projectKey",
            "Optional project key to filter environments",
        )],
    },
    ToolDescriptor {
        name: "get_environment",
        description: "Get detailed information about a specific environment by ID or unified key (projectKey:environmentKey).",
        params: &[string(
            "idOrUnifiedKey",
            "Environment ID or unified key (e.g., 'myproject:production')",
        )
        .required()],
    },
    ToolDescriptor {
        name: "create_environment",
        description: "Create a new environment for a project. Optionally clone settings from an existing environment.",
        params: &[
            string(
                "projectKey",
                "The project key where the environment will be created",
            )
            .required(),
            string("key", "Unique environment key within the project").required(),
            string("name", "Display name for the environment").required(),
            string("color", "Color for the environment (hex code)"),
            boolean("production", "Whether this is a production environment"),
            string(
                "cloneEnvironmentKey",
                "Optional environment key to clone settings from",
            ),
        ],
    },
    ToolDescriptor {
        name: "update_environment",
        description: "Update an existing environment's properties.",
        params: &[
            string("idOrUnifiedKey", "Environment ID or unified key").required(),
            string("name", "New display name"),
            string("color", "New color (hex code)"),
            string("url", "Environment URL"),
            boolean("production", "Whether this is a production environment"),
        ],
    },
    ToolDescriptor {
        name: "delete_environment",
        description: "Delete an environment. Cannot delete the last environment in a project.",
        params: &[string(
            "idOrUnifiedKey",
            "Environment ID or unified key to delete",
        )
        .required()],
    },
    // Targets
    ToolDescriptor {
        name: "list_targets",
        description: "Get all targets (user attributes) for a project. Targets are used in targeting rules for A/B testing.",
        params: &[string("projectKey", "Project key").required()],
    },
    ToolDescriptor {
        name: "get_target",
        description: "Get a specific target by its key.",
        params: &[
            string("projectKey", "Project key").required(),
            string("targetKey", "Target key to look up").required(),
        ],
    },
    // API Keys
    ToolDescriptor {
        name: "list_api_keys",
        description: "List API keys for a specific environment.",
        params: &[
            string(
                "environmentKey",
                "Environment unified key (projectKey:environmentKey format)",
            )
            .required(),
            string("type", "Optional type filter for API keys").one_of(API_KEY_TYPES),
        ],
    },
];

/// Look up a tool descriptor by name.
pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.name == name)
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    TOOLS.iter().map(ToolDescriptor::to_definition).collect()
}
