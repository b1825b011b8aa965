//! Built-in example tools for the conversational agent.
//!
//! `get_weather`, `get_companies` and `get_collaborators` answer from canned
//! data; `search_docs` queries a [`DocumentIndex`] built at startup. Each tool
//! is constructed via [`FunctionTool::new`] and returned as `Arc<dyn Tool>`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use colloquy::retrieval::{DocumentIndex, IndexOptions};
//! use colloquy::tools::builtin::default_registry;
//!
//! # fn main() -> colloquy::error::Result<()> {
//! let index = Arc::new(DocumentIndex::new(IndexOptions::default()));
//! let registry = default_registry(index)?;
//! assert_eq!(registry.len(), 4);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::json;

use crate::error::ColloquyError;
use crate::retrieval::DocumentIndex;
use crate::tools::registry::ToolRegistry;
use crate::tools::tool::{into_result_object, FunctionTool, Tool, ToolExecutionContext};
use crate::tools::types::ToolSchema;

/// Number of excerpts `search_docs` hands back to the model.
pub const SEARCH_DOCS_TOP_K: usize = 3;

/// Create the `get_weather` tool: canned current weather for a city.
pub fn weather_tool() -> Arc<dyn Tool> {
    Arc::new(
        FunctionTool::new(
            "get_weather",
            "Get the current weather for a city",
            ToolSchema::object()
                .string("location", "The city, e.g. São Paulo, SP", true)
                .build(),
            |args, _ctx: ToolExecutionContext| async move {
                let location = args.get_str("location")?;
                Ok(into_result_object(json!({
                    "location": location,
                    "temperature": "22°C",
                    "condition": "Sunny",
                })))
            },
        )
        .with_response(
            ToolSchema::object()
                .string("location", "The city, e.g. São Paulo, SP", false)
                .string("temperature", "Current temperature, e.g. 22°C", false)
                .string("condition", "Weather condition, e.g. Sunny", false)
                .build(),
        ),
    )
}

/// Create the `get_companies` tool: companies the caller can access.
pub fn companies_tool() -> Arc<dyn Tool> {
    Arc::new(
        FunctionTool::new(
            "get_companies",
            "List the companies I have access to.",
            ToolSchema::empty(),
            |_args, _ctx: ToolExecutionContext| async move {
                Ok(into_result_object(json!({
                    "companies": [
                        { "id": "1", "name": "Company A" },
                        { "id": "2", "name": "Company B" },
                    ],
                })))
            },
        )
        .with_response(
            ToolSchema::object()
                .object_array(
                    "companies",
                    "The list of companies",
                    &[("id", "The company ID"), ("name", "The company name")],
                )
                .build(),
        ),
    )
}

/// Create the `get_collaborators` tool: people working at a company.
///
/// Unknown company ids yield an empty list rather than an error.
pub fn collaborators_tool() -> Arc<dyn Tool> {
    Arc::new(
        FunctionTool::new(
            "get_collaborators",
            "List the collaborators of a company.",
            ToolSchema::object()
                .string("company_id", "The company ID", true)
                .build(),
            |args, _ctx: ToolExecutionContext| async move {
                let collaborators = match args.get_str("company_id")? {
                    "1" => json!([
                        { "id": "1", "name": "Fulano da Silva" },
                        { "id": "2", "name": "Beltrano da Silva" },
                    ]),
                    "2" => json!([
                        { "id": "3", "name": "Ciclano da Silva" },
                        { "id": "4", "name": "Fulana da Costa" },
                        { "id": "5", "name": "Beltrana da Silva" },
                    ]),
                    _ => json!([]),
                };
                Ok(into_result_object(json!({ "collaborators": collaborators })))
            },
        )
        .with_response(
            ToolSchema::object()
                .object_array(
                    "collaborators",
                    "The company's collaborators",
                    &[("id", "The collaborator ID"), ("name", "The collaborator name")],
                )
                .build(),
        ),
    )
}

/// Create the `search_docs` tool backed by `index`.
pub fn search_docs_tool(index: Arc<DocumentIndex>) -> Arc<dyn Tool> {
    Arc::new(
        FunctionTool::new(
            "search_docs",
            "Searches the internal document library for information relevant to the query. \
             Use this whenever the user asks about topics that might be covered in internal \
             documentation.",
            ToolSchema::object()
                .string(
                    "query",
                    "The search query describing what information you need",
                    true,
                )
                .build(),
            move |args, _ctx: ToolExecutionContext| {
                let index = Arc::clone(&index);
                async move {
                    let query = args.get_str("query")?;
                    if query.trim().is_empty() {
                        return Err(ColloquyError::ToolExecution {
                            tool_name: "search_docs".into(),
                            message: "query argument is required".into(),
                        });
                    }

                    let results: Vec<_> = index
                        .search(query, SEARCH_DOCS_TOP_K)
                        .into_iter()
                        .map(|hit| {
                            json!({
                                "filename": hit.document.filename,
                                "content": hit.document.text,
                            })
                        })
                        .collect();

                    Ok(into_result_object(json!({ "results": results })))
                }
            },
        )
        .with_response(
            ToolSchema::object()
                .object_array(
                    "results",
                    "Matching excerpts, best first",
                    &[
                        ("filename", "Source document filename"),
                        ("content", "Relevant text excerpt from the document"),
                    ],
                )
                .build(),
        ),
    )
}

/// All built-in tools, `search_docs` reading from `index`.
pub fn all_tools(index: Arc<DocumentIndex>) -> Vec<Arc<dyn Tool>> {
    vec![
        weather_tool(),
        companies_tool(),
        collaborators_tool(),
        search_docs_tool(index),
    ]
}

/// A registry holding every built-in tool.
pub fn default_registry(index: Arc<DocumentIndex>) -> Result<ToolRegistry, ColloquyError> {
    all_tools(index)
        .into_iter()
        .try_fold(ToolRegistry::new(), ToolRegistry::with_tool)
}
