use crate::{Error, tools::ToolRegistry};
use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorData as McpError, Implementation,
        InitializeRequestParam, InitializeResult, ListToolsResult, PaginatedRequestParam,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use tracing::{info, warn};

pub const SERVER_NAME: &str = "Chutes MCP Server";

const SUPPORTED_PROTOCOL_VERSIONS: [ProtocolVersion; 2] =
    [ProtocolVersion::V_2025_03_26, ProtocolVersion::V_2024_11_05];

pub async fn health() -> &'static str {
    "ok"
}

/// Echoes the client's protocol version when it is one we speak, otherwise
/// offers the newest one.
pub fn negotiate_protocol_version(requested: &ProtocolVersion) -> ProtocolVersion {
    if SUPPORTED_PROTOCOL_VERSIONS.contains(requested) {
        requested.clone()
    } else {
        warn!(
            "Client requested unsupported protocol version {:?}, offering the latest",
            requested
        );
        ProtocolVersion::V_2025_03_26
    }
}

/// Maps failures that happen before a tool runs onto JSON-RPC errors.
/// Failures inside a tool are already `isError` results.
pub fn to_mcp_error(error: Error) -> McpError {
    match error {
        Error::ToolNotFound { .. } | Error::InvalidRequest(_) => {
            McpError::invalid_params(error.to_string(), None)
        }
        other => McpError::internal_error(other.to_string(), None),
    }
}

impl ServerHandler for ToolRegistry {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Generates music, video and images and talks to LLMs hosted on Chutes.".to_string(),
            ),
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!(
            "MCP client '{}' connected (protocol {:?})",
            request.client_info.name, request.protocol_version
        );
        let mut info = self.get_info();
        info.protocol_version = negotiate_protocol_version(&request.protocol_version);
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools().to_vec(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(request).await.map_err(to_mcp_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_protocol_versions_are_echoed() {
        assert_eq!(
            negotiate_protocol_version(&ProtocolVersion::V_2024_11_05),
            ProtocolVersion::V_2024_11_05
        );
        assert_eq!(
            negotiate_protocol_version(&ProtocolVersion::V_2025_03_26),
            ProtocolVersion::V_2025_03_26
        );
    }

    #[test]
    fn unknown_protocol_version_falls_back_to_latest() {
        let requested: ProtocolVersion =
            serde_json::from_value(serde_json::json!("1999-01-01")).unwrap();
        assert_eq!(
            negotiate_protocol_version(&requested),
            ProtocolVersion::V_2025_03_26
        );
    }

    #[test]
    fn errors_before_execution_are_invalid_params() {
        let err = to_mcp_error(Error::ToolNotFound {
            tool_name: "nope".to_string(),
        });
        assert_eq!(err.code.0, -32602);

        let err = to_mcp_error(Error::invalid_request("bad args"));
        assert_eq!(err.code.0, -32602);

        let err = to_mcp_error(Error::internal("boom"));
        assert_eq!(err.code.0, -32603);
    }
}
