//! QuickPact MCP tools.
//!
//! Exactly five tools are exposed:
//!
//! - `validate` - Return the configured identity number to the calling platform
//! - `create_agreement` - Turn free-text terms into a draft agreement
//! - `sign_agreement` - Sign an agreement as party1, party2 or witness
//! - `get_agreement` - Fetch one agreement with its signatures
//! - `list_agreements` - List agreements, optionally filtered by party or status
//!
//! Every tool except `validate` answers with pretty-printed JSON. Failures are
//! reported in the payload as `{"success": false, "error": {"kind", "message"}}`
//! rather than as transport errors.

use quickpact::QuickPactError;
use quickpact::agreement::{Agreement, AgreementStatus, SignerRole};
use quickpact::service::{AgreementService, AgreementSummary};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo, Tool, ToolsCapability};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Structured failure carried in every error payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolError {
    /// Stable machine-readable kind, e.g. `not_found`.
    pub kind: String,
    /// Human-readable explanation.
    pub message: String,
}

impl From<&QuickPactError> for ToolError {
    fn from(err: &QuickPactError) -> Self {
        ToolError {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Parameters for creating an agreement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateAgreementParams {
    #[schemars(description = "Name or contact of the first party (usually the one doing the work)")]
    pub party1: String,

    #[schemars(description = "Name or contact of the second party (usually the one paying)")]
    pub party2: String,

    #[schemars(
        description = "Plain-text terms, e.g. \"I'll design a logo by Friday, you'll pay ₹2000\""
    )]
    pub terms: String,

    #[schemars(
        description = "When the work is due, e.g. 'by Friday', 'tomorrow', 'within 3 days', '2025-09-01'"
    )]
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Result of creating an agreement.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgreementResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement: Option<AgreementSummary>,

    /// ISO code of the extracted currency, e.g. `INR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

/// Parameters for signing an agreement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SignAgreementParams {
    #[schemars(description = "Agreement id returned by create_agreement (e.g. 'qp_1a2b3c4d')")]
    pub agreement_id: String,

    #[schemars(description = "Name of the person signing")]
    pub signer_name: String,

    #[schemars(description = "Role of the signer: 'party1', 'party2' or 'witness'")]
    pub signer_role: String,
}

/// Result of signing an agreement.
#[derive(Debug, Clone, Serialize)]
pub struct SignAgreementResult {
    pub success: bool,

    pub agreement_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_role: Option<SignerRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgreementStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_label: Option<String>,

    pub fully_signed: bool,

    /// Party roles still waiting for a signature.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub awaiting: Vec<SignerRole>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

/// Parameters for fetching one agreement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetAgreementParams {
    #[schemars(description = "Agreement id (e.g. 'qp_1a2b3c4d')")]
    pub agreement_id: String,
}

/// Result of fetching one agreement.
#[derive(Debug, Clone, Serialize)]
pub struct GetAgreementResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement: Option<Agreement>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub awaiting: Vec<SignerRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

/// Parameters for listing agreements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListAgreementsParams {
    #[schemars(description = "Only agreements where either party name contains this text")]
    #[serde(default)]
    pub filter_party: Option<String>,

    #[schemars(description = "Only agreements in this status: 'draft', 'partially_signed' or 'fully_signed'")]
    #[serde(default)]
    pub filter_status: Option<String>,
}

/// One row of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct AgreementListItem {
    pub agreement_id: String,
    pub party1: String,
    pub party2: String,
    pub status: AgreementStatus,
    pub status_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub created_at: String,
}

impl From<&Agreement> for AgreementListItem {
    fn from(agreement: &Agreement) -> Self {
        let extracted = agreement.extracted();
        let payment = match (extracted.amount, extracted.currency) {
            (Some(amount), Some(currency)) => Some(format!("{}{}", currency.symbol(), amount)),
            (Some(amount), None) => Some(amount.to_string()),
            _ => None,
        };
        let deadline = extracted
            .deadline
            .map(|d| d.to_string())
            .or_else(|| Some(agreement.deadline_raw().clone()).filter(|d| !d.is_empty()));
        AgreementListItem {
            agreement_id: agreement.id().clone(),
            party1: agreement.party1().clone(),
            party2: agreement.party2().clone(),
            status: *agreement.status(),
            status_label: agreement.status().label().to_string(),
            task: extracted.task.clone(),
            payment,
            deadline,
            created_at: agreement.created_at().to_rfc3339(),
        }
    }
}

/// Result of listing agreements. Listing never fails.
#[derive(Debug, Clone, Serialize)]
pub struct ListAgreementsResult {
    pub success: bool,
    pub count: usize,
    pub agreements: Vec<AgreementListItem>,
    pub message: String,
}

/// Result of `validate` when no number is configured.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResult {
    pub success: bool,
    pub error: ToolError,
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Log a failed tool call and shape it for the response payload.
fn report(tool: &str, err: &QuickPactError) -> ToolError {
    if err.is_caller_error() {
        tracing::debug!(tool, kind = err.kind(), "tool call rejected: {}", err);
    } else {
        tracing::error!(tool, kind = err.kind(), "tool call failed: {}", err);
    }
    ToolError::from(err)
}

fn to_pretty_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("Error: {}", e))
}

/// Party roles that have not signed yet.
fn awaiting_parties(agreement: &Agreement) -> Vec<SignerRole> {
    [SignerRole::Party1, SignerRole::Party2]
        .into_iter()
        .filter(|role| agreement.signature(*role).is_none())
        .collect()
}

fn next_steps(summary: &AgreementSummary) -> Vec<String> {
    vec![
        format!(
            "Share agreement id '{}' with both parties",
            summary.agreement_id
        ),
        format!(
            "{} signs with sign_agreement as 'party1', {} as 'party2'",
            summary.party1, summary.party2
        ),
        format!("Shareable link: {}", summary.shareable_url),
    ]
}

/// Names of the exposed tools, in the order they are advertised.
pub const TOOL_NAMES: [&str; 5] = [
    "validate",
    "create_agreement",
    "sign_agreement",
    "get_agreement",
    "list_agreements",
];

// =============================================================================
// MCP Server
// =============================================================================

/// MCP server exposing the QuickPact agreement tools.
#[derive(Clone)]
pub struct QuickPactMcpServer {
    /// Shared across rmcp's per-request tasks.
    service: Arc<AgreementService>,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

impl QuickPactMcpServer {
    pub fn new(service: AgreementService) -> Self {
        Self {
            service: Arc::new(service),
            tool_router: Self::tool_router(),
        }
    }

    /// The tools advertised to clients, in a fixed order.
    pub fn tools() -> Vec<Tool> {
        let mut tools = Self::tool_router().list_all();
        tools.sort_by_key(|t| {
            TOOL_NAMES
                .iter()
                .position(|name| *name == t.name.as_ref())
                .unwrap_or(TOOL_NAMES.len())
        });
        tools
    }
}

#[tool_router]
impl QuickPactMcpServer {
    /// Return the configured identity number verbatim.
    #[tool(
        name = "validate",
        description = "Return the configured phone number so the calling platform can confirm \
                       this server. Use when the platform performs its authentication handshake."
    )]
    pub async fn validate(&self) -> String {
        match self.service.validate() {
            Ok(number) => number,
            Err(e) => to_pretty_json(&ValidateResult {
                success: false,
                error: report("validate", &e),
            }),
        }
    }

    /// Create a draft agreement from free text.
    #[tool(
        name = "create_agreement",
        description = "Create a micro-agreement from plain text. Extracts payment amount, \
                       currency, deadline and task. Use when two people agree on work, payment \
                       or a favour and want it written down."
    )]
    pub async fn create_agreement(
        &self,
        Parameters(params): Parameters<CreateAgreementParams>,
    ) -> String {
        let deadline = params.deadline.as_deref().unwrap_or_default();
        let result = match self.service.create_agreement(
            &params.party1,
            &params.party2,
            &params.terms,
            deadline,
        ) {
            Ok(summary) => CreateAgreementResult {
                success: true,
                currency_code: summary.extracted.currency.map(|c| c.code().to_string()),
                next_steps: next_steps(&summary),
                message: format!(
                    "Agreement {} created between {} and {}. Awaiting signatures.",
                    summary.agreement_id, summary.party1, summary.party2
                ),
                agreement: Some(summary),
                error: None,
            },
            Err(e) => CreateAgreementResult {
                success: false,
                agreement: None,
                currency_code: None,
                next_steps: Vec::new(),
                message: "Agreement was not created".to_string(),
                error: Some(report("create_agreement", &e)),
            },
        };

        to_pretty_json(&result)
    }

    /// Sign an agreement in the given role.
    #[tool(
        name = "sign_agreement",
        description = "Sign an agreement as 'party1', 'party2' or 'witness'. Use when a party \
                       accepts the terms. The agreement is fully signed once both parties have \
                       signed."
    )]
    pub async fn sign_agreement(
        &self,
        Parameters(params): Parameters<SignAgreementParams>,
    ) -> String {
        let result = match self.service.sign_agreement(
            &params.agreement_id,
            &params.signer_name,
            &params.signer_role,
        ) {
            Ok(receipt) => {
                let status = *receipt.agreement.status();
                let message = if receipt.agreement.is_fully_signed() {
                    format!(
                        "{} signed as {}. Agreement {} is now fully signed.",
                        receipt.signer_name,
                        receipt.role,
                        receipt.agreement.id()
                    )
                } else {
                    format!(
                        "{} signed as {}. Agreement {} is {}.",
                        receipt.signer_name,
                        receipt.role,
                        receipt.agreement.id(),
                        status.label()
                    )
                };
                SignAgreementResult {
                    success: true,
                    agreement_id: receipt.agreement.id().clone(),
                    signer_role: Some(receipt.role),
                    status: Some(status),
                    status_label: Some(status.label().to_string()),
                    fully_signed: receipt.agreement.is_fully_signed(),
                    awaiting: awaiting_parties(&receipt.agreement),
                    message,
                    error: None,
                }
            }
            Err(e) => SignAgreementResult {
                success: false,
                agreement_id: params.agreement_id.clone(),
                signer_role: None,
                status: None,
                status_label: None,
                fully_signed: false,
                awaiting: Vec::new(),
                message: "Signature was not recorded".to_string(),
                error: Some(report("sign_agreement", &e)),
            },
        };

        to_pretty_json(&result)
    }

    /// Fetch one agreement.
    #[tool(
        name = "get_agreement",
        description = "Fetch an agreement with its extracted fields, status and signatures. Use \
                       when someone asks about the state of a specific agreement."
    )]
    pub async fn get_agreement(
        &self,
        Parameters(params): Parameters<GetAgreementParams>,
    ) -> String {
        let result = match self.service.get_agreement(&params.agreement_id) {
            Ok(agreement) => GetAgreementResult {
                success: true,
                status_label: Some(agreement.status().label().to_string()),
                currency_code: agreement
                    .extracted()
                    .currency
                    .map(|c| c.code().to_string()),
                awaiting: awaiting_parties(&agreement),
                agreement: Some(agreement),
                error: None,
            },
            Err(e) => GetAgreementResult {
                success: false,
                agreement: None,
                status_label: None,
                currency_code: None,
                awaiting: Vec::new(),
                error: Some(report("get_agreement", &e)),
            },
        };

        to_pretty_json(&result)
    }

    /// List agreements in creation order.
    #[tool(
        name = "list_agreements",
        description = "List agreements in creation order, optionally filtered by party name or \
                       status. Use when someone wants to see their pending or completed \
                       agreements."
    )]
    pub async fn list_agreements(
        &self,
        Parameters(params): Parameters<ListAgreementsParams>,
    ) -> String {
        let agreements = self.service.list_agreements(
            params.filter_party.as_deref(),
            params.filter_status.as_deref(),
        );
        let items: Vec<AgreementListItem> = agreements.iter().map(AgreementListItem::from).collect();
        let message = if items.is_empty() {
            "No agreements found. Create one with create_agreement.".to_string()
        } else {
            format!("{} agreement(s) found", items.len())
        };

        to_pretty_json(&ListAgreementsResult {
            success: true,
            count: items.len(),
            agreements: items,
            message,
        })
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for QuickPactMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "quickpact-mcp".to_string(),
                title: Some("QuickPact Micro-Agreement Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: Some("https://quickpact.app".to_string()),
            },
            instructions: Some(
                "This MCP server turns handshake deals into signed micro-agreements. Use \
                 create_agreement with both parties and the plain-text terms, share the returned \
                 id, then each party calls sign_agreement. Use get_agreement and \
                 list_agreements to check progress."
                    .to_string(),
            ),
        }
    }
}
