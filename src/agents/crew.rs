use crate::agents::prompts::{
    REPORTER_PROMPT, RESEARCHER_PROMPT, SCRAPER_PROMPT, SUPERVISOR_PROMPT,
};
use crate::tools::registry::ToolRegistry;
use crate::types::{AppError, Result, ToolDefinition};
use crate::utils::toml_config::{LlmConfig, ScoutConfig, SupervisorConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Supervisor,
    Researcher,
    Scraper,
    Reporter,
}

/// What the orchestrator needs to instantiate one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub role: AgentRole,
    pub system_prompt: String,
    pub tools: Vec<String>,
    pub model: String,
    pub temperature: f32,
}

impl AgentSpec {
    fn new(
        name: &str,
        role: AgentRole,
        system_prompt: &str,
        tools: &[&str],
        llm: &LlmConfig,
    ) -> Self {
        Self {
            name: name.to_string(),
            role,
            system_prompt: system_prompt.to_string(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
            model: llm.model.clone(),
            temperature: llm.temperature,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchCrew {
    pub agents: Vec<AgentSpec>,
    /// How the supervisor reports the crew's work back
    pub supervisor: SupervisorConfig,
}

impl Default for ResearchCrew {
    fn default() -> Self {
        Self::default_crew()
    }
}

impl ResearchCrew {
    pub const SUPERVISOR: &'static str = "supervisor";
    pub const RESEARCHER: &'static str = "researcher_agent";
    pub const SCRAPER: &'static str = "scrapper_agent";
    pub const REPORTER: &'static str = "reporter_agent";

    /// The four-agent roster on the default model, supervisor settings included.
    pub fn default_crew() -> Self {
        Self::roster(&LlmConfig::default(), SupervisorConfig::default())
    }

    fn roster(llm: &LlmConfig, supervisor: SupervisorConfig) -> Self {
        Self {
            agents: vec![
                AgentSpec::new(
                    Self::SUPERVISOR,
                    AgentRole::Supervisor,
                    SUPERVISOR_PROMPT,
                    &[],
                    llm,
                ),
                AgentSpec::new(
                    Self::RESEARCHER,
                    AgentRole::Researcher,
                    RESEARCHER_PROMPT,
                    &["web_search"],
                    llm,
                ),
                AgentSpec::new(
                    Self::SCRAPER,
                    AgentRole::Scraper,
                    SCRAPER_PROMPT,
                    &["web_scraper"],
                    llm,
                ),
                AgentSpec::new(
                    Self::REPORTER,
                    AgentRole::Reporter,
                    REPORTER_PROMPT,
                    &[],
                    llm,
                ),
            ],
            supervisor,
        }
    }

    /// Roster built on `[llm]` and `[supervisor]`, with `[agents.*]` overrides applied.
    ///
    /// Overrides for names outside the crew are ignored.
    pub fn from_config(config: &ScoutConfig) -> Self {
        let mut crew = Self::roster(&config.llm, config.supervisor.clone());

        for agent in &mut crew.agents {
            let Some(overrides) = config.get_agent(&agent.name) else {
                continue;
            };
            if let Some(prompt) = &overrides.system_prompt {
                agent.system_prompt = prompt.clone();
            }
            if let Some(tools) = &overrides.tools {
                agent.tools = tools.clone();
            }
            if let Some(model) = &overrides.model {
                agent.model = model.clone();
            }
            if let Some(temperature) = overrides.temperature {
                agent.temperature = temperature;
            }
            debug!(agent = %agent.name, "Applied agent overrides");
        }

        crew
    }

    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn by_role(&self, role: AgentRole) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.role == role)
    }

    /// Every tool an agent references must be registered.
    pub fn validate(&self, registry: &ToolRegistry) -> Result<()> {
        for agent in &self.agents {
            for tool in &agent.tools {
                if !registry.has_tool(tool) {
                    return Err(AppError::NotFound(format!(
                        "Tool '{}' referenced by agent '{}' is not registered",
                        tool, agent.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Tool definitions to hand to the model backing `agent`.
    pub fn tool_definitions_for(
        &self,
        agent: &str,
        registry: &ToolRegistry,
    ) -> Result<Vec<ToolDefinition>> {
        let spec = self
            .get(agent)
            .ok_or_else(|| AppError::NotFound(format!("Agent not found: {}", agent)))?;

        spec.tools
            .iter()
            .map(|tool| {
                registry.get_tool_definition(tool).ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Tool '{}' referenced by agent '{}' is not registered",
                        tool, agent
                    ))
                })
            })
            .collect()
    }
}
