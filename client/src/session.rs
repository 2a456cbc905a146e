//! Agent catalog and the selected-agent session cell.
//!
//! [`SessionState`] is written only by [`SessionState::select`] and [`SessionState::reconcile`],
//! both of which take `&mut self`; controllers read it through a shared borrow, so every read sees
//! the latest selection.

use crate::{Client, Error, Result};
use hitstand_types::{AgentDescriptor, DEFAULT_AGENT_ID};
use tracing::{debug, info};

/// Agents offered by the service, in the order it listed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentCatalog {
    agents: Vec<AgentDescriptor>,
    loaded: bool,
}

impl AgentCatalog {
    pub fn from_agents(agents: Vec<AgentDescriptor>) -> Self {
        Self {
            agents,
            loaded: true,
        }
    }

    pub async fn fetch(client: &Client) -> Result<Self> {
        let agents = client.agents().await?;
        info!(count = agents.len(), "fetched agent catalog");
        Ok(Self::from_agents(agents))
    }

    /// Whether a catalog response has been received.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn get(&self, id: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.agents.iter().position(|agent| agent.id == id)
    }

    /// `EV` when offered, otherwise the first listed agent.
    pub fn default_agent(&self) -> Option<&AgentDescriptor> {
        self.get(DEFAULT_AGENT_ID).or_else(|| self.agents.first())
    }
}

/// Page-lifetime session: the agent used for single hands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    selected_agent_id: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selected_agent_id: DEFAULT_AGENT_ID.to_string(),
        }
    }
}

impl SessionState {
    pub fn selected_agent_id(&self) -> &str {
        &self.selected_agent_id
    }

    /// Replace the selection. Agents missing from `catalog` are rejected and leave the session
    /// untouched.
    pub fn select(&mut self, catalog: &AgentCatalog, id: &str) -> Result<()> {
        let agent = catalog
            .get(id)
            .ok_or_else(|| Error::UnknownAgent(id.to_string()))?;
        debug!(from = %self.selected_agent_id, to = %agent.id, "agent selected");
        self.selected_agent_id = agent.id.clone();
        Ok(())
    }

    /// Keep exactly one valid selection after a catalog refresh.
    pub fn reconcile(&mut self, catalog: &AgentCatalog) {
        if catalog.contains(&self.selected_agent_id) {
            return;
        }
        if let Some(agent) = catalog.default_agent() {
            debug!(from = %self.selected_agent_id, to = %agent.id, "selection reset to default");
            self.selected_agent_id = agent.id.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, name: &str) -> AgentDescriptor {
        AgentDescriptor {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    fn catalog() -> AgentCatalog {
        AgentCatalog::from_agents(vec![
            agent("EV", "DealerBot (EV)"),
            agent("NAIVE", "PlayerBot (Naive)"),
        ])
    }

    #[test]
    fn test_default_is_ev() {
        assert_eq!(SessionState::default().selected_agent_id(), "EV");
        assert_eq!(catalog().default_agent().map(|a| a.id.as_str()), Some("EV"));
    }

    #[test]
    fn test_select_replaces_selection() {
        let catalog = catalog();
        let mut session = SessionState::default();
        session.select(&catalog, "NAIVE").unwrap();
        assert_eq!(session.selected_agent_id(), "NAIVE");
        session.select(&catalog, "EV").unwrap();
        assert_eq!(session.selected_agent_id(), "EV");
    }

    #[test]
    fn test_unknown_agent_rejected_without_change() {
        let catalog = catalog();
        let mut session = SessionState::default();
        session.select(&catalog, "NAIVE").unwrap();
        let err = session.select(&catalog, "GREEDY").unwrap_err();
        assert!(matches!(err, Error::UnknownAgent(ref id) if id == "GREEDY"));
        assert_eq!(session.selected_agent_id(), "NAIVE");
    }

    #[test]
    fn test_select_before_catalog_rejected() {
        let mut session = SessionState::default();
        assert!(session.select(&AgentCatalog::default(), "EV").is_err());
        assert_eq!(session.selected_agent_id(), "EV");
    }

    #[test]
    fn test_reconcile_falls_back_to_first_agent() {
        let catalog = AgentCatalog::from_agents(vec![agent("NAIVE", "PlayerBot"), agent("RANDOM", "Coin")]);
        let mut session = SessionState::default();
        session.reconcile(&catalog);
        assert_eq!(session.selected_agent_id(), "NAIVE");

        session.select(&catalog, "RANDOM").unwrap();
        session.reconcile(&catalog);
        assert_eq!(session.selected_agent_id(), "RANDOM");
    }

    #[test]
    fn test_reconcile_with_empty_catalog_keeps_selection() {
        let mut session = SessionState::default();
        session.reconcile(&AgentCatalog::from_agents(Vec::new()));
        assert_eq!(session.selected_agent_id(), "EV");
    }
}
