//! Workflows, workflow states and state transitions.

use crate::client::{ClientError, MfwsClient};
use mfws_model::WorkflowState;
use std::collections::HashMap;

/// Id returned for an alias that matches no item, or more than one.
pub const UNRESOLVED_ALIAS: i32 = -1;

/// Workflow operations, obtained from [`MfwsClient::workflows`].
#[derive(Debug, Clone, Copy)]
pub struct WorkflowOperations<'a> {
    client: &'a MfwsClient,
}

impl<'a> WorkflowOperations<'a> {
    pub(crate) fn new(client: &'a MfwsClient) -> Self {
        Self { client }
    }

    /// States of a workflow.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_workflow_states(
        &self,
        workflow: i32,
    ) -> Result<Vec<WorkflowState>, ClientError> {
        let states: Option<Vec<WorkflowState>> = self
            .client
            .get(&format!("/REST/structure/workflows/{workflow}/states.aspx"))
            .await?;
        Ok(states.unwrap_or_default())
    }

    /// A workflow state found by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_workflow_state_by_name(
        &self,
        workflow: i32,
        name: &str,
    ) -> Result<Option<WorkflowState>, ClientError> {
        let states = self.get_workflow_states(workflow).await?;
        Ok(find_state_by_name(states, name))
    }

    /// Workflow ids for the given aliases, in input order.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_workflow_ids_by_aliases(
        &self,
        aliases: &[&str],
    ) -> Result<Vec<i32>, ClientError> {
        resolve_aliases(self.client, "workflows", aliases).await
    }

    /// Workflow id for one alias, or [`UNRESOLVED_ALIAS`].
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_workflow_id_by_alias(&self, alias: &str) -> Result<i32, ClientError> {
        single(self.get_workflow_ids_by_aliases(&[alias]).await?)
    }

    /// Workflow state ids for the given aliases, in input order.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_workflow_state_ids_by_aliases(
        &self,
        aliases: &[&str],
    ) -> Result<Vec<i32>, ClientError> {
        resolve_aliases(self.client, "workflowstates", aliases).await
    }

    /// Workflow state id for one alias, or [`UNRESOLVED_ALIAS`].
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_workflow_state_id_by_alias(&self, alias: &str) -> Result<i32, ClientError> {
        single(self.get_workflow_state_ids_by_aliases(&[alias]).await?)
    }

    /// State transition ids for the given aliases, in input order.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_state_transition_ids_by_aliases(
        &self,
        aliases: &[&str],
    ) -> Result<Vec<i32>, ClientError> {
        resolve_aliases(self.client, "statetransitions", aliases).await
    }

    /// State transition id for one alias, or [`UNRESOLVED_ALIAS`].
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_state_transition_id_by_alias(
        &self,
        alias: &str,
    ) -> Result<i32, ClientError> {
        single(self.get_state_transition_ids_by_aliases(&[alias]).await?)
    }
}

fn find_state_by_name(states: Vec<WorkflowState>, name: &str) -> Option<WorkflowState> {
    let wanted = name.to_lowercase();
    states.into_iter().find(|state| {
        state
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase() == wanted)
    })
}

/// Resolve aliases of one structure kind through its `itemidbyalias` endpoint.
///
/// An empty alias list is answered locally.
pub(crate) async fn resolve_aliases(
    client: &MfwsClient,
    structure: &str,
    aliases: &[&str],
) -> Result<Vec<i32>, ClientError> {
    if aliases.is_empty() {
        return Ok(Vec::new());
    }

    let resource = format!("/REST/structure/{structure}/itemidbyalias.aspx");
    let resolved: Option<HashMap<String, i32>> = client.post(&resource, aliases).await?;
    let resolved = resolved.unwrap_or_default();

    let ids = map_aliases(aliases, &resolved);
    tracing::trace!(
        structure,
        requested = aliases.len(),
        unresolved = ids.iter().filter(|id| **id == UNRESOLVED_ALIAS).count(),
        "Resolved aliases"
    );
    Ok(ids)
}

fn map_aliases(aliases: &[&str], resolved: &HashMap<String, i32>) -> Vec<i32> {
    aliases
        .iter()
        .map(|alias| resolved.get(*alias).copied().unwrap_or(UNRESOLVED_ALIAS))
        .collect()
}

pub(crate) fn single(ids: Vec<i32>) -> Result<i32, ClientError> {
    ids.into_iter()
        .next()
        .ok_or_else(|| ClientError::Parse("alias lookup returned no id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: i32, name: &str) -> WorkflowState {
        WorkflowState {
            id,
            name: Some(name.to_string()),
            selectable: true,
        }
    }

    #[test]
    fn state_lookup_ignores_case() {
        let states = vec![state(1, "Draft"), state(2, "Approved")];
        assert_eq!(find_state_by_name(states.clone(), "APPROVED").map(|s| s.id), Some(2));
        assert!(find_state_by_name(states, "Rejected").is_none());
    }

    #[test]
    fn missing_aliases_map_to_unresolved() {
        let resolved = HashMap::from([("WF.Approval".to_string(), 104)]);
        assert_eq!(
            map_aliases(&["WF.Missing", "WF.Approval"], &resolved),
            vec![UNRESOLVED_ALIAS, 104]
        );
    }
}
