//! Intent definitions and the registry that owns them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use emi_assist_config::ClassifierConfig;

use crate::similarity::ExampleSpace;
use crate::AgentError;

/// Part an intent plays in the yes/no confirmation exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationRole {
    #[default]
    None,
    /// Choosing this intent asks the user to confirm
    Request,
    Affirm,
    Deny,
}

/// A named category of user request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDefinition {
    pub name: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Retrieval handler name
    pub handler: String,
    #[serde(default)]
    pub confirmation: ConfirmationRole,
}

impl IntentDefinition {
    pub fn new(name: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            examples: Vec::new(),
            keywords: Vec::new(),
            handler: handler.into(),
            confirmation: ConfirmationRole::None,
        }
    }

    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_confirmation(mut self, role: ConfirmationRole) -> Self {
        self.confirmation = role;
        self
    }
}

/// Definition plus its cached example space
#[derive(Debug, Clone)]
pub struct RegisteredIntent {
    pub definition: IntentDefinition,
    pub(crate) space: ExampleSpace,
}

impl RegisteredIntent {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn handler(&self) -> &str {
        &self.definition.handler
    }
}

/// Ordered, immutable set of intents
///
/// Registration order is significant: it breaks ties between equal scores.
#[derive(Debug, Clone)]
pub struct IntentRegistry {
    intents: Vec<RegisteredIntent>,
    index: HashMap<String, usize>,
    fallback: usize,
    priority: usize,
}

impl IntentRegistry {
    /// Build a registry, checking the catalog against the classifier settings
    pub fn new(
        definitions: Vec<IntentDefinition>,
        config: &ClassifierConfig,
    ) -> Result<Self, AgentError> {
        let mut intents = Vec::with_capacity(definitions.len());
        let mut index = HashMap::with_capacity(definitions.len());

        for mut definition in definitions {
            if definition.name.trim().is_empty() {
                return Err(AgentError::Registry("Intent name must not be empty".to_string()));
            }
            if definition.handler.trim().is_empty() {
                return Err(AgentError::Registry(format!(
                    "Intent '{}' has no handler",
                    definition.name
                )));
            }
            if index.contains_key(&definition.name) {
                return Err(AgentError::Registry(format!(
                    "Duplicate intent name '{}'",
                    definition.name
                )));
            }

            // Input is lowercased before matching
            definition.keywords = definition.keywords.iter().map(|k| k.to_lowercase()).collect();

            index.insert(definition.name.clone(), intents.len());
            let space = ExampleSpace::new(&definition.examples);
            intents.push(RegisteredIntent { definition, space });
        }

        let fallback = *index.get(&config.fallback_intent).ok_or_else(|| {
            AgentError::Registry(format!(
                "Fallback intent '{}' is not registered",
                config.fallback_intent
            ))
        })?;
        if !intents[fallback].definition.keywords.is_empty() {
            return Err(AgentError::Registry(format!(
                "Fallback intent '{}' must not have keywords",
                config.fallback_intent
            )));
        }

        let priority = *index.get(&config.priority_intent).ok_or_else(|| {
            AgentError::Registry(format!(
                "Priority intent '{}' is not registered",
                config.priority_intent
            ))
        })?;

        tracing::debug!(intents = intents.len(), "Intent registry loaded");

        Ok(Self {
            intents,
            index,
            fallback,
            priority,
        })
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredIntent> {
        self.index.get(name).map(|&i| &self.intents[i])
    }

    /// Intents in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredIntent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.intents.iter().map(|i| i.name()).collect()
    }

    pub fn fallback(&self) -> &RegisteredIntent {
        &self.intents[self.fallback]
    }

    pub fn priority(&self) -> &RegisteredIntent {
        &self.intents[self.priority]
    }

    /// Distinct handler names referenced by the catalog
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.intents.iter().map(|i| i.handler()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn confirmation_role(&self, name: &str) -> ConfirmationRole {
        self.get(name)
            .map(|i| i.definition.confirmation)
            .unwrap_or_default()
    }
}
