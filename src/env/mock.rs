use std::{collections::HashMap, env::VarError, sync::Arc};

use tokio::sync::Mutex;

use crate::ArcStr;

/// Mock implementation of the Env actor holding variables in memory.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    variables: Arc<Mutex<HashMap<ArcStr, ArcStr>>>,
}

impl Mock {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a mock holding `variables`.
    pub fn with_variables(variables: HashMap<ArcStr, ArcStr>) -> Self {
        Self {
            variables: Arc::new(Mutex::new(variables)),
        }
    }

    /// Looks up `key` in the mocked variables.
    pub async fn env(&self, key: ArcStr) -> Result<ArcStr, VarError> {
        let variables = self.variables.lock().await;
        variables.get(&key).cloned().ok_or(VarError::NotPresent)
    }
}
