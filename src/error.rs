use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Ingredient '{ingredient}' not found in list '{list}'")]
    IngredientNotFound { list: String, ingredient: String },

    #[error("A list named '{0}' already exists")]
    ListExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend failed to {operation}")]
    Upstream { operation: String },

    #[error("Move of '{ingredient}' from '{from_list}' to '{to_list}' failed and could not be fully undone")]
    PartialReconciliation {
        ingredient: String,
        from_list: String,
        to_list: String,
    },
}

impl ListError {
    pub(crate) fn upstream(operation: impl Into<String>) -> Self {
        ListError::Upstream {
            operation: operation.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
