use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Show '{show_id}' not found")]
    ShowNotFound { show_id: String },

    #[error("Company '{company_id}' not found")]
    CompanyNotFound { company_id: String },

    #[error("Unknown inbox kind '{value}'")]
    UnknownInboxKind { value: String },

    #[error("Unknown generation mode '{value}'")]
    UnknownGenerationMode { value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
