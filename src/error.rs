use thiserror::Error;

/// Top-level error type for the forecasting pipeline.
///
/// Every stage reports through one of these variants and the pipeline halts at
/// the first failure; `exit_code` maps the taxonomy onto process exit codes:
///
/// - `2`: input/usage problems (bad file, bad flags, unknown item)
/// - `3`: not enough history for the requested seasonality
/// - `4`: numerical fitting/projection failure
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Failed to load sales data: {0}")]
    Load(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Unknown item '{item}'. Run the `items` subcommand to list available identifiers.")]
    UnknownItem { item: String },

    #[error(
        "Insufficient history: {got} monthly points, but seasonal_periods={period} requires at \
         least {needed} (two full seasonal cycles). Load more history or lower --seasonal-periods."
    )]
    InsufficientData {
        got: usize,
        needed: usize,
        period: usize,
    },

    #[error("Model fit failed: {0}")]
    ModelFit(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Load(_)
            | AppError::InvalidParam(_)
            | AppError::UnknownItem { .. }
            | AppError::Export(_) => 2,
            AppError::InsufficientData { .. } => 3,
            AppError::ModelFit(_) => 4,
        }
    }
}
