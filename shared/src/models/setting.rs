//! App Setting Model (key-value overrides)

use serde::{Deserialize, Serialize};

/// System-wide setting row. Values are stored as TEXT and parsed by the
/// consumer (e.g. the quota guard parses its limits as integers).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AppSetting {
    pub key: String,
    pub value: String,
    pub updated_at: i64,
}
