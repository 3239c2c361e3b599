//! Persisted KPI snapshot entity
//!
//! Rows are written by an out-of-band pipeline and served newest-first;
//! every numeric field may be absent but is never NaN.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kpi_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub total_energy: Option<f64>,
    pub avg_energy: Option<f64>,
    pub avg_sec: Option<f64>,
    pub anomaly_rate: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
