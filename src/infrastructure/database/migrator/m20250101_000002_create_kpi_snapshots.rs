//! Create kpi_snapshots table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KpiSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KpiSnapshots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(KpiSnapshots::TotalEnergy).double())
                    .col(ColumnDef::new(KpiSnapshots::AvgEnergy).double())
                    .col(ColumnDef::new(KpiSnapshots::AvgSec).double())
                    .col(ColumnDef::new(KpiSnapshots::AnomalyRate).double())
                    .col(
                        ColumnDef::new(KpiSnapshots::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KpiSnapshots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum KpiSnapshots {
    Table,
    Id,
    TotalEnergy,
    AvgEnergy,
    AvgSec,
    AnomalyRate,
    Timestamp,
}
