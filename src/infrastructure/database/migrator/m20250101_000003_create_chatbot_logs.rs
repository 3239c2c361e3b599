//! Create chatbot_logs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatbotLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatbotLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatbotLogs::UserId).string())
                    .col(ColumnDef::new(ChatbotLogs::Message).text().not_null())
                    .col(ColumnDef::new(ChatbotLogs::Response).text().not_null())
                    .col(ColumnDef::new(ChatbotLogs::Context).json())
                    .col(
                        ColumnDef::new(ChatbotLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatbotLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChatbotLogs {
    Table,
    Id,
    UserId,
    Message,
    Response,
    Context,
    CreatedAt,
}
