use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The application treats the role set as closed, so the two
        // authorities are seeded here rather than created through the API.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                INSERT INTO tb_role (authority)
                VALUES ('ROLE_OPERATOR'), ('ROLE_ADMIN')
                ON CONFLICT (authority) DO NOTHING
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM tb_role WHERE authority IN ('ROLE_OPERATOR', 'ROLE_ADMIN')",
            )
            .await?;

        Ok(())
    }
}
