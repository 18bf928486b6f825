use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        // Emails are stored lower-cased, so the unique index is case-insensitive.
        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r"
CREATE TABLE IF NOT EXISTS contributor_requests (
    id UUID PRIMARY KEY NOT NULL,
    survey_id UUID NOT NULL,
    email_address VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT fk_contributor_requests_survey FOREIGN KEY (survey_id) REFERENCES surveys(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS uk_contributor_requests_survey_email ON contributor_requests(survey_id, email_address);
CREATE INDEX IF NOT EXISTS idx_contributor_requests_email ON contributor_requests(email_address);

CREATE TABLE IF NOT EXISTS survey_contributors (
    survey_id UUID NOT NULL,
    user_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (survey_id, user_id),
    CONSTRAINT fk_survey_contributors_survey FOREIGN KEY (survey_id) REFERENCES surveys(id) ON DELETE CASCADE,
    CONSTRAINT fk_survey_contributors_user FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_survey_contributors_user ON survey_contributors(user_id);
                "
            }
            sea_orm::DatabaseBackend::MySql => {
                r"
CREATE TABLE IF NOT EXISTS contributor_requests (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    survey_id VARCHAR(36) NOT NULL,
    email_address VARCHAR(255) NOT NULL,
    created_at TIMESTAMP NOT NULL,
    UNIQUE KEY uk_contributor_requests_survey_email (survey_id, email_address),
    INDEX idx_contributor_requests_email (email_address),
    CONSTRAINT fk_contributor_requests_survey FOREIGN KEY (survey_id) REFERENCES surveys(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS survey_contributors (
    survey_id VARCHAR(36) NOT NULL,
    user_id VARCHAR(36) NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (survey_id, user_id),
    INDEX idx_survey_contributors_user (user_id),
    CONSTRAINT fk_survey_contributors_survey FOREIGN KEY (survey_id) REFERENCES surveys(id) ON DELETE CASCADE,
    CONSTRAINT fk_survey_contributors_user FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);
                "
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r"
CREATE TABLE IF NOT EXISTS contributor_requests (
    id TEXT PRIMARY KEY NOT NULL,
    survey_id TEXT NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
    email_address TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS uk_contributor_requests_survey_email ON contributor_requests(survey_id, email_address);
CREATE INDEX IF NOT EXISTS idx_contributor_requests_email ON contributor_requests(email_address);

CREATE TABLE IF NOT EXISTS survey_contributors (
    survey_id TEXT NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    PRIMARY KEY (survey_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_survey_contributors_user ON survey_contributors(user_id);
                "
            }
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let sql = r"
DROP TABLE IF EXISTS survey_contributors;
DROP TABLE IF EXISTS contributor_requests;
        ";
        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}
