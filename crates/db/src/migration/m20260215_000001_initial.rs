//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and triggers for users, budgets,
//! categories, allocations, and expenses.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: BUDGETS & CATEGORIES
        // ============================================================
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(BUDGET_CATEGORIES_SQL).await?;
        db.execute_unprepared(BUDGET_CATEGORY_RELATIONS_SQL).await?;

        // ============================================================
        // PART 4: EXPENSES
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Budget income intervals
CREATE TYPE time_interval AS ENUM (
    'yearly',
    'monthly',
    'weekly'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(150) NOT NULL UNIQUE,
    email VARCHAR(254) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(256) NOT NULL,
    description VARCHAR(2048),
    start_time TIMESTAMPTZ NOT NULL,
    end_time TIMESTAMPTZ NOT NULL,
    interval time_interval NOT NULL,
    income NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_budgets_user ON budgets(user_id);
CREATE INDEX idx_budgets_end_time ON budgets(end_time DESC);
";

const BUDGET_CATEGORIES_SQL: &str = r"
CREATE TABLE budget_categories (
    id UUID PRIMARY KEY,
    name VARCHAR(256) NOT NULL,
    typical_percentage NUMERIC(4, 2),
    typical_monthly_amount NUMERIC(12, 2)
);

CREATE INDEX idx_budget_categories_name ON budget_categories(name);
";

const BUDGET_CATEGORY_RELATIONS_SQL: &str = r"
CREATE TABLE budget_category_relations (
    id UUID PRIMARY KEY,
    budget_id UUID NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES budget_categories(id) ON DELETE CASCADE,
    amount NUMERIC(12, 2) NOT NULL,
    is_percentage BOOLEAN NOT NULL,

    -- One planned amount per category per budget
    CONSTRAINT uq_budget_category UNIQUE (budget_id, category_id)
);

CREATE INDEX idx_relations_budget ON budget_category_relations(budget_id);
CREATE INDEX idx_relations_category ON budget_category_relations(category_id);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(256),
    timestamp TIMESTAMPTZ NOT NULL,
    description VARCHAR(2048),
    category_id UUID REFERENCES budget_categories(id) ON DELETE SET NULL,
    amount NUMERIC(12, 2) NOT NULL
);

CREATE INDEX idx_expenses_user ON expenses(user_id);
CREATE INDEX idx_expenses_timestamp ON expenses(timestamp DESC);
CREATE INDEX idx_expenses_category ON expenses(category_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_budgets_updated_at
    BEFORE UPDATE ON budgets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS budget_category_relations CASCADE;
DROP TABLE IF EXISTS budget_categories CASCADE;
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS time_interval CASCADE;
";
