//! Initial database migration.
//!
//! Creates all tables, uniqueness constraints, amount checks, cascade
//! rules, and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TENANT ROOT
        // ============================================================
        db.execute_unprepared(HOUSEHOLDS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCED ENTITIES
        // ============================================================
        db.execute_unprepared(HOUSEHOLD_MEMBERS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 3: BUDGETS AND DEPENDENTS
        // ============================================================
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(INCOMES_SQL).await?;
        db.execute_unprepared(PLANNED_EXPENSES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const HOUSEHOLDS_SQL: &str = r"
CREATE TABLE households (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id uuid NOT NULL UNIQUE,
    name varchar(120) NOT NULL,
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
);
";

const HOUSEHOLD_MEMBERS_SQL: &str = r"
CREATE TABLE household_members (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id uuid NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    full_name varchar(160) NOT NULL,
    is_active boolean NOT NULL DEFAULT true,
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
);

CREATE INDEX household_members_household_idx ON household_members (household_id);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id uuid NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    name varchar(120) NOT NULL,
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX categories_household_name_key
    ON categories (household_id, lower(name));
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id uuid NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    month date NOT NULL CHECK (extract(day from month) = 1),
    note varchar(500),
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now(),
    CONSTRAINT budgets_household_month_key UNIQUE (household_id, month)
);

CREATE INDEX budgets_household_month_idx ON budgets (household_id, month);
";

const INCOMES_SQL: &str = r"
CREATE TABLE incomes (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id uuid NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    budget_id uuid NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    household_member_id uuid NOT NULL REFERENCES household_members(id) ON DELETE RESTRICT,
    amount numeric(9,2) NOT NULL CHECK (amount > 0),
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
);

CREATE INDEX incomes_budget_idx ON incomes (budget_id);
";

const PLANNED_EXPENSES_SQL: &str = r"
CREATE TABLE planned_expenses (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id uuid NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    budget_id uuid NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    category_id uuid NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    limit_amount numeric(9,2) NOT NULL CHECK (limit_amount > 0),
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
);

CREATE INDEX planned_expenses_budget_idx ON planned_expenses (budget_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id uuid NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    budget_id uuid NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    category_id uuid NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    amount numeric(9,2) NOT NULL CHECK (amount > 0),
    transaction_date date NOT NULL,
    note varchar(500),
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
);

CREATE INDEX transactions_budget_idx ON transactions (budget_id);
CREATE INDEX transactions_budget_category_idx ON transactions (budget_id, category_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS trigger AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER households_updated_at BEFORE UPDATE ON households
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER household_members_updated_at BEFORE UPDATE ON household_members
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER categories_updated_at BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER budgets_updated_at BEFORE UPDATE ON budgets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER incomes_updated_at BEFORE UPDATE ON incomes
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER planned_expenses_updated_at BEFORE UPDATE ON planned_expenses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER transactions_updated_at BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS planned_expenses;
DROP TABLE IF EXISTS incomes;
DROP TABLE IF EXISTS budgets;
DROP TABLE IF EXISTS categories;
DROP TABLE IF EXISTS household_members;
DROP TABLE IF EXISTS households;
DROP FUNCTION IF EXISTS set_updated_at();
";
