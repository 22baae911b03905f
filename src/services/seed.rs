use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

use crate::entities::solution_stack::{self, Entity as SolutionStack};

// (name, description, category, owner)
const SAMPLE_STACKS: &[(&str, &str, &str, &str)] = &[
    (
        "Customer Web Portal",
        "Public facing web application for customer self-service",
        "Web",
        "digital-experience",
    ),
    (
        "Payments API",
        "Card and wallet payment processing services",
        "API",
        "payments",
    ),
    (
        "Data Warehouse",
        "Central analytics warehouse fed by nightly ETL jobs",
        "Data",
        "data-platform",
    ),
    (
        "Legacy Billing",
        "Legacy web app for invoicing, scheduled for retirement",
        "Web",
        "finance-it",
    ),
    (
        "Observability Stack",
        "Metrics, logs and traces for all production workloads",
        "Platform",
        "sre",
    ),
    (
        "Identity Service",
        "Single sign-on and directory integration",
        "Security",
        "identity",
    ),
];

/// Inserts the sample stacks when the table is empty. Returns the number of
/// rows inserted.
pub async fn seed_solution_stacks(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let existing = SolutionStack::find().count(db).await?;
    if existing > 0 {
        tracing::info!(existing, "Solution stacks already present, skipping seed");
        return Ok(0);
    }

    let stacks = SAMPLE_STACKS
        .iter()
        .map(|(name, description, category, owner)| {
            solution_stack::ActiveModel::new_stack(name, description, category, owner)
        });

    let inserted = SolutionStack::insert_many(stacks)
        .exec_without_returning(db)
        .await?;

    tracing::info!(inserted, "Seeded sample solution stacks");
    Ok(inserted)
}
