//! Pricing rule repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::pricing_rule::{
    CreatePricingRuleRequest, PricingConditions, UpdatePricingRuleRequest,
};

use crate::entities::pricing_rule::PRICING_RULE_COLUMNS;
use crate::entities::PricingRuleEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PricingRuleRepository {
    pool: PgPool,
}

impl PricingRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &CreatePricingRuleRequest,
    ) -> Result<PricingRuleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pricing_rule");
        let c = &input.conditions;
        let sql = format!(
            r#"
            INSERT INTO pricing_rules (
                name, description, adjustment_kind, adjustment_value,
                cond_make, cond_body_type, cond_min_year, cond_max_year,
                cond_min_price, cond_max_price, priority, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            PRICING_RULE_COLUMNS
        );
        let result = sqlx::query_as::<_, PricingRuleEntity>(&sql)
            .bind(input.name.trim())
            .bind(input.description.as_deref())
            .bind(input.adjustment_kind.as_str())
            .bind(input.adjustment_value)
            .bind(c.make.as_deref().map(str::trim))
            .bind(c.body_type.map(|b| b.as_str()))
            .bind(c.min_year)
            .bind(c.max_year)
            .bind(c.min_price)
            .bind(c.max_price)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PricingRuleEntity>, sqlx::Error> {
        let sql = format!("SELECT {} FROM pricing_rules WHERE id = $1", PRICING_RULE_COLUMNS);
        sqlx::query_as::<_, PricingRuleEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All rules in evaluation order (priority, then creation time).
    pub async fn list(&self, active_only: bool) -> Result<Vec<PricingRuleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pricing_rules");
        let sql = format!(
            r#"
            SELECT {} FROM pricing_rules
            WHERE (NOT $1 OR is_active)
            ORDER BY priority, created_at, id
            "#,
            PRICING_RULE_COLUMNS
        );
        let result = sqlx::query_as::<_, PricingRuleEntity>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Partial update. When `conditions` is present it replaces the whole set.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdatePricingRuleRequest,
    ) -> Result<Option<PricingRuleEntity>, sqlx::Error> {
        let replace_conditions = input.conditions.is_some();
        let c = input.conditions.clone().unwrap_or_else(PricingConditions::default);
        let sql = format!(
            r#"
            UPDATE pricing_rules SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                adjustment_kind = COALESCE($4, adjustment_kind),
                adjustment_value = COALESCE($5, adjustment_value),
                cond_make = CASE WHEN $6 THEN $7 ELSE cond_make END,
                cond_body_type = CASE WHEN $6 THEN $8 ELSE cond_body_type END,
                cond_min_year = CASE WHEN $6 THEN $9 ELSE cond_min_year END,
                cond_max_year = CASE WHEN $6 THEN $10 ELSE cond_max_year END,
                cond_min_price = CASE WHEN $6 THEN $11 ELSE cond_min_price END,
                cond_max_price = CASE WHEN $6 THEN $12 ELSE cond_max_price END,
                priority = COALESCE($13, priority),
                is_active = COALESCE($14, is_active)
            WHERE id = $1
            RETURNING {}
            "#,
            PRICING_RULE_COLUMNS
        );
        sqlx::query_as::<_, PricingRuleEntity>(&sql)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.description.as_deref())
            .bind(input.adjustment_kind.map(|k| k.as_str()))
            .bind(input.adjustment_value)
            .bind(replace_conditions)
            .bind(c.make.as_deref().map(str::trim))
            .bind(c.body_type.map(|b| b.as_str()))
            .bind(c.min_year)
            .bind(c.max_year)
            .bind(c.min_price)
            .bind(c.max_price)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
