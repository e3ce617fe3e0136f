//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, GroupRepository, LogRepository, TemplateRepository, AutomationRepository};
use crate::models::*;
use crate::utils::errors::ZapOfertasError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub groups: GroupRepository,
    pub logs: LogRepository,
    pub templates: TemplateRepository,
    pub automation: AutomationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            groups: GroupRepository::new(pool.clone()),
            logs: LogRepository::new(pool.clone()),
            templates: TemplateRepository::new(pool.clone()),
            automation: AutomationRepository::new(pool),
        }
    }

    /// Seed a default template so the dispatch pipeline has something to
    /// render before the operator customizes one
    pub async fn ensure_default_template(&self) -> Result<MessageTemplate, ZapOfertasError> {
        if let Some(template) = self.templates.get_active().await? {
            return Ok(template);
        }

        self.templates
            .save(SaveTemplateRequest {
                name: "padrao".to_string(),
                content: "🔥 {title}\n\n💰 De ~{original_price}~ por *{price}* ({discount}% OFF)\n\n👉 {link}".to_string(),
                is_active: true,
            })
            .await
    }
}
