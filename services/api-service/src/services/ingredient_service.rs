use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain::requests::{CreateIngredientRequest, UpdateIngredientRequest};
use domain::{AppError, Ingredient};
use storage::IngredientRepository;

use super::{normalize, normalize_opt};

/// Business rules for ingredients; same shape as categories.
pub struct IngredientService {
    ingredients: Arc<dyn IngredientRepository>,
}

impl IngredientService {
    pub fn new(ingredients: Arc<dyn IngredientRepository>) -> Self {
        Self { ingredients }
    }

    pub async fn list(&self) -> Result<Vec<Ingredient>, AppError> {
        Ok(self.ingredients.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Ingredient, AppError> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient", id))
    }

    pub async fn create(&self, request: CreateIngredientRequest) -> Result<Ingredient, AppError> {
        request.validate()?;
        let name = normalize(&request.name);

        if let Some(existing) = self.ingredients.find_by_name_ci(&name).await? {
            return Err(AppError::Conflict(format!(
                "Ingredient '{}' already exists",
                existing.name
            )));
        }

        let now = Utc::now();
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name,
            description: normalize_opt(request.description),
            unit: normalize_opt(request.unit),
            created_at: now,
            updated_at: now,
        };
        Ok(self.ingredients.create(&ingredient).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateIngredientRequest,
    ) -> Result<Ingredient, AppError> {
        request.validate()?;

        let existing = self
            .ingredients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient", id))?;

        let name = match request.name {
            Some(name) => normalize(&name),
            None => existing.name.clone(),
        };
        if let Some(other) = self.ingredients.find_by_name_ci(&name).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "Ingredient '{}' already exists",
                    other.name
                )));
            }
        }

        let merged = Ingredient {
            id,
            name,
            description: normalize_opt(request.description).or(existing.description),
            unit: normalize_opt(request.unit).or(existing.unit),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.ingredients
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.ingredients.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Ingredient", id))
        }
    }
}
