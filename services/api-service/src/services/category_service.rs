use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain::requests::{CreateCategoryRequest, UpdateCategoryRequest};
use domain::{AppError, Category};
use storage::CategoryRepository;

use super::{normalize, normalize_opt};

/// Business rules for categories: trimmed names, case-insensitive
/// uniqueness, existence checks before update/delete.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, AppError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, AppError> {
        request.validate()?;
        let name = normalize(&request.name);

        if let Some(existing) = self.categories.find_by_name_ci(&name).await? {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                existing.name
            )));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name,
            description: normalize_opt(request.description),
            created_at: now,
            updated_at: now,
        };
        Ok(self.categories.create(&category).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        request.validate()?;

        let existing = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))?;

        let name = match request.name {
            Some(name) => normalize(&name),
            None => existing.name.clone(),
        };
        if let Some(other) = self.categories.find_by_name_ci(&name).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "Category '{}' already exists",
                    other.name
                )));
            }
        }

        let merged = Category {
            id,
            name,
            description: normalize_opt(request.description).or(existing.description),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.categories
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.categories.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Category", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use storage::StorageError;

    mock! {
        Categories {}

        #[async_trait]
        impl CategoryRepository for Categories {
            async fn find_all(&self) -> Result<Vec<Category>, StorageError>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StorageError>;
            async fn find_by_name_ci(&self, name: &str) -> Result<Option<Category>, StorageError>;
            async fn create(&self, category: &Category) -> Result<Category, StorageError>;
            async fn update(&self, category: &Category) -> Result<Option<Category>, StorageError>;
            async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_case_insensitive_duplicate() {
        let mut repo = MockCategories::new();
        repo.expect_find_by_name_ci()
            .withf(|name| name == "pasteles")
            .returning(|_| Ok(Some(category("Pasteles"))));
        repo.expect_create().never();

        let service = CategoryService::new(Arc::new(repo));
        let result = service
            .create(CreateCategoryRequest {
                name: "pasteles".to_string(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let mut repo = MockCategories::new();
        repo.expect_find_by_name_ci()
            .withf(|name| name == "Pasteles")
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|c: &Category| c.name == "Pasteles")
            .returning(|c| Ok(c.clone()));

        let service = CategoryService::new(Arc::new(repo));
        let created = service
            .create(CreateCategoryRequest {
                name: "  Pasteles  ".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Pasteles");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found_without_write() {
        let id = Uuid::new_v4();
        let mut repo = MockCategories::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));
        repo.expect_update().never();

        let service = CategoryService::new(Arc::new(repo));
        let result = service
            .update(
                id,
                UpdateCategoryRequest {
                    name: Some("Panes".to_string()),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_existing_fields() {
        let id = Uuid::new_v4();
        let mut existing = category("Pasteles");
        existing.id = id;
        existing.description = Some("Cakes".to_string());

        let mut repo = MockCategories::new();
        {
            let existing = existing.clone();
            repo.expect_find_by_id()
                .with(eq(id))
                .returning(move |_| Ok(Some(existing.clone())));
        }
        repo.expect_find_by_name_ci()
            .returning(move |_| Ok(None));
        repo.expect_update()
            .withf(move |c: &Category| {
                c.id == id && c.name == "Pasteles" && c.description.as_deref() == Some("Cakes")
            })
            .returning(|c| Ok(Some(c.clone())));

        let service = CategoryService::new(Arc::new(repo));
        let updated = service
            .update(
                id,
                UpdateCategoryRequest {
                    name: None,
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("Cakes"));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let id = Uuid::new_v4();
        let mut repo = MockCategories::new();
        repo.expect_delete().with(eq(id)).returning(|_| Ok(false));

        let service = CategoryService::new(Arc::new(repo));
        let result = service.delete(id).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
