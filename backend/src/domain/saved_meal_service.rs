use std::sync::Arc;

use tracing::info;

use crate::domain::commands::saved_meal::{
    DeleteSavedMealCommand, DeleteSavedMealResult, ListSavedMealsCommand, ListSavedMealsResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::resolve_parent;
use crate::storage::traits::{FamilyStorage, SavedMealStorage};

/// Listing and deleting a parent's saved favorites. Creation lives with the
/// custom meal builder, since a favorite is always born from one.
#[derive(Clone)]
pub struct SavedMealService {
    family: Arc<dyn FamilyStorage>,
    saved_meals: Arc<dyn SavedMealStorage>,
}

impl SavedMealService {
    pub fn new(family: Arc<dyn FamilyStorage>, saved_meals: Arc<dyn SavedMealStorage>) -> Self {
        Self {
            family,
            saved_meals,
        }
    }

    pub async fn list_saved_meals(
        &self,
        command: ListSavedMealsCommand,
    ) -> DomainResult<ListSavedMealsResult> {
        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let saved_meals = self.saved_meals.list_saved_meals(parent.parent_id).await?;
        Ok(ListSavedMealsResult { saved_meals })
    }

    pub async fn delete_saved_meal(
        &self,
        command: DeleteSavedMealCommand,
    ) -> DomainResult<DeleteSavedMealResult> {
        info!(
            "Deleting saved meal {} for user {}",
            command.saved_meal_id, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;

        let saved_meal = self
            .saved_meals
            .get_saved_meal(command.saved_meal_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("saved meal {} not found", command.saved_meal_id))
            })?;

        if saved_meal.parent_id != parent.parent_id {
            return Err(DomainError::Authorization(format!(
                "saved meal {} does not belong to your account",
                command.saved_meal_id
            )));
        }

        self.saved_meals
            .delete_saved_meal(command.saved_meal_id)
            .await?;

        Ok(DeleteSavedMealResult {
            success_message: format!("Deleted saved meal {:?}", saved_meal.name),
        })
    }
}
