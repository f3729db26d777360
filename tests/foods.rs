#[cfg(test)]
mod tests {
    use moodlog::db::db::Db;
    use moodlog::db::foods::Foods;
    use moodlog::db::people::People;
    use moodlog::db::places::Places;
    use moodlog::libs::error::StoreError;
    use moodlog::libs::food::{FoodPatch, MealType, NewFoodEntry};
    use moodlog::libs::mood::Emotion;
    use moodlog::libs::person::NewPerson;
    use moodlog::libs::place::NewPlace;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct FoodTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for FoodTestContext {
        fn setup() -> Self {
            FoodTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl FoodTestContext {
        fn db_path(&self) -> PathBuf {
            self.temp_dir.path().join("moodlog.db")
        }

        fn db(&self) -> Db {
            Db::open(&self.db_path()).unwrap()
        }
    }

    #[test_context(FoodTestContext)]
    #[test]
    fn test_food_crud_round_trip(ctx: &mut FoodTestContext) {
        let mut people = People::new(ctx.db());
        let mut places = Places::new(ctx.db());
        let mut foods = Foods::new(ctx.db());

        let anna = people.create(&NewPerson::new("Anna")).unwrap();
        let cafe = places.create(&NewPlace::new("Cafe Anna")).unwrap();

        let mut draft = NewFoodEntry::new(MealType::Lunch);
        draft.calories = 620.0;
        draft.protein = 32.0;
        draft.rating = Some(4);
        draft.emotion = Some(Emotion::Grateful);
        draft.restaurant = true;
        draft.people = vec![anna.id.clone(), anna.id.clone()];
        draft.place_id = Some(cafe.id.clone());

        let saved = foods.save(&draft).unwrap();
        assert_eq!(saved.meal_type, MealType::Lunch);
        assert_eq!(saved.calories, 620.0);
        assert_eq!(saved.people, vec![anna.id.clone()]);
        assert_eq!(saved.place_id.as_deref(), Some(cafe.id.as_str()));

        let fetched = foods.get_by_id(&saved.id).unwrap().unwrap();
        assert_eq!(fetched, saved);

        assert!(foods.delete(&saved.id).unwrap());
        assert!(foods.get_by_id(&saved.id).unwrap().is_none());
    }

    #[test_context(FoodTestContext)]
    #[test]
    fn test_food_rejects_negative_macros(ctx: &mut FoodTestContext) {
        let mut foods = Foods::new(ctx.db());

        let mut draft = NewFoodEntry::new(MealType::Snack);
        draft.carbs = -1.0;
        assert!(matches!(foods.save(&draft).unwrap_err(), StoreError::Validation(_)));

        let mut draft = NewFoodEntry::new(MealType::Snack);
        draft.rating = Some(9);
        assert!(matches!(foods.save(&draft).unwrap_err(), StoreError::Validation(_)));
    }

    #[test_context(FoodTestContext)]
    #[test]
    fn test_food_patch_replaces_people(ctx: &mut FoodTestContext) {
        let mut people = People::new(ctx.db());
        let mut foods = Foods::new(ctx.db());

        let anna = people.create(&NewPerson::new("Anna")).unwrap();
        let ben = people.create(&NewPerson::new("Ben")).unwrap();

        let mut draft = NewFoodEntry::new(MealType::Dinner);
        draft.people = vec![anna.id.clone()];
        let saved = foods.save(&draft).unwrap();

        let patch = FoodPatch {
            people: Some(vec![ben.id.clone()]),
            ..FoodPatch::default()
        };
        let updated = foods.update(&saved.id, &patch).unwrap();
        assert_eq!(updated.people, vec![ben.id.clone()]);
    }

    #[test_context(FoodTestContext)]
    #[test]
    fn test_person_delete_unlinks_food_entries(ctx: &mut FoodTestContext) {
        let mut people = People::new(ctx.db());
        let mut foods = Foods::new(ctx.db());

        let anna = people.create(&NewPerson::new("Anna")).unwrap();
        let mut draft = NewFoodEntry::new(MealType::Breakfast);
        draft.people = vec![anna.id.clone()];
        let saved = foods.save(&draft).unwrap();

        people.delete(&anna.id).unwrap();

        let fetched = foods.get_by_id(&saved.id).unwrap().unwrap();
        assert!(fetched.people.is_empty());
    }

    #[test_context(FoodTestContext)]
    #[test]
    fn test_food_pagination_newest_first(ctx: &mut FoodTestContext) {
        let mut foods = Foods::new(ctx.db());

        let base = 1_700_000_000_000_i64;
        for i in 0..7 {
            let mut draft = NewFoodEntry::new(MealType::Snack);
            draft.entry_time = Some(base + i * 1_000);
            foods.save(&draft).unwrap();
        }

        let first = foods.get_page(4, 0).unwrap();
        let second = foods.get_page(4, 4).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 3);
        assert_eq!(first[0].entry_time, base + 6_000);
        assert_eq!(second[2].entry_time, base);
    }
}
