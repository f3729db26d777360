#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use moodlog::db::db::Db;
    use moodlog::db::moods::Moods;
    use moodlog::db::people::People;
    use moodlog::db::places::Places;
    use moodlog::libs::error::StoreError;
    use moodlog::libs::mood::{Emotion, NewMoodEntry};
    use moodlog::libs::person::{NewPerson, PersonPatch, Relationship};
    use moodlog::libs::place::{NewPlace, PlacePatch};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RegistryTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for RegistryTestContext {
        fn setup() -> Self {
            RegistryTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl RegistryTestContext {
        fn db_path(&self) -> PathBuf {
            self.temp_dir.path().join("moodlog.db")
        }

        fn db(&self) -> Db {
            Db::open(&self.db_path()).unwrap()
        }
    }

    #[test_context(RegistryTestContext)]
    #[test]
    fn test_person_crud_round_trip(ctx: &mut RegistryTestContext) {
        let mut people = People::new(ctx.db());

        let mut draft = NewPerson::new("Mira");
        draft.relationship = Some(Relationship::Friend);
        draft.birth_date = NaiveDate::from_ymd_opt(1991, 6, 14);
        draft.hobbies = vec!["climbing".to_string(), "chess".to_string()];
        draft.interests = vec!["jazz".to_string()];

        let person = people.create(&draft).unwrap();
        assert_eq!(person.name, "Mira");
        assert_eq!(person.relationship, Some(Relationship::Friend));
        assert_eq!(person.hobbies, vec!["chess".to_string(), "climbing".to_string()]);
        assert_eq!(person.interests, vec!["jazz".to_string()]);

        let fetched = people.get_by_id(&person.id).unwrap().unwrap();
        assert_eq!(fetched, person);

        // Replacing hobbies leaves interests untouched.
        let patch = PersonPatch {
            hobbies: Some(vec!["pottery".to_string()]),
            ..PersonPatch::default()
        };
        let updated = people.update(&person.id, &patch).unwrap();
        assert_eq!(updated.hobbies, vec!["pottery".to_string()]);
        assert_eq!(updated.interests, vec!["jazz".to_string()]);

        assert!(people.delete(&person.id).unwrap());
        assert!(people.get_by_id(&person.id).unwrap().is_none());
    }

    #[test_context(RegistryTestContext)]
    #[test]
    fn test_person_requires_name(ctx: &mut RegistryTestContext) {
        let mut people = People::new(ctx.db());
        let err = people.create(&NewPerson::new("  ")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test_context(RegistryTestContext)]
    #[test]
    fn test_person_delete_cascades_tag_rows(ctx: &mut RegistryTestContext) {
        let mut people = People::new(ctx.db());
        let mut draft = NewPerson::new("Tomas");
        draft.hobbies = vec!["running".to_string()];
        let person = people.create(&draft).unwrap();

        people.delete(&person.id).unwrap();

        let db = ctx.db();
        let rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM person_tags WHERE person_id = ?1", [&person.id], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test_context(RegistryTestContext)]
    #[test]
    fn test_place_crud_round_trip(ctx: &mut RegistryTestContext) {
        let mut places = Places::new(ctx.db());

        let mut draft = NewPlace::new("Stadtpark");
        draft.latitude = Some(48.186);
        draft.longitude = Some(16.380);
        let place = places.create(&draft).unwrap();

        let fetched = places.get_by_id(&place.id).unwrap().unwrap();
        assert_eq!(fetched, place);

        let patch = PlacePatch {
            notes: Some(Some("good benches".to_string())),
            ..PlacePatch::default()
        };
        let updated = places.update(&place.id, &patch).unwrap();
        assert_eq!(updated.notes.as_deref(), Some("good benches"));
        assert_eq!(updated.latitude, place.latitude);

        assert_eq!(places.list().unwrap().len(), 1);
        assert!(places.delete(&place.id).unwrap());
        assert!(places.get_by_id(&place.id).unwrap().is_none());
    }

    #[test_context(RegistryTestContext)]
    #[test]
    fn test_place_mood_links(ctx: &mut RegistryTestContext) {
        let mut places = Places::new(ctx.db());
        let mut moods = Moods::new(ctx.db());

        let place = places.create(&NewPlace::new("Cafe Anna")).unwrap();
        let entry = moods.save(&NewMoodEntry::new(4, Emotion::Happy)).unwrap();

        places.link_mood(&place.id, &entry.id).unwrap();
        assert_eq!(places.moods_for_place(&place.id).unwrap(), vec![entry.id.clone()]);

        // Deleting the place drops the link but keeps the mood entry.
        places.delete(&place.id).unwrap();
        let db = ctx.db();
        let links: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM place_moods WHERE place_id = ?1", [&place.id], |row| row.get(0))
            .unwrap();
        assert_eq!(links, 0);
        assert!(moods.get_by_id(&entry.id).unwrap().is_some());
    }

    #[test_context(RegistryTestContext)]
    #[test]
    fn test_link_requires_existing_rows(ctx: &mut RegistryTestContext) {
        let mut places = Places::new(ctx.db());
        let place = places.create(&NewPlace::new("Somewhere")).unwrap();

        let err = places.link_mood(&place.id, "no-such-mood").unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
