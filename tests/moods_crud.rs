#[cfg(test)]
mod tests {
    use moodlog::db::db::Db;
    use moodlog::db::moods::Moods;
    use moodlog::libs::error::StoreError;
    use moodlog::libs::mood::{Activity, Emotion, Intensity, LocationMeta, MoodPatch, NewMoodEntry, SocialContext, Weather};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MoodTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MoodTestContext {
        fn setup() -> Self {
            MoodTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl MoodTestContext {
        fn db_path(&self) -> PathBuf {
            self.temp_dir.path().join("moodlog.db")
        }

        fn moods(&self) -> Moods {
            Moods::new(Db::open(&self.db_path()).unwrap())
        }
    }

    fn full_draft() -> NewMoodEntry {
        let mut draft = NewMoodEntry::new(4, Emotion::Happy);
        draft.notes = Some("long walk before dinner".to_string());
        draft.location = Some("Home".to_string());
        draft.social_context = Some(SocialContext::Family);
        draft.weather = Some(Weather::Sunny);
        draft.location_meta = Some(LocationMeta {
            latitude: Some(52.52),
            longitude: Some(13.405),
            description: Some("kitchen table".to_string()),
        });
        draft.tags = vec!["walk".to_string(), "family".to_string(), "walk".to_string()];
        draft.activities = BTreeMap::from([(Activity::Exercise, Intensity::Medium), (Activity::Outdoors, Intensity::High)]);
        draft
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_save_then_get_round_trip(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();

        let saved = moods.save(&full_draft()).unwrap();
        assert!(!saved.id.is_empty());
        assert!(saved.entry_time > 0);
        assert_eq!(saved.rating, 4);
        assert_eq!(saved.emotion, Emotion::Happy);
        // Duplicate tags collapse into a set.
        assert_eq!(saved.tags, vec!["family".to_string(), "walk".to_string()]);
        assert_eq!(saved.activities.get(&Activity::Exercise), Some(&Intensity::Medium));
        assert_eq!(saved.activities.get(&Activity::Outdoors), Some(&Intensity::High));

        let fetched = moods.get_by_id(&saved.id).unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(fetched.location_meta.as_ref().unwrap().description.as_deref(), Some("kitchen table"));
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_save_rejects_out_of_range_rating(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();

        for rating in [0, 6, -1] {
            let err = moods.save(&NewMoodEntry::new(rating, Emotion::Calm)).unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)), "rating {rating} should fail validation");
        }

        // Validation happens before any write.
        assert!(moods.get_page(10, 0).unwrap().is_empty());
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_save_requires_emotion(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();

        let mut draft = NewMoodEntry::new(3, Emotion::Calm);
        draft.emotion = None;
        assert!(matches!(moods.save(&draft).unwrap_err(), StoreError::Validation(_)));

        draft.emotion = Some(Emotion::Other("  ".to_string()));
        assert!(matches!(moods.save(&draft).unwrap_err(), StoreError::Validation(_)));
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_get_by_id_missing_returns_none(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();
        assert!(moods.get_by_id("no-such-id").unwrap().is_none());
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_update_notes_only_leaves_rest_untouched(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();
        let saved = moods.save(&full_draft()).unwrap();

        let patch = MoodPatch {
            notes: Some(Some("edited".to_string())),
            ..MoodPatch::default()
        };
        let updated = moods.update(&saved.id, &patch).unwrap();

        assert_eq!(updated.notes.as_deref(), Some("edited"));
        assert_eq!(updated.rating, saved.rating);
        assert_eq!(updated.emotion, saved.emotion);
        assert_eq!(updated.tags, saved.tags);
        assert_eq!(updated.activities, saved.activities);
        assert!(updated.updated_at >= saved.updated_at);
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_update_replaces_tags_and_activities(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();
        let saved = moods.save(&full_draft()).unwrap();

        let patch = MoodPatch {
            tags: Some(vec!["fresh".to_string()]),
            activities: Some(BTreeMap::from([(Activity::Rest, Intensity::Low)])),
            ..MoodPatch::default()
        };
        let updated = moods.update(&saved.id, &patch).unwrap();

        assert_eq!(updated.tags, vec!["fresh".to_string()]);
        assert_eq!(updated.activities, BTreeMap::from([(Activity::Rest, Intensity::Low)]));
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_update_can_clear_contextual_fields(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();
        let saved = moods.save(&full_draft()).unwrap();

        let patch = MoodPatch {
            location: Some(None),
            weather: Some(None),
            ..MoodPatch::default()
        };
        let updated = moods.update(&saved.id, &patch).unwrap();

        assert!(updated.location.is_none());
        assert!(updated.weather.is_none());
        assert_eq!(updated.social_context, saved.social_context);
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_update_missing_id_is_not_found(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();
        let err = moods.update("no-such-id", &MoodPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_delete_removes_entry_and_children(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();
        let saved = moods.save(&full_draft()).unwrap();

        assert!(moods.delete(&saved.id).unwrap());
        assert!(moods.get_by_id(&saved.id).unwrap().is_none());
        assert!(!moods.delete(&saved.id).unwrap());

        // Link rows cascade with the parent.
        let db = Db::open(&ctx.db_path()).unwrap();
        let tag_rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM mood_tags WHERE mood_id = ?1", [&saved.id], |row| row.get(0))
            .unwrap();
        let activity_rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM mood_activities WHERE mood_id = ?1", [&saved.id], |row| row.get(0))
            .unwrap();
        assert_eq!(tag_rows, 0);
        assert_eq!(activity_rows, 0);
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_child_row_failure_still_writes_remaining_children(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();

        // Break the tag table out from under the repository; the save must
        // surface the failure, but the activity rows are still attempted.
        let db = Db::open(&ctx.db_path()).unwrap();
        db.conn.execute("DROP TABLE mood_tags", []).unwrap();

        let err = moods.save(&full_draft()).unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        let activity_rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM mood_activities", [], |row| row.get(0))
            .unwrap();
        assert_eq!(activity_rows, 2);
    }

    #[test_context(MoodTestContext)]
    #[test]
    fn test_pagination_partitions_without_gaps_or_duplicates(ctx: &mut MoodTestContext) {
        let mut moods = ctx.moods();

        let base = 1_700_000_000_000_i64;
        for i in 0..25 {
            let mut draft = NewMoodEntry::new((i % 5) + 1, Emotion::Neutral);
            draft.entry_time = Some(base + i * 60_000);
            moods.save(&draft).unwrap();
        }

        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let page = moods.get_page(10, offset).unwrap();
            if page.is_empty() {
                break;
            }
            for pair in page.windows(2) {
                assert!(pair[0].entry_time >= pair[1].entry_time, "page must be newest-first");
            }
            seen.extend(page.into_iter().map(|e| e.entry_time));
            offset += 10;
        }

        assert_eq!(seen.len(), 25);
        let expected: Vec<i64> = (0..25).rev().map(|i| base + i * 60_000).collect();
        assert_eq!(seen, expected);
    }
}
