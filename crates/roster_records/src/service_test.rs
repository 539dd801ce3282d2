#[cfg(test)]
mod tests {
    use crate::service::RecordService;
    use proptest::prelude::*;
    use roster_common::{Member, MemberPatch, NewRecord, RosterError, Video, VideoPatch};
    use roster_config::RecordsConfig;
    use roster_db::{MemoryRecordStore, RecordStore, Written};

    type Members = RecordService<Member, MemoryRecordStore<Member>>;
    type Videos = RecordService<Video, MemoryRecordStore<Video>>;

    fn members() -> Members {
        RecordService::new(MemoryRecordStore::new(), &RecordsConfig::default())
    }

    fn videos() -> Videos {
        RecordService::new(MemoryRecordStore::new(), &RecordsConfig::default())
    }

    fn new_member(name: &str, email: &str) -> NewRecord<Member> {
        NewRecord {
            id: None,
            fields: Member::new(name, email),
        }
    }

    #[tokio::test]
    async fn test_list_all_on_empty_store_is_empty_error() {
        let err = members().list_all().await.unwrap_err();
        assert!(matches!(err, RosterError::EmptyError(_)));
    }

    #[tokio::test]
    async fn test_create_then_get_by_key() {
        let service = members();
        let created = service.create(new_member("Ann", "a@x.com")).await.unwrap();

        let found = service.get_by_key("Ann").await.unwrap();

        assert_eq!(found, created);
        assert!(matches!(
            service.get_by_key("ann").await,
            Err(RosterError::NotFoundError(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_or_email_conflicts() {
        let service = members();
        service.create(new_member("Ann", "a@x.com")).await.unwrap();

        let same_name = service.create(new_member("Ann", "other@x.com")).await;
        let same_email = service.create(new_member("Bea", "a@x.com")).await;

        assert!(matches!(same_name, Err(RosterError::ConflictError(_))));
        assert!(matches!(same_email, Err(RosterError::ConflictError(_))));
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_taken_id_conflicts() {
        let service = videos();
        let first = NewRecord {
            id: Some(6),
            fields: Video::new("Intro", 1, 1),
        };
        service.create(first.clone()).await.unwrap();

        let err = service.create(first).await.unwrap_err();

        assert_eq!(err, RosterError::ConflictError("Video ID 6 already in use".into()));
    }

    #[tokio::test]
    async fn test_videos_may_share_a_name() {
        let service = videos();
        let a = NewRecord {
            id: None,
            fields: Video::new("Clip", 1, 1),
        };
        service.create(a.clone()).await.unwrap();
        service.create(a).await.unwrap();

        assert_eq!(service.list_all().await.unwrap().len(), 2);
        assert_eq!(service.get_by_key("Clip").await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_upsert_creates_then_replaces() {
        let service = members();

        let first = service.upsert(4, Member::new("Ann", "a@x.com")).await.unwrap();
        let second = service.upsert(4, Member::new("Ann", "ann@y.org")).await.unwrap();

        assert!(matches!(first, Written::Created(_)));
        assert!(matches!(second, Written::Replaced(_)));
        assert_eq!(
            service.get_by_id(4).await.unwrap().fields,
            Member::new("Ann", "ann@y.org")
        );
    }

    #[tokio::test]
    async fn test_patch_changes_only_present_fields() {
        let service = videos();
        service.upsert(1, Video::new("Intro", 10, 2)).await.unwrap();

        let patched = service
            .patch(
                1,
                VideoPatch {
                    views: Some(0),
                    ..VideoPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.fields, Video::new("Intro", 0, 2));
        assert_eq!(service.get_by_id(1).await.unwrap(), patched);
    }

    #[tokio::test]
    async fn test_patch_never_creates() {
        let service = members();

        let err = service
            .patch(
                3,
                MemberPatch {
                    name: Some("Ann".into()),
                    email: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::NotFoundError(_)));
        assert!(service.store().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_lookups_are_not_found() {
        let service = members();
        let ann = service.create(new_member("Ann", "a@x.com")).await.unwrap();

        service.delete(ann.id).await.unwrap();

        assert!(matches!(
            service.get_by_id(ann.id).await,
            Err(RosterError::NotFoundError(_))
        ));
        assert!(matches!(
            service.delete(ann.id).await,
            Err(RosterError::NotFoundError(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_all_on_empty_store() {
        let strict = members();
        strict.create(new_member("Ann", "a@x.com")).await.unwrap();
        assert_eq!(strict.delete_all().await.unwrap(), 1);
        assert!(matches!(
            strict.delete_all().await,
            Err(RosterError::NotFoundError(_))
        ));

        let lenient: Members = RecordService::new(
            MemoryRecordStore::new(),
            &RecordsConfig {
                idempotent_delete_all: true,
            },
        );
        assert_eq!(lenient.delete_all().await.unwrap(), 0);
    }

    fn block_on<T>(future: impl std::future::Future<Output = T>) -> T {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn prop_upsert_twice_keeps_last_fields(
            id in 1i64..10_000,
            first in (".{0,12}", any::<i64>(), any::<i64>()),
            second in (".{0,12}", any::<i64>(), any::<i64>()),
        ) {
            let service = videos();
            let (a, b) = block_on(async {
                let a = service.upsert(id, Video::new(first.0.clone(), first.1, first.2)).await.unwrap();
                let b = service.upsert(id, Video::new(second.0.clone(), second.1, second.2)).await.unwrap();
                (a, b)
            });

            prop_assert!(matches!(a, Written::Created(_)));
            prop_assert!(matches!(b, Written::Replaced(_)));
            let stored = block_on(service.get_by_id(id)).unwrap();
            prop_assert_eq!(stored.fields, Video::new(second.0, second.1, second.2));
        }

        #[test]
        fn prop_create_then_key_lookup_returns_fields(name in "[A-Za-z]{1,12}", email in "[a-z]{1,8}@x\\.com") {
            let service = members();
            let found = block_on(async {
                service.create(new_member(&name, &email)).await.unwrap();
                service.get_by_key(&name).await.unwrap()
            });
            prop_assert_eq!(found.fields, Member::new(name, email));
        }
    }
}
