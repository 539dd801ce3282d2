#[cfg(test)]
mod tests {
    use crate::error::RosterError;
    use crate::models::{Member, MemberPatch, Video, VideoPatch};
    use crate::record::{
        parse_fields, parse_new_record, parse_patch, FieldMap, FieldValue, FieldValues, Record,
        RecordFields,
    };
    use proptest::prelude::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> FieldMap {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn message(err: RosterError) -> String {
        match err {
            RosterError::ValidationError(message) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_full_member_parses() {
        let member: Member =
            parse_fields(&body(json!({"name": "Ann", "email": "a@x.com"}))).unwrap();
        assert_eq!(member, Member::new("Ann", "a@x.com"));
    }

    #[test]
    fn test_missing_field_reports_its_message() {
        let err = parse_fields::<Member>(&body(json!({"name": "Ann"}))).unwrap_err();
        assert_eq!(message(err), "Email of the member is required");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = parse_fields::<Member>(&body(
            json!({"nam3": "Illegal parameter name", "email": "This is valid"}),
        ))
        .unwrap_err();
        assert_eq!(message(err), "Unknown field 'nam3' for member");
    }

    #[test]
    fn test_id_only_allowed_in_create_bodies() {
        let map = body(json!({"id": 7, "name": "Ann", "email": "a@x.com"}));

        let new_record = parse_new_record::<Member>(&map).unwrap();
        assert_eq!(new_record.id, Some(7));
        assert_eq!(new_record.fields.name, "Ann");

        assert!(parse_fields::<Member>(&map).is_err());
    }

    #[test]
    fn test_form_strings_coerce_to_integers() {
        let video: Video = parse_fields(&body(
            json!({"name": "Joe's Video", "views": "20000", "likes": " 78 "}),
        ))
        .unwrap();
        assert_eq!(video, Video::new("Joe's Video", 20000, 78));
    }

    #[test]
    fn test_non_numeric_integer_is_rejected() {
        let err = parse_fields::<Video>(&body(json!({"name": "v", "views": "lots", "likes": 1})))
            .unwrap_err();
        assert_eq!(message(err), "Field 'views' must be an integer");
    }

    #[test]
    fn test_text_field_rejects_numbers() {
        let err = parse_fields::<Member>(&body(json!({"name": 5, "email": "a@x.com"})))
            .unwrap_err();
        assert_eq!(message(err), "Field 'name' must be a string");
    }

    #[test]
    fn test_patch_keeps_zero_as_an_update() {
        let patch = parse_patch::<Video>(&body(json!({"views": 0}))).unwrap();
        assert_eq!(
            patch,
            VideoPatch {
                name: None,
                views: Some(0),
                likes: None
            }
        );

        let mut video = Video::new("clip", 99, 11);
        video.apply_patch(patch);
        assert_eq!(video, Video::new("clip", 0, 11));
    }

    #[test]
    fn test_patch_rejects_extra_arguments() {
        let err = parse_patch::<Member>(&body(
            json!({"name": "A valid name", "email": "A valid email", "extra_arg": "x"}),
        ))
        .unwrap_err();
        assert_eq!(message(err), "Unknown field 'extra_arg' for member");
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let patch = parse_patch::<Member>(&FieldMap::new()).unwrap();
        assert_eq!(patch, MemberPatch::default());
    }

    #[test]
    fn test_unique_values_for_members_only() {
        let member = Member::new("Ann", "a@x.com");
        assert_eq!(
            member.unique_values(),
            vec![
                ("name", FieldValue::Text("Ann".into())),
                ("email", FieldValue::Text("a@x.com".into()))
            ]
        );
        assert!(Video::new("clip", 1, 2).unique_values().is_empty());
    }

    #[test]
    fn test_field_values_compare_by_kind_and_values() {
        let video = Video::new("clip", 1, 2);
        let values = FieldValues::complete(Video::FIELDS, video.to_values());

        assert_eq!(values, FieldValues::complete(Video::FIELDS, video.to_values()));
        assert_ne!(
            values,
            FieldValues::complete(Member::FIELDS, video.to_values())
        );
        assert_eq!(Video::from_values(&values).unwrap(), video);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record::new(3, Video::new("clip", 1, 2));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 3, "name": "clip", "views": 1, "likes": 2})
        );
    }

    proptest! {
        #[test]
        fn prop_patch_touches_only_named_field(
            name in "[a-zA-Z ]{1,16}",
            views in any::<i64>(),
            likes in any::<i64>(),
            new_likes in any::<i64>(),
        ) {
            let mut video = Video::new(name.clone(), views, likes);
            let patch = parse_patch::<Video>(&body(json!({"likes": new_likes}))).unwrap();
            video.apply_patch(patch);
            prop_assert_eq!(video, Video::new(name, views, new_likes));
        }

        #[test]
        fn prop_values_round_trip(name in ".{0,24}", email in ".{0,24}") {
            let member = Member::new(name, email);
            let map: FieldMap = Member::FIELDS
                .iter()
                .zip(member.to_values())
                .map(|(spec, value)| (spec.name.to_string(), serde_json::to_value(value).unwrap()))
                .collect();
            prop_assert_eq!(parse_fields::<Member>(&map).unwrap(), member);
        }
    }
}
