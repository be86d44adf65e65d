// Message codec tests.
//
// Covers the JSON mapping of every message type, the oneof rules on both
// directions, and the request sanity check.

#[cfg(test)]
mod tests {
    use seldon_model_core::message::{
        decode_feedback, decode_message, decode_message_list, encode_message, encode_message_list,
        sanity_check_request, DecodeErrorKind, DefaultData, EncodeError, Meta, Metric, MetricType,
        SeldonMessage, SeldonMessageList, Status, StatusFlag,
    };
    use serde_json::json;

    fn decode_str(s: &str) -> SeldonMessage {
        decode_message(s.as_bytes()).unwrap()
    }

    // ## 1. Decode: accepted shapes

    #[test]
    fn empty_object_decodes_to_empty_message() {
        let m = decode_str("{}");
        assert!(m.is_empty());
        assert_eq!(encode_message(&m).unwrap(), b"{}");
    }

    #[test]
    fn str_data_decodes() {
        let m = decode_str(r#"{"strData":"ndarray"}"#);
        assert_eq!(m.str_data.as_deref(), Some("ndarray"));
        assert_eq!(m.payload_count(), 1);
    }

    #[test]
    fn ndarray_and_names_decode() {
        let m = decode_str(r#"{"data":{"names":["a","b"],"ndarray":[[1,2],[3,4]]}}"#);
        let data = m.data.unwrap();
        assert_eq!(data.names, vec!["a", "b"]);
        assert_eq!(data.ndarray.unwrap(), vec![json!([1, 2]), json!([3, 4])]);
    }

    #[test]
    fn tensor_decodes() {
        let m = decode_str(r#"{"data":{"tensor":{"shape":[2,1],"values":[0.5,1.5]}}}"#);
        let t = m.data.unwrap().tensor.unwrap();
        assert_eq!(t.shape, vec![2, 1]);
        assert_eq!(t.values, vec![0.5, 1.5]);
    }

    #[test]
    fn bin_data_is_base64_on_the_wire() {
        let m = decode_str(r#"{"binData":"aGVsbG8="}"#);
        assert_eq!(m.bin_data.as_deref(), Some(&b"hello"[..]));
        let out = encode_message(&m).unwrap();
        assert_eq!(out, br#"{"binData":"aGVsbG8="}"#);
    }

    #[test]
    fn json_data_keeps_explicit_null() {
        let m = decode_str(r#"{"jsonData":null}"#);
        assert_eq!(m.json_data, Some(serde_json::Value::Null));
        assert_eq!(encode_message(&m).unwrap(), br#"{"jsonData":null}"#);
    }

    #[test]
    fn tftensor_keeps_explicit_null() {
        let m = SeldonMessage {
            data: Some(DefaultData { tftensor: Some(serde_json::Value::Null), ..DefaultData::default() }),
            ..SeldonMessage::default()
        };
        let bytes = encode_message(&m).unwrap();
        assert_eq!(bytes, br#"{"data":{"tftensor":null}}"#);
        assert_eq!(decode_message(&bytes).unwrap(), m);
    }

    #[test]
    fn meta_and_status_decode_with_enum_names_and_numbers() {
        let m = decode_str(
            r#"{
                "meta": {
                    "puid": "abc",
                    "tags": {"model": "v1", "n": 3},
                    "routing": {"router": 1},
                    "requestPath": {"classifier": "img:1"},
                    "metrics": [
                        {"key": "hits", "type": "COUNTER", "value": 1},
                        {"key": "load", "type": 1, "value": 0.25, "tags": {"k": "v"}}
                    ]
                },
                "status": {"code": 200, "info": "ok", "status": "FAILURE"},
                "strData": "x"
            }"#,
        );
        let meta = m.meta.unwrap();
        assert_eq!(meta.puid, "abc");
        assert_eq!(meta.tags["n"], json!(3));
        assert_eq!(meta.routing["router"], 1);
        assert_eq!(meta.request_path["classifier"], "img:1");
        assert_eq!(meta.metrics[0].kind, MetricType::Counter);
        assert_eq!(meta.metrics[1].kind, MetricType::Gauge);
        assert_eq!(meta.metrics[1].tags["k"], "v");
        let status = m.status.unwrap();
        assert_eq!(status.code, 200);
        assert_eq!(status.status, StatusFlag::Failure);
    }

    #[test]
    fn null_fields_are_treated_as_absent() {
        let m = decode_str(r#"{"strData":null,"meta":null,"data":null}"#);
        assert!(m.is_empty());
    }

    // ## 2. Decode: rejected inputs

    #[test]
    fn non_json_is_a_syntax_error() {
        for bad in [&b"not json"[..], b"", b"{", &[0xff, 0xfe][..]] {
            let err = decode_message(bad).unwrap_err();
            assert_eq!(err.kind, DecodeErrorKind::Syntax, "{:?}", bad);
        }
    }

    #[test]
    fn wrong_shapes_are_schema_errors() {
        for bad in [
            r#"[1,2,3]"#,
            r#""just a string""#,
            r#"{"strData": 5}"#,
            r#"{"unknownField": true}"#,
            r#"{"data":{"tensor":{"shape":["a"]}}}"#,
            r#"{"meta":{"metrics":[{"key":"k","type":"HISTOGRAM"}]}}"#,
            r#"{"status":{"status":7}}"#,
            r#"{"binData":"%%%"}"#,
        ] {
            let err = decode_message(bad.as_bytes()).unwrap_err();
            assert_eq!(err.kind, DecodeErrorKind::Schema, "{}", bad);
        }
    }

    #[test]
    fn out_of_range_number_is_a_schema_error() {
        for bad in [
            r#"{"meta":{"metrics":[{"key":"a","value":1e39}]}}"#,
            r#"{"data":{"tensor":{"shape":[4294967296]}}}"#,
        ] {
            let err = decode_message(bad.as_bytes()).unwrap_err();
            assert_eq!(err.kind, DecodeErrorKind::Schema, "{}", bad);
        }
    }

    #[test]
    fn two_payloads_are_rejected() {
        let err = decode_message(br#"{"strData":"a","binData":"YQ=="}"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Validation);

        let err = decode_message(br#"{"data":{"ndarray":[1],"tensor":{"values":[1]}}}"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Validation);
        assert!(err.message.contains("message.data"));
    }

    // ## 3. Encode

    #[test]
    fn defaults_are_omitted_on_output() {
        let m = SeldonMessage {
            status: Some(Status::default()),
            meta: Some(Meta::default()),
            str_data: Some(String::new()),
            ..SeldonMessage::default()
        };
        let out = String::from_utf8(encode_message(&m).unwrap()).unwrap();
        assert_eq!(out, r#"{"status":{},"meta":{},"strData":""}"#);
    }

    #[test]
    fn enums_encode_as_names() {
        let mut m = SeldonMessage::from_str_data("x");
        m.meta_mut().metrics.push(Metric::new("latency", MetricType::Timer, 12.5));
        m.status = Some(Status { status: StatusFlag::Failure, ..Status::default() });
        let v: serde_json::Value = serde_json::from_slice(&encode_message(&m).unwrap()).unwrap();
        assert_eq!(v["meta"]["metrics"][0]["type"], "TIMER");
        assert_eq!(v["status"]["status"], "FAILURE");
    }

    #[test]
    fn encode_rejects_two_payloads() {
        let mut m = SeldonMessage::from_str_data("a");
        m.bin_data = Some(vec![1]);
        assert!(matches!(
            encode_message(&m).unwrap_err(),
            EncodeError::MultiplePayloads { count: 2, .. }
        ));
    }

    #[test]
    fn encode_rejects_non_finite_values() {
        let m = SeldonMessage::from_tensor(vec![2], vec![1.0, f64::NAN]);
        match encode_message(&m).unwrap_err() {
            EncodeError::NonFinite { field } => assert_eq!(field, "data.tensor.values[1]"),
            other => panic!("unexpected error: {other}"),
        }

        let mut m = SeldonMessage::default();
        m.meta_mut().metrics.push(Metric::new("g", MetricType::Gauge, f32::INFINITY));
        assert!(matches!(encode_message(&m).unwrap_err(), EncodeError::NonFinite { .. }));
    }

    #[test]
    fn encode_rejects_unnamed_metric() {
        let mut m = SeldonMessage::default();
        m.meta_mut().metrics.push(Metric::new("ok", MetricType::Counter, 1.0));
        m.meta_mut().metrics.push(Metric::new(" ", MetricType::Counter, 1.0));
        assert!(matches!(
            encode_message(&m).unwrap_err(),
            EncodeError::InvalidMetric { index: 1, .. }
        ));
    }

    // ## 4. Feedback and lists

    #[test]
    fn feedback_decodes_nested_messages() {
        let fb = decode_feedback(
            br#"{"request":{"data":{"ndarray":[[1.0]]}},"truth":{"strData":"cat"},"reward":1.0}"#,
        )
        .unwrap();
        assert_eq!(fb.reward, 1.0);
        assert_eq!(fb.truth.unwrap().str_data.as_deref(), Some("cat"));
        assert!(fb.response.is_none());
    }

    #[test]
    fn feedback_rejects_bad_nested_message() {
        let err = decode_feedback(br#"{"truth":{"strData":"a","jsonData":{}}}"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Validation);
        assert!(err.message.starts_with("truth"));
    }

    #[test]
    fn message_list_encodes_and_decodes() {
        let list = SeldonMessageList {
            seldon_messages: vec![SeldonMessage::from_str_data("a"), SeldonMessage::default()],
        };
        let out = encode_message_list(&list).unwrap();
        assert_eq!(out, br#"{"seldonMessages":[{"strData":"a"},{}]}"#);
        assert_eq!(decode_message_list(&out).unwrap(), list);

        let err = decode_message_list(br#"{"seldonMessages":[{},{"strData":"a","binData":""}]}"#)
            .unwrap_err();
        assert!(err.message.contains("seldonMessages[1]"));
    }

    // ## 5. Request sanity check

    #[test]
    fn sanity_check_requires_a_payload() {
        assert!(sanity_check_request(&decode_str("{}")).is_err());
        assert!(sanity_check_request(&decode_str(r#"{"meta":{"puid":"x"}}"#)).is_err());
        assert!(sanity_check_request(&decode_str(r#"{"data":{"names":["a"]}}"#)).is_err());
        sanity_check_request(&decode_str(r#"{"strData":"x"}"#)).unwrap();
        sanity_check_request(&decode_str(r#"{"binData":"eA=="}"#)).unwrap();
        sanity_check_request(&decode_str(r#"{"data":{"ndarray":[]}}"#)).unwrap();
    }

    #[test]
    fn sanity_check_matches_tensor_shape_to_values() {
        sanity_check_request(&SeldonMessage::from_tensor(vec![2, 2], vec![1.0; 4])).unwrap();
        sanity_check_request(&SeldonMessage::from_tensor(vec![], vec![1.0, 2.0])).unwrap();

        let err = sanity_check_request(&SeldonMessage::from_tensor(vec![2, 3], vec![1.0; 4])).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Validation);
        assert!(err.message.contains("needs 6 values, got 4"));

        assert!(sanity_check_request(&SeldonMessage::from_tensor(vec![-1], vec![])).is_err());
    }
}
